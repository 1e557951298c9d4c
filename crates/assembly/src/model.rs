//! Piece and group storage.
//!
//! `Model` owns every piece and group of one assembly. Groups refer to their
//! members by `PieceId`; a piece refers back to its group by `GroupId`, and
//! only `add_to_group` / `remove_from_group` write that back-reference.

use std::fmt;

use crate::colour::Colour;
use crate::error::{AssemblyError, Result};
use crate::geometry::{Frame, Matrix, Vector};
use crate::piece::{Piece, Record};

/// Handle to a piece stored in a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(usize);

/// Handle to a group stored in a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Ordered set of pieces sharing a coordinate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Frame offset relative to the world
    pub position: Vector,
    pub orientation: Matrix,
    members: Vec<PieceId>,
}

impl Group {
    fn new(frame: Frame) -> Self {
        Self {
            position: frame.position,
            orientation: frame.orientation,
            members: Vec::new(),
        }
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.orientation)
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[PieceId] {
        &self.members
    }

    pub fn contains(&self, piece: PieceId) -> bool {
        self.members.contains(&piece)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Arena of pieces and groups.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pieces: Vec<Piece>,
    groups: Vec<Group>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Groups ──────────────────────────────────────────────

    /// Create an empty group with the given frame offset.
    pub fn add_group(&mut self, frame: Frame) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group::new(frame));
        id
    }

    pub fn group(&self, id: GroupId) -> Result<&Group> {
        self.groups.get(id.0).ok_or(AssemblyError::UnknownGroup(id))
    }

    /// Mutable access to a group's frame. Membership changes go through
    /// [`Model::add_to_group`] and [`Model::remove_from_group`].
    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut Group> {
        self.groups
            .get_mut(id.0)
            .ok_or(AssemblyError::UnknownGroup(id))
    }

    // ── Pieces ──────────────────────────────────────────────

    /// Store `piece` and, when `owner` is given, register it in that group.
    pub fn add_piece(&mut self, piece: Piece, owner: Option<GroupId>) -> Result<PieceId> {
        if let Some(group) = owner {
            self.group(group)?;
        }
        let id = PieceId(self.pieces.len());
        self.pieces.push(piece);
        if let Some(group) = owner {
            self.add_to_group(group, id)?;
        }
        Ok(id)
    }

    /// Construct a piece (upper-casing `part`) and store it.
    pub fn place(
        &mut self,
        colour: Colour,
        position: Vector,
        orientation: Matrix,
        part: &str,
        owner: Option<GroupId>,
    ) -> Result<PieceId> {
        self.add_piece(Piece::new(colour, position, orientation, part), owner)
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece> {
        self.pieces.get(id.0).ok_or(AssemblyError::UnknownPiece(id))
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    // ── Membership ──────────────────────────────────────────

    /// Append `piece` to `group`, taking it out of its previous group first.
    pub fn add_to_group(&mut self, group: GroupId, piece: PieceId) -> Result<()> {
        self.group(group)?;
        let previous = self.piece(piece)?.owner();

        match previous {
            Some(owner) if owner == group => return Ok(()),
            Some(owner) => {
                tracing::debug!("Moving {} from {} to {}", piece, owner, group);
                self.remove_from_group(owner, piece)?;
            }
            None => {}
        }

        self.groups[group.0].members.push(piece);
        self.pieces[piece.0].set_owner(Some(group));
        Ok(())
    }

    /// Remove `piece` from `group`. Fails if it is not a member.
    pub fn remove_from_group(&mut self, group: GroupId, piece: PieceId) -> Result<()> {
        self.piece(piece)?;
        let members = &mut self.group_mut(group)?.members;
        let index = members
            .iter()
            .position(|&member| member == piece)
            .ok_or(AssemblyError::NotAMember { piece, group })?;
        members.remove(index);
        self.pieces[piece.0].set_owner(None);
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────

    /// Resolved record for one piece, with its owner's frame applied.
    pub fn record(&self, id: PieceId) -> Result<Record> {
        let piece = self.piece(id)?;
        let parent = match piece.owner() {
            Some(group) => self.group(group)?.frame(),
            None => Frame::IDENTITY,
        };
        Ok(piece.record_in(&parent))
    }

    /// One record line for a piece.
    pub fn render_piece(&self, id: PieceId) -> Result<String> {
        Ok(self.record(id)?.to_string())
    }

    /// Records of a group's members, in member order.
    pub fn group_records(&self, id: GroupId) -> Result<Vec<Record>> {
        self.group(id)?
            .members
            .iter()
            .map(|&piece| self.record(piece))
            .collect()
    }

    /// Member records joined by newlines (no trailing newline).
    pub fn render_group(&self, id: GroupId) -> Result<String> {
        let lines: Vec<String> = self
            .group_records(id)?
            .iter()
            .map(Record::to_string)
            .collect();
        Ok(lines.join("\n"))
    }
}
