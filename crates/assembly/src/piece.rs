//! Placed parts and their LDraw type-1 records.

use std::fmt;

use serde::Serialize;

use crate::colour::Colour;
use crate::geometry::{Frame, Matrix, Vector};
use crate::model::GroupId;

/// A part placed with a colour, position and orientation.
///
/// `position` and `orientation` are relative to the owning group's frame
/// when the piece has an owner, otherwise they are world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub colour: Colour,
    pub position: Vector,
    pub orientation: Matrix,
    part: String,
    owner: Option<GroupId>,
}

impl Piece {
    /// Create an unowned piece. The part code is upper-cased.
    pub fn new(colour: Colour, position: Vector, orientation: Matrix, part: &str) -> Self {
        Self {
            colour,
            position,
            orientation,
            part: part.to_uppercase(),
            owner: None,
        }
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    /// Group currently owning this piece.
    pub fn owner(&self) -> Option<GroupId> {
        self.owner
    }

    /// Only the model's group operations write the owner.
    pub(crate) fn set_owner(&mut self, owner: Option<GroupId>) {
        self.owner = owner;
    }

    /// The piece's own frame, used as an anchor for dependent placements.
    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.orientation)
    }

    /// Resolve the record with `parent` applied on top of the piece's own
    /// placement.
    pub fn record_in(&self, parent: &Frame) -> Record {
        Record::new(
            self.colour,
            parent.transform_point(self.position),
            parent.transform_orientation(self.orientation),
            &self.part,
        )
    }
}

/// One serialized placement line:
///
/// `1 <colour> <x> <y> <z> <a> <b> <c> <d> <e> <f> <g> <h> <i> <PART>.DAT`
///
/// Floats are printed with six decimals, the matrix row by row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub colour: i32,
    pub position: [f64; 3],
    /// Row-major
    pub orientation: [[f64; 3]; 3],
    pub part: String,
}

impl Record {
    pub fn new(colour: Colour, position: Vector, orientation: Matrix, part: &str) -> Self {
        Self {
            colour: colour.code,
            position: position.to_array(),
            orientation: [
                orientation.row(0).to_array(),
                orientation.row(1).to_array(),
                orientation.row(2).to_array(),
            ],
            part: part.to_string(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 {} ", self.colour)?;
        for value in self.position {
            write!(f, "{:.6} ", value)?;
        }
        for row in self.orientation {
            for value in row {
                write!(f, "{:.6} ", value)?;
            }
        }
        write!(f, "{}.DAT", self.part)
    }
}
