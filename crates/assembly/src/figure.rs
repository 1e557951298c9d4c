//! Minifigure builder.
//!
//! `Person` places the parts of a minifigure relative to its own frame.
//! Primary placements (head, torso, arms, legs, ...) only need the figure's
//! frame. Dependent placements (hat, hands, hand items, shoes) are anchored
//! on the piece last placed in a slot; when that slot is still empty they
//! place nothing and return `Ok(None)`.

use std::collections::HashMap;
use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::Result;
use crate::geometry::{Axis, Frame, Matrix, Rotate, Vector};
use crate::model::{GroupId, Model, PieceId};
use crate::parts::PartTable;

/// Anatomical anchor points that later placements depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Head,
    LeftArm,
    LeftHand,
    LeftLeg,
    RightArm,
    RightHand,
    RightLeg,
}

impl Slot {
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::LeftArm => "left arm",
            Slot::LeftHand => "left hand",
            Slot::LeftLeg => "left leg",
            Slot::RightArm => "right arm",
            Slot::RightHand => "right hand",
            Slot::RightLeg => "right leg",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Skeleton offsets, in the figure's (or anchor's) local frame
const HEAD_OFFSET: DVec3 = DVec3::new(0.0, -24.0, 0.0);
const HIPS_OFFSET: DVec3 = DVec3::new(0.0, 32.0, 0.0);
const LEFT_ARM_OFFSET: DVec3 = DVec3::new(15.0, 8.0, 0.0);
const RIGHT_ARM_OFFSET: DVec3 = DVec3::new(-15.0, 8.0, 0.0);
const LEFT_HAND_OFFSET: DVec3 = DVec3::new(4.0, 17.0, -9.0);
const RIGHT_HAND_OFFSET: DVec3 = DVec3::new(-4.0, 17.0, -9.0);
const LEG_OFFSET: DVec3 = DVec3::new(0.0, 44.0, 0.0);
const LEFT_SHOE_OFFSET: DVec3 = DVec3::new(10.0, 28.0, 0.0);
const RIGHT_SHOE_OFFSET: DVec3 = DVec3::new(-10.0, 28.0, 0.0);

/// Shoulder tilt of the arms about Z, in degrees
const ARM_TILT: f64 = 10.0;
/// Wrist bend of the hands about X, in degrees
const WRIST_BEND: f64 = 40.0;
/// Grip tilt of held items about X, in degrees
const GRIP_TILT: f64 = 10.0;

/// Builder for one minifigure.
#[derive(Debug, Clone)]
pub struct Person {
    /// Base frame of the figure (torso origin)
    pub position: Vector,
    pub orientation: Matrix,
    group: Option<GroupId>,
    parts: PartTable,
    slots: HashMap<Slot, PieceId>,
}

impl Person {
    /// New figure at `frame`, registering its pieces in `group` if given.
    pub fn new(frame: Frame, group: Option<GroupId>) -> Self {
        Self {
            position: frame.position,
            orientation: frame.orientation,
            group,
            parts: PartTable::default(),
            slots: HashMap::new(),
        }
    }

    pub fn with_parts(mut self, parts: PartTable) -> Self {
        self.parts = parts;
        self
    }

    pub fn parts(&self) -> &PartTable {
        &self.parts
    }

    /// Part codes are read at placement time, so edits apply to later calls.
    pub fn parts_mut(&mut self) -> &mut PartTable {
        &mut self.parts
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Piece most recently placed in `slot`.
    pub fn piece(&self, slot: Slot) -> Option<PieceId> {
        self.slots.get(&slot).copied()
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.orientation)
    }

    // ── Head ────────────────────────────────────────────────

    /// Head, turned by `angle` degrees about the neck.
    pub fn head(&mut self, model: &mut Model, colour: Colour, angle: f64) -> Result<PieceId> {
        let orientation = self.orientation.rotate(angle, Axis::Y);
        let id = self.place_primary(model, colour, HEAD_OFFSET, orientation, &self.parts.head)?;
        self.slots.insert(Slot::Head, id);
        Ok(id)
    }

    /// Hat sitting on the head.
    pub fn hat(&mut self, model: &mut Model, colour: Colour) -> Result<Option<PieceId>> {
        let Some(head) = self.anchor(model, Slot::Head)? else {
            return Ok(None);
        };
        let position = head.transform_point(DVec3::ZERO);
        let id = self.place(model, colour, position, head.orientation, &self.parts.hat)?;
        Ok(Some(id))
    }

    // ── Body ────────────────────────────────────────────────

    pub fn torso(&mut self, model: &mut Model, colour: Colour) -> Result<PieceId> {
        self.place_primary(model, colour, DVec3::ZERO, self.orientation, &self.parts.torso)
    }

    /// Backpack, displaced from the torso by `displacement` (origin when
    /// `None`).
    pub fn backpack(
        &mut self,
        model: &mut Model,
        colour: Colour,
        displacement: Option<Vector>,
    ) -> Result<PieceId> {
        let offset = displacement.unwrap_or(DVec3::ZERO);
        self.place_primary(model, colour, offset, self.orientation, &self.parts.backpack)
    }

    /// Hips with both legs as one part.
    pub fn hips_and_legs(&mut self, model: &mut Model, colour: Colour) -> Result<PieceId> {
        self.place_primary(
            model,
            colour,
            HIPS_OFFSET,
            self.orientation,
            &self.parts.hips_and_legs,
        )
    }

    /// Hips only; legs are placed separately.
    pub fn hips(&mut self, model: &mut Model, colour: Colour) -> Result<PieceId> {
        self.place_primary(model, colour, HIPS_OFFSET, self.orientation, &self.parts.hips)
    }

    // ── Arms and hands ──────────────────────────────────────

    /// Left arm, swung forward/back by `angle` degrees.
    pub fn left_arm(&mut self, model: &mut Model, colour: Colour, angle: f64) -> Result<PieceId> {
        let orientation = self
            .orientation
            .rotate(-ARM_TILT, Axis::Z)
            .rotate(angle, Axis::X);
        let id = self.place_primary(
            model,
            colour,
            LEFT_ARM_OFFSET,
            orientation,
            &self.parts.left_arm,
        )?;
        self.slots.insert(Slot::LeftArm, id);
        Ok(id)
    }

    pub fn right_arm(&mut self, model: &mut Model, colour: Colour, angle: f64) -> Result<PieceId> {
        let orientation = self
            .orientation
            .rotate(ARM_TILT, Axis::Z)
            .rotate(angle, Axis::X);
        let id = self.place_primary(
            model,
            colour,
            RIGHT_ARM_OFFSET,
            orientation,
            &self.parts.right_arm,
        )?;
        self.slots.insert(Slot::RightArm, id);
        Ok(id)
    }

    /// Left hand on the end of the left arm, twisted by `angle` degrees.
    pub fn left_hand(
        &mut self,
        model: &mut Model,
        colour: Colour,
        angle: f64,
    ) -> Result<Option<PieceId>> {
        self.hand(model, Slot::LeftArm, Slot::LeftHand, LEFT_HAND_OFFSET, colour, angle)
    }

    pub fn right_hand(
        &mut self,
        model: &mut Model,
        colour: Colour,
        angle: f64,
    ) -> Result<Option<PieceId>> {
        self.hand(model, Slot::RightArm, Slot::RightHand, RIGHT_HAND_OFFSET, colour, angle)
    }

    /// Item held in the left hand at `displacement` from the hand. Nothing
    /// is placed without a part.
    pub fn left_hand_item(
        &mut self,
        model: &mut Model,
        colour: Colour,
        displacement: Vector,
        angle: f64,
        part: Option<&str>,
    ) -> Result<Option<PieceId>> {
        self.hand_item(model, Slot::LeftHand, colour, displacement, angle, part)
    }

    pub fn right_hand_item(
        &mut self,
        model: &mut Model,
        colour: Colour,
        displacement: Vector,
        angle: f64,
        part: Option<&str>,
    ) -> Result<Option<PieceId>> {
        self.hand_item(model, Slot::RightHand, colour, displacement, angle, part)
    }

    // ── Legs and shoes ──────────────────────────────────────

    /// Left leg, swung by `angle` degrees about the hip.
    pub fn left_leg(&mut self, model: &mut Model, colour: Colour, angle: f64) -> Result<PieceId> {
        let orientation = self.orientation.rotate(angle, Axis::X);
        let id =
            self.place_primary(model, colour, LEG_OFFSET, orientation, &self.parts.left_leg)?;
        self.slots.insert(Slot::LeftLeg, id);
        Ok(id)
    }

    pub fn right_leg(&mut self, model: &mut Model, colour: Colour, angle: f64) -> Result<PieceId> {
        let orientation = self.orientation.rotate(angle, Axis::X);
        let id =
            self.place_primary(model, colour, LEG_OFFSET, orientation, &self.parts.right_leg)?;
        self.slots.insert(Slot::RightLeg, id);
        Ok(id)
    }

    /// Shoe (flipper, ski, ...) under the left leg. Nothing is placed
    /// without a part.
    pub fn left_shoe(
        &mut self,
        model: &mut Model,
        colour: Colour,
        angle: f64,
        part: Option<&str>,
    ) -> Result<Option<PieceId>> {
        self.shoe(model, Slot::LeftLeg, LEFT_SHOE_OFFSET, colour, angle, part)
    }

    pub fn right_shoe(
        &mut self,
        model: &mut Model,
        colour: Colour,
        angle: f64,
        part: Option<&str>,
    ) -> Result<Option<PieceId>> {
        self.shoe(model, Slot::RightLeg, RIGHT_SHOE_OFFSET, colour, angle, part)
    }

    // ── Placement helpers ───────────────────────────────────

    fn place(
        &self,
        model: &mut Model,
        colour: Colour,
        position: Vector,
        orientation: Matrix,
        part: &str,
    ) -> Result<PieceId> {
        let id = model.place(colour, position, orientation, part, self.group)?;
        tracing::debug!("Placed {} ({}) as {} at {:?}", part, colour, id, position);
        Ok(id)
    }

    /// Place a piece displaced from the figure's own frame.
    fn place_primary(
        &self,
        model: &mut Model,
        colour: Colour,
        displacement: Vector,
        orientation: Matrix,
        part: &str,
    ) -> Result<PieceId> {
        let position = self.frame().transform_point(displacement);
        self.place(model, colour, position, orientation, part)
    }

    /// Current frame of the piece in `slot`, if any.
    fn anchor(&self, model: &Model, slot: Slot) -> Result<Option<Frame>> {
        match self.slots.get(&slot) {
            Some(&id) => Ok(Some(model.piece(id)?.frame())),
            None => {
                tracing::debug!("No {} placed yet, skipping dependent piece", slot);
                Ok(None)
            }
        }
    }

    fn hand(
        &mut self,
        model: &mut Model,
        arm: Slot,
        slot: Slot,
        offset: Vector,
        colour: Colour,
        angle: f64,
    ) -> Result<Option<PieceId>> {
        let Some(arm) = self.anchor(model, arm)? else {
            return Ok(None);
        };
        let position = arm.transform_point(offset);
        let orientation = arm
            .orientation
            .rotate(WRIST_BEND, Axis::X)
            .rotate(angle, Axis::Z);
        let id = self.place(model, colour, position, orientation, &self.parts.hand)?;
        self.slots.insert(slot, id);
        Ok(Some(id))
    }

    fn hand_item(
        &self,
        model: &mut Model,
        hand: Slot,
        colour: Colour,
        displacement: Vector,
        angle: f64,
        part: Option<&str>,
    ) -> Result<Option<PieceId>> {
        let Some(hand) = self.anchor(model, hand)? else {
            return Ok(None);
        };
        let Some(part) = part.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let position = hand.transform_point(displacement);
        let orientation = hand
            .orientation
            .rotate(GRIP_TILT, Axis::X)
            .rotate(angle, Axis::Y);
        self.place(model, colour, position, orientation, part).map(Some)
    }

    fn shoe(
        &self,
        model: &mut Model,
        leg: Slot,
        offset: Vector,
        colour: Colour,
        angle: f64,
        part: Option<&str>,
    ) -> Result<Option<PieceId>> {
        let Some(leg) = self.anchor(model, leg)? else {
            return Ok(None);
        };
        let Some(part) = part.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let position = leg.transform_point(offset);
        let orientation = leg.orientation.rotate(angle, Axis::Y);
        self.place(model, colour, position, orientation, part).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotation;

    const EPS: f64 = 1e-9;

    fn setup() -> (Model, GroupId, Person) {
        let mut model = Model::new();
        let group = model.add_group(Frame::IDENTITY);
        let person = Person::new(Frame::IDENTITY, Some(group));
        (model, group, person)
    }

    #[test]
    fn test_torso_record_on_identity_figure() {
        let (mut model, _, mut person) = setup();
        let torso = person.torso(&mut model, Colour::RED).unwrap();
        assert_eq!(
            model.render_piece(torso).unwrap(),
            "1 4 0.000000 0.000000 0.000000 1.000000 0.000000 0.000000 \
             0.000000 1.000000 0.000000 0.000000 0.000000 1.000000 973.DAT"
        );
    }

    #[test]
    fn test_hat_before_head_places_nothing() {
        let (mut model, group, mut person) = setup();
        assert_eq!(person.hat(&mut model, Colour::BLACK).unwrap(), None);
        assert_eq!(model.piece_count(), 0);
        assert!(model.group(group).unwrap().is_empty());
    }

    #[test]
    fn test_hat_follows_head() {
        let (mut model, _, mut person) = setup();
        person.head(&mut model, Colour::YELLOW, 30.0).unwrap();
        let hat = person.hat(&mut model, Colour::BLACK).unwrap().unwrap();

        let piece = model.piece(hat).unwrap();
        assert_eq!(piece.part(), "3901");
        assert!(piece.position.abs_diff_eq(DVec3::new(0.0, -24.0, 0.0), EPS));
        assert!(piece.orientation.abs_diff_eq(rotation(30.0, Axis::Y), EPS));
    }

    #[test]
    fn test_head_records_slot() {
        let (mut model, _, mut person) = setup();
        assert_eq!(person.piece(Slot::Head), None);
        let head = person.head(&mut model, Colour::YELLOW, 0.0).unwrap();
        assert_eq!(person.piece(Slot::Head), Some(head));
        assert_eq!(model.piece(head).unwrap().part(), "3626BPS5");
    }

    #[test]
    fn test_left_arm_and_hand() {
        let (mut model, _, mut person) = setup();
        let arm = person.left_arm(&mut model, Colour::RED, 0.0).unwrap();
        let hand = person.left_hand(&mut model, Colour::YELLOW, 0.0).unwrap().unwrap();

        let arm_orientation = rotation(-10.0, Axis::Z) * rotation(0.0, Axis::X);
        let arm = model.piece(arm).unwrap();
        assert!(arm.position.abs_diff_eq(DVec3::new(15.0, 8.0, 0.0), EPS));
        assert!(arm.orientation.abs_diff_eq(arm_orientation, EPS));

        let hand = model.piece(hand).unwrap();
        let expected = DVec3::new(15.0, 8.0, 0.0) + arm_orientation * DVec3::new(4.0, 17.0, -9.0);
        assert!(hand.position.abs_diff_eq(expected, EPS));
        assert!(hand
            .orientation
            .abs_diff_eq(arm_orientation * rotation(40.0, Axis::X), EPS));
        assert_eq!(hand.part(), "3820");
    }

    #[test]
    fn test_right_arm_mirrors_left() {
        let (mut model, _, mut person) = setup();
        let arm = person.right_arm(&mut model, Colour::RED, -30.0).unwrap();
        let hand = person.right_hand(&mut model, Colour::YELLOW, 15.0).unwrap().unwrap();

        let arm_orientation = rotation(10.0, Axis::Z) * rotation(-30.0, Axis::X);
        let arm = model.piece(arm).unwrap();
        assert!(arm.position.abs_diff_eq(DVec3::new(-15.0, 8.0, 0.0), EPS));
        assert!(arm.orientation.abs_diff_eq(arm_orientation, EPS));
        assert_eq!(arm.part(), "3818");

        let hand = model.piece(hand).unwrap();
        let expected =
            DVec3::new(-15.0, 8.0, 0.0) + arm_orientation * DVec3::new(-4.0, 17.0, -9.0);
        assert!(hand.position.abs_diff_eq(expected, EPS));
        let expected_orientation =
            arm_orientation * rotation(40.0, Axis::X) * rotation(15.0, Axis::Z);
        assert!(hand.orientation.abs_diff_eq(expected_orientation, EPS));
    }

    #[test]
    fn test_hand_without_arm_places_nothing() {
        let (mut model, _, mut person) = setup();
        person.left_arm(&mut model, Colour::RED, 0.0).unwrap();
        assert_eq!(person.right_hand(&mut model, Colour::YELLOW, 0.0).unwrap(), None);
        assert_eq!(person.piece(Slot::RightHand), None);
        assert_eq!(model.piece_count(), 1);
    }

    #[test]
    fn test_hand_item_needs_hand_and_part() {
        let (mut model, _, mut person) = setup();
        let offset = DVec3::new(0.0, 0.0, -10.0);

        // No hand yet
        assert_eq!(
            person
                .left_hand_item(&mut model, Colour::BLACK, offset, 0.0, Some("3959"))
                .unwrap(),
            None
        );

        person.left_arm(&mut model, Colour::RED, 0.0).unwrap();
        let hand = person.left_hand(&mut model, Colour::YELLOW, 0.0).unwrap().unwrap();

        // No part
        assert_eq!(
            person.left_hand_item(&mut model, Colour::BLACK, offset, 0.0, None).unwrap(),
            None
        );
        assert_eq!(
            person.left_hand_item(&mut model, Colour::BLACK, offset, 0.0, Some("")).unwrap(),
            None
        );
        assert_eq!(model.piece_count(), 2);

        let item = person
            .left_hand_item(&mut model, Colour::BLACK, offset, 20.0, Some("3959"))
            .unwrap()
            .unwrap();
        let hand = model.piece(hand).unwrap().clone();
        let item = model.piece(item).unwrap();
        assert_eq!(item.part(), "3959");
        assert!(item
            .position
            .abs_diff_eq(hand.position + hand.orientation * offset, EPS));
        let expected = hand.orientation * rotation(10.0, Axis::X) * rotation(20.0, Axis::Y);
        assert!(item.orientation.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_legs_and_shoes() {
        let (mut model, _, mut person) = setup();
        assert_eq!(
            person.left_shoe(&mut model, Colour::BLACK, 0.0, Some("2599")).unwrap(),
            None
        );

        let left = person.left_leg(&mut model, Colour::BLUE, 20.0).unwrap();
        let right = person.right_leg(&mut model, Colour::BLUE, -20.0).unwrap();
        assert_eq!(model.piece(left).unwrap().part(), "3817B");
        assert_eq!(model.piece(right).unwrap().part(), "3816B");

        // Shoes are optional
        assert_eq!(person.right_shoe(&mut model, Colour::BLACK, 0.0, None).unwrap(), None);

        let shoe = person
            .left_shoe(&mut model, Colour::BLACK, 5.0, Some("2599"))
            .unwrap()
            .unwrap();
        let leg_orientation = rotation(20.0, Axis::X);
        let shoe = model.piece(shoe).unwrap();
        let expected = DVec3::new(0.0, 44.0, 0.0) + leg_orientation * DVec3::new(10.0, 28.0, 0.0);
        assert!(shoe.position.abs_diff_eq(expected, EPS));
        assert!(shoe
            .orientation
            .abs_diff_eq(leg_orientation * rotation(5.0, Axis::Y), EPS));

        let shoe = person
            .right_shoe(&mut model, Colour::BLACK, 0.0, Some("2599"))
            .unwrap()
            .unwrap();
        let expected =
            DVec3::new(0.0, 44.0, 0.0) + rotation(-20.0, Axis::X) * DVec3::new(-10.0, 28.0, 0.0);
        assert!(model.piece(shoe).unwrap().position.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_hips_backpack_offsets() {
        let (mut model, _, mut person) = setup();
        let hips = person.hips_and_legs(&mut model, Colour::BLUE).unwrap();
        let bare = person.hips(&mut model, Colour::BLUE).unwrap();
        let pack = person.backpack(&mut model, Colour::LIGHT_GREY, None).unwrap();
        let moved = person
            .backpack(&mut model, Colour::LIGHT_GREY, Some(DVec3::new(0.0, 0.0, 10.0)))
            .unwrap();

        assert_eq!(model.piece(hips).unwrap().position, DVec3::new(0.0, 32.0, 0.0));
        assert_eq!(model.piece(hips).unwrap().part(), "3815C01");
        assert_eq!(model.piece(bare).unwrap().part(), "3815B");
        assert_eq!(model.piece(pack).unwrap().position, DVec3::ZERO);
        assert_eq!(model.piece(pack).unwrap().part(), "3838");
        assert_eq!(model.piece(moved).unwrap().position, DVec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_figure_frame_is_applied() {
        let mut model = Model::new();
        let frame = Frame::new(DVec3::new(100.0, 0.0, -40.0), rotation(90.0, Axis::Y));
        let mut person = Person::new(frame, None);

        let head = person.head(&mut model, Colour::YELLOW, 0.0).unwrap();
        let arm = person.left_arm(&mut model, Colour::RED, 45.0).unwrap();

        let head = model.piece(head).unwrap();
        assert_eq!(head.owner(), None);
        assert!(head.position.abs_diff_eq(frame.transform_point(HEAD_OFFSET), EPS));

        let arm = model.piece(arm).unwrap();
        let expected = frame.orientation * rotation(-10.0, Axis::Z) * rotation(45.0, Axis::X);
        assert!(arm.orientation.abs_diff_eq(expected, EPS));
        assert!(arm
            .position
            .abs_diff_eq(DVec3::new(100.0, 8.0, -55.0), EPS));
    }

    #[test]
    fn test_dependent_reads_latest_slot() {
        let (mut model, _, mut person) = setup();
        person.head(&mut model, Colour::YELLOW, 0.0).unwrap();
        person.position = DVec3::new(0.0, 0.0, 50.0);
        person.head(&mut model, Colour::YELLOW, 0.0).unwrap();

        let hat = person.hat(&mut model, Colour::BLACK).unwrap().unwrap();
        assert!(model
            .piece(hat)
            .unwrap()
            .position
            .abs_diff_eq(DVec3::new(0.0, -24.0, 50.0), EPS));
    }

    #[test]
    fn test_part_table_override() {
        let (mut model, _, mut person) = setup();
        person.parts_mut().torso = "973p01".to_string();
        let torso = person.torso(&mut model, Colour::WHITE).unwrap();
        assert_eq!(model.piece(torso).unwrap().part(), "973P01");

        let mut parts = PartTable::default();
        parts.hat = "3624".to_string();
        let mut police = Person::new(Frame::IDENTITY, None).with_parts(parts);
        police.head(&mut model, Colour::YELLOW, 0.0).unwrap();
        let hat = police.hat(&mut model, Colour::BLACK).unwrap().unwrap();
        assert_eq!(model.piece(hat).unwrap().part(), "3624");
    }

    #[test]
    fn test_pieces_join_target_group_in_order() {
        let (mut model, group, mut person) = setup();
        let head = person.head(&mut model, Colour::YELLOW, 0.0).unwrap();
        let torso = person.torso(&mut model, Colour::RED).unwrap();
        let hat = person.hat(&mut model, Colour::BLACK).unwrap().unwrap();

        assert_eq!(model.group(group).unwrap().members(), &[head, torso, hat]);
        assert_eq!(person.piece(Slot::Head), Some(head));
    }
}
