//! Serializable description of a complete minifigure.
//!
//! A `Pose` lists colours, joint angles and optional accessories; `assemble`
//! feeds it through [`Person`] in a fixed order: head, hat, torso, backpack,
//! hips, legs and shoes, then each arm with its hand and held item.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::Result;
use crate::figure::Person;
use crate::geometry::{Axis, Frame, Rotate};
use crate::model::{GroupId, Model, PieceId};
use crate::parts::PartTable;

/// One step of the figure's base orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationStep {
    pub axis: Axis,
    /// Degrees
    pub angle: f64,
}

/// Colours per body region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseColours {
    pub head: Colour,
    pub hat: Colour,
    pub torso: Colour,
    pub arms: Colour,
    pub hands: Colour,
    pub hips: Colour,
    pub legs: Colour,
    pub backpack: Colour,
    pub shoes: Colour,
    pub items: Colour,
}

impl Default for PoseColours {
    fn default() -> Self {
        Self {
            head: Colour::YELLOW,
            hat: Colour::BROWN,
            torso: Colour::RED,
            arms: Colour::RED,
            hands: Colour::YELLOW,
            hips: Colour::BLUE,
            legs: Colour::BLUE,
            backpack: Colour::LIGHT_GREY,
            shoes: Colour::BLACK,
            items: Colour::DARK_GREY,
        }
    }
}

/// Joint angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseAngles {
    pub head: f64,
    pub left_arm: f64,
    pub right_arm: f64,
    pub left_hand: f64,
    pub right_hand: f64,
    pub left_leg: f64,
    pub right_leg: f64,
    pub left_shoe: f64,
    pub right_shoe: f64,
}

/// Something held in a hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldItem {
    pub part: String,
    /// Offset from the hand, in the hand's frame
    #[serde(default)]
    pub displacement: [f64; 3],
    #[serde(default)]
    pub angle: f64,
}

/// Optional pieces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessories {
    pub hat: bool,
    /// Backpack offset from the torso; no backpack when absent
    pub backpack: Option<[f64; 3]>,
    pub left_item: Option<HeldItem>,
    pub right_item: Option<HeldItem>,
    pub left_shoe: Option<String>,
    pub right_shoe: Option<String>,
}

impl Default for Accessories {
    fn default() -> Self {
        Self {
            hat: true,
            backpack: None,
            left_item: None,
            right_item: None,
            left_shoe: None,
            right_shoe: None,
        }
    }
}

/// Complete minifigure description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub position: [f64; 3],
    /// Applied in order, each composed on the right
    pub rotation: Vec<RotationStep>,
    pub colours: PoseColours,
    pub angles: PoseAngles,
    pub accessories: Accessories,
    pub parts: PartTable,
    /// Hips and two posable legs instead of the fixed hips-and-legs part.
    /// Shoes need separate legs.
    pub separate_legs: bool,
}

impl Pose {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Base frame of the figure.
    pub fn frame(&self) -> Frame {
        let orientation = self
            .rotation
            .iter()
            .fold(DMat3::IDENTITY, |m, step| m.rotate(step.angle, step.axis));
        Frame::new(DVec3::from_array(self.position), orientation)
    }

    /// Place every piece of the figure into `model`, returning the ids in
    /// placement order.
    pub fn assemble(&self, model: &mut Model, group: Option<GroupId>) -> Result<Vec<PieceId>> {
        let mut person = Person::new(self.frame(), group).with_parts(self.parts.clone());
        let colours = &self.colours;
        let angles = &self.angles;
        let extras = &self.accessories;
        let mut placed = Vec::new();

        placed.push(person.head(model, colours.head, angles.head)?);
        if extras.hat {
            placed.extend(person.hat(model, colours.hat)?);
        }
        placed.push(person.torso(model, colours.torso)?);
        if let Some(offset) = extras.backpack {
            let offset = DVec3::from_array(offset);
            placed.push(person.backpack(model, colours.backpack, Some(offset))?);
        }

        if self.separate_legs {
            placed.push(person.hips(model, colours.hips)?);
            placed.push(person.left_leg(model, colours.legs, angles.left_leg)?);
            placed.push(person.right_leg(model, colours.legs, angles.right_leg)?);
            placed.extend(person.left_shoe(
                model,
                colours.shoes,
                angles.left_shoe,
                extras.left_shoe.as_deref(),
            )?);
            placed.extend(person.right_shoe(
                model,
                colours.shoes,
                angles.right_shoe,
                extras.right_shoe.as_deref(),
            )?);
        } else {
            placed.push(person.hips_and_legs(model, colours.hips)?);
        }

        placed.push(person.left_arm(model, colours.arms, angles.left_arm)?);
        placed.extend(person.left_hand(model, colours.hands, angles.left_hand)?);
        if let Some(item) = &extras.left_item {
            placed.extend(person.left_hand_item(
                model,
                colours.items,
                DVec3::from_array(item.displacement),
                item.angle,
                Some(item.part.as_str()),
            )?);
        }

        placed.push(person.right_arm(model, colours.arms, angles.right_arm)?);
        placed.extend(person.right_hand(model, colours.hands, angles.right_hand)?);
        if let Some(item) = &extras.right_item {
            placed.extend(person.right_hand_item(
                model,
                colours.items,
                DVec3::from_array(item.displacement),
                item.angle,
                Some(item.part.as_str()),
            )?);
        }

        tracing::debug!("Assembled minifigure from {} pieces", placed.len());
        Ok(placed)
    }
}
