//! Part codes used by the figure builder.

use serde::{Deserialize, Serialize};

fn default_head() -> String {
    // Head with SW smirk and brown eyebrows pattern
    "3626bps5".to_string()
}

fn default_hat() -> String {
    "3901".to_string()
}

fn default_torso() -> String {
    "973".to_string()
}

fn default_backpack() -> String {
    // Airtanks
    "3838".to_string()
}

fn default_hips_and_legs() -> String {
    "3815c01".to_string()
}

fn default_hips() -> String {
    "3815b".to_string()
}

fn default_left_arm() -> String {
    "3819".to_string()
}

fn default_right_arm() -> String {
    "3818".to_string()
}

fn default_hand() -> String {
    "3820".to_string()
}

fn default_left_leg() -> String {
    "3817b".to_string()
}

fn default_right_leg() -> String {
    "3816b".to_string()
}

/// Part codes for every anatomical placement of a minifigure.
///
/// Any field missing from a deserialized table falls back to the standard
/// minifigure part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTable {
    #[serde(default = "default_head")]
    pub head: String,
    #[serde(default = "default_hat")]
    pub hat: String,
    #[serde(default = "default_torso")]
    pub torso: String,
    #[serde(default = "default_backpack")]
    pub backpack: String,
    #[serde(default = "default_hips_and_legs")]
    pub hips_and_legs: String,
    #[serde(default = "default_hips")]
    pub hips: String,
    #[serde(default = "default_left_arm")]
    pub left_arm: String,
    #[serde(default = "default_right_arm")]
    pub right_arm: String,
    /// Shared by both hands
    #[serde(default = "default_hand")]
    pub hand: String,
    #[serde(default = "default_left_leg")]
    pub left_leg: String,
    #[serde(default = "default_right_leg")]
    pub right_leg: String,
}

impl Default for PartTable {
    fn default() -> Self {
        Self {
            head: default_head(),
            hat: default_hat(),
            torso: default_torso(),
            backpack: default_backpack(),
            hips_and_legs: default_hips_and_legs(),
            hips: default_hips(),
            left_arm: default_left_arm(),
            right_arm: default_right_arm(),
            hand: default_hand(),
            left_leg: default_left_leg(),
            right_leg: default_right_leg(),
        }
    }
}
