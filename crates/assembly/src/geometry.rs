//! Rigid-body geometry on top of `glam`.
//!
//! Positions are `DVec3`, orientations are `DMat3`. Composition follows the
//! `parent * local` convention: the right-hand operand is applied first, in
//! the local frame.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// Position / displacement in LDraw units.
pub type Vector = DVec3;

/// 3×3 orientation matrix.
pub type Matrix = DMat3;

/// Principal axis for rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotation of `degrees` about a principal axis.
pub fn rotation(degrees: f64, axis: Axis) -> Matrix {
    let radians = degrees.to_radians();
    match axis {
        Axis::X => DMat3::from_rotation_x(radians),
        Axis::Y => DMat3::from_rotation_y(radians),
        Axis::Z => DMat3::from_rotation_z(radians),
    }
}

/// Right-composition of principal-axis rotations.
pub trait Rotate {
    /// Returns `self * rotation(degrees, axis)`.
    fn rotate(self, degrees: f64, axis: Axis) -> Self;
}

impl Rotate for Matrix {
    fn rotate(self, degrees: f64, axis: Axis) -> Self {
        self * rotation(degrees, axis)
    }
}

/// Coordinate frame: an offset and an orientation relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Vector,
    pub orientation: Matrix,
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Frame {
    /// World frame (origin, identity orientation).
    pub const IDENTITY: Frame = Frame {
        position: DVec3::ZERO,
        orientation: DMat3::IDENTITY,
    };

    pub fn new(position: Vector, orientation: Matrix) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Point `local` expressed in this frame's parent coordinates.
    pub fn transform_point(&self, local: Vector) -> Vector {
        self.position + self.orientation * local
    }

    /// Orientation `local` expressed in this frame's parent coordinates.
    pub fn transform_orientation(&self, local: Matrix) -> Matrix {
        self.orientation * local
    }
}
