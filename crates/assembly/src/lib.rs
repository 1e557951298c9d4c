//! Minifigure assembly.
//!
//! Pieces are placed parts (colour, position, orientation, part code) stored
//! in a [`Model`]. Groups give a set of pieces a shared coordinate frame.
//! [`Person`] places the parts of a minifigure along a fixed skeleton, and
//! every piece renders as one LDraw type-1 line.

pub mod colour;
pub mod error;
pub mod figure;
pub mod geometry;
pub mod model;
pub mod parts;
pub mod piece;
pub mod pose;

pub use colour::Colour;
pub use error::{AssemblyError, Result};
pub use figure::{Person, Slot};
pub use geometry::{rotation, Axis, Frame, Matrix, Rotate, Vector};
pub use model::{Group, GroupId, Model, PieceId};
pub use parts::PartTable;
pub use piece::{Piece, Record};
pub use pose::{Accessories, HeldItem, Pose, PoseAngles, PoseColours, RotationStep};
