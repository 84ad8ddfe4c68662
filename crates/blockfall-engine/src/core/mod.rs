//! Board geometry: shapes, pieces, collision and rotation.
//!
//! - [`PieceKind`] - the shape table (canonical offsets and display colors)
//! - [`Piece`] - a kind with its current block offsets and anchor
//! - [`Board`] - the 10×20 occupancy grid, collision rule and line clears
//! - [`RotationDirection`] - geometric rotation with horizontal kicks

pub use self::{board::*, piece::*, rotation::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod rotation;
pub(crate) mod shape;
