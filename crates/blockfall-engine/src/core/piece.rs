use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::shape::PieceKind;

/// Offset of one block relative to its piece's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Absolute grid position.
///
/// (0, 0) is the top-left cell of the visible board, x grows to the right
/// and y grows downward. Negative y addresses the hidden spawn buffer above
/// the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Default spawn anchor: column 3, two rows above the visible board.
    pub const SPAWN: Self = Self::new(3, -2);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    fn add(self, rhs: Offset) -> Self::Output {
        self.shifted(rhs.x, rhs.y)
    }
}

/// A piece instance: kind, current block offsets and anchor.
///
/// Pieces are values. Movement and rotation return new `Piece` instances and
/// the engine replaces its current piece wholesale when a candidate is legal.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, Position};
///
/// let piece = Piece::new(PieceKind::T, Position::SPAWN);
/// let moved = piece.moved(1, 0);
/// assert_eq!(moved.anchor(), Position::new(4, -2));
/// assert_eq!(moved.blocks(), piece.blocks());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Piece {
    kind: PieceKind,
    blocks: [Offset; 4],
    anchor: Position,
}

impl Piece {
    /// Creates a piece in canonical orientation at `anchor`.
    #[must_use]
    pub const fn new(kind: PieceKind, anchor: Position) -> Self {
        Self {
            kind,
            blocks: kind.shape(),
            anchor,
        }
    }

    /// Creates a piece with explicit block offsets.
    #[must_use]
    pub const fn with_blocks(kind: PieceKind, blocks: [Offset; 4], anchor: Position) -> Self {
        Self {
            kind,
            blocks,
            anchor,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn blocks(&self) -> [Offset; 4] {
        self.blocks
    }

    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub const fn color_id(&self) -> u8 {
        self.kind.color_id()
    }

    /// Same kind and offsets, placed at a different anchor.
    #[must_use]
    pub const fn at(self, anchor: Position) -> Self {
        Self { anchor, ..self }
    }

    #[must_use]
    pub const fn moved(self, dx: i32, dy: i32) -> Self {
        self.at(self.anchor.shifted(dx, dy))
    }

    /// Returns the absolute position of every block.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.blocks.iter().map(move |&offset| self.anchor + offset)
    }

    /// Returns `true` if any block is still above the visible board.
    #[must_use]
    pub fn is_above_board(&self) -> bool {
        self.cells().any(|cell| cell.y < 0)
    }
}
