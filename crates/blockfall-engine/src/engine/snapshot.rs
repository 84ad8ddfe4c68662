use serde::Serialize;

use crate::core::{
    board::Board,
    piece::{Offset, Piece, Position},
    shape::PieceKind,
};

/// Serializable view of a piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub blocks: [Offset; 4],
    pub anchor: Position,
    pub color_id: u8,
    pub color: &'static str,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind(),
            blocks: piece.blocks(),
            anchor: piece.anchor(),
            color_id: piece.color_id(),
            color: piece.kind().color(),
        }
    }
}

/// Read-only state of a session taken between ticks.
///
/// A snapshot is an owned copy, so it never observes a half-applied
/// mutation. The board serializes as 20 rows of 10 color ids (0 = empty).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub current: PieceSnapshot,
    pub next: PieceSnapshot,
    /// Anchor where the current piece would land on a hard drop.
    pub ghost: Position,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub completed_pieces: u64,
    pub drop_interval_ms: u64,
    pub soft_drop: bool,
    pub paused: bool,
    pub game_over: bool,
    /// Time ticked while running.
    pub elapsed_ms: u64,
}
