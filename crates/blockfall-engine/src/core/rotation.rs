use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    piece::{Offset, Piece},
};

/// Pivot that every block offset is rotated about, in offset space.
const PIVOT_X: f64 = 1.5;
const PIVOT_Y: f64 = 1.0;

/// Horizontal anchor shifts tried, in order, when a rotation collides.
pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    /// 90° clockwise as seen on screen (y grows downward).
    Clockwise,
    /// 90° counterclockwise as seen on screen.
    CounterClockwise,
}

/// Rounds to the nearest integer, halves toward positive infinity.
#[expect(clippy::cast_possible_truncation)]
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Rotates block offsets by 90° about the fixed pivot (1.5, 1.0).
///
/// Every coordinate is rounded on its own after the transform. The same
/// pivot is used for every kind, so the O piece shifts when rotated and a
/// clockwise turn followed by a counterclockwise one does not restore the
/// original offsets. Four turns in the same direction always do.
///
/// # Examples
///
/// ```
/// use blockfall_engine::{Offset, PieceKind, RotationDirection, rotate_offsets};
///
/// let t = PieceKind::T.shape();
/// let cw = rotate_offsets(t, RotationDirection::Clockwise);
/// assert_eq!(
///     cw,
///     [Offset::new(3, 1), Offset::new(2, 0), Offset::new(2, 1), Offset::new(2, 2)]
/// );
/// ```
#[must_use]
pub fn rotate_offsets(blocks: [Offset; 4], direction: RotationDirection) -> [Offset; 4] {
    blocks.map(|block| {
        let dx = f64::from(block.x) - PIVOT_X;
        let dy = f64::from(block.y) - PIVOT_Y;
        let (x, y) = match direction {
            RotationDirection::Clockwise => (PIVOT_X - dy, PIVOT_Y + dx),
            RotationDirection::CounterClockwise => (PIVOT_X + dy, PIVOT_Y - dx),
        };
        Offset::new(round_half_up(x), round_half_up(y))
    })
}

impl Piece {
    /// Rotates the block offsets in place, keeping the anchor.
    ///
    /// No collision check is done; see [`Self::super_rotated`].
    #[must_use]
    pub fn rotated(self, direction: RotationDirection) -> Self {
        Self::with_blocks(
            self.kind(),
            rotate_offsets(self.blocks(), direction),
            self.anchor(),
        )
    }

    /// Rotates the piece, kicking it sideways if the rotation collides.
    ///
    /// The rotated offsets are tried at the same row with the anchor shifted
    /// by each of [`KICK_OFFSETS`] in turn. There are no vertical kicks.
    ///
    /// Returns `None` if every candidate collides.
    #[must_use]
    pub fn super_rotated(self, direction: RotationDirection, board: &Board) -> Option<Self> {
        let rotated = self.rotated(direction);
        KICK_OFFSETS
            .iter()
            .map(|&dx| rotated.moved(dx, 0))
            .find(|candidate| !board.is_colliding(candidate))
    }
}
