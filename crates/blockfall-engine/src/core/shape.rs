use serde::{Deserialize, Serialize};

use super::piece::Offset;

/// Enum representing the type of piece.
///
/// The discriminant order is also the color order: the color id stored on
/// the board for a kind is its discriminant plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds, in color-id order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the canonical block offsets of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{Offset, PieceKind};
    ///
    /// let shape = PieceKind::I.shape();
    /// assert!(shape.iter().all(|offset| offset.y == 1));
    /// assert_eq!(shape[0], Offset::new(0, 1));
    /// ```
    #[must_use]
    pub const fn shape(self) -> [Offset; 4] {
        SHAPES[self as usize]
    }

    /// Returns the color id (1..=7) written into board cells.
    #[must_use]
    pub const fn color_id(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Self::color_id`].
    #[must_use]
    pub const fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Returns the display color as a `#rrggbb` string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        COLORS[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

const SHAPES: [[Offset; 4]; PieceKind::LEN] = {
    const fn o(x: i32, y: i32) -> Offset {
        Offset::new(x, y)
    }
    [
        // I-piece
        [o(0, 1), o(1, 1), o(2, 1), o(3, 1)],
        // O-piece
        [o(1, 0), o(2, 0), o(1, 1), o(2, 1)],
        // T-piece
        [o(1, 0), o(0, 1), o(1, 1), o(2, 1)],
        // S-piece
        [o(1, 0), o(2, 0), o(0, 1), o(1, 1)],
        // Z-piece
        [o(0, 0), o(1, 0), o(1, 1), o(2, 1)],
        // J-piece
        [o(0, 0), o(0, 1), o(1, 1), o(2, 1)],
        // L-piece
        [o(2, 0), o(0, 1), o(1, 1), o(2, 1)],
    ]
};

const COLORS: [&str; PieceKind::LEN] = [
    "#e74c3c", "#f1c40f", "#2ecc71", "#3498db", "#9b59b6", "#e67e22", "#1abc9c",
];
