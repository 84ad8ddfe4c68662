use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use super::piece::{Offset, Piece, Position};
use super::shape::PieceKind;

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell filled by a locked piece of a specific type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns 0 for an empty cell, otherwise the color id (1..=7).
    #[must_use]
    pub fn color_id(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.color_id(),
        }
    }

    fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

type Row = [Block; Board::WIDTH];

const EMPTY_ROW: Row = [Block::Empty; Board::WIDTH];

fn is_filled(row: &Row) -> bool {
    row.iter().all(|b| !b.is_empty())
}

/// Fixed 10×20 occupancy grid.
///
/// Row 0 is the top of the visible board. Cells are only ever filled by
/// [`Board::merge`] and only ever emptied by [`Board::clear_lines`].
///
/// # Collision rule
///
/// A block whose absolute row is negative never collides: neither the side
/// walls, the floor nor other blocks are checked for it. Every other block
/// collides iff its column is outside `0..10`, its row is `>= 20`, or the
/// board cell under it is filled.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind, Position};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::I, Position::new(0, 18));
/// assert!(!board.is_colliding(&piece));
///
/// board.merge(&piece);
/// assert!(board.is_colliding(&piece));
/// assert_eq!(board.clear_lines(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; Board::HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; Self::HEIGHT],
    };

    /// Returns the cell at a visible position, or `None` when out of bounds.
    #[must_use]
    pub fn block(&self, pos: Position) -> Option<Block> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block; Board::WIDTH]> {
        self.rows.iter()
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|b| !b.is_empty())
            .count()
    }

    /// Checks whether a candidate placement collides.
    ///
    /// `anchor` and `blocks` need not belong to an existing piece; this is
    /// the primitive behind movement, rotation kicks and swapping.
    #[must_use]
    pub fn is_colliding_at(&self, anchor: Position, blocks: &[Offset; 4]) -> bool {
        blocks.iter().any(|&offset| {
            let cell = anchor + offset;
            if cell.y < 0 {
                return false;
            }
            self.block(cell).is_none_or(|b| !b.is_empty())
        })
    }

    /// Checks if the piece collides with the walls, the floor or occupied cells.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.is_colliding_at(piece.anchor(), &piece.blocks())
    }

    /// Writes the piece's color into every cell it covers on the visible board.
    ///
    /// Blocks still in the spawn buffer (negative row) are dropped.
    pub fn merge(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for cell in piece.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) else {
                continue;
            };
            if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *slot = block;
            }
        }
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows are scanned bottom to top. A filled row is removed, everything
    /// above shifts down by one and an empty row enters at the top; the same
    /// row index is then checked again since it now holds the shifted row.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = Self::HEIGHT;
        while y > 0 {
            if is_filled(&self.rows[y - 1]) {
                self.rows.copy_within(0..y - 1, 1);
                self.rows[0] = EMPTY_ROW;
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Creates a `Board` from ASCII art, for tests and fixtures.
    ///
    /// `.` is an empty cell and a piece letter (`I`, `O`, `T`, `S`, `Z`,
    /// `J`, `L`) is a filled cell. Whitespace is ignored and blank lines are
    /// skipped. Rows are aligned to the bottom of the board: the last line
    /// of `art` is row 19.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<char>> = art
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= Self::HEIGHT,
            "At most {} rows allowed, got {}",
            Self::HEIGHT,
            lines.len()
        );

        let mut board = Self::EMPTY;
        let top = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(
                line.len(),
                Self::WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                Self::WIDTH,
                line.len(),
                i
            );
            for (x, &ch) in line.iter().enumerate() {
                board.rows[top + i][x] = match ch {
                    '.' => Block::Empty,
                    c => Block::Piece(
                        PieceKind::from_char(c)
                            .unwrap_or_else(|| panic!("invalid cell {c:?} at row {i}")),
                    ),
                };
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row {
                write!(f, "{}", block.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: one array of color ids per row, top to bottom.
        let mut seq = serializer.serialize_seq(Some(Self::HEIGHT))?;
        for row in &self.rows {
            let ids: [u8; Board::WIDTH] = row.map(Block::color_id);
            seq.serialize_element(&ids)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn board_from_bits(bits: &[bool]) -> Board {
        let mut board = Board::EMPTY;
        for (i, &filled) in bits.iter().enumerate() {
            if filled {
                board.rows[i / Board::WIDTH][i % Board::WIDTH] = Block::Piece(PieceKind::Z);
            }
        }
        board
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(board.filled_cells(), 0);
        assert_eq!(board.rows().count(), Board::HEIGHT);
        assert!(board.rows().all(|row| row.iter().all(|b| b.is_empty())));
    }

    #[test]
    fn test_block_out_of_bounds() {
        let board = Board::EMPTY;
        assert_eq!(board.block(Position::new(0, 0)), Some(Block::Empty));
        assert_eq!(board.block(Position::new(9, 19)), Some(Block::Empty));
        assert_eq!(board.block(Position::new(-1, 0)), None);
        assert_eq!(board.block(Position::new(10, 0)), None);
        assert_eq!(board.block(Position::new(0, 20)), None);
        assert_eq!(board.block(Position::new(0, -1)), None);
    }

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::EMPTY;
        let piece = Piece::new(PieceKind::I, Position::new(0, 0));
        assert!(!board.is_colliding(&piece));
        assert!(board.is_colliding(&piece.moved(-1, 0)));
        assert!(!board.is_colliding(&piece.moved(6, 0)));
        assert!(board.is_colliding(&piece.moved(7, 0)));
        assert!(!board.is_colliding(&piece.moved(0, 18)));
        assert!(board.is_colliding(&piece.moved(0, 19)));
    }

    #[test]
    fn test_collision_ignores_blocks_above_board() {
        let board = Board::from_ascii("IIIIIIIIII");
        // Row -1 at columns -5..-1: out of range columns, yet above the board.
        let piece = Piece::new(PieceKind::I, Position::new(-5, -2));
        assert!(!board.is_colliding(&piece));
        // Same columns one row lower are checked and hit the left wall.
        assert!(board.is_colliding(&piece.moved(0, 1)));
    }

    #[test]
    fn test_collision_with_filled_cell() {
        let board = Board::from_ascii(
            "
            ....T.....
            ",
        );
        let piece = Piece::new(PieceKind::I, Position::new(2, 18));
        assert!(board.is_colliding(&piece));
        assert!(!board.is_colliding(&piece.moved(0, -1)));
        assert!(!board.is_colliding(&piece.moved(3, 0)));
    }

    #[test]
    fn test_merge_writes_color_and_skips_spawn_buffer() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::T, Position::new(0, -1));
        // T cells: (1,-1) above the board, (0,0) (1,0) (2,0) visible.
        board.merge(&piece);
        assert_eq!(board.filled_cells(), 3);
        assert_eq!(board.block(Position::new(0, 0)), Some(Block::Piece(PieceKind::T)));
        assert_eq!(board.block(Position::new(1, 0)).map(Block::color_id), Some(3));
        assert_eq!(board.block(Position::new(3, 0)), Some(Block::Empty));
    }

    #[test]
    fn test_clear_lines_single_line() {
        let mut board = Board::from_ascii(
            "
            ...O......
            IIIIIIIIII
            ",
        );
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board, Board::from_ascii("...O......"));
    }

    #[test]
    fn test_clear_lines_rechecks_shifted_row() {
        let mut board = Board::from_ascii(
            "
            J.........
            LLLLLLLLLL
            SSSSSSSSSS
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board, Board::from_ascii("J........."));
    }

    #[test]
    fn test_clear_lines_non_adjacent() {
        let mut board = Board::from_ascii(
            "
            IIIIIIIIII
            T.T.T.T.T.
            OOOOOOOOOO
            Z........Z
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                T.T.T.T.T.
                Z........Z
                "
            )
        );
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut board = Board::from_ascii("IIIIIIIII.");
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board.filled_cells(), 9);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let art = "OOOOOOOOOO\n".repeat(Board::HEIGHT);
        let mut board = Board::from_ascii(&art);
        assert_eq!(board.clear_lines(), Board::HEIGHT);
        assert_eq!(board, Board::EMPTY);
    }

    #[test]
    fn test_serialize_as_color_ids() {
        let board = Board::from_ascii("I........L");
        let value = serde_json::to_value(&board).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), Board::HEIGHT);
        assert_eq!(rows[0], serde_json::json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(rows[19], serde_json::json!([1, 0, 0, 0, 0, 0, 0, 0, 0, 7]));
    }

    #[test]
    fn test_display() {
        let board = Board::from_ascii("SS........");
        let text = board.to_string();
        assert_eq!(text.lines().count(), Board::HEIGHT);
        assert_eq!(text.lines().last(), Some("SS........"));
    }

    proptest! {
        #[test]
        fn prop_collision_rule(
            bits in prop::collection::vec(any::<bool>(), Board::WIDTH * Board::HEIGHT),
            ax in -6..16i32,
            ay in -6..24i32,
            offsets in prop::array::uniform4((-3..5i32, -3..5i32)),
        ) {
            let board = board_from_bits(&bits);
            let blocks = offsets.map(|(x, y)| Offset::new(x, y));
            let anchor = Position::new(ax, ay);

            let expected = blocks.iter().any(|&o| {
                let (x, y) = (ax + o.x, ay + o.y);
                if y < 0 {
                    return false;
                }
                if !(0..10).contains(&x) || y >= 20 {
                    return true;
                }
                let index = usize::try_from(y * 10 + x).unwrap();
                bits[index]
            });
            prop_assert_eq!(board.is_colliding_at(anchor, &blocks), expected);
        }
    }
}
