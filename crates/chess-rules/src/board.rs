//! Mailbox board with per-square rule flags.
//!
//! Every cell is one byte laid out as `PFAA IIII`:
//! - `IIII`: piece id (see [`ColoredPiece::id`]), 0 for empty
//! - `AA`: pin axis of a pinned piece (see [`Axis`])
//! - `F`: pinned flag. On a piece of the side to move it means the piece is
//!   pinned to its king. On an enemy piece it means the piece gives check.
//!   On an empty square it means moving there blocks the check.
//! - `P`: attacked flag, set when the enemy attacks or defends the square
//!
//! Flags only describe the side to move and are recomputed by every
//! position transition.

use chess_core::{Color, ColoredPiece, Piece, Square};
use std::fmt;

const PIECE_MASK: u8 = 0x0F;
const AXIS_MASK: u8 = 0x30;
const AXIS_SHIFT: u8 = 4;
const PINNED: u8 = 0x40;
const ATTACKED: u8 = 0x80;

/// The line a pinned piece may still move along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// Along a file.
    Vertical = 0,
    /// Along a rank.
    Horizontal = 1,
    /// Up-left to down-right.
    AntiDiagonal = 2,
    /// Down-left to up-right.
    Diagonal = 3,
}

impl Axis {
    /// Returns the axis a displacement lies on, or `None` if it is not a
    /// straight line (a knight jump, for example).
    pub const fn of_delta(file_delta: i8, rank_delta: i8) -> Option<Axis> {
        if file_delta == 0 && rank_delta == 0 {
            None
        } else if file_delta == 0 {
            Some(Axis::Vertical)
        } else if rank_delta == 0 {
            Some(Axis::Horizontal)
        } else if file_delta == rank_delta {
            Some(Axis::Diagonal)
        } else if file_delta == -rank_delta {
            Some(Axis::AntiDiagonal)
        } else {
            None
        }
    }

    const fn from_bits(bits: u8) -> Axis {
        match bits & 0x3 {
            0 => Axis::Vertical,
            1 => Axis::Horizontal,
            2 => Axis::AntiDiagonal,
            _ => Axis::Diagonal,
        }
    }
}

/// 64 squares of piece ids and flags.
///
/// `Board` is a plain `Copy` value: [`Board::set`] returns a modified copy and
/// leaves the original untouched, while [`Board::put`] edits a board the
/// caller already owns mutably.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([u8; 64]);

impl Board {
    /// An empty board.
    pub const EMPTY: Board = Board([0; 64]);

    /// Builds a board from square contents indexed by [`Square::index`].
    pub fn from_placement(placement: &[Option<ColoredPiece>; 64]) -> Self {
        let mut board = Board::EMPTY;
        for (i, piece) in placement.iter().enumerate() {
            board.0[i] = piece.map_or(0, ColoredPiece::id);
        }
        board
    }

    /// Returns square contents indexed by [`Square::index`].
    pub fn placement(&self) -> [Option<ColoredPiece>; 64] {
        let mut placement = [None; 64];
        for (i, cell) in self.0.iter().enumerate() {
            placement[i] = ColoredPiece::from_id(cell & PIECE_MASK);
        }
        placement
    }

    /// Returns the piece ids with all flags stripped.
    pub(crate) fn piece_ids(&self) -> [u8; 64] {
        let mut ids = self.0;
        for id in ids.iter_mut() {
            *id &= PIECE_MASK;
        }
        ids
    }

    #[inline]
    fn cell(&self, sq: Square) -> u8 {
        self.0[sq.index() as usize]
    }

    #[inline]
    fn cell_mut(&mut self, sq: Square) -> &mut u8 {
        &mut self.0[sq.index() as usize]
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<ColoredPiece> {
        ColoredPiece::from_id(self.cell(sq) & PIECE_MASK)
    }

    /// Returns true if the square holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cell(sq) & PIECE_MASK == 0
    }

    /// Returns a copy with `piece` placed on `sq`. Flags are kept.
    #[must_use]
    pub fn set(mut self, sq: Square, piece: Option<ColoredPiece>) -> Board {
        self.put(sq, piece);
        self
    }

    /// Places `piece` on `sq` in place. Flags are kept.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Option<ColoredPiece>) {
        let cell = self.cell_mut(sq);
        *cell = (*cell & !PIECE_MASK) | piece.map_or(0, ColoredPiece::id);
    }

    /// Applies a batch of edits to a copy.
    #[must_use]
    pub fn with_mutations(mut self, f: impl FnOnce(&mut Board)) -> Board {
        f(&mut self);
        self
    }

    /// Returns true if a piece of `mover` may move onto `sq`: it is empty or
    /// holds an opposing piece.
    #[inline]
    pub fn can_enter(&self, sq: Square, mover: Color) -> bool {
        self.get(sq).map_or(true, |p| p.color != mover)
    }

    /// Returns true if `sq` holds a piece `mover` could capture.
    #[inline]
    pub fn can_capture(&self, sq: Square, mover: Color) -> bool {
        self.get(sq).is_some_and(|p| p.color != mover)
    }

    #[inline]
    pub fn is_pinned(&self, sq: Square) -> bool {
        self.cell(sq) & PINNED != 0
    }

    #[inline]
    pub fn pinned_axis(&self, sq: Square) -> Axis {
        Axis::from_bits((self.cell(sq) & AXIS_MASK) >> AXIS_SHIFT)
    }

    #[inline]
    pub fn is_attacked(&self, sq: Square) -> bool {
        self.cell(sq) & ATTACKED != 0
    }

    pub fn set_pinned(&mut self, sq: Square, pinned: bool) {
        let cell = self.cell_mut(sq);
        *cell = (*cell & !PINNED) | if pinned { PINNED } else { 0 };
    }

    pub fn set_pinned_axis(&mut self, sq: Square, axis: Axis) {
        let cell = self.cell_mut(sq);
        *cell = (*cell & !AXIS_MASK) | ((axis as u8) << AXIS_SHIFT);
    }

    pub fn set_attacked(&mut self, sq: Square, attacked: bool) {
        let cell = self.cell_mut(sq);
        *cell = (*cell & !ATTACKED) | if attacked { ATTACKED } else { 0 };
    }

    /// Clears every flag on one square, keeping the piece.
    pub fn clear_flags(&mut self, sq: Square) {
        *self.cell_mut(sq) &= PIECE_MASK;
    }

    /// Clears every flag on the board.
    pub fn clear_all_flags(&mut self) {
        for cell in self.0.iter_mut() {
            *cell &= PIECE_MASK;
        }
    }

    /// Returns the square of `color`'s king, if present.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let id = ColoredPiece::new(Piece::King, color).id();
        self.0
            .iter()
            .position(|&cell| cell & PIECE_MASK == id)
            .and_then(|i| Square::from_index(i as u8))
    }

    /// Iterates occupied squares from a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::EMPTY
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::at(file, rank);
                let c = self.get(sq).map_or('.', ColoredPiece::fen_char);
                write!(f, "{}", c)?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
