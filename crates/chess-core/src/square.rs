//! Board coordinates.

use std::fmt;

/// A square on the chess board, indexed 0-63.
///
/// Squares are indexed in little-endian rank-file mapping:
/// - a1 = 0, b1 = 1, ..., h1 = 7
/// - a2 = 8, ..., h8 = 63
///
/// Files and ranks are zero based, so `e4` is file 4, rank 3.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from file and rank.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside `0..8`. Off-board coordinates are
    /// a caller bug; use [`Square::try_at`] or [`Square::offset`] for
    /// arithmetic that may leave the board.
    #[inline]
    pub const fn at(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8, "square coordinates out of range");
        Square(rank * 8 + file)
    }

    /// Creates a square from file and rank, or `None` when off the board.
    #[inline]
    pub const fn try_at(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Some(Square((rank * 8 + file) as u8))
        }
    }

    /// Creates a square from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match file_from_char(bytes[0] as char) {
            Some(f) => f,
            None => return None,
        };
        let rank = match rank_from_char(bytes[1] as char) {
            Some(r) => r,
            None => return None,
        };
        Some(Square::at(file, rank))
    }

    /// Returns the raw index (rank * 8 + file).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the file (0 = a, 7 = h).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Returns the rank (0 = first rank, 7 = eighth rank).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Returns the square displaced by the given file and rank deltas, or
    /// `None` when the result falls off the board.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        Square::try_at(self.file() as i8 + file_delta, self.rank() as i8 + rank_delta)
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", file_to_char(self.file()), rank_to_char(self.rank()))
    }

    /// Iterates all 64 squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    pub const A1: Square = Square(0);
    pub const C1: Square = Square(2);
    pub const E1: Square = Square(4);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const C8: Square = Square(58);
    pub const E8: Square = Square(60);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);
}

/// Converts a file letter ('a'-'h') into a file index.
#[inline]
pub const fn file_from_char(c: char) -> Option<u8> {
    match c {
        'a'..='h' => Some(c as u8 - b'a'),
        _ => None,
    }
}

/// Converts a rank digit ('1'-'8') into a rank index.
#[inline]
pub const fn rank_from_char(c: char) -> Option<u8> {
    match c {
        '1'..='8' => Some(c as u8 - b'1'),
        _ => None,
    }
}

/// Converts a file index into its letter.
#[inline]
pub const fn file_to_char(file: u8) -> char {
    (b'a' + file) as char
}

/// Converts a rank index into its digit.
#[inline]
pub const fn rank_to_char(rank: u8) -> char {
    (b'1' + rank) as char
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
