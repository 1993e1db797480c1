//! Castling rights and sides.

use crate::{Color, Square};
use std::fmt;

/// Which wing a castle goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    /// File of the rook before castling.
    #[inline]
    pub const fn rook_from_file(self) -> u8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }

    /// File of the rook after castling.
    #[inline]
    pub const fn rook_to_file(self) -> u8 {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }

    /// File of the king after castling.
    #[inline]
    pub const fn king_to_file(self) -> u8 {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }

    /// Home square of the king for `color`.
    #[inline]
    pub const fn king_from(color: Color) -> Square {
        Square::at(4, color.home_rank())
    }

    #[inline]
    pub const fn king_to(self, color: Color) -> Square {
        Square::at(self.king_to_file(), color.home_rank())
    }

    #[inline]
    pub const fn rook_from(self, color: Color) -> Square {
        Square::at(self.rook_from_file(), color.home_rank())
    }

    #[inline]
    pub const fn rook_to(self, color: Color) -> Square {
        Square::at(self.rook_to_file(), color.home_rank())
    }

    /// Notation for this castle.
    pub const fn san(self) -> &'static str {
        match self {
            CastleSide::King => "O-O",
            CastleSide::Queen => "O-O-O",
        }
    }
}

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queen) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::King) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queen) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` may still castle towards `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        (self.0 & Self::flag(color, side)) != 0
    }

    /// Returns a copy with the given right granted.
    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> Self {
        CastlingRights(self.0 | Self::flag(color, side))
    }

    /// Removes a single right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::King);
        self.remove(color, CastleSide::Queen);
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Parses the FEN castling field. Only the canonical `KQkq` subset order
    /// and `-` are accepted.
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = CastlingRights::NONE;
        let mut last = None;
        for c in field.chars() {
            let pos = "KQkq".find(c)?;
            if last.is_some_and(|l| pos <= l) {
                return None;
            }
            last = Some(pos);
            rights.0 |= 1 << pos;
        }
        if last.is_none() {
            return None;
        }
        Some(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (i, c) in "KQkq".chars().enumerate() {
            if self.0 & (1 << i) != 0 {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_geometry() {
        assert_eq!(CastleSide::king_from(Color::White), Square::E1);
        assert_eq!(CastleSide::King.king_to(Color::White), Square::G1);
        assert_eq!(CastleSide::Queen.king_to(Color::Black), Square::C8);
        assert_eq!(CastleSide::King.rook_from(Color::Black), Square::H8);
        assert_eq!(CastleSide::Queen.rook_to(Color::White), Square::at(3, 0));
    }

    #[test]
    fn rights_flags() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.has(Color::White, CastleSide::King));
        rights.remove(Color::White, CastleSide::King);
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(rights.has(Color::White, CastleSide::Queen));
        rights.remove_color(Color::Black);
        assert_eq!(rights.to_string(), "Q");
    }

    #[test]
    fn fen_field() {
        assert_eq!(CastlingRights::from_fen("KQkq"), Some(CastlingRights::ALL));
        assert_eq!(CastlingRights::from_fen("-"), Some(CastlingRights::NONE));
        assert_eq!(
            CastlingRights::from_fen("Kq"),
            Some(
                CastlingRights::NONE
                    .with(Color::White, CastleSide::King)
                    .with(Color::Black, CastleSide::Queen)
            )
        );
        assert_eq!(CastlingRights::from_fen("qK"), None);
        assert_eq!(CastlingRights::from_fen("KK"), None);
        assert_eq!(CastlingRights::from_fen("X"), None);
        assert_eq!(CastlingRights::from_fen(""), None);
        assert_eq!(CastlingRights::ALL.to_string(), "KQkq");
        assert_eq!(CastlingRights::NONE.to_string(), "-");
    }
}
