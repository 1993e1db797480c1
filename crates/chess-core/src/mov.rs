//! Move representation.

use crate::{CastleSide, Color, ColoredPiece, Piece, Square};
use std::fmt;

/// A chess move.
///
/// A move is a plain value; it is interpreted against the position it was
/// generated from. Captures are implied by the destination's occupant and
/// are not stored.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Any piece move or capture without special effects.
    Normal {
        piece: ColoredPiece,
        from: Square,
        to: Square,
    },
    /// Two-square pawn advance from its starting rank.
    DoublePush { color: Color, from: Square, to: Square },
    /// Pawn capture onto the en-passant target.
    EnPassant { color: Color, from: Square, to: Square },
    /// Pawn move onto the last rank, replaced by `choice`.
    Promotion {
        color: Color,
        from: Square,
        to: Square,
        choice: Piece,
    },
    /// King and rook swap sides; squares are derived from `color` and `side`.
    Castle { color: Color, side: CastleSide },
}

impl Move {
    /// Returns the source square. For castling this is the king's square.
    #[inline]
    pub const fn from(self) -> Square {
        match self {
            Move::Normal { from, .. }
            | Move::DoublePush { from, .. }
            | Move::EnPassant { from, .. }
            | Move::Promotion { from, .. } => from,
            Move::Castle { color, .. } => CastleSide::king_from(color),
        }
    }

    /// Returns the destination square. For castling this is where the king lands.
    #[inline]
    pub const fn to(self) -> Square {
        match self {
            Move::Normal { to, .. }
            | Move::DoublePush { to, .. }
            | Move::EnPassant { to, .. }
            | Move::Promotion { to, .. } => to,
            Move::Castle { color, side } => side.king_to(color),
        }
    }

    /// Returns the moving piece (the king for castling).
    #[inline]
    pub const fn piece(self) -> ColoredPiece {
        match self {
            Move::Normal { piece, .. } => piece,
            Move::DoublePush { color, .. }
            | Move::EnPassant { color, .. }
            | Move::Promotion { color, .. } => ColoredPiece::new(Piece::Pawn, color),
            Move::Castle { color, .. } => ColoredPiece::new(Piece::King, color),
        }
    }

    /// Returns the color of the mover.
    #[inline]
    pub const fn color(self) -> Color {
        self.piece().color
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match self {
            Move::Promotion { choice, .. } => Some(choice),
            _ => None,
        }
    }

    /// Returns the castle side if this is a castling move.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self {
            Move::Castle { side, .. } => Some(side),
            _ => None,
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q", "e1g1").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion() {
            Some(Piece::Knight) => "n",
            Some(Piece::Bishop) => "b",
            Some(Piece::Rook) => "r",
            Some(Piece::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from(), self.to(), promo)
    }
}

/// Squares and promotion choice read from UCI text.
///
/// This is only the coordinates; a position resolves it into a [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl UciMove {
    /// Parses UCI coordinates such as `e2e4` or `e7e8q`.
    pub fn parse(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s.chars().nth(4) {
            None => None,
            Some('n' | 'N') => Some(Piece::Knight),
            Some('b' | 'B') => Some(Piece::Bishop),
            Some('r' | 'R') => Some(Piece::Rook),
            Some('q' | 'Q') => Some(Piece::Queen),
            Some(_) => return None,
        };
        Some(UciMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
