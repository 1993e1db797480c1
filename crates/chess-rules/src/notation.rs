//! Algebraic move notation.
//!
//! A [`MoveNotation`] is the parsed form of a move token such as `Nbd2`,
//! `exd6`, `e8=Q+` or `O-O`. It says nothing about legality; use
//! [`MoveNotation::matches`] against a position's moves to resolve it.

use crate::Position;
use chess_core::{
    file_from_char, file_to_char, rank_from_char, rank_to_char, CastleSide, Color, ColoredPiece,
    Move, Piece, Square,
};
use std::fmt;

/// Check suffix written after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMark {
    /// `+`
    Check,
    /// `#`
    Mate,
}

impl CheckMark {
    pub fn as_char(self) -> char {
        match self {
            CheckMark::Check => '+',
            CheckMark::Mate => '#',
        }
    }
}

/// A piece move in algebraic notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalNotation {
    pub piece: ColoredPiece,
    /// True when an `x` was written.
    pub capture: bool,
    pub from_file: Option<u8>,
    pub from_rank: Option<u8>,
    pub to: Square,
    pub promotion: Option<Piece>,
    pub check: Option<CheckMark>,
}

/// A parsed algebraic move token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveNotation {
    Castle {
        side: CastleSide,
        check: Option<CheckMark>,
    },
    Normal(NormalNotation),
}

const ANNOTATIONS: [&str; 6] = ["!!", "??", "!?", "?!", "!", "?"];

/// Parses an algebraic move token for `color`.
///
/// Accepts `O-O`, `O-O-O` (or with zeros) and
/// `[KQRBN][file][rank][x]<square>[=QRBN][+#]`, each optionally followed by
/// one of `!`, `?`, `!!`, `??`, `!?`, `?!`. Returns `None` for anything else.
pub fn parse_algebraic(color: Color, text: &str) -> Option<MoveNotation> {
    let mut body = text;
    if let Some(stripped) = ANNOTATIONS.iter().find_map(|a| body.strip_suffix(a)) {
        body = stripped;
    }
    let check = match body.chars().last() {
        Some('+') => Some(CheckMark::Check),
        Some('#') => Some(CheckMark::Mate),
        _ => None,
    };
    if check.is_some() {
        body = &body[..body.len() - 1];
    }

    match body {
        "O-O" | "0-0" => {
            return Some(MoveNotation::Castle {
                side: CastleSide::King,
                check,
            })
        }
        "O-O-O" | "0-0-0" => {
            return Some(MoveNotation::Castle {
                side: CastleSide::Queen,
                check,
            })
        }
        _ => {}
    }

    let mut chars: Vec<char> = body.chars().collect();
    let piece = match chars.first().copied().and_then(Piece::from_san_char) {
        Some(piece) => {
            chars.remove(0);
            piece
        }
        None => Piece::Pawn,
    };

    let mut promotion = None;
    if chars.len() > 2 {
        if let Some(choice) = chars.last().copied().and_then(Piece::from_san_char) {
            if choice == Piece::King {
                return None;
            }
            promotion = Some(choice);
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
        }
    }

    let rank = rank_from_char(chars.pop()?)?;
    let file = file_from_char(chars.pop()?)?;
    let to = Square::at(file, rank);

    let capture = chars.last() == Some(&'x');
    if capture {
        chars.pop();
    }

    let mut rest = chars.into_iter().peekable();
    let from_file = rest.next_if(|&c| file_from_char(c).is_some()).and_then(file_from_char);
    let from_rank = rest.next_if(|&c| rank_from_char(c).is_some()).and_then(rank_from_char);
    if rest.next().is_some() {
        return None;
    }

    Some(MoveNotation::Normal(NormalNotation {
        piece: ColoredPiece::new(piece, color),
        capture,
        from_file,
        from_rank,
        to,
        promotion,
        check,
    }))
}

impl MoveNotation {
    /// Returns true if `mv`, a move of `position`, fits this notation.
    ///
    /// An omitted `x` matches captures too, but a written `x` requires one.
    /// Check marks are not compared.
    pub fn matches(&self, position: &Position, mv: &Move) -> bool {
        match (self, mv) {
            (MoveNotation::Castle { side, .. }, Move::Castle { side: s, .. }) => side == s,
            (MoveNotation::Castle { .. }, _) | (MoveNotation::Normal(_), Move::Castle { .. }) => {
                false
            }
            (MoveNotation::Normal(n), _) => {
                let from = mv.from();
                let captures = matches!(mv, Move::EnPassant { .. })
                    || position.board().can_capture(mv.to(), mv.color());
                mv.piece() == n.piece
                    && mv.promotion() == n.promotion
                    && (!n.capture || captures)
                    && n.from_file.map_or(true, |f| f == from.file())
                    && n.from_rank.map_or(true, |r| r == from.rank())
                    && mv.to() == n.to
            }
        }
    }

    pub fn check(&self) -> Option<CheckMark> {
        match self {
            MoveNotation::Castle { check, .. } => *check,
            MoveNotation::Normal(n) => n.check,
        }
    }

    pub(crate) fn set_check(&mut self, mark: Option<CheckMark>) {
        match self {
            MoveNotation::Castle { check, .. } => *check = mark,
            MoveNotation::Normal(n) => n.check = mark,
        }
    }
}

impl fmt::Display for MoveNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = match self {
            MoveNotation::Castle { side, check } => {
                f.write_str(side.san())?;
                check
            }
            MoveNotation::Normal(n) => {
                if let Some(letter) = n.piece.piece.san_char() {
                    write!(f, "{}", letter)?;
                }
                if let Some(file) = n.from_file {
                    write!(f, "{}", file_to_char(file))?;
                }
                if let Some(rank) = n.from_rank {
                    write!(f, "{}", rank_to_char(rank))?;
                }
                if n.capture {
                    f.write_str("x")?;
                }
                write!(f, "{}", n.to)?;
                if let Some(letter) = n.promotion.and_then(Piece::san_char) {
                    write!(f, "={}", letter)?;
                }
                &n.check
            }
        };
        if let Some(mark) = check {
            write!(f, "{}", mark.as_char())?;
        }
        Ok(())
    }
}
