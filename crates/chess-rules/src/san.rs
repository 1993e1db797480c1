//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::notation::{parse_algebraic, CheckMark, MoveNotation, NormalNotation};
use crate::Position;
use chess_core::{Move, Piece};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The SAN string is empty.
    #[error("empty SAN string")]
    Empty,
    /// The SAN string has invalid format.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the SAN.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN (ambiguous).
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Builds the shortest unambiguous notation for `mv`.
///
/// The position must be the state BEFORE the move is made, and the move
/// should be legal there.
pub fn to_notation(position: &Position, mv: &Move) -> MoveNotation {
    let mut notation = match *mv {
        Move::Castle { side, .. } => MoveNotation::Castle { side, check: None },
        _ => {
            let capture = matches!(mv, Move::EnPassant { .. })
                || position.board().can_capture(mv.to(), mv.color());
            let bare = NormalNotation {
                piece: mv.piece(),
                capture,
                from_file: None,
                from_rank: None,
                to: mv.to(),
                promotion: mv.promotion(),
                check: None,
            };
            MoveNotation::Normal(disambiguate(position, mv, bare))
        }
    };

    let after = position.play(mv);
    let mark = if after.is_checkmate() {
        Some(CheckMark::Mate)
    } else if after.is_check() {
        Some(CheckMark::Check)
    } else {
        None
    };
    notation.set_check(mark);
    notation
}

fn disambiguate(position: &Position, mv: &Move, bare: NormalNotation) -> NormalNotation {
    let from = mv.from();
    let legal = position.legal_moves();
    let count = |n: NormalNotation| {
        legal
            .iter()
            .filter(|m| MoveNotation::Normal(n).matches(position, m))
            .count()
    };

    let pawn_capture = bare.piece.piece == Piece::Pawn && bare.capture;
    if count(bare) <= 1 && !pawn_capture {
        return bare;
    }
    let with_file = NormalNotation {
        from_file: Some(from.file()),
        ..bare
    };
    if count(with_file) <= 1 {
        return with_file;
    }
    let with_rank = NormalNotation {
        from_rank: Some(from.rank()),
        ..bare
    };
    if count(with_rank) <= 1 {
        return with_rank;
    }
    NormalNotation {
        from_file: Some(from.file()),
        from_rank: Some(from.rank()),
        ..bare
    }
}

/// Converts a move to SAN notation given the current position.
pub fn move_to_san(position: &Position, mv: &Move) -> String {
    to_notation(position, mv).to_string()
}

/// Parses a SAN string and returns the corresponding legal move.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    let notation = parse_algebraic(position.side_to_move(), san)
        .ok_or_else(|| SanError::InvalidFormat(san.to_string()))?;

    let mut matching = position
        .legal_moves()
        .into_iter()
        .filter(|m| notation.matches(position, m));

    match (matching.next(), matching.next()) {
        (None, _) => Err(SanError::NoMatchingMove(san.to_string())),
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

impl Position {
    /// Returns the SAN text of `mv` played from this position.
    pub fn san(&self, mv: &Move) -> String {
        move_to_san(self, mv)
    }

    /// Parses `san` and plays it.
    pub fn play_san(&self, san: &str) -> Result<Position, SanError> {
        san_to_move(self, san).map(|mv| self.play(&mv))
    }
}
