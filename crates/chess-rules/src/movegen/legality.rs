//! Legality of candidate moves.
//!
//! The production filter reads the flags computed by the position
//! transition and never plays the move. [`leaves_king_in_check`] is the slow
//! reference that does play it, kept for cross-checking.

use super::{apply_to_board, attacks};
use crate::board::{Axis, Board};
use crate::Position;
use chess_core::{CastleSide, Color, Move, Piece, Square};
use thiserror::Error;

/// Why a move may not be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("Not a move in this position")]
    NotAvailable,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Check")]
    Check,
    #[error("Pinned")]
    Pinned,
    #[error("Double check")]
    DoubleCheck,
    #[error("Can't castle out of check")]
    CastleOutOfCheck,
    #[error("Can't castle on {} side", side_name(.0))]
    CastlingRightLost(CastleSide),
    #[error("Pieces are between rook and king")]
    CastleBlocked,
    #[error("Can't castle through check")]
    CastleThroughCheck,
    #[error("Can't castle into check")]
    CastleIntoCheck,
}

fn side_name(side: &CastleSide) -> &'static str {
    match side {
        CastleSide::King => "king",
        CastleSide::Queen => "queen",
    }
}

/// Checks a move taken from [`crate::movegen::pseudo_moves`] for `position`.
pub(crate) fn check(position: &Position, mv: &Move) -> Option<IllegalMove> {
    let us = position.side_to_move();

    let board = position.board();
    match *mv {
        Move::Castle { side, .. } => castle_reason(position, side),
        Move::EnPassant { from, to, .. } => {
            en_passant_exposes_king(board, us, from, to).then_some(IllegalMove::Check)
        }
        _ => {
            let from = mv.from();
            let to = mv.to();
            if mv.piece().piece == Piece::King {
                return board.is_attacked(to).then_some(IllegalMove::Check);
            }
            if position.checks() > 1 {
                return Some(IllegalMove::DoubleCheck);
            }
            if board.is_pinned(from) {
                let axis = Axis::of_delta(
                    to.file() as i8 - from.file() as i8,
                    to.rank() as i8 - from.rank() as i8,
                );
                if axis != Some(board.pinned_axis(from)) {
                    return Some(IllegalMove::Pinned);
                }
            }
            // In single check the flagged squares are the checker and the blocks.
            if position.checks() == 1 && !board.is_pinned(to) {
                return Some(IllegalMove::Check);
            }
            None
        }
    }
}

fn castle_reason(position: &Position, side: CastleSide) -> Option<IllegalMove> {
    let us = position.side_to_move();
    let board = position.board();
    let rank = us.home_rank();

    if position.is_check() {
        return Some(IllegalMove::CastleOutOfCheck);
    }
    if !position.castling().has(us, side) {
        return Some(IllegalMove::CastlingRightLost(side));
    }

    let (between, passed): (&[u8], u8) = match side {
        CastleSide::King => (&[5, 6], 5),
        CastleSide::Queen => (&[1, 2, 3], 3),
    };
    if between.iter().any(|&file| !board.is_empty(Square::at(file, rank))) {
        return Some(IllegalMove::CastleBlocked);
    }
    if board.is_attacked(Square::at(passed, rank)) {
        return Some(IllegalMove::CastleThroughCheck);
    }
    if board.is_attacked(side.king_to(us)) {
        return Some(IllegalMove::CastleIntoCheck);
    }
    None
}

/// Returns true if capturing en passant from `from` onto `target` would leave
/// `us` in check. Both pawns leave the capture rank, which can open a line no
/// pin flag describes, so the capture is played on a scratch board.
pub(crate) fn en_passant_exposes_king(board: &Board, us: Color, from: Square, target: Square) -> bool {
    let mut scratch = *board;
    apply_to_board(
        &mut scratch,
        &Move::EnPassant {
            color: us,
            from,
            to: target,
        },
    );
    attacks::king_in_check(&scratch, us)
}

/// Plays `mv` on a copy of the board and reports whether the mover's king is
/// attacked afterwards.
///
/// This ignores the extra castling conditions (rights, passing through check);
/// for a castle it only checks the king's landing square.
pub fn leaves_king_in_check(position: &Position, mv: &Move) -> bool {
    let mut scratch = *position.board();
    apply_to_board(&mut scratch, mv);
    attacks::king_in_check(&scratch, mv.color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::pseudo_moves;
    use chess_core::ColoredPiece;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn reason(fen: &str, uci: &str) -> Option<IllegalMove> {
        let position = Position::from_fen(fen).unwrap();
        let mv = pseudo_moves(&position)
            .into_iter()
            .find(|m| m.to_uci() == uci)
            .unwrap_or_else(|| panic!("{} is not a candidate in {}", uci, fen));
        check(&position, &mv)
    }

    #[test]
    fn king_cannot_step_into_attack() {
        assert_eq!(
            reason("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1", "e1e2"),
            Some(IllegalMove::Check)
        );
        assert_eq!(reason("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1", "e1d2"), None);
    }

    #[test]
    fn king_cannot_retreat_along_checking_ray() {
        assert_eq!(
            reason("4k3/8/8/8/r3K3/8/8/8 w - - 0 1", "e4f4"),
            Some(IllegalMove::Check)
        );
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        assert_eq!(
            reason("4k3/8/8/8/8/8/3rr3/4K3 w - - 0 1", "e1d2"),
            Some(IllegalMove::Check)
        );
    }

    #[test]
    fn pinned_piece_keeps_to_its_axis() {
        let fen = "4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1";
        assert_eq!(reason(fen, "e2d2"), Some(IllegalMove::Pinned));
        assert_eq!(reason(fen, "e2e5"), None);
        assert_eq!(reason(fen, "e2e7"), None);

        let fen = "4k3/8/8/b7/8/8/3N4/4K3 w - - 0 1";
        assert_eq!(reason(fen, "d2f3"), Some(IllegalMove::Pinned));
    }

    #[test]
    fn single_check_needs_capture_or_block() {
        let fen = "4k3/8/8/8/4r3/8/8/R3K3 w - - 0 1";
        assert_eq!(reason(fen, "a1a2"), Some(IllegalMove::Check));
        let fen = "4k3/8/8/8/4r3/8/R7/4K3 w - - 0 1";
        assert_eq!(reason(fen, "a2e2"), None);
        let fen = "4k3/8/8/8/R3r3/8/8/4K3 w - - 0 1";
        assert_eq!(reason(fen, "a4e4"), None);
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let fen = "4k3/8/8/8/4r3/5n2/8/R3K3 w - - 0 1";
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.checks(), 2);
        assert_eq!(reason(fen, "a1a4"), Some(IllegalMove::DoubleCheck));
    }

    #[test]
    fn castling_conditions() {
        assert_eq!(reason("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1"), None);
        assert_eq!(reason("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1"), None);
        assert_eq!(
            reason("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1", "e1g1"),
            Some(IllegalMove::CastlingRightLost(CastleSide::King))
        );
        assert_eq!(
            reason("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1", "e1c1"),
            Some(IllegalMove::CastleBlocked)
        );
        assert_eq!(
            reason("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1", "e1g1"),
            Some(IllegalMove::CastleThroughCheck)
        );
        assert_eq!(
            reason("r3k1r1/8/8/8/8/8/8/R3K2R w KQq - 0 1", "e1g1"),
            Some(IllegalMove::CastleIntoCheck)
        );
        assert_eq!(
            reason("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1", "e1c1"),
            Some(IllegalMove::CastleOutOfCheck)
        );
    }

    #[test]
    fn queenside_b_file_may_be_attacked() {
        assert_eq!(reason("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", "e1c1"), None);
    }

    #[test]
    fn en_passant_discovered_rank_check() {
        // Both pawns vanish from the fifth rank and expose the king to the rook.
        let fen = "8/8/8/KPp4r/8/8/8/7k w - c6 0 1";
        assert_eq!(Position::from_fen(fen).unwrap().en_passant(), None);

        let position = Position::from_fen("8/8/8/KPp4r/8/8/8/7k w - - 0 1").unwrap();
        assert!(en_passant_exposes_king(
            position.board(),
            Color::White,
            sq("b5"),
            sq("c6")
        ));
    }

    #[test]
    fn reasons_display() {
        assert_eq!(IllegalMove::Check.to_string(), "Check");
        assert_eq!(
            IllegalMove::CastlingRightLost(CastleSide::Queen).to_string(),
            "Can't castle on queen side"
        );
        assert_eq!(
            IllegalMove::CastleBlocked.to_string(),
            "Pieces are between rook and king"
        );
    }

    #[test]
    fn oracle_detects_exposed_king() {
        let position = Position::from_fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let sideways = Move::Normal {
            piece: ColoredPiece::new(Piece::Rook, Color::White),
            from: sq("e2"),
            to: sq("d2"),
        };
        assert!(leaves_king_in_check(&position, &sideways));
        let forward = Move::Normal {
            piece: ColoredPiece::new(Piece::Rook, Color::White),
            from: sq("e2"),
            to: sq("e5"),
        };
        assert!(!leaves_king_in_check(&position, &forward));
    }
}
