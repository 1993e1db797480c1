//! Move generation.
//!
//! Moves are generated per piece from its [`Movement`] rule and filtered for
//! legality with the flags the position transition maintains:
//! - [`pseudo_moves`] lists every candidate including both castles
//! - [`legality`] decides whether a candidate may be played
//! - [`perft`] counts leaf nodes to validate the whole pipeline

pub mod attacks;
pub mod legality;
pub mod perft;

use crate::{Board, Position};
use chess_core::{CastleSide, Color, ColoredPiece, Move, Movement, Piece, Square};

pub use attacks::{is_square_attacked, king_in_check};
pub use legality::{leaves_king_in_check, IllegalMove};
pub use perft::{perft, perft_divide};

/// Generates all candidate moves for the side to move.
///
/// The list contains every move the pieces' movement rules allow, plus a
/// kingside and a queenside castle which are always present. Use
/// [`Position::legal_moves`] for the legal subset.
pub fn pseudo_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let us = position.side_to_move();
    let board = position.board();

    for (from, piece) in board.pieces().filter(|(_, p)| p.color == us) {
        match piece.piece.movement() {
            Movement::Slider(directions) => {
                for &(df, dr) in directions {
                    let mut next = from.offset(df, dr);
                    while let Some(to) = next {
                        if !board.can_enter(to, us) {
                            break;
                        }
                        moves.push(Move::Normal { piece, from, to });
                        if board.can_capture(to, us) {
                            break;
                        }
                        next = to.offset(df, dr);
                    }
                }
            }
            Movement::Leaper(offsets) => {
                for &(df, dr) in offsets {
                    if let Some(to) = from.offset(df, dr) {
                        if board.can_enter(to, us) {
                            moves.push(Move::Normal { piece, from, to });
                        }
                    }
                }
            }
            Movement::Pawn => pawn_moves(position, from, us, &mut moves),
        }
    }

    for side in CastleSide::BOTH {
        moves.push(Move::Castle { color: us, side });
    }
    moves
}

fn pawn_moves(position: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let board = position.board();
    let forward = us.pawn_direction();

    if let Some(to) = from.offset(0, forward) {
        if board.is_empty(to) {
            push_pawn_move(from, to, us, moves);
            if from.rank() == us.pawn_rank() {
                if let Some(double) = to.offset(0, forward) {
                    if board.is_empty(double) {
                        moves.push(Move::DoublePush {
                            color: us,
                            from,
                            to: double,
                        });
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, forward) else {
            continue;
        };
        if board.can_capture(to, us) {
            push_pawn_move(from, to, us, moves);
        } else if position.en_passant() == Some(to) {
            moves.push(Move::EnPassant { color: us, from, to });
        }
    }
}

fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.rank() == color.promotion_rank() {
        for choice in Piece::PROMOTIONS {
            moves.push(Move::Promotion {
                color,
                from,
                to,
                choice,
            });
        }
    } else {
        moves.push(Move::Normal {
            piece: ColoredPiece::new(Piece::Pawn, color),
            from,
            to,
        });
    }
}

/// Moves the pieces for `mv` on `board`. Clocks, rights and flags are the
/// caller's concern.
pub(crate) fn apply_to_board(board: &mut Board, mv: &Move) {
    match *mv {
        Move::Normal { piece, from, to } => {
            board.put(from, None);
            board.put(to, Some(piece));
        }
        Move::DoublePush { color, from, to } => {
            board.put(from, None);
            board.put(to, Some(ColoredPiece::new(Piece::Pawn, color)));
        }
        Move::EnPassant { color, from, to } => {
            board.put(from, None);
            board.put(to, Some(ColoredPiece::new(Piece::Pawn, color)));
            if let Some(passed) = to.offset(0, -color.pawn_direction()) {
                board.put(passed, None);
            }
        }
        Move::Promotion {
            color,
            from,
            to,
            choice,
        } => {
            board.put(from, None);
            board.put(to, Some(ColoredPiece::new(choice, color)));
        }
        Move::Castle { color, side } => {
            board.put(CastleSide::king_from(color), None);
            board.put(side.rook_from(color), None);
            board.put(side.rook_to(color), Some(ColoredPiece::new(Piece::Rook, color)));
            board.put(side.king_to(color), Some(ColoredPiece::new(Piece::King, color)));
        }
    }
}
