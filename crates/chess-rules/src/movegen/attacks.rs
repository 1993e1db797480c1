//! Attack sets and pin rays.

use crate::board::{Axis, Board};
use chess_core::{Color, ColoredPiece, Movement, Piece, Square};

/// Appends every square `piece` on `from` attacks or defends to `out`.
///
/// Slider rays stop on the first occupied square, which is included. The
/// `xray` square (the defending king) does not stop a ray, so squares behind
/// the king along a checking line count as attacked.
pub fn collect_attacks(
    board: &Board,
    from: Square,
    piece: ColoredPiece,
    xray: Option<Square>,
    out: &mut Vec<Square>,
) {
    match piece.piece.movement() {
        Movement::Slider(directions) => {
            for &(df, dr) in directions {
                let mut next = from.offset(df, dr);
                while let Some(sq) = next {
                    out.push(sq);
                    if !board.is_empty(sq) && Some(sq) != xray {
                        break;
                    }
                    next = sq.offset(df, dr);
                }
            }
        }
        Movement::Leaper(offsets) => {
            out.extend(offsets.iter().filter_map(|&(df, dr)| from.offset(df, dr)));
        }
        Movement::Pawn => {
            let forward = piece.color.pawn_direction();
            out.extend([-1, 1].iter().filter_map(|&df| from.offset(df, forward)));
        }
    }
}

/// Returns true if any piece of color `by` attacks `target`.
///
/// This walks the board directly and does not use cached flags, so it works
/// on scratch boards.
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    let mut targets = Vec::with_capacity(28);
    board
        .pieces()
        .filter(|(_, piece)| piece.color == by)
        .any(|(sq, piece)| {
            targets.clear();
            collect_attacks(board, sq, piece, None, &mut targets);
            targets.contains(&target)
        })
}

/// Returns true if `color`'s king is attacked on `board`.
pub fn king_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// Marks pins and check-blocking squares along the rays of a slider on `from`.
///
/// With exactly one `defender` piece between the slider and the defender's
/// king, that piece is flagged pinned with the ray's axis. With nothing in
/// between, the empty squares are flagged as block squares.
pub(crate) fn project_pins(
    board: &mut Board,
    from: Square,
    directions: &[(i8, i8)],
    defender: Color,
) {
    for &(df, dr) in directions {
        let mut blocker = None;
        let mut next = from.offset(df, dr);
        while let Some(sq) = next {
            if let Some(piece) = board.get(sq) {
                if piece.color != defender {
                    break;
                }
                if piece.piece == Piece::King {
                    match blocker {
                        Some(pinned) => {
                            board.set_pinned(pinned, true);
                            if let Some(axis) = Axis::of_delta(df, dr) {
                                board.set_pinned_axis(pinned, axis);
                            }
                        }
                        None => mark_block_squares(board, from, sq, (df, dr)),
                    }
                    break;
                }
                if blocker.is_some() {
                    break;
                }
                blocker = Some(sq);
            }
            next = sq.offset(df, dr);
        }
    }
}

fn mark_block_squares(board: &mut Board, from: Square, king: Square, (df, dr): (i8, i8)) {
    let mut next = from.offset(df, dr);
    while let Some(sq) = next {
        if sq == king {
            break;
        }
        board.set_pinned(sq, true);
        next = sq.offset(df, dr);
    }
}
