//! Chess position representation.
//!
//! A [`Position`] is an immutable snapshot. Every change goes through a
//! transition that copies the position, applies the edit, and then restores
//! the derived state: castling rights, the en-passant target, and the board
//! flags the legality filter reads.

use crate::board::Board;
use crate::history::HistoryEntry;
use crate::movegen::{self, attacks, legality, IllegalMove};
use chess_core::{
    CastleSide, CastlingRights, Color, ColoredPiece, Fen, FenError, Move, Movement, Piece, Square,
    UciMove,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The part of a position that decides repetitions: placement, side to move,
/// castling rights and en-passant target. Clocks are not included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pieces: [u8; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

/// Complete chess position state.
#[derive(Clone)]
pub struct Position {
    board: Board,
    castling: CastlingRights,
    /// Only kept when the side to move can actually capture there.
    en_passant: Option<Square>,
    side_to_move: Color,
    halfmove_clock: u32,
    /// Twice the full-move number, plus one when Black is to move.
    ply: u32,
    checks: u8,
    /// Occurrences of each key since the last capture or pawn move.
    repetitions: Arc<HashMap<PositionKey, u32>>,
    /// The move that led here, linking back through earlier positions.
    last: Option<HistoryEntry>,
    history_len: usize,
    resigned: Option<Color>,
    draw_agreed: bool,
}

static STARTPOS: OnceLock<Position> = OnceLock::new();

impl Position {
    /// Returns the standard starting position.
    pub fn startpos() -> Self {
        STARTPOS
            .get_or_init(|| {
                let back = [
                    Piece::Rook,
                    Piece::Knight,
                    Piece::Bishop,
                    Piece::Queen,
                    Piece::King,
                    Piece::Bishop,
                    Piece::Knight,
                    Piece::Rook,
                ];
                let mut placement = [None; 64];
                for (file, &piece) in back.iter().enumerate() {
                    let file = file as u8;
                    for color in Color::BOTH {
                        let pawn = ColoredPiece::new(Piece::Pawn, color);
                        placement[Square::at(file, color.home_rank()).index() as usize] =
                            Some(ColoredPiece::new(piece, color));
                        placement[Square::at(file, color.pawn_rank()).index() as usize] = Some(pawn);
                    }
                }
                Position::from_record(&Fen {
                    placement,
                    castling: CastlingRights::ALL,
                    ..Fen::default()
                })
            })
            .clone()
    }

    /// Parses a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Fen::parse(fen).map(|record| Position::from_record(&record))
    }

    /// Builds a position from a parsed FEN record.
    ///
    /// Castling rights without their king and rook, and an en-passant target
    /// nobody can capture on, are dropped.
    pub fn from_record(fen: &Fen) -> Self {
        let raw = Position {
            board: Board::from_placement(&fen.placement),
            castling: fen.castling,
            en_passant: fen.en_passant,
            side_to_move: fen.side_to_move,
            halfmove_clock: fen.halfmove_clock,
            ply: fen
                .fullmove_number
                .saturating_mul(2)
                .saturating_add(fen.side_to_move as u32),
            checks: 0,
            repetitions: Arc::default(),
            last: None,
            history_len: 0,
            resigned: None,
            draw_agreed: false,
        };
        let mut position = raw.transition(|_| {});
        position.record_repetition(true);
        position
    }

    /// Returns the FEN record of this position.
    pub fn to_fen_record(&self) -> Fen {
        Fen {
            placement: self.board.placement(),
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number(),
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_fen_record().to_string()
    }

    /// Copies the position, applies `mutate`, and recomputes derived state.
    pub(crate) fn transition(&self, mutate: impl FnOnce(&mut Position)) -> Position {
        let mut next = self.clone();
        mutate(&mut next);
        next.revoke_castling_rights();
        next.validate_en_passant();
        next.compute_flags();
        next
    }

    fn revoke_castling_rights(&mut self) {
        for color in Color::BOTH {
            let king = Some(ColoredPiece::new(Piece::King, color));
            if self.board.get(CastleSide::king_from(color)) != king {
                self.castling.remove_color(color);
            }
            let rook = Some(ColoredPiece::new(Piece::Rook, color));
            for side in CastleSide::BOTH {
                if self.board.get(side.rook_from(color)) != rook {
                    self.castling.remove(color, side);
                }
            }
        }
    }

    fn validate_en_passant(&mut self) {
        let Some(target) = self.en_passant else {
            return;
        };
        let us = self.side_to_move;
        let them = us.opposite();
        let skipped_rank = them.pawn_rank() as i8 + them.pawn_direction();

        let capturable = self.board.is_empty(target)
            && target.rank() as i8 == skipped_rank
            && target
                .offset(0, them.pawn_direction())
                .filter(|&passed| self.board.get(passed) == Some(ColoredPiece::new(Piece::Pawn, them)))
                .is_some_and(|passed| {
                    [-1, 1].into_iter().any(|df| {
                        passed.offset(df, 0).is_some_and(|from| {
                            self.board.get(from) == Some(ColoredPiece::new(Piece::Pawn, us))
                                && !legality::en_passant_exposes_king(&self.board, us, from, target)
                        })
                    })
                });

        if !capturable {
            self.en_passant = None;
        }
    }

    fn compute_flags(&mut self) {
        self.board.clear_all_flags();
        self.checks = 0;

        let us = self.side_to_move;
        let king = self.board.king_square(us);
        let attackers: Vec<(Square, ColoredPiece)> = self
            .board
            .pieces()
            .filter(|(_, piece)| piece.color != us)
            .collect();

        let mut targets = Vec::with_capacity(28);
        for (sq, piece) in attackers {
            targets.clear();
            attacks::collect_attacks(&self.board, sq, piece, king, &mut targets);
            for &target in &targets {
                self.board.set_attacked(target, true);
                if Some(target) == king {
                    self.checks += 1;
                    self.board.set_pinned(sq, true);
                }
            }
            if let Movement::Slider(directions) = piece.piece.movement() {
                attacks::project_pins(&mut self.board, sq, directions, us);
            }
        }
    }

    pub(crate) fn key(&self) -> PositionKey {
        PositionKey {
            pieces: self.board.piece_ids(),
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    fn record_repetition(&mut self, reset: bool) {
        if reset {
            self.repetitions = Arc::default();
        }
        let key = self.key();
        *Arc::make_mut(&mut self.repetitions).entry(key).or_insert(0) += 1;
    }

    /// Returns the board.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en-passant target, present only when a capture there exists.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Twice the full-move number, plus one when Black is to move.
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2
    }

    /// Number of enemy pieces giving check.
    #[inline]
    pub fn checks(&self) -> u8 {
        self.checks
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.board.get(sq)
    }

    /// The color that resigned, if any.
    #[inline]
    pub fn resigned(&self) -> Option<Color> {
        self.resigned
    }

    #[inline]
    pub fn draw_agreed(&self) -> bool {
        self.draw_agreed
    }

    /// Returns all candidate moves, including both castles. Some may be
    /// illegal; see [`Position::invalid`].
    pub fn moves(&self) -> Vec<Move> {
        movegen::pseudo_moves(self)
    }

    /// Returns why `mv` may not be played here, or `None` if it is legal.
    pub fn invalid(&self, mv: &Move) -> Option<IllegalMove> {
        if mv.color() != self.side_to_move {
            return Some(IllegalMove::NotYourTurn);
        }
        if !self.moves().contains(mv) {
            return Some(IllegalMove::NotAvailable);
        }
        legality::check(self, mv)
    }

    /// Returns all legal moves.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = self.moves();
        moves.retain(|m| legality::check(self, m).is_none());
        moves
    }

    /// Returns true if the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        self.moves()
            .iter()
            .any(|m| legality::check(self, m).is_none())
    }

    /// Plays a move and returns the resulting position.
    ///
    /// The move should come from [`Position::legal_moves`]; playing an illegal
    /// move produces a position that breaks the rules of chess but is still
    /// internally consistent.
    #[must_use]
    pub fn play(&self, mv: &Move) -> Position {
        let irreversible =
            mv.piece().piece == Piece::Pawn || self.board.can_capture(mv.to(), mv.color());
        let before = Arc::new(self.clone());

        let mut next = self.transition(|next| {
            next.en_passant = None;
            movegen::apply_to_board(&mut next.board, mv);
            if let Move::DoublePush { color, from, .. } = *mv {
                next.en_passant = from.offset(0, color.pawn_direction());
            }
            next.halfmove_clock = if irreversible {
                0
            } else {
                next.halfmove_clock.saturating_add(1)
            };
            next.side_to_move = next.side_to_move.opposite();
            next.ply = next.ply.saturating_add(1);
            next.last = Some(HistoryEntry::new(*mv, before));
            next.history_len += 1;
        });
        next.record_repetition(irreversible);
        next
    }

    /// Finds the candidate move from `from` to `to`.
    ///
    /// A king moving two squares along its home rank, or onto its own rook,
    /// is read as castling. Promotions need the matching `promotion` piece.
    /// The returned move may still be illegal.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<Piece>) -> Option<Move> {
        let us = self.side_to_move;
        let piece = self.board.get(from).filter(|p| p.color == us)?;

        if piece.piece == Piece::King && from == CastleSide::king_from(us) {
            let own_rook = Some(ColoredPiece::new(Piece::Rook, us));
            for side in CastleSide::BOTH {
                let onto_rook = to == side.rook_from(us) && self.board.get(to) == own_rook;
                if to == side.king_to(us) || onto_rook {
                    return Some(Move::Castle { color: us, side });
                }
            }
        }

        self.moves().into_iter().find(|m| {
            !matches!(m, Move::Castle { .. })
                && m.from() == from
                && m.to() == to
                && m.promotion() == promotion
        })
    }

    /// Parses UCI coordinates (`e2e4`, `e7e8q`, `e1g1`) into a candidate move.
    pub fn parse_uci(&self, text: &str) -> Option<Move> {
        let uci = UciMove::parse(text)?;
        self.find_move(uci.from, uci.to, uci.promotion)
    }

    /// Marks `color` as having resigned.
    #[must_use]
    pub fn resign(&self, color: Color) -> Position {
        let mut next = self.clone();
        next.resigned = Some(color);
        next
    }

    /// Marks the game as drawn by agreement.
    #[must_use]
    pub fn agree_draw(&self) -> Position {
        let mut next = self.clone();
        next.draw_agreed = true;
        next
    }

    /// Returns true if the side to move is in check.
    #[inline]
    pub fn is_check(&self) -> bool {
        self.checks > 0
    }

    /// Returns true if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_legal_move()
    }

    /// Returns true if the side to move has no legal move and is not in check.
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_move()
    }

    /// Occurrences of this position since the last capture or pawn move,
    /// this one included.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.key()).copied().unwrap_or(0)
    }

    /// Returns true if this position has occurred three times.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    /// Returns true once 100 plies pass without a capture or pawn move.
    pub fn is_fifty_move_rule(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Number of moves played since the game's first position.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub(crate) fn last_entry(&self) -> Option<&HistoryEntry> {
        self.last.as_ref()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.to_fen())
            .field("checks", &self.checks)
            .field("history", &self.history_len)
            .field("board", &self.board)
            .finish()
    }
}
