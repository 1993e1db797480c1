//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - 64-byte board with per-square pin, axis and attack flags
//! - [`Position`] - Immutable game state with history and repetition tracking
//! - Legal move generation and the reasons a move is illegal
//! - Checkmate, stalemate, repetition and fifty-move detection
//! - SAN notation parsing and generation, PGN export and import
//! - Perft for validating move generation
//!
//! # Architecture
//!
//! Every transition recomputes castling rights, the en-passant target and the
//! board flags for the side to move. Legality is then a handful of flag reads
//! per move; nothing is played out speculatively except en-passant captures.
//!
//! # Example
//!
//! ```
//! use chess_rules::Position;
//!
//! let position = Position::startpos();
//! println!("Legal moves from starting position: {}", position.legal_moves().len());
//!
//! let position = position.play_san("e4").unwrap().play_san("e5").unwrap();
//! println!("Position after 1.e4 e5: {}", position.to_fen());
//! ```

mod board;
mod history;
pub mod movegen;
pub mod notation;
pub mod pgn;
mod position;
pub mod rules;
pub mod san;

pub use board::{Axis, Board};
pub use history::HistoryEntry;
pub use movegen::{leaves_king_in_check, perft, perft_divide, IllegalMove};
pub use notation::{parse_algebraic, CheckMark, MoveNotation, NormalNotation};
pub use pgn::{parse_pgn, PgnError, PgnGame, PgnTags};
pub use position::{Position, PositionKey};
pub use rules::{DrawReason, GameResult};
pub use san::{move_to_san, san_to_move, SanError};

pub use chess_core::{
    CastleSide, CastlingRights, Color, ColoredPiece, Fen, FenError, Move, Piece, Square,
};
