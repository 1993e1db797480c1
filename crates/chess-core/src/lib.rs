//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and its
//! front ends:
//! - [`Piece`], [`ColoredPiece`] and [`Color`] for piece identities
//! - [`Square`] for board coordinates
//! - [`CastlingRights`] and [`CastleSide`]
//! - [`Move`] for move representation
//! - [`Fen`] parsing and serialization

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, UciMove};
pub use piece::{ColoredPiece, Movement, Piece};
pub use square::{file_from_char, file_to_char, rank_from_char, rank_to_char, Square};
