//! Move history.
//!
//! Each position keeps only its last move and the position that move was
//! played from. Earlier moves are reached through that position, so every
//! position of a game shares one chain and branches share their prefix.

use crate::Position;
use chess_core::Move;
use std::sync::Arc;

/// A played move and the position it was played from.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    mv: Move,
    before: Arc<Position>,
}

impl HistoryEntry {
    pub(crate) fn new(mv: Move, before: Arc<Position>) -> Self {
        Self { mv, before }
    }

    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// The position the move was played from.
    #[inline]
    pub fn before(&self) -> &Position {
        &self.before
    }
}

impl Position {
    /// Returns the moves played to reach this position, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut entries = Vec::with_capacity(self.history_len());
        let mut cursor = self.last_entry();
        while let Some(entry) = cursor {
            entries.push(entry.clone());
            cursor = entry.before().last_entry();
        }
        entries.reverse();
        entries
    }

    /// Returns the position after the first `index` moves.
    ///
    /// `history_position(0)` is the first position of the game; any index at
    /// or past the end returns this position.
    pub fn history_position(&self, index: usize) -> Position {
        let mut position = self;
        while position.history_len() > index {
            let Some(entry) = position.last_entry() else {
                break;
            };
            position = entry.before();
        }
        position.clone()
    }

    /// The position the game started from.
    pub fn begin(&self) -> Position {
        self.history_position(0)
    }

    /// The most recently played move.
    pub fn last_move(&self) -> Option<Move> {
        self.last_entry().map(HistoryEntry::mv)
    }
}
