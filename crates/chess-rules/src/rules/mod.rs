//! Game termination.
//!
//! Checkmate, stalemate, repetition and the fifty-move rule are read from the
//! position itself. Resignation and draw agreement are recorded on the
//! position by the caller.

use crate::Position;
use chess_core::Color;
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins (checkmate or resignation).
    WhiteWins,
    /// Black wins (checkmate or resignation).
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// The side that won, if any.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }

    fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }

    /// PGN result token: `1-0`, `0-1` or `1/2-1/2`.
    pub fn pgn_token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "White wins"),
            GameResult::BlackWins => write!(f, "Black wins"),
            GameResult::Draw(reason) => write!(f, "Draw by {}", reason),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// The same position occurred three times.
    ThreefoldRepetition,
    /// 100 half-moves without pawn move or capture.
    FiftyMoveRule,
    Agreement,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::Agreement => "agreement",
        };
        f.write_str(text)
    }
}

impl Position {
    /// Returns why the game is drawn, if it is.
    ///
    /// An agreed draw wins over stalemate, which wins over repetition, which
    /// wins over the fifty-move rule.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.draw_agreed() {
            Some(DrawReason::Agreement)
        } else if self.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if self.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else if self.is_fifty_move_rule() {
            Some(DrawReason::FiftyMoveRule)
        } else {
            None
        }
    }

    /// Returns true if the game is drawn for any reason.
    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    /// Returns the game result if the game is over, otherwise `None`.
    ///
    /// A resignation decides the game first. Checkmate is reported before the
    /// draw rules, except for an agreed draw.
    pub fn result(&self) -> Option<GameResult> {
        if let Some(loser) = self.resigned() {
            return Some(GameResult::win_for(loser.opposite()));
        }
        if self.draw_agreed() {
            return Some(GameResult::Draw(DrawReason::Agreement));
        }
        if self.is_checkmate() {
            return Some(GameResult::win_for(self.side_to_move().opposite()));
        }
        self.draw_reason().map(GameResult::Draw)
    }

    /// Returns true if the game is over.
    pub fn is_game_over(&self) -> bool {
        self.result().is_some()
    }
}
