//! PGN (Portable Game Notation) export and import.
//!
//! Export writes the seven-tag roster, the starting FEN when the game did not
//! begin from the standard position, and SAN movetext wrapped at 80 columns.
//! Import reads any number of games, skipping comments, NAGs and variations.

use crate::san::{san_to_move, SanError};
use crate::Position;
use chess_core::{Color, FenError};
use chrono::{NaiveDate, Utc};
use std::fmt::Write as _;
use thiserror::Error;

/// Movetext lines are wrapped to at most this many columns.
pub const LINE_WIDTH: usize = 80;

/// Tag values for PGN export. Blank fields are written with defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnTags {
    pub event: String,
    pub site: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub round: String,
    pub white: String,
    pub black: String,
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    match value.trim() {
        "" => default,
        trimmed => trimmed,
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Joins tokens with spaces, starting a new line whenever the next token
/// would push the current one past [`LINE_WIDTH`].
#[derive(Debug, Default)]
struct LineWrapper {
    lines: Vec<String>,
    current: String,
}

impl LineWrapper {
    fn push(&mut self, token: &str) {
        if self.current.is_empty() {
            self.current.push_str(token);
        } else if self.current.len() + 1 + token.len() > LINE_WIDTH {
            self.lines.push(std::mem::replace(&mut self.current, token.to_string()));
        } else {
            self.current.push(' ');
            self.current.push_str(token);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.lines.push(self.current);
        self.lines
    }
}

impl Position {
    /// Exports the game that led to this position as PGN.
    pub fn to_pgn(&self, tags: &PgnTags) -> String {
        let begin = self.begin();
        let result = self.result().map_or("*", |r| r.pgn_token());
        let date = tags
            .date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format("%Y.%m.%d")
            .to_string();

        let mut roster = vec![
            ("Event", or_default(&tags.event, "Casual Game").to_string()),
            ("Site", or_default(&tags.site, "Local Game").to_string()),
            ("Date", date),
            ("Round", or_default(&tags.round, "-").to_string()),
            ("White", or_default(&tags.white, "Unknown").to_string()),
            ("Black", or_default(&tags.black, "Unknown").to_string()),
            ("Result", result.to_string()),
        ];
        let begin_fen = begin.to_fen();
        if begin_fen != Position::startpos().to_fen() {
            roster.push(("SetUp", "1".to_string()));
            roster.push(("FEN", begin_fen));
        }

        let mut out = String::new();
        for (name, value) in &roster {
            let _ = writeln!(out, "[{} \"{}\"]", name, escape(value));
        }
        out.push('\n');

        let mut wrapper = LineWrapper::default();
        let mut ply = begin.ply();
        if ply % 2 == 1 {
            wrapper.push(&format!("{}...", ply / 2));
        }
        for entry in self.history() {
            if ply % 2 == 0 {
                wrapper.push(&format!("{}.", ply / 2));
            }
            ply += 1;
            wrapper.push(&entry.before().san(&entry.mv()));
        }
        wrapper.push(result);

        for line in wrapper.finish() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Errors from [`parse_pgn`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgnError {
    #[error("malformed tag pair")]
    TagSyntax,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("move syntax error: {0}")]
    MoveSyntax(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
    #[error("move number {found} does not match expected {expected}")]
    MoveNumberMismatch { expected: u32, found: u32 },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("invalid FEN tag: {0}")]
    InvalidFen(#[from] FenError),
    #[error("result {0} contradicts the final position")]
    ResultMismatch(String),
}

impl From<SanError> for PgnError {
    fn from(err: SanError) -> Self {
        match err {
            SanError::Empty => PgnError::MoveSyntax(String::new()),
            SanError::InvalidFormat(s) => PgnError::MoveSyntax(s),
            SanError::NoMatchingMove(s) => PgnError::IllegalMove(s),
            SanError::AmbiguousMove(s) => PgnError::AmbiguousMove(s),
        }
    }
}

/// A game read from PGN: its tag pairs in file order and its final position.
#[derive(Debug, Clone)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    pub position: Position,
}

impl PgnGame {
    /// Returns the value of the first tag called `name`.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    TagOpen,
    TagClose,
    VariationOpen,
    VariationClose,
    Period,
    Str(String),
    Nag,
    Symbol(String),
    Reserved(char),
}

fn is_symbol_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_+#=:-!?/".contains(c)
}

fn tokenize(text: &str) -> Result<Vec<Token>, PgnError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line_start = true;

    while let Some(c) = chars.next() {
        let at_line_start = line_start;
        line_start = c == '\n';
        match c {
            '%' if at_line_start => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        line_start = true;
                        break;
                    }
                }
            }
            ';' => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        line_start = true;
                        break;
                    }
                }
            }
            '{' => {
                if !chars.by_ref().any(|skipped| skipped == '}') {
                    return Err(PgnError::UnexpectedEnd);
                }
            }
            c if c.is_whitespace() => {}
            '[' => tokens.push(Token::TagOpen),
            ']' => tokens.push(Token::TagClose),
            '(' => tokens.push(Token::VariationOpen),
            ')' => tokens.push(Token::VariationClose),
            '.' => tokens.push(Token::Period),
            '*' => tokens.push(Token::Symbol("*".to_string())),
            '<' | '>' => tokens.push(Token::Reserved(c)),
            '"' => {
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => return Err(PgnError::UnterminatedString),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => value.push(escaped),
                            Some(other) => {
                                value.push('\\');
                                value.push(other);
                            }
                            None => return Err(PgnError::UnterminatedString),
                        },
                        Some(other) => value.push(other),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '$' => {
                let mut digits = 0;
                while chars.next_if(|d| d.is_ascii_digit()).is_some() {
                    digits += 1;
                }
                if digits == 0 {
                    return Err(PgnError::UnexpectedToken("$".to_string()));
                }
                tokens.push(Token::Nag);
            }
            c if c.is_ascii_alphanumeric() => {
                let mut symbol = c.to_string();
                while let Some(next) = chars.next_if(|&n| is_symbol_continuation(n)) {
                    symbol.push(next);
                }
                tokens.push(Token::Symbol(symbol));
            }
            other => return Err(PgnError::UnexpectedToken(other.to_string())),
        }
    }
    Ok(tokens)
}

fn is_tag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses every game in `text`.
///
/// A game whose tags hold `SetUp "1"` and a `FEN` starts from that position.
/// A result token that the final position does not explain marks the loser
/// as resigned, or the draw as agreed.
pub fn parse_pgn(text: &str) -> Result<Vec<PgnGame>, PgnError> {
    let tokens = tokenize(text)?;
    let mut stream = tokens.into_iter().peekable();
    let mut games = Vec::new();

    while stream.peek().is_some() {
        let mut tags = Vec::new();
        while stream.next_if_eq(&Token::TagOpen).is_some() {
            let name = match stream.next() {
                Some(Token::Symbol(name)) if is_tag_name(&name) => name,
                _ => return Err(PgnError::TagSyntax),
            };
            let value = match stream.next() {
                Some(Token::Str(value)) => value,
                _ => return Err(PgnError::TagSyntax),
            };
            if stream.next() != Some(Token::TagClose) {
                return Err(PgnError::TagSyntax);
            }
            tags.push((name, value));
        }

        let tag = |name: &str| tags.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str());
        let mut position = match (tag("SetUp"), tag("FEN")) {
            (Some("1"), Some(fen)) => Position::from_fen(fen)?,
            _ => Position::startpos(),
        };

        loop {
            let token = stream.next().ok_or(PgnError::UnexpectedEnd)?;
            let symbol = match token {
                Token::Period | Token::Nag => continue,
                Token::VariationOpen => {
                    let mut depth = 1;
                    while depth > 0 {
                        match stream.next().ok_or(PgnError::UnexpectedEnd)? {
                            Token::VariationOpen => depth += 1,
                            Token::VariationClose => depth -= 1,
                            _ => {}
                        }
                    }
                    continue;
                }
                Token::Symbol(symbol) => symbol,
                Token::Str(s) => return Err(PgnError::UnexpectedToken(format!("\"{}\"", s))),
                Token::Reserved(c) => return Err(PgnError::UnexpectedToken(c.to_string())),
                Token::TagOpen => return Err(PgnError::UnexpectedToken("[".to_string())),
                Token::TagClose => return Err(PgnError::UnexpectedToken("]".to_string())),
                Token::VariationClose => {
                    return Err(PgnError::UnexpectedToken(")".to_string()))
                }
            };

            if symbol.bytes().all(|b| b.is_ascii_digit()) {
                let found = symbol
                    .parse::<u32>()
                    .map_err(|_| PgnError::UnexpectedToken(symbol.clone()))?;
                let expected = position.fullmove_number();
                if found != expected {
                    return Err(PgnError::MoveNumberMismatch { expected, found });
                }
                continue;
            }

            match symbol.as_str() {
                "1-0" => {
                    position = settle_win(position, Color::White, &symbol)?;
                    break;
                }
                "0-1" => {
                    position = settle_win(position, Color::Black, &symbol)?;
                    break;
                }
                "1/2-1/2" => {
                    if position.is_checkmate() {
                        return Err(PgnError::ResultMismatch(symbol));
                    }
                    if !position.is_draw() {
                        position = position.agree_draw();
                    }
                    break;
                }
                "*" => break,
                san => {
                    let mv = san_to_move(&position, san)?;
                    position = position.play(&mv);
                }
            }
        }

        tracing::debug!(
            moves = position.history_len(),
            fen = %position.to_fen(),
            "imported PGN game"
        );
        games.push(PgnGame { tags, position });
    }

    Ok(games)
}

fn settle_win(position: Position, winner: Color, token: &str) -> Result<Position, PgnError> {
    if position.is_checkmate() {
        if position.side_to_move() == winner {
            return Err(PgnError::ResultMismatch(token.to_string()));
        }
        return Ok(position);
    }
    Ok(position.resign(winner.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameResult;

    fn tags() -> PgnTags {
        PgnTags {
            event: "Club Night".to_string(),
            site: "Town Hall".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
            round: "2".to_string(),
            white: "Alice".to_string(),
            black: "Bob".to_string(),
        }
    }

    fn play_san(position: Position, moves: &[&str]) -> Position {
        moves
            .iter()
            .fold(position, |pos, san| pos.play_san(san).unwrap())
    }

    #[test]
    fn exports_roster_and_movetext() {
        let pos = play_san(Position::startpos(), &["f4", "e5", "g4", "Qh4#"]);
        let pgn = pos.to_pgn(&tags());
        assert_eq!(
            pgn,
            "[Event \"Club Night\"]\n\
             [Site \"Town Hall\"]\n\
             [Date \"2024.03.09\"]\n\
             [Round \"2\"]\n\
             [White \"Alice\"]\n\
             [Black \"Bob\"]\n\
             [Result \"0-1\"]\n\
             \n\
             1. f4 e5 2. g4 Qh4# 0-1\n"
        );
    }

    #[test]
    fn blank_tags_get_defaults() {
        let pgn = Position::startpos().to_pgn(&PgnTags {
            white: "   ".to_string(),
            ..PgnTags::default()
        });
        assert!(pgn.contains("[Event \"Casual Game\"]"));
        assert!(pgn.contains("[Site \"Local Game\"]"));
        assert!(pgn.contains("[Round \"-\"]"));
        assert!(pgn.contains("[White \"Unknown\"]"));
        assert!(pgn.contains("[Black \"Unknown\"]"));
        assert!(pgn.contains("[Result \"*\"]"));
        assert!(pgn.ends_with("\n\n*\n"));
    }

    #[test]
    fn tag_values_are_escaped() {
        let pgn = Position::startpos().to_pgn(&PgnTags {
            event: "The \"Big\" One \\ 2".to_string(),
            ..tags()
        });
        assert!(pgn.contains(r#"[Event "The \"Big\" One \\ 2"]"#));
        let games = parse_pgn(&pgn).unwrap();
        assert_eq!(games[0].tag("Event"), Some("The \"Big\" One \\ 2"));
    }

    #[test]
    fn black_first_game_numbering() {
        let start =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
                .unwrap();
        let pos = play_san(start, &["e5", "Nf3"]);
        let pgn = pos.to_pgn(&tags());
        assert!(pgn.contains("[SetUp \"1\"]"));
        assert!(pgn.contains(
            "[FEN \"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1\"]"
        ));
        assert!(pgn.ends_with("\n1... e5 2. Nf3 *\n"));
    }

    #[test]
    fn movetext_wraps_at_80_columns() {
        let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
        let mut pos = Position::startpos();
        for _ in 0..10 {
            pos = play_san(pos, &shuffle[..2]);
            pos = play_san(pos, &shuffle[2..]);
        }
        let pgn = pos.agree_draw().to_pgn(&tags());
        let movetext: Vec<&str> = pgn.split("\n\n").nth(1).unwrap().lines().collect();
        assert!(movetext.len() > 1);
        assert!(movetext.iter().all(|line| line.len() <= LINE_WIDTH));
        assert!(movetext[0].len() > LINE_WIDTH - 8);
        assert!(movetext.last().unwrap().ends_with("1/2-1/2"));
    }

    #[test]
    fn import_roundtrip() {
        let pos = play_san(
            Position::startpos(),
            &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Bxc6", "dxc6", "O-O"],
        );
        let pgn = pos.to_pgn(&tags());
        let games = parse_pgn(&pgn).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].position.to_fen(), pos.to_fen());
        assert_eq!(games[0].tag("White"), Some("Alice"));
        assert_eq!(games[0].tag("Result"), Some("*"));
        assert_eq!(games[0].position.history_len(), 9);
    }

    #[test]
    fn import_skips_comments_nags_and_variations() {
        let text = "% exported by hand\n\
                    [Event \"Test\"]\n\
                    \n\
                    1. e4 {best by test} e5 $1 2. Nf3 (2. f4 exf4 (2... d5)) Nc6 ; main line\n\
                    3. Bb5 a6 *\n";
        let games = parse_pgn(text).unwrap();
        assert_eq!(
            games[0].position.to_fen(),
            "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4"
        );
    }

    #[test]
    fn import_multiple_games() {
        let text = "[Event \"One\"]\n\n1. e4 1-0\n\n[Event \"Two\"]\n\n1. d4 d5 1/2-1/2\n";
        let games = parse_pgn(text).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].position.resigned(), Some(Color::Black));
        assert_eq!(games[0].position.result(), Some(GameResult::WhiteWins));
        assert!(games[1].position.draw_agreed());
        assert_eq!(games[1].tag("Event"), Some("Two"));
    }

    #[test]
    fn import_checkmate_result() {
        let games = parse_pgn("1. f4 e5 2. g4 Qh4# 0-1").unwrap();
        let pos = &games[0].position;
        assert!(pos.is_checkmate());
        assert_eq!(pos.resigned(), None);
        assert_eq!(
            parse_pgn("1. f4 e5 2. g4 Qh4# 1-0").unwrap_err(),
            PgnError::ResultMismatch("1-0".to_string())
        );
    }

    #[test]
    fn win_token_resigns_the_loser_whoever_is_to_move() {
        let games = parse_pgn("1. e4 e5 1-0\n\n1. e4 e5 0-1").unwrap();
        let white_to_move = &games[0].position;
        assert_eq!(white_to_move.side_to_move(), Color::White);
        assert_eq!(white_to_move.resigned(), Some(Color::Black));
        assert_eq!(white_to_move.result(), Some(GameResult::WhiteWins));
        assert_eq!(games[1].position.resigned(), Some(Color::White));
        assert_eq!(games[1].position.result(), Some(GameResult::BlackWins));
    }

    #[test]
    fn import_from_fen_tag() {
        let text = "[SetUp \"1\"]\n[FEN \"8/P6k/8/8/8/8/8/7K w - - 0 1\"]\n\n1. a8=Q *";
        let games = parse_pgn(text).unwrap();
        assert_eq!(games[0].position.to_fen(), "Q7/7k/8/8/8/8/8/7K b - - 0 1");
    }

    #[test]
    fn import_errors() {
        assert_eq!(
            parse_pgn("1. e5 *").unwrap_err(),
            PgnError::IllegalMove("e5".to_string())
        );
        assert_eq!(
            parse_pgn("1. e4 e5 3. Nf3 *").unwrap_err(),
            PgnError::MoveNumberMismatch {
                expected: 2,
                found: 3
            }
        );
        assert_eq!(
            parse_pgn("1. Zz9 *").unwrap_err(),
            PgnError::MoveSyntax("Zz9".to_string())
        );
        assert_eq!(
            parse_pgn("[SetUp \"1\"]\n[FEN \"8/8/8/8/8/8/8/1N1K1N1k w - - 0 1\"]\n1. Nd2 *")
                .unwrap_err(),
            PgnError::AmbiguousMove("Nd2".to_string())
        );
        assert_eq!(
            parse_pgn("[Event \"open").unwrap_err(),
            PgnError::UnterminatedString
        );
        assert_eq!(parse_pgn("[Event Test]").unwrap_err(), PgnError::TagSyntax);
        assert_eq!(parse_pgn("1. e4 e5").unwrap_err(), PgnError::UnexpectedEnd);
        assert!(matches!(
            parse_pgn("[SetUp \"1\"]\n[FEN \"8/8/8\"]\n*").unwrap_err(),
            PgnError::InvalidFen(_)
        ));
    }

    #[test]
    fn empty_input_has_no_games() {
        assert!(parse_pgn("").unwrap().is_empty());
        assert!(parse_pgn("  \n ; nothing here\n").unwrap().is_empty());
    }
}
