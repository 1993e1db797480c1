//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{CastlingRights, Color, ColoredPiece, Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("invalid king count: {color} has {count} kings, expected 1")]
    InvalidKingCount { color: Color, count: usize },
}

/// A parsed FEN record.
///
/// This holds the six FEN fields as typed values, without any rule
/// normalisation. The rules engine turns it into a playable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Square contents indexed by [`Square::index`].
    pub placement: [Option<ColoredPiece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Starts at 1 and increments after Black's move.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Largest accepted half-move clock.
    pub const MAX_HALFMOVE_CLOCK: u32 = u32::MAX / 2;

    /// Largest accepted full-move number. Keeps the ply count in range.
    pub const MAX_FULLMOVE_NUMBER: u32 = u32::MAX / 4;

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingRights::from_fen(parts[2])
            .ok_or_else(|| FenError::InvalidCastlingRights(parts[2].to_string()))?;

        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .ok()
            .filter(|&n| n <= Self::MAX_HALFMOVE_CLOCK)
            .ok_or_else(|| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0 && n <= Self::MAX_FULLMOVE_NUMBER)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        for color in Color::BOTH {
            let king = Some(ColoredPiece::new(Piece::King, color));
            let count = placement.iter().filter(|&&p| p == king).count();
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[Option<ColoredPiece>; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut squares = [None; 64];
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u32;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip;
                } else if let Some(piece) = ColoredPiece::from_fen_char(c) {
                    if file < 8 {
                        squares[Square::at(file as u8, rank).index() as usize] = Some(piece);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }

        Ok(squares)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank() == 2 || sq.rank() == 5 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Writes the piece placement field.
    pub fn placement_field(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.placement[Square::at(file, rank).index() as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        write!(
            f,
            "{} {} {} {} {} {}",
            self.placement_field(),
            self.side_to_move.fen_char(),
            self.castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for Fen {
    fn default() -> Self {
        Fen {
            placement: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINGS: &str = "4k3/8/8/8/8/8/8/4K3";

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingRights::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.placement[Square::E1.index() as usize],
            Some(ColoredPiece::new(Piece::King, Color::White))
        );
        assert_eq!(
            fen.placement[Square::A8.index() as usize],
            Some(ColoredPiece::new(Piece::Rook, Color::Black))
        );
    }

    #[test]
    fn parse_custom_position() {
        let fen = Fen::parse("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
            .unwrap();
        assert_eq!(fen.halfmove_clock, 2);
        assert_eq!(fen.fullmove_number, 3);
    }

    #[test]
    fn roundtrip() {
        for original in [
            Fen::STARTPOS,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 b Kq - 12 40",
        ] {
            assert_eq!(Fen::parse(original).unwrap().to_string(), original);
        }
    }

    #[test]
    fn invalid_part_count_and_color() {
        assert!(matches!(
            Fen::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));
        assert!(matches!(
            Fen::parse(&format!("{} x KQkq - 0 1", KINGS)),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        // Too few ranks
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K2 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn castling_must_be_canonical() {
        assert!(matches!(
            Fen::parse(&format!("{} w XYZ - 0 1", KINGS)),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            Fen::parse(&format!("{} w qkQK - 0 1", KINGS)),
            Err(FenError::InvalidCastlingRights(_))
        ));
        let fen = Fen::parse(&format!("{} w Kq - 0 1", KINGS)).unwrap();
        assert_eq!(fen.castling.to_string(), "Kq");
    }

    #[test]
    fn en_passant_field() {
        for bad in ["abc", "x3", "e4"] {
            assert!(matches!(
                Fen::parse(&format!("{} w - {} 0 1", KINGS, bad)),
                Err(FenError::InvalidEnPassantSquare(_))
            ));
        }
        let fen = Fen::parse(&format!("{} b - d6 0 1", KINGS)).unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("d6"));
    }

    #[test]
    fn invalid_clocks() {
        assert!(matches!(
            Fen::parse(&format!("{} w - - abc 1", KINGS)),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse(&format!("{} w - - 0 xyz", KINGS)),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert!(matches!(
            Fen::parse(&format!("{} w - - 0 0", KINGS)),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn oversized_clocks_are_rejected() {
        assert!(matches!(
            Fen::parse(&format!("{} w - - 0 4294967295", KINGS)),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert!(matches!(
            Fen::parse(&format!("{} w - - 4294967295 1", KINGS)),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        let max = Fen::parse(&format!(
            "{} b - - {} {}",
            KINGS,
            Fen::MAX_HALFMOVE_CLOCK,
            Fen::MAX_FULLMOVE_NUMBER
        ))
        .unwrap();
        assert_eq!(max.halfmove_clock, Fen::MAX_HALFMOVE_CLOCK);
        assert_eq!(max.fullmove_number, Fen::MAX_FULLMOVE_NUMBER);
        assert!(Fen::parse(&format!(
            "{} w - - 0 {}",
            KINGS,
            Fen::MAX_FULLMOVE_NUMBER + 1
        ))
        .is_err());
    }

    #[test]
    fn king_count() {
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidKingCount {
                color: Color::White,
                count: 0
            })
        );
        assert_eq!(
            Fen::parse("3kk3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::InvalidKingCount {
                color: Color::Black,
                count: 2
            })
        );
    }

    #[test]
    fn fen_error_display() {
        let err = FenError::InvalidPartCount(3);
        assert!(format!("{}", err).contains("3"));

        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(format!("{}", err).contains("z9"));

        let err = FenError::InvalidKingCount {
            color: Color::Black,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "invalid king count: Black has 2 kings, expected 1"
        );
    }

    proptest::proptest! {
        #[test]
        fn parse_never_panics(text in "[ -~]{0,90}") {
            let _ = Fen::parse(&text);
        }

        #[test]
        fn parsed_records_print_back(
            side in proptest::bool::ANY,
            rights in 0u8..16,
            halfmove in 0u32..200,
            fullmove in 1u32..500,
        ) {
            let mut record = Fen::parse(Fen::STARTPOS).unwrap();
            record.side_to_move = if side { Color::White } else { Color::Black };
            record.castling = CastlingRights::new(rights);
            record.halfmove_clock = halfmove;
            record.fullmove_number = fullmove;
            let text = record.to_string();
            proptest::prop_assert_eq!(Fen::parse(&text), Ok(record));
        }
    }
}
