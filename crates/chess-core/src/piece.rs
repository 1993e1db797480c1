//! Chess piece representation.

use crate::Color;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ROYAL: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// How a piece kind travels across the board.
///
/// Directions are `(file_delta, rank_delta)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Repeats each direction until blocked.
    Slider(&'static [(i8, i8)]),
    /// Jumps exactly once by each offset.
    Leaper(&'static [(i8, i8)]),
    /// Advances forward, captures diagonally, promotes on the last rank.
    Pawn,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Promotion choices, in the order promotion moves are generated.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Knight, Piece::Rook, Piece::Bishop];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the movement rule for this piece type.
    pub const fn movement(self) -> Movement {
        match self {
            Piece::Pawn => Movement::Pawn,
            Piece::Knight => Movement::Leaper(&KNIGHT_JUMPS),
            Piece::Bishop => Movement::Slider(&DIAGONAL),
            Piece::Rook => Movement::Slider(&ORTHOGONAL),
            Piece::Queen => Movement::Slider(&ROYAL),
            Piece::King => Movement::Leaper(&ROYAL),
        }
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, color))
    }

    /// Returns the notation letter, or `None` for pawns which have none.
    pub const fn san_char(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            Piece::Knight => Some('N'),
            Piece::Bishop => Some('B'),
            Piece::Rook => Some('R'),
            Piece::Queen => Some('Q'),
            Piece::King => Some('K'),
        }
    }

    /// Parses an uppercase notation letter.
    pub const fn from_san_char(c: char) -> Option<Piece> {
        match c {
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece of a given color, one of the twelve identities a square can hold.
///
/// Each identity has a small integer id: white pieces use 1-6 and black
/// pieces 9-14, in [`Piece::ALL`] order. Id 0 is reserved for the empty
/// square, which is represented as `None` in an `Option<ColoredPiece>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColoredPiece {
    pub piece: Piece,
    pub color: Color,
}

impl ColoredPiece {
    /// The twelve colored pieces, white first.
    pub const ALL: [ColoredPiece; 12] = {
        let mut all = [ColoredPiece::new(Piece::Pawn, Color::White); 12];
        let mut i = 0;
        while i < 12 {
            let color = if i < 6 { Color::White } else { Color::Black };
            all[i] = ColoredPiece::new(Piece::ALL[i % 6], color);
            i += 1;
        }
        all
    };

    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Self {
        ColoredPiece { piece, color }
    }

    /// Returns the board id of this piece.
    #[inline]
    pub const fn id(self) -> u8 {
        self.piece as u8 + 1 + (self.color as u8) * 8
    }

    /// Looks up a piece by board id. Returns `None` for 0 and unused ids.
    #[inline]
    pub const fn from_id(id: u8) -> Option<Self> {
        let color = if id & 8 == 0 { Color::White } else { Color::Black };
        let kind = id & 7;
        if kind == 0 || kind > 6 {
            return None;
        }
        Some(ColoredPiece::new(Piece::ALL[(kind - 1) as usize], color))
    }

    /// Returns the FEN character, uppercase for white.
    #[inline]
    pub const fn fen_char(self) -> char {
        self.piece.to_fen_char(self.color)
    }

    /// Parses a FEN character.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match Piece::from_fen_char(c) {
            Some((piece, color)) => Some(ColoredPiece::new(piece, color)),
            None => None,
        }
    }
}

impl std::fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.piece)
    }
}
