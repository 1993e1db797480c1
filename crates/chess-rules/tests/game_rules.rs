//! End-to-end scenarios for chess-rules: whole games played through the
//! public API, from UCI or SAN input to FEN, PGN and game results.

use chess_rules::{
    parse_pgn, CastleSide, Color, DrawReason, GameResult, IllegalMove, Move, PgnTags, Position,
};

fn play_uci(position: &Position, moves: &[&str]) -> Position {
    moves.iter().fold(position.clone(), |pos, uci| {
        let mv = pos
            .parse_uci(uci)
            .unwrap_or_else(|| panic!("{} is not a move in {}", uci, pos.to_fen()));
        assert_eq!(pos.invalid(&mv), None, "{} is illegal in {}", uci, pos.to_fen());
        pos.play(&mv)
    })
}

#[test]
fn fools_mate() {
    let pos = play_uci(&Position::startpos(), &["f2f4", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(
        pos.to_fen(),
        "rnb1kbnr/pppp1ppp/8/4p3/5PPq/8/PPPPP2P/RNBQKBNR w KQkq - 1 3"
    );
    assert!(pos.is_checkmate());
    assert!(pos.legal_moves().is_empty());
    assert_eq!(pos.result(), Some(GameResult::BlackWins));
}

#[test]
fn every_promotion_choice() {
    let start = Position::from_fen("8/P6k/8/8/8/8/8/7K w - - 0 1").unwrap();
    let expected = [
        ("a7a8q", "Q7/7k/8/8/8/8/8/7K b - - 0 1"),
        ("a7a8n", "N7/7k/8/8/8/8/8/7K b - - 0 1"),
        ("a7a8r", "R7/7k/8/8/8/8/8/7K b - - 0 1"),
        ("a7a8b", "B7/7k/8/8/8/8/8/7K b - - 0 1"),
    ];
    for (uci, fen) in expected {
        assert_eq!(play_uci(&start, &[uci]).to_fen(), fen);
    }
    // A promotion needs its piece.
    assert_eq!(start.parse_uci("a7a8"), None);
}

#[test]
fn kingside_castle_by_king_step_or_onto_rook() {
    let start = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    for gesture in ["e1g1", "e1h1"] {
        let pos = play_uci(&start, &[gesture]);
        assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        assert_eq!(
            pos.last_move(),
            Some(Move::Castle {
                color: Color::White,
                side: CastleSide::King
            })
        );
    }
}

#[test]
fn rook_moves_and_captures_revoke_rights() {
    let start = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let pos = play_uci(&start, &["h1h8"]);
    assert_eq!(pos.castling().to_string(), "Qq");
    let pos = play_uci(&start, &["a1a2", "e8d8"]);
    assert_eq!(pos.castling().to_string(), "K");
}

#[test]
fn castling_reasons_through_public_api() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1").unwrap();
    let queenside = Move::Castle {
        color: Color::White,
        side: CastleSide::Queen,
    };
    assert_eq!(
        pos.invalid(&queenside),
        Some(IllegalMove::CastlingRightLost(CastleSide::Queen))
    );
    let black = Move::Castle {
        color: Color::Black,
        side: CastleSide::King,
    };
    assert_eq!(pos.invalid(&black), Some(IllegalMove::NotYourTurn));
}

#[test]
fn en_passant_window_lasts_one_ply() {
    let pos = play_uci(&Position::startpos(), &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(pos.en_passant().map(|s| s.to_string()), Some("d6".to_string()));
    assert!(pos.parse_uci("e5d6").is_some());

    let later = play_uci(&pos, &["a2a3", "a6a5"]);
    assert_eq!(later.en_passant(), None);
    assert_eq!(later.parse_uci("e5d6"), None);

    let taken = play_uci(&pos, &["e5d6"]);
    assert_eq!(
        taken.to_fen(),
        "rnbqkbnr/1pp1pppp/p2P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
    );
}

#[test]
fn threefold_by_knight_shuffle() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let mut pos = Position::startpos();
    for _ in 0..2 {
        assert!(!pos.is_draw());
        pos = play_uci(&pos, &shuffle);
    }
    assert!(pos.is_threefold_repetition());
    assert_eq!(
        pos.result(),
        Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
    );
}

#[test]
fn fifty_move_rule_after_quiet_move() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 99 70").unwrap();
    assert!(!pos.is_draw());
    let pos = play_uci(&pos, &["h1h2"]);
    assert_eq!(
        pos.result(),
        Some(GameResult::Draw(DrawReason::FiftyMoveRule))
    );
}

#[test]
fn pgn_roundtrip_of_scripted_game() {
    let sans = [
        "d4", "d5", "c4", "e6", "Nc3", "Nf6", "Bg5", "Be7", "e3", "O-O", "Nf3", "h6", "Bh4",
        "b6", "cxd5", "Nxd5", "Bxe7", "Qxe7", "Nxd5", "exd5", "Rc1", "Be6", "Qa4", "c5",
        "Qa3", "Rc8", "Bb5", "a6", "dxc5", "bxc5", "O-O", "Ra7", "Be2", "Nd7",
    ];
    let pos = sans
        .iter()
        .try_fold(Position::startpos(), |pos, san| pos.play_san(san))
        .unwrap();

    let tags = PgnTags {
        white: "Tartakower".to_string(),
        black: "Capablanca".to_string(),
        ..PgnTags::default()
    };
    let pgn = pos.to_pgn(&tags);
    for line in pgn.lines() {
        assert!(line.len() <= 80, "line too long: {}", line);
    }

    let games = parse_pgn(&pgn).unwrap();
    assert_eq!(games.len(), 1);
    let imported = &games[0].position;
    assert_eq!(imported.to_fen(), pos.to_fen());
    assert_eq!(imported.history_len(), sans.len());
    let replayed: Vec<String> = imported
        .history()
        .iter()
        .map(|entry| entry.before().san(&entry.mv()))
        .collect();
    assert_eq!(replayed, sans);
    assert_eq!(games[0].tag("White"), Some("Tartakower"));
}

#[test]
fn positions_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Position>();

    let pos = play_uci(&Position::startpos(), &["e2e4"]);
    let shared = &pos;
    let counts: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = shared
            .legal_moves()
            .into_iter()
            .map(move |mv| scope.spawn(move || shared.play(&mv).perft(1)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts.iter().sum::<u64>(), pos.perft(2));
}
