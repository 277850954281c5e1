/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use kingfall::{generate_moves, Board, Click, Color, Game, PieceKind, Square, SquareSet};

fn sq(s: &str) -> Square {
    Square::from_uci(s).unwrap()
}

/// Plays each `from to` pair with `select` and `move_to`, asserting both succeed.
fn play(game: &mut Game, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        assert!(game.select(sq(from)), "could not select {from} in {game:?}");
        assert!(game.move_to(sq(to)), "could not move {from} to {to} in {game:?}");
    }
}

#[test]
fn pawn_double_step_then_no_more() {
    let mut game = Game::new();
    let from = Square::new(6, 4).unwrap();
    let to = Square::new(4, 4).unwrap();

    assert!(game.select(from));
    assert!(game.valid_moves().contains(to));
    assert!(game.move_to(to));

    let pawn = game.board().piece_at(to).unwrap();
    assert!(pawn.has_moved());
    assert_eq!(pawn.square(), to);
    assert!(game.board().is_empty_at(from));

    // Black replies, then the same pawn only has its single step
    play(&mut game, &[("a7", "a6")]);
    assert!(game.select(to));
    assert_eq!(game.valid_moves(), SquareSet::from(Square::new(3, 4).unwrap()));
    assert!(!game.move_to(Square::new(2, 4).unwrap()));
}

#[test]
fn rook_slides_up_a_cleared_file_into_the_enemy_rook() {
    let mut board = Board::standard();
    board.take(sq("a2"));
    board.take(sq("a7"));

    let rook = board.piece_at(Square::new(7, 0).unwrap()).unwrap();
    let expected = (0..=6)
        .filter_map(|row| Square::new(row, 0))
        .collect::<SquareSet>();

    assert_eq!(generate_moves(rook, &board), expected);
    assert!(expected.contains(Square::new(0, 0).unwrap()));

    let mut game = Game::from_board(board, Color::White);
    play(&mut game, &[("a1", "a8")]);
    let captured = game.last_move().unwrap().captured.unwrap();
    assert_eq!(captured.parts(), (Color::Black, PieceKind::Rook));
}

#[test]
fn check_is_lifted_by_a_block() {
    let mut game = Game::from_fen("4k3/8/2n5/8/8/8/8/R3K3 w").unwrap();
    assert!(!game.is_in_check(Color::Black));

    play(&mut game, &[("a1", "a8")]);
    assert!(game.is_in_check(Color::Black));
    assert_eq!(game.checkers(Color::Black), SquareSet::from(sq("a8")));

    play(&mut game, &[("c6", "d8")]);
    assert!(!game.is_in_check(Color::Black));
    assert!(!game.is_in_check(Color::White));
}

#[test]
fn check_is_lifted_by_a_capture() {
    let mut game = Game::from_fen("4k3/8/8/8/4b3/8/8/R3K3 w").unwrap();

    play(&mut game, &[("a1", "a8")]);
    assert!(game.is_in_check(Color::Black));

    play(&mut game, &[("e4", "a8")]);
    assert!(!game.is_in_check(Color::Black));
    assert_eq!(game.board().pieces_of(Color::White).count(), 1);
}

#[test]
fn moving_into_check_is_allowed() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/3RK3 b").unwrap();
    assert!(game.select(sq("e8")));
    assert!(game.valid_moves().contains(sq("d8")));

    play(&mut game, &[("e8", "d7")]);
    assert!(game.is_in_check(Color::Black));
    assert_eq!(game.king_square(Color::Black), Some(sq("d7")));
}

#[test]
fn promotion_then_queen_moves() {
    let mut game = Game::from_fen("7k/1P6/8/8/8/8/8/K7 w").unwrap();
    play(&mut game, &[("b7", "b8")]);

    let queen = game.board().piece_at(sq("b8")).unwrap();
    assert_eq!(queen.parts(), (Color::White, PieceKind::Queen));
    assert!(game.last_move().unwrap().promoted);

    // The new Queen attacks along the back rank right away
    assert!(game.is_in_check(Color::Black));

    play(&mut game, &[("h8", "h7")]);
    assert!(game.select(sq("b8")));
    assert!(game.valid_moves().contains(sq("b1")));
    assert!(game.valid_moves().contains(sq("h2")));
    assert!(game.valid_moves().contains(sq("a7")));
}

#[test]
fn capture_promotion() {
    let mut game = Game::from_fen("1r5k/P7/8/8/8/8/8/K7 w").unwrap();
    play(&mut game, &[("a7", "b8")]);

    let report = *game.last_move().unwrap();
    assert!(report.promoted);
    assert_eq!(
        report.captured.map(|p| p.parts()),
        Some((Color::Black, PieceKind::Rook))
    );
    assert_eq!(report.piece.kind(), PieceKind::Queen);
}

#[test]
fn short_game_ends_on_king_capture() {
    let mut game = Game::new();
    let clicks = [
        ("e2", "e4"),
        ("e7", "e5"),
        ("d1", "h5"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("g8", "f6"),
        ("h5", "f7"),
    ];

    for (from, to) in clicks {
        assert_eq!(game.click(sq(from)), Click::Selected, "clicking {from}");
        assert_eq!(game.click(sq(to)), Click::Moved, "clicking {to}");
    }
    assert!(game.is_in_check(Color::Black));
    assert!(!game.is_game_over());

    // Black ignores the check, which the rules allow
    assert_eq!(game.click(sq("a7")), Click::Selected);
    assert_eq!(game.click(sq("a6")), Click::Moved);

    assert_eq!(game.click(sq("f7")), Click::Selected);
    assert_eq!(game.click(sq("e8")), Click::Moved);

    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(Color::White));
    assert_eq!(game.king_square(Color::Black), None);

    let finished = game.clone();
    for square in Square::iter() {
        assert_eq!(game.click(square), Click::Ignored);
    }
    assert_eq!(game, finished);

    game.reset();
    assert!(!game.is_game_over());
    assert_eq!(game.board(), &Board::standard());
}
