//! Tests for move validation, capture, ko, passing and scoring.

use std::sync::{Arc, Mutex};
use strictly_go::{
    Board, Game, GameEvent, GameObserver, MoveError, Outcome, Position, Score, Stone,
};

fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

fn play(game: &mut Game, moves: &[(usize, usize)]) {
    for &(row, col) in moves {
        game.do_move(pos(row, col)).unwrap();
    }
}

/// Reaches a position where black has just captured a single white stone
/// at (1,1) by playing (1,2), so white retaking at (1,1) repeats a position.
fn ko_game() -> Game {
    let mut game = Game::new("alice", "bob");
    play(
        &mut game,
        &[
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 3),
            (2, 1),
            (2, 2),
            (8, 8),
            (1, 1),
        ],
    );
    let outcome = game.do_move(pos(1, 2)).unwrap();
    assert_eq!(outcome.captured, vec![pos(1, 1)]);
    game
}

#[test]
fn test_new_game_black_moves_first() {
    let game = Game::new("alice", "bob");
    assert_eq!(game.current_stone(), Stone::Black);
    assert_eq!(game.current_player().username(), "alice");
    assert_eq!(game.player(Stone::White).username(), "bob");
    assert_eq!(game.pass_count(), 0);
    assert!(!game.is_game_over());
    assert_eq!(game.outcome(), None);
}

#[test]
fn test_move_alternates_turns() {
    let mut game = Game::new("alice", "bob");
    let outcome = game.do_move(pos(4, 4)).unwrap();
    assert_eq!(outcome.stone, Stone::Black);
    assert_eq!(outcome.next, Stone::White);
    assert!(outcome.captured.is_empty());
    assert_eq!(game.board().stone_at(4, 4), Stone::Black);
    assert_eq!(game.current_stone(), Stone::White);
    assert_eq!(game.moves_played(), 1);
}

#[test]
fn test_occupied_and_off_board_are_rejected() {
    let mut game = Game::new("alice", "bob");
    game.do_move(pos(4, 4)).unwrap();
    let before = game.board().clone();

    assert_eq!(game.do_move(pos(4, 4)), Err(MoveError::Occupied(pos(4, 4))));
    assert_eq!(
        game.do_move(pos(9, 0)),
        Err(MoveError::OffBoard { row: 9, col: 0 })
    );
    assert_eq!(game.board(), &before);
    assert_eq!(game.current_stone(), Stone::White);
    assert!(!game.is_valid_move(pos(4, 4)));
    assert!(!game.is_valid_move(pos(0, 9)));
}

#[test]
fn test_single_stone_capture() {
    let mut game = Game::new("alice", "bob");
    play(&mut game, &[(0, 0), (0, 1), (5, 5)]);
    let outcome = game.do_move(pos(1, 0)).unwrap();
    assert_eq!(outcome.captured, vec![pos(0, 0)]);
    assert!(game.board().is_empty(pos(0, 0)));
}

#[test]
fn test_group_capture_in_corner() {
    let mut game = Game::new("alice", "bob");
    play(&mut game, &[(0, 0), (0, 2), (0, 1), (1, 1), (1, 0)]);
    let outcome = game.do_move(pos(2, 0)).unwrap();

    assert_eq!(outcome.captured, vec![pos(0, 0), pos(0, 1), pos(1, 0)]);
    for p in [pos(0, 0), pos(0, 1), pos(1, 0)] {
        assert!(game.board().is_empty(p));
    }
    assert_eq!(game.board().count(Stone::White), 3);
}

#[test]
fn test_capture_takes_priority_over_suicide() {
    // Black at (1,2) has no liberty of its own but captures (1,1).
    let game = ko_game();
    assert_eq!(game.board().stone_at(1, 2), Stone::Black);
    assert!(game.board().is_empty(pos(1, 1)));
}

#[test]
fn test_single_stone_suicide_repeats_position() {
    let mut game = Game::new("alice", "bob");
    play(&mut game, &[(5, 5), (0, 1), (6, 6), (1, 0)]);
    let before = game.board().clone();

    assert_eq!(game.do_move(pos(0, 0)), Err(MoveError::Ko(pos(0, 0))));
    assert_eq!(game.board(), &before);
    assert_eq!(game.current_stone(), Stone::Black);
}

#[test]
fn test_multi_stone_suicide_removes_own_group() {
    let mut game = Game::new("alice", "bob");
    play(&mut game, &[(0, 0), (1, 0), (8, 8), (1, 1), (8, 7), (0, 2)]);

    let outcome = game.do_move(pos(0, 1)).unwrap();
    assert!(outcome.is_suicide());
    assert_eq!(outcome.captured, vec![pos(0, 0), pos(0, 1)]);
    assert!(game.board().is_empty(pos(0, 0)));
    assert!(game.board().is_empty(pos(0, 1)));
    assert_eq!(game.current_stone(), Stone::White);
}

#[test]
fn test_ko_recapture_is_rejected() {
    let mut game = ko_game();
    let before = game.board().clone();
    let history = game.history_len();

    assert_eq!(game.do_move(pos(1, 1)), Err(MoveError::Ko(pos(1, 1))));
    assert_eq!(game.board(), &before);
    assert_eq!(game.current_stone(), Stone::White);
    assert_eq!(game.history_len(), history);
    assert!(!game.is_legal(pos(1, 1)));
}

#[test]
fn test_ko_point_excluded_from_legal_positions() {
    let game = ko_game();
    let legal = game.legal_positions();
    assert!(!legal.contains(&pos(1, 1)));
    assert!(legal.contains(&pos(4, 4)));
    assert_eq!(legal.len(), game.board().empty_positions().len() - 1);
}

#[test]
fn test_ko_can_be_retaken_after_board_changes() {
    let mut game = ko_game();
    play(&mut game, &[(6, 6), (7, 7)]);
    let outcome = game.do_move(pos(1, 1)).unwrap();
    assert_eq!(outcome.captured, vec![pos(1, 2)]);
}

#[test]
fn test_history_grows_per_move_not_per_pass() {
    let mut game = Game::new("alice", "bob");
    assert_eq!(game.history_len(), 0);
    game.do_move(pos(3, 3)).unwrap();
    game.pass().unwrap();
    assert_eq!(game.history_len(), 1);
}

#[test]
fn test_move_resets_pass_count() {
    let mut game = Game::new("alice", "bob");
    game.pass().unwrap();
    assert_eq!(game.pass_count(), 1);
    assert_eq!(game.current_stone(), Stone::White);

    game.do_move(pos(4, 4)).unwrap();
    assert_eq!(game.pass_count(), 0);

    game.pass().unwrap();
    assert!(!game.is_game_over());
    game.pass().unwrap();
    assert!(game.is_game_over());
    assert_eq!(game.outcome(), Some(Outcome::Winner(Stone::White)));
    assert_eq!(game.winner().map(|p| p.username()), Some("bob"));
    assert_eq!(game.final_score(game.player(Stone::White)), 81);
}

#[test]
fn test_two_passes_on_empty_board_is_draw() {
    let mut game = Game::new("alice", "bob");
    game.pass().unwrap();
    game.pass().unwrap();
    assert!(game.is_game_over());
    assert_eq!(game.score(), Score { black: 0, white: 0 });
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert!(game.winner().is_none());
}

#[test]
fn test_no_actions_after_game_over() {
    let mut game = Game::new("alice", "bob");
    game.pass().unwrap();
    game.pass().unwrap();
    assert_eq!(game.do_move(pos(0, 0)), Err(MoveError::GameOver));
    assert_eq!(game.pass(), Err(MoveError::GameOver));
    assert!(game.legal_positions().is_empty());
}

#[test]
fn test_full_board_ends_game() {
    let mut board = Board::new(2);
    for p in board.positions().collect::<Vec<_>>() {
        board.place(p, Stone::Black);
    }
    let game = Game::with_board("alice", "bob", board);
    assert!(game.is_game_over());
    assert_eq!(game.score(), Score { black: 4, white: 0 });
    assert_eq!(game.winner().map(|p| p.username()), Some("alice"));
}

#[test]
fn test_area_scoring_with_territory() {
    let mut board = Board::new(5);
    for row in 0..5 {
        board.place(pos(row, 1), Stone::Black);
        board.place(pos(row, 3), Stone::White);
    }
    let game = Game::with_board("alice", "bob", board.clone());
    assert_eq!(game.score(), Score { black: 10, white: 10 });
    assert_eq!(game.score().outcome(), Outcome::Draw);

    board.place(pos(0, 0), Stone::White);
    let game = Game::with_board("alice", "bob", board);
    assert_eq!(game.score(), Score { black: 5, white: 11 });
    assert_eq!(game.score().outcome(), Outcome::Winner(Stone::White));
}

#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl GameObserver for Recorder {
    fn on_event(&mut self, event: &GameEvent, _board: &Board) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[test]
fn test_observer_receives_events_in_order() {
    let recorder = Recorder::default();
    let mut game = Game::new("alice", "bob");
    game.add_observer(Box::new(recorder.clone()));

    game.do_move(pos(2, 2)).unwrap();
    assert!(game.do_move(pos(2, 2)).is_err());
    game.pass().unwrap();
    game.pass().unwrap();

    let events = recorder.events.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        GameEvent::StonePlaced {
            stone: Stone::Black,
            position: pos(2, 2),
            captured: Vec::new(),
        }
    );
    assert_eq!(
        events[1],
        GameEvent::Passed {
            stone: Stone::White,
            pass_count: 1,
        }
    );
    assert!(matches!(
        events[3],
        GameEvent::Ended {
            outcome: Outcome::Winner(Stone::Black),
            ..
        }
    ));
}
