//! Tests for the Go board.

use strictly_go::{Board, DEFAULT_SIZE, Position, Stone};

#[test]
fn test_new_board_is_empty() {
    let board = Board::default();
    assert_eq!(board.size(), DEFAULT_SIZE);
    assert_eq!(board.empty_positions().len(), 81);
    assert!(!board.is_full());
}

#[test]
fn test_place_changes_only_target_cell() {
    for row in 0..DEFAULT_SIZE {
        for col in 0..DEFAULT_SIZE {
            let mut board = Board::default();
            assert!(board.place(Position::new(row, col), Stone::White));
            assert_eq!(board.stone_at(row, col), Stone::White);
            assert_eq!(board.count(Stone::White), 1);
            assert_eq!(board.count(Stone::Empty), 80);
        }
    }
}

#[test]
fn test_invalid_placement_never_mutates() {
    let mut board = Board::new(9);
    board.place(Position::new(3, 3), Stone::Black);
    let before = board.clone();

    assert!(!board.place(Position::new(3, 3), Stone::White));
    assert!(!board.place(Position::new(9, 0), Stone::White));
    assert!(!board.place(Position::new(0, 42), Stone::Black));
    assert!(!board.place(Position::new(1, 1), Stone::Empty));

    assert_eq!(board, before);
}

#[test]
fn test_remove_is_idempotent() {
    let mut board = Board::new(9);
    let pos = Position::new(2, 5);
    board.place(pos, Stone::Black);
    board.remove(pos);
    assert!(board.is_empty(pos));
    board.remove(pos);
    assert!(board.is_empty(pos));
    board.remove(Position::new(20, 20));
}

#[test]
fn test_valid_position_bounds() {
    let board = Board::new(9);
    assert!(board.is_valid_position(0, 0));
    assert!(board.is_valid_position(8, 8));
    assert!(!board.is_valid_position(9, 8));
    assert!(!board.is_valid_position(8, 9));
    assert_eq!(board.get(Position::new(9, 9)), None);
}

#[test]
fn test_neighbor_counts() {
    let board = Board::new(9);
    assert_eq!(board.neighbors(Position::new(0, 0)).len(), 2);
    assert_eq!(board.neighbors(Position::new(0, 4)).len(), 3);
    assert_eq!(board.neighbors(Position::new(4, 4)).len(), 4);
    assert_eq!(board.neighbors(Position::new(8, 8)).len(), 2);
    assert!(board.neighbors(Position::new(9, 9)).is_empty());
}

#[test]
fn test_full_board() {
    let mut board = Board::new(2);
    for pos in board.positions().collect::<Vec<_>>() {
        board.place(pos, Stone::Black);
    }
    assert!(board.is_full());
    assert!(board.empty_positions().is_empty());
}

#[test]
fn test_snapshot_tracks_contents() {
    let mut a = Board::new(9);
    let mut b = Board::new(9);
    assert_eq!(a.snapshot(), b.snapshot());

    a.place(Position::new(0, 0), Stone::Black);
    assert_ne!(a.snapshot(), b.snapshot());

    b.place(Position::new(0, 0), Stone::White);
    assert_ne!(a.snapshot(), b.snapshot());

    b.remove(Position::new(0, 0));
    b.place(Position::new(0, 0), Stone::Black);
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.snapshot().as_bytes().len(), 81);
}

#[test]
fn test_snapshot_distinguishes_sizes() {
    assert_ne!(Board::new(3).snapshot(), Board::new(4).snapshot());
}

#[test]
fn test_copy_is_independent() {
    let mut board = Board::new(9);
    let copy = board.clone();
    board.place(Position::new(4, 4), Stone::Black);
    assert!(copy.is_empty(Position::new(4, 4)));
}

#[test]
fn test_display_renders_symbols() {
    let mut board = Board::new(3);
    board.place(Position::new(0, 0), Stone::Black);
    board.place(Position::new(2, 2), Stone::White);
    let text = board.to_string();
    assert!(text.contains('B'));
    assert!(text.contains('W'));
    assert_eq!(text.lines().count(), 4);
}
