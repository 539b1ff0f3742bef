//! Capture resolution, repetition history and area scoring.

use super::board::{Board, BoardSnapshot};
use super::types::{Position, Score, Stone};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, instrument, trace};

/// Flood-fills the `color` group(s) reachable from `seeds` and returns every
/// visited stone if none of them touches an empty intersection.
///
/// Returns an empty vector as soon as a liberty is found. Seeds that do not
/// hold `color` are ignored.
pub fn group_without_liberties(board: &Board, seeds: &[Position], color: Stone) -> Vec<Position> {
    let mut visited: HashSet<Position> = HashSet::new();
    let mut queue: VecDeque<Position> = VecDeque::new();

    for &seed in seeds {
        if board.get(seed) == Some(color) && visited.insert(seed) {
            queue.push_back(seed);
        }
    }

    while let Some(current) = queue.pop_front() {
        for (neighbor, stone) in board.neighbor_stones(current) {
            if stone == Stone::Empty {
                trace!(at = %current, liberty = %neighbor, "Group has a liberty");
                return Vec::new();
            }
            if stone == color && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    let mut group: Vec<Position> = visited.into_iter().collect();
    group.sort();
    group
}

/// Removes groups left without liberties after a stone was placed at `placed`.
///
/// Opponent groups adjacent to `placed` are resolved first, one flood-fill
/// per distinct cluster; the placed stone's own group is checked afterwards,
/// so a suicide that captures keeps its stone when the capture opens a
/// liberty. Returns every removed position.
#[instrument(skip(board), fields(size = board.size()))]
pub fn resolve_captures(board: &mut Board, placed: Position) -> Vec<Position> {
    let Some(own) = board.get(placed).filter(|s| s.is_stone()) else {
        return Vec::new();
    };
    let opponent = own.opponent();
    let mut removed = Vec::new();
    let mut checked: HashSet<Position> = HashSet::new();

    for (neighbor, stone) in board.neighbor_stones(placed) {
        if stone != opponent || checked.contains(&neighbor) {
            continue;
        }
        let group = group_without_liberties(board, &[neighbor], opponent);
        if group.is_empty() {
            // Not captured; the rest of this cluster also has the liberty.
            checked.extend(connected_group(board, neighbor));
            continue;
        }
        for &pos in &group {
            board.remove(pos);
            checked.insert(pos);
        }
        debug!(color = %opponent, stones = group.len(), "Captured opponent group");
        removed.extend(group);
    }

    let own_group = group_without_liberties(board, &[placed], own);
    if !own_group.is_empty() {
        for &pos in &own_group {
            board.remove(pos);
        }
        debug!(color = %own, stones = own_group.len(), "Self-capture");
        removed.extend(own_group);
    }

    removed
}

/// Every stone of the same color connected to `start`.
pub fn connected_group(board: &Board, start: Position) -> Vec<Position> {
    let Some(color) = board.get(start) else {
        return Vec::new();
    };
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for (neighbor, stone) in board.neighbor_stones(current) {
            if stone == color && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    let mut group: Vec<Position> = visited.into_iter().collect();
    group.sort();
    group
}

/// Connected empty region containing `start` and the stone colors bordering it.
fn empty_region(board: &Board, start: Position, seen: &mut HashSet<Position>) -> (usize, HashSet<Stone>) {
    let mut borders = HashSet::new();
    let mut size = 0;
    let mut queue = VecDeque::from([start]);
    seen.insert(start);

    while let Some(current) = queue.pop_front() {
        size += 1;
        for (neighbor, stone) in board.neighbor_stones(current) {
            match stone {
                Stone::Empty => {
                    if seen.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
                color => {
                    borders.insert(color);
                }
            }
        }
    }

    (size, borders)
}

/// Area score: stones on the board plus empty regions bordered by one color only.
///
/// A region touching both colors, or touching no stone at all, is neutral.
#[instrument(skip(board), fields(size = board.size()))]
pub fn area_score(board: &Board) -> Score {
    let mut score = Score {
        black: board.count(Stone::Black),
        white: board.count(Stone::White),
    };
    let mut seen = HashSet::new();

    for pos in board.positions() {
        if !board.is_empty(pos) || seen.contains(&pos) {
            continue;
        }
        let (size, borders) = empty_region(board, pos, &mut seen);
        if borders.len() != 1 {
            continue;
        }
        if borders.contains(&Stone::Black) {
            score.black += size;
        } else if borders.contains(&Stone::White) {
            score.white += size;
        }
    }

    debug!(black = score.black, white = score.white, "Computed area score");
    score
}

/// Every board position reached after a completed move in one match.
#[derive(Debug, Clone, Default)]
pub struct KoHistory {
    order: Vec<BoardSnapshot>,
    seen: HashSet<BoardSnapshot>,
}

impl KoHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the snapshot repeats an earlier position.
    pub fn contains(&self, snapshot: &BoardSnapshot) -> bool {
        self.seen.contains(snapshot)
    }

    /// Appends a snapshot. Returns false if it was already present.
    pub fn record(&mut self, snapshot: BoardSnapshot) -> bool {
        if !self.seen.insert(snapshot.clone()) {
            return false;
        }
        self.order.push(snapshot);
        true
    }

    /// Number of recorded positions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True before the first completed move.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Most recently recorded position.
    pub fn last(&self) -> Option<&BoardSnapshot> {
        self.order.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len());
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let stone = match ch {
                    'B' => Stone::Black,
                    'W' => Stone::White,
                    _ => continue,
                };
                board.place(Position::new(r, c), stone);
            }
        }
        board
    }

    #[test]
    fn test_group_with_liberty_is_not_captured() {
        let board = board_from(&["BB.", "...", "..."]);
        assert!(group_without_liberties(&board, &[Position::new(0, 0)], Stone::Black).is_empty());
    }

    #[test]
    fn test_surrounded_group_is_returned_whole() {
        let board = board_from(&["BBW", "WW.", "..."]);
        let group = group_without_liberties(&board, &[Position::new(0, 1)], Stone::Black);
        assert_eq!(group, vec![Position::new(0, 0), Position::new(0, 1)]);
    }

    #[test]
    fn test_two_disjoint_groups_captured_by_one_stone() {
        // White at (1,1) captures both black stones at (0,1) and (1,0).
        let mut board = board_from(&["WBW.", "B.W.", "W...", "...."]);
        board.place(Position::new(1, 1), Stone::White);
        let removed = resolve_captures(&mut board, Position::new(1, 1));
        assert_eq!(removed.len(), 2);
        assert!(board.is_empty(Position::new(0, 1)));
        assert!(board.is_empty(Position::new(1, 0)));
        assert_eq!(board.get(Position::new(1, 1)), Some(Stone::White));
    }

    #[test]
    fn test_neutral_region_scores_nothing() {
        let board = board_from(&["B.W", "B.W", "B.W"]);
        let score = area_score(&board);
        assert_eq!(score, Score { black: 3, white: 3 });
    }

    #[test]
    fn test_history_rejects_duplicates() {
        let mut history = KoHistory::new();
        let board = Board::new(3);
        assert!(history.record(board.snapshot()));
        assert!(!history.record(board.snapshot()));
        assert_eq!(history.len(), 1);
    }
}
