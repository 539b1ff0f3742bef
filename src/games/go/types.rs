//! Core domain types for Go.

use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Content of a single intersection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Stone {
    /// Black stone (moves first).
    #[strum(serialize = "BLACK")]
    Black,
    /// White stone.
    #[strum(serialize = "WHITE")]
    White,
    /// No stone.
    #[strum(serialize = "EMPTY")]
    Empty,
}

impl Stone {
    /// Returns the opposing color. `Empty` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// True for `Black` and `White`.
    pub fn is_stone(self) -> bool {
        self != Stone::Empty
    }

    /// Single-character symbol used when rendering boards.
    pub fn symbol(self) -> char {
        match self {
            Stone::Black => 'B',
            Stone::White => 'W',
            Stone::Empty => '.',
        }
    }

    pub(crate) fn to_byte(self) -> u8 {
        match self {
            Stone::Empty => 0,
            Stone::Black => 1,
            Stone::White => 2,
        }
    }
}

/// Intersection coordinate, 0-indexed from the top-left corner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new,
)]
pub struct Position {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A participant in a match with their assigned color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Player {
    username: String,
    stone: Stone,
}

impl Player {
    /// Returns the player's username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the player's color.
    pub fn stone(&self) -> Stone {
        self.stone
    }
}

/// Area score of both colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Black stones on board plus territory enclosed only by black.
    pub black: usize,
    /// White stones on board plus territory enclosed only by white.
    pub white: usize,
}

impl Score {
    /// Score credited to the given color. `Empty` scores zero.
    pub fn of(&self, stone: Stone) -> usize {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
            Stone::Empty => 0,
        }
    }

    /// Outcome implied by this score: strictly higher wins.
    pub fn outcome(&self) -> Outcome {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Outcome::Winner(Stone::Black),
            std::cmp::Ordering::Less => Outcome::Winner(Stone::White),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The given color won.
    Winner(Stone),
    /// Equal scores.
    Draw,
}

impl Outcome {
    /// Returns the winning color if there is one.
    pub fn winner(&self) -> Option<Stone> {
        match self {
            Outcome::Winner(stone) => Some(*stone),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(stone) => write!(f, "{} wins", stone),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
