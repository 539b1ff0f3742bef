//! Line protocol spoken between clients and the server.
//!
//! Every message is one UTF-8 line; fields are separated by `~`.

use derive_more::{Display, Error};
use std::num::IntErrorKind;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use tracing::instrument;

/// Field separator.
pub const SEPARATOR: char = '~';

const SEPARATOR_STR: &str = "~";

/// Every command keyword on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Keyword {
    /// Client handshake start.
    Hello,
    /// Server handshake reply.
    Welcome,
    /// Requested username.
    Username,
    /// Username rejected.
    UsernameTaken,
    /// Username accepted.
    Joined,
    /// Toggle queue membership.
    Queue,
    /// Match formed.
    NewGame,
    /// Recipient may act.
    YourTurn,
    /// Stone placement.
    Move,
    /// Turn passed.
    Pass,
    /// Previous move rejected.
    InvalidMove,
    /// Match ended.
    GameOver,
    /// Leave or forfeit.
    Quit,
    /// Malformed input.
    Error,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum GameOverReason {
    /// Decided by area score; a draw carries an empty winner field.
    Victory,
    /// The opponent quit or lost the connection.
    Disconnect,
}

/// Malformed or unexpected protocol input.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// Blank line.
    #[display("Empty message")]
    Empty,

    /// First field is not a known keyword for this direction.
    #[display("Unknown command: {}", _0)]
    UnknownCommand(#[error(not(source))] String),

    /// A required field was absent.
    #[display("{} requires field '{}'", command, field)]
    MissingField {
        /// Command keyword.
        command: Keyword,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A numeric field did not parse.
    #[display("Field '{}' is not a number: {}", field, value)]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// Raw field text.
        value: String,
    },
}

/// Command sent by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// `HELLO~description`
    Hello(String),
    /// `USERNAME~name`; the name keeps any further separators so they can be rejected.
    Username(String),
    /// `QUEUE`
    Queue,
    /// `MOVE~row~col`; coordinates may be negative and are range-checked by the game.
    Move {
        /// Row field.
        row: i64,
        /// Column field.
        col: i64,
    },
    /// `PASS`
    Pass,
    /// `QUIT`
    Quit,
}

fn split_line(line: &str) -> Result<(Keyword, Vec<&str>), ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    let mut fields = line.split(SEPARATOR);
    let head = fields.next().unwrap_or_default();
    let keyword =
        Keyword::from_str(head).map_err(|_| ProtocolError::UnknownCommand(head.to_string()))?;
    Ok((keyword, fields.collect()))
}

fn field<'a>(
    fields: &[&'a str],
    index: usize,
    command: Keyword,
    name: &'static str,
) -> Result<&'a str, ProtocolError> {
    fields
        .get(index)
        .copied()
        .ok_or(ProtocolError::MissingField {
            command,
            field: name,
        })
}

fn number<T: FromStr>(value: &str, name: &'static str) -> Result<T, ProtocolError> {
    value.trim().parse().map_err(|_| ProtocolError::InvalidNumber {
        field: name,
        value: value.to_string(),
    })
}

/// Parses a board coordinate, saturating integers too large for `i64` so the
/// game rejects them as off the board.
fn coordinate(value: &str, name: &'static str) -> Result<i64, ProtocolError> {
    match value.trim().parse::<i64>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ProtocolError::InvalidNumber {
                field: name,
                value: value.to_string(),
            }),
        },
    }
}

impl ClientCommand {
    /// Decodes one line received from a client.
    #[instrument]
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (keyword, fields) = split_line(line)?;
        match keyword {
            Keyword::Hello => Ok(Self::Hello(fields.join(SEPARATOR_STR))),
            Keyword::Username => {
                field(&fields, 0, keyword, "name")?;
                Ok(Self::Username(fields.join(SEPARATOR_STR)))
            }
            Keyword::Queue => Ok(Self::Queue),
            Keyword::Move => {
                let row = coordinate(field(&fields, 0, keyword, "row")?, "row")?;
                let col = coordinate(field(&fields, 1, keyword, "col")?, "col")?;
                Ok(Self::Move { row, col })
            }
            Keyword::Pass => Ok(Self::Pass),
            Keyword::Quit => Ok(Self::Quit),
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

impl std::fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = SEPARATOR;
        match self {
            Self::Hello(description) => write!(f, "{}{sep}{}", Keyword::Hello, description),
            Self::Username(name) => write!(f, "{}{sep}{}", Keyword::Username, name),
            Self::Queue => write!(f, "{}", Keyword::Queue),
            Self::Move { row, col } => write!(f, "{}{sep}{}{sep}{}", Keyword::Move, row, col),
            Self::Pass => write!(f, "{}", Keyword::Pass),
            Self::Quit => write!(f, "{}", Keyword::Quit),
        }
    }
}

/// Message sent by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `WELCOME~description`
    Welcome(String),
    /// `USERNAMETAKEN~reason`
    UsernameTaken(String),
    /// `JOINED~message`
    Joined(String),
    /// `NEWGAME~black~white`
    NewGame {
        /// Username playing black.
        black: String,
        /// Username playing white.
        white: String,
    },
    /// `YOURTURN`
    YourTurn,
    /// `MOVE~user~row~col`
    Move {
        /// Player who moved.
        username: String,
        /// Row of the placed stone.
        row: usize,
        /// Column of the placed stone.
        col: usize,
    },
    /// `PASS~user`
    Pass {
        /// Player who passed.
        username: String,
    },
    /// `INVALIDMOVE`
    InvalidMove,
    /// `GAMEOVER~reason~winner`; the winner field is empty on a draw.
    GameOver {
        /// Why the match ended.
        reason: GameOverReason,
        /// Winning username, absent on a draw.
        winner: Option<String>,
    },
    /// `ERROR~message`
    Error(String),
}

impl ServerMessage {
    /// Decodes one line received from the server.
    #[instrument]
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (keyword, fields) = split_line(line)?;
        let text = |name| field(&fields, 0, keyword, name).map(str::to_string);
        match keyword {
            Keyword::Welcome => Ok(Self::Welcome(text("description").unwrap_or_default())),
            Keyword::UsernameTaken => Ok(Self::UsernameTaken(text("reason").unwrap_or_default())),
            Keyword::Joined => Ok(Self::Joined(text("message").unwrap_or_default())),
            Keyword::NewGame => Ok(Self::NewGame {
                black: field(&fields, 0, keyword, "user1")?.to_string(),
                white: field(&fields, 1, keyword, "user2")?.to_string(),
            }),
            Keyword::YourTurn => Ok(Self::YourTurn),
            Keyword::Move => Ok(Self::Move {
                username: field(&fields, 0, keyword, "user")?.to_string(),
                row: number(field(&fields, 1, keyword, "row")?, "row")?,
                col: number(field(&fields, 2, keyword, "col")?, "col")?,
            }),
            Keyword::Pass => Ok(Self::Pass {
                username: field(&fields, 0, keyword, "user")?.to_string(),
            }),
            Keyword::InvalidMove => Ok(Self::InvalidMove),
            Keyword::GameOver => {
                let raw = field(&fields, 0, keyword, "reason")?;
                let reason = GameOverReason::from_str(raw)
                    .map_err(|_| ProtocolError::UnknownCommand(raw.to_string()))?;
                let winner = fields.get(1).filter(|w| !w.is_empty()).map(|w| w.to_string());
                Ok(Self::GameOver { reason, winner })
            }
            Keyword::Error => Ok(Self::Error(fields.join(SEPARATOR_STR))),
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = SEPARATOR;
        match self {
            Self::Welcome(description) => write!(f, "{}{sep}{}", Keyword::Welcome, description),
            Self::UsernameTaken(reason) => write!(f, "{}{sep}{}", Keyword::UsernameTaken, reason),
            Self::Joined(message) => write!(f, "{}{sep}{}", Keyword::Joined, message),
            Self::NewGame { black, white } => {
                write!(f, "{}{sep}{}{sep}{}", Keyword::NewGame, black, white)
            }
            Self::YourTurn => write!(f, "{}", Keyword::YourTurn),
            Self::Move { username, row, col } => {
                write!(f, "{}{sep}{}{sep}{}{sep}{}", Keyword::Move, username, row, col)
            }
            Self::Pass { username } => write!(f, "{}{sep}{}", Keyword::Pass, username),
            Self::InvalidMove => write!(f, "{}", Keyword::InvalidMove),
            Self::GameOver { reason, winner } => write!(
                f,
                "{}{sep}{}{sep}{}",
                Keyword::GameOver,
                reason,
                winner.as_deref().unwrap_or_default()
            ),
            Self::Error(message) => write!(f, "{}{sep}{}", Keyword::Error, message),
        }
    }
}
