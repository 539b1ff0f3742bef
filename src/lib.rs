//! Strictly Go library - networked two-player Go
//!
//! # Architecture
//!
//! - **Games**: Go rule engine (captures, superko, area scoring)
//! - **Matchmaker**: FIFO pairing of waiting participants
//! - **Session**: per-match state machine behind a single-consumer channel
//! - **Connection**: per-client line protocol pump
//! - **Players**: move-selection strategies (random, human) and an automated client
//!
//! # Example
//!
//! ```
//! use strictly_go::{Game, Position, Stone};
//!
//! let mut game = Game::new("alice", "bob");
//! game.do_move(Position::new(4, 4)).unwrap();
//! assert_eq!(game.board().get(Position::new(4, 4)), Some(Stone::Black));
//! assert_eq!(game.current_stone(), Stone::White);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod connection;
mod games;
mod matchmaker;
mod orchestrator;
mod players;
mod protocol;
mod registry;
mod server;
mod session;

// Crate-level exports - Game types (Go)
pub use games::go::{
    Board, BoardSnapshot, DEFAULT_SIZE, Decision, Game, GameEvent, GameObserver, KoHistory,
    MAX_SIZE, MIN_SIZE, MoveError, MoveOutcome, Outcome, PASSES_TO_END, Player, Position, Score,
    Stone, TracingObserver, area_score, connected_group, group_without_liberties,
    resolve_captures,
};

// Crate-level exports - Protocol
pub use protocol::{ClientCommand, GameOverReason, Keyword, ProtocolError, SEPARATOR, ServerMessage};

// Crate-level exports - Server side
pub use config::{ConfigError, ServerConfig};
pub use connection::ConnectionHandler;
pub use matchmaker::Matchmaker;
pub use registry::{UsernameError, UsernameRegistry};
pub use server::{GoServer, ServerState};
pub use session::{
    Intent, Participant, ParticipantId, Session, SessionEvent, SessionHandle, SessionId,
    SessionState,
};

// Crate-level exports - Players and clients
pub use client::{BotClient, BotOutcome};
pub use orchestrator::{DEFAULT_MAX_TURNS, LocalMatch, MatchResult};
pub use players::{HumanStrategy, RandomStrategy, Strategy};
