//! Live coordination of one match between two connected participants.
//!
//! A [`Session`] is the synchronous state machine; [`SessionHandle`] runs it
//! on its own task and feeds it intents through a single-consumer channel,
//! so intents from both sides are applied one at a time. A seat whose
//! connection goes away forfeits, whether or not it ever sent anything.

use crate::games::go::{Game, GameObserver, MoveError, Outcome, Position, Stone};
use crate::protocol::{GameOverReason, ServerMessage};
use derive_more::Display;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a session.
pub type SessionId = u64;

/// Unique identifier for a connected participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{}", _0)]
pub struct ParticipantId(pub u64);

/// Delivered to a participant's connection.
#[derive(Debug)]
pub enum SessionEvent {
    /// The participant was paired; intents go to `handle`, playing `stone`.
    Started {
        /// Channel into the session.
        handle: SessionHandle,
        /// Color assigned to the recipient.
        stone: Stone,
    },
    /// A protocol line to write to the participant.
    Message(ServerMessage),
}

/// A connected client as seen by the matchmaker and sessions.
#[derive(Debug, Clone)]
pub struct Participant {
    id: ParticipantId,
    username: String,
    outbound: mpsc::UnboundedSender<SessionEvent>,
}

impl Participant {
    /// Creates a participant with its outbound channel.
    pub fn new(
        id: ParticipantId,
        username: impl Into<String>,
        outbound: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            outbound,
        }
    }

    /// Participant ID.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// True once the connection side has gone away.
    pub fn is_disconnected(&self) -> bool {
        self.outbound.is_closed()
    }

    /// Resolves once the connection side has gone away.
    pub async fn closed(&self) {
        self.outbound.closed().await
    }

    /// Queues a protocol line. Returns false if the connection is gone.
    pub fn send(&self, message: ServerMessage) -> bool {
        self.deliver(SessionEvent::Message(message))
    }

    pub(crate) fn deliver(&self, event: SessionEvent) -> bool {
        let delivered = self.outbound.send(event).is_ok();
        if !delivered {
            debug!(participant = %self.id, username = %self.username, "Participant no longer connected");
        }
        delivered
    }
}

/// What a participant asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Place a stone; raw coordinates as received.
    Move {
        /// Row.
        row: i64,
        /// Column.
        col: i64,
    },
    /// Pass the turn.
    Pass,
    /// Forfeit immediately.
    Quit,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting moves and passes.
    InProgress,
    /// Terminal; every further intent is ignored.
    Over,
}

/// One match: the game plus both participants' outbound channels.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    game: Game,
    black: Participant,
    white: Participant,
    state: SessionState,
}

impl Session {
    /// Creates a session; `black` moves first.
    #[instrument(skip(black, white), fields(black = %black.username, white = %white.username))]
    pub fn new(id: SessionId, black: Participant, white: Participant, board_size: usize) -> Self {
        info!("Creating new game session");
        let game = Game::with_size(black.username.clone(), white.username.clone(), board_size);
        Self {
            id,
            game,
            black,
            white,
            state: SessionState::InProgress,
        }
    }

    /// Session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once terminal.
    pub fn is_over(&self) -> bool {
        self.state == SessionState::Over
    }

    /// Participant playing `stone`. `Empty` resolves to black.
    pub fn participant(&self, stone: Stone) -> &Participant {
        match stone {
            Stone::White => &self.white,
            _ => &self.black,
        }
    }

    /// Attaches an observer to the underlying game.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.game.add_observer(observer);
    }

    /// Resolves with the seat whose connection goes away first.
    pub async fn seat_closed(&self) -> Stone {
        tokio::select! {
            _ = self.black.closed() => Stone::Black,
            _ = self.white.closed() => Stone::White,
        }
    }

    fn broadcast(&self, message: ServerMessage) {
        self.black.send(message.clone());
        self.white.send(message);
    }

    /// Announces the match to both sides and gives black the first turn.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn start(&self) {
        self.broadcast(ServerMessage::NewGame {
            black: self.black.username.clone(),
            white: self.white.username.clone(),
        });
        self.black.send(ServerMessage::YourTurn);
    }

    /// Applies one intent from the participant playing `from`.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn handle(&mut self, from: Stone, intent: Intent) -> SessionState {
        if self.is_over() {
            debug!("Ignoring intent for finished session");
            return self.state;
        }
        if !from.is_stone() {
            warn!("Intent from unknown seat");
            return self.state;
        }

        match intent {
            Intent::Quit => {
                info!(quitter = %from, "Participant left the match");
                self.finish(GameOverReason::Disconnect, Some(from.opponent()));
            }
            _ if from != self.game.current_stone() => {
                debug!(expected = %self.game.current_stone(), "Intent out of turn");
                self.participant(from)
                    .send(ServerMessage::Error("Not your turn".to_string()));
            }
            Intent::Move { row, col } => self.handle_move(from, row, col),
            Intent::Pass => self.handle_pass(from),
        }

        self.state
    }

    fn handle_move(&mut self, from: Stone, row: i64, col: i64) {
        let result = match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => self.game.do_move(Position::new(row, col)),
            _ => Err(MoveError::OffBoard {
                row: usize::MAX,
                col: usize::MAX,
            }),
        };

        match result {
            Ok(outcome) => {
                self.broadcast(ServerMessage::Move {
                    username: self.participant(from).username.clone(),
                    row: outcome.position.row,
                    col: outcome.position.col,
                });
                self.advance();
            }
            Err(e) => {
                debug!(row, col, error = %e, "Invalid move");
                let actor = self.participant(from);
                actor.send(ServerMessage::InvalidMove);
                actor.send(ServerMessage::YourTurn);
            }
        }
    }

    fn handle_pass(&mut self, from: Stone) {
        if let Err(e) = self.game.pass() {
            warn!(error = %e, "Pass rejected");
            return;
        }
        self.broadcast(ServerMessage::Pass {
            username: self.participant(from).username.clone(),
        });
        self.advance();
    }

    /// Hands the turn over, or ends the match if the game is over.
    fn advance(&mut self) {
        match self.game.outcome() {
            Some(Outcome::Winner(stone)) => self.finish(GameOverReason::Victory, Some(stone)),
            Some(Outcome::Draw) => self.finish(GameOverReason::Victory, None),
            None => {
                self.participant(self.game.current_stone())
                    .send(ServerMessage::YourTurn);
            }
        }
    }

    fn finish(&mut self, reason: GameOverReason, winner: Option<Stone>) {
        let winner = winner.map(|stone| self.participant(stone).username.clone());
        info!(%reason, winner = ?winner, "Session over");
        self.broadcast(ServerMessage::GameOver { reason, winner });
        self.state = SessionState::Over;
    }
}

/// Sender side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    intents: mpsc::UnboundedSender<(Stone, Intent)>,
}

impl SessionHandle {
    /// Starts `session` on its own task.
    ///
    /// Each participant first receives [`SessionEvent::Started`], then the
    /// `NEWGAME` announcement, on the same channel.
    #[instrument(skip(session), fields(session_id = session.id))]
    pub fn spawn(session: Session) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            id: session.id,
            intents: tx,
        };

        for stone in [Stone::Black, Stone::White] {
            session.participant(stone).deliver(SessionEvent::Started {
                handle: handle.clone(),
                stone,
            });
        }
        session.start();

        tokio::spawn(run(session, rx));
        handle
    }

    /// Session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Forwards an intent. Returns false once the session has ended.
    pub fn submit(&self, from: Stone, intent: Intent) -> bool {
        self.intents.send((from, intent)).is_ok()
    }

    /// True once the session task has stopped.
    pub fn is_closed(&self) -> bool {
        self.intents.is_closed()
    }
}

async fn run(mut session: Session, mut intents: mpsc::UnboundedReceiver<(Stone, Intent)>) {
    while !session.is_over() {
        tokio::select! {
            received = intents.recv() => match received {
                Some((from, intent)) => {
                    session.handle(from, intent);
                }
                None => {
                    // No handle left to submit through; wait for a seat to leave.
                    let stone = session.seat_closed().await;
                    session.handle(stone, Intent::Quit);
                }
            },
            stone = session.seat_closed() => {
                info!(session_id = session.id, seat = %stone, "Participant connection lost");
                session.handle(stone, Intent::Quit);
            }
        }
    }
    debug!(session_id = session.id, "Session task finished");
}
