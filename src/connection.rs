//! Per-participant message pump.
//!
//! Decodes inbound lines, drives the handshake and queue, forwards in-game
//! commands to the session and writes every outbound message back.

use crate::games::go::Stone;
use crate::protocol::{ClientCommand, ServerMessage};
use crate::server::ServerState;
use crate::session::{Intent, Participant, ParticipantId, SessionEvent, SessionHandle};
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Where the connection is in its lifecycle.
#[derive(Debug)]
enum Phase {
    AwaitingHello,
    AwaitingUsername,
    Lobby,
    Queued,
    InGame { handle: SessionHandle, stone: Stone },
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

/// Serves one client connection until it quits or disconnects.
pub struct ConnectionHandler<R, W> {
    id: ParticipantId,
    lines: Lines<R>,
    writer: W,
    state: ServerState,
    phase: Phase,
    username: Option<String>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<R, W> ConnectionHandler<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a handler for a freshly accepted connection.
    pub fn new(id: ParticipantId, reader: R, writer: W, state: ServerState) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            id,
            lines: reader.lines(),
            writer,
            state,
            phase: Phase::AwaitingHello,
            username: None,
            events_tx,
            events_rx,
        }
    }

    /// Pumps messages until the client quits or the connection drops.
    ///
    /// Leaving always releases the username, leaves the queue and forfeits a
    /// running match.
    #[instrument(skip(self), fields(participant = %self.id))]
    pub async fn run(mut self) -> Result<()> {
        info!("Connection opened");
        let result = self.pump().await;
        self.leave();
        match &result {
            Ok(()) => info!("Connection closed"),
            Err(e) => warn!(error = %e, "Connection closed with error"),
        }
        result
    }

    async fn pump(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                line = self.lines.next_line() => match line? {
                    Some(line) => {
                        if self.on_line(&line).await? == Flow::Close {
                            return Ok(());
                        }
                    }
                    None => {
                        debug!("Client closed the connection");
                        return Ok(());
                    }
                },
                Some(event) = self.events_rx.recv() => self.on_event(event).await?,
            }
        }
    }

    async fn send(&mut self, message: ServerMessage) -> Result<()> {
        debug!(%message, "Sending");
        self.writer.write_all(format!("{}\n", message).as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn error(&mut self, message: impl Into<String>) -> Result<()> {
        self.send(ServerMessage::Error(message.into())).await
    }

    async fn on_event(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::Started { handle, stone } => {
                info!(session_id = handle.id(), %stone, "Joined session");
                self.phase = Phase::InGame { handle, stone };
                Ok(())
            }
            SessionEvent::Message(message) => {
                if matches!(message, ServerMessage::GameOver { .. })
                    && matches!(self.phase, Phase::InGame { .. })
                {
                    self.phase = Phase::Lobby;
                }
                self.send(message).await
            }
        }
    }

    async fn on_line(&mut self, line: &str) -> Result<Flow> {
        debug!(line, "Received");
        let command = match ClientCommand::parse(line) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "Malformed input");
                self.error(e.to_string()).await?;
                return Ok(Flow::Continue);
            }
        };

        if command == ClientCommand::Quit {
            self.leave();
            return Ok(Flow::Close);
        }

        match self.phase {
            Phase::AwaitingHello => {
                return match command {
                    ClientCommand::Hello(description) => {
                        info!(client = %description, "Handshake started");
                        self.phase = Phase::AwaitingUsername;
                        let welcome = self.state.config().description().clone();
                        self.send(ServerMessage::Welcome(welcome)).await?;
                        Ok(Flow::Continue)
                    }
                    _ => {
                        self.error("Expected HELLO").await?;
                        Ok(Flow::Continue)
                    }
                };
            }
            Phase::AwaitingUsername => {
                match command {
                    ClientCommand::Username(name) => self.claim_username(name).await?,
                    _ => self.error("Expected USERNAME").await?,
                }
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        match command {
            ClientCommand::Hello(_) => self.error("Handshake already done").await?,
            ClientCommand::Username(_) => self.error("Username already set").await?,
            ClientCommand::Queue => match self.phase {
                Phase::Lobby => self.enter_queue(),
                Phase::Queued => self.leave_queue().await?,
                _ => self.error("Already in a game").await?,
            },
            ClientCommand::Move { row, col } => self.forward(Intent::Move { row, col }).await?,
            ClientCommand::Pass => self.forward(Intent::Pass).await?,
            ClientCommand::Quit => {}
        }
        Ok(Flow::Continue)
    }

    async fn forward(&mut self, intent: Intent) -> Result<()> {
        if let Phase::InGame { handle, stone } = &self.phase {
            submit(handle, *stone, intent);
            return Ok(());
        }
        self.error("Not in a game").await
    }

    async fn claim_username(&mut self, name: String) -> Result<()> {
        match self.state.usernames().claim(&name) {
            Ok(()) => {
                info!(username = %name, "Username accepted");
                self.send(ServerMessage::Joined(format!("Welcome to the server, {}", name)))
                    .await?;
                self.username = Some(name);
                self.phase = Phase::Lobby;
            }
            Err(e) => {
                debug!(error = %e, "Username rejected");
                self.send(ServerMessage::UsernameTaken(e.to_string())).await?;
            }
        }
        Ok(())
    }

    fn enter_queue(&mut self) {
        let Some(username) = self.username.clone() else {
            return;
        };
        let participant = Participant::new(self.id, username, self.events_tx.clone());
        let matchmaker = self.state.matchmaker();
        matchmaker.enqueue(participant);
        self.phase = Phase::Queued;
        if let Some(session) = matchmaker.try_pair() {
            SessionHandle::spawn(session);
        }
    }

    async fn leave_queue(&mut self) -> Result<()> {
        self.state.matchmaker().dequeue(self.id);
        self.phase = Phase::Lobby;
        let name = self.username.clone().unwrap_or_default();
        self.send(ServerMessage::Joined(format!("{} has left the queue.", name)))
            .await
    }

    /// Leaves whatever the connection is part of. Safe to call repeatedly.
    ///
    /// A pairing that has not been picked up yet is still forfeited.
    fn leave(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Queued => {
                self.state.matchmaker().dequeue(self.id);
            }
            Phase::InGame { handle, stone } => {
                submit(&handle, stone, Intent::Quit);
            }
            _ => {}
        }
        while let Ok(event) = self.events_rx.try_recv() {
            if let SessionEvent::Started { handle, stone } = event {
                debug!(session_id = handle.id(), "Forfeiting a match not yet joined");
                submit(&handle, stone, Intent::Quit);
            }
        }
        if let Some(name) = self.username.take() {
            self.state.usernames().release(&name);
        }
    }
}

fn submit(handle: &SessionHandle, stone: Stone, intent: Intent) {
    if !handle.submit(stone, intent) {
        debug!(session_id = handle.id(), "Session already finished");
    }
}
