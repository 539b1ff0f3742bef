//! TCP accept loop and state shared by every connection.

use crate::config::ServerConfig;
use crate::connection::ConnectionHandler;
use crate::matchmaker::Matchmaker;
use crate::registry::UsernameRegistry;
use crate::session::ParticipantId;
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Resources shared across all connections. Clones share the same state.
#[derive(Debug, Clone)]
pub struct ServerState {
    config: Arc<ServerConfig>,
    matchmaker: Matchmaker,
    usernames: UsernameRegistry,
    next_participant: Arc<AtomicU64>,
}

impl ServerState {
    /// Creates fresh shared state for the given configuration.
    #[instrument(skip(config), fields(board_size = config.board_size()))]
    pub fn new(config: ServerConfig) -> Self {
        info!("Creating server state");
        Self {
            matchmaker: Matchmaker::with_board_size(*config.board_size()),
            config: Arc::new(config),
            usernames: UsernameRegistry::new(),
            next_participant: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared waiting queue.
    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    /// Usernames of connected clients.
    pub fn usernames(&self) -> &UsernameRegistry {
        &self.usernames
    }

    /// Allocates an ID for a new connection.
    pub fn next_participant_id(&self) -> ParticipantId {
        ParticipantId(self.next_participant.fetch_add(1, Ordering::Relaxed))
    }

    /// Serves one connection on its own task.
    pub fn spawn_connection<R, W>(&self, reader: R, writer: W) -> JoinHandle<Result<()>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let id = self.next_participant_id();
        let handler = ConnectionHandler::new(id, reader, writer, self.clone());
        tokio::spawn(handler.run())
    }
}

/// Listening Go server.
pub struct GoServer {
    listener: TcpListener,
    state: ServerState,
}

impl GoServer {
    /// Binds to the configured address.
    #[instrument(skip(config), fields(address = %config.address()))]
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.address()).await?;
        info!(local = %listener.local_addr()?, "Server listening");
        Ok(Self {
            listener,
            state: ServerState::new(config),
        })
    }

    /// Address actually bound, useful when the configured port is 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state handed to every connection.
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Accepts connections until the listener fails.
    pub async fn run(self) -> Result<()> {
        info!("Accepting connections");
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };
            debug!(%peer, "Accepted connection");
            if let Err(e) = stream.set_nodelay(true) {
                debug!(error = %e, "Could not disable Nagle");
            }
            let (reader, writer) = stream.into_split();
            self.state.spawn_connection(BufReader::new(reader), writer);
        }
    }
}
