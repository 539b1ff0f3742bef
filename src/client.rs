//! Automated protocol client that plays one match with a [`Strategy`].

use crate::games::go::{Decision, Game, Position};
use crate::players::Strategy;
use crate::protocol::{ClientCommand, GameOverReason, ServerMessage};
use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Attempts at finding a free username before giving up.
const USERNAME_ATTEMPTS: usize = 5;

/// How a bot's match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotOutcome {
    /// Why the match ended.
    pub reason: GameOverReason,
    /// Winning username; `None` on a draw.
    pub winner: Option<String>,
    /// Username the bot played under.
    pub username: String,
}

impl BotOutcome {
    /// True when the bot won.
    pub fn won(&self) -> bool {
        self.winner.as_deref() == Some(self.username.as_str())
    }
}

/// Client that handshakes, queues and plays until `GAMEOVER`.
pub struct BotClient {
    username: String,
    strategy: Box<dyn Strategy>,
    board_size: usize,
}

impl BotClient {
    /// Creates a bot using the strategy's name as its username.
    pub fn new(strategy: Box<dyn Strategy>, board_size: usize) -> Self {
        Self {
            username: strategy.name().to_string(),
            strategy,
            board_size,
        }
    }

    /// Connects over TCP and plays one match.
    #[instrument(skip(self), fields(username = %self.username))]
    pub async fn connect(&mut self, address: &str) -> Result<BotOutcome> {
        let stream = TcpStream::connect(address)
            .await
            .with_context(|| format!("Failed to connect to {}", address))?;
        let (reader, writer) = stream.into_split();
        self.play(BufReader::new(reader), writer).await
    }

    /// Plays one match over an established connection.
    pub async fn play<R, W>(&mut self, reader: R, mut writer: W) -> Result<BotOutcome>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let mut lines = reader.lines();
        let mut game: Option<Game> = None;
        let mut pass_next = false;
        let mut attempts = 1;
        let requested = self.username.clone();

        send(&mut writer, ClientCommand::Hello("strictly_go bot".to_string())).await?;

        while let Some(line) = lines.next_line().await? {
            let message = match ServerMessage::parse(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, line = %line, "Unreadable server line");
                    continue;
                }
            };
            debug!(%message, "Received");

            match message {
                ServerMessage::Welcome(server) => {
                    info!(%server, "Connected");
                    send(&mut writer, ClientCommand::Username(self.username.clone())).await?;
                }
                ServerMessage::UsernameTaken(reason) => {
                    if attempts >= USERNAME_ATTEMPTS {
                        bail!("No free username after {} attempts: {}", attempts, reason);
                    }
                    attempts += 1;
                    self.username = format!("{}_{}", requested, attempts);
                    debug!(username = %self.username, "Retrying with another name");
                    send(&mut writer, ClientCommand::Username(self.username.clone())).await?;
                }
                ServerMessage::Joined(_) => send(&mut writer, ClientCommand::Queue).await?,
                ServerMessage::NewGame { black, white } => {
                    info!(%black, %white, "Match started");
                    game = Some(Game::with_size(black, white, self.board_size));
                }
                ServerMessage::YourTurn => {
                    let Some(game) = game.as_ref() else {
                        warn!("YOURTURN outside a game");
                        continue;
                    };
                    let decision = if pass_next {
                        Decision::Pass
                    } else {
                        self.strategy.determine_move(game).await?
                    };
                    pass_next = false;
                    let command = match decision {
                        Decision::Place(pos) => ClientCommand::Move {
                            row: pos.row as i64,
                            col: pos.col as i64,
                        },
                        Decision::Pass => ClientCommand::Pass,
                    };
                    send(&mut writer, command).await?;
                }
                ServerMessage::Move { username, row, col } => {
                    if let Some(game) = game.as_mut() {
                        mirror_move(game, &username, Position::new(row, col));
                    }
                }
                ServerMessage::Pass { username } => {
                    if let Some(game) = game.as_mut()
                        && let Err(e) = game.pass()
                    {
                        warn!(%username, error = %e, "Local mirror rejected pass");
                    }
                }
                ServerMessage::InvalidMove => {
                    warn!("Move rejected, passing next turn");
                    pass_next = true;
                }
                ServerMessage::GameOver { reason, winner } => {
                    info!(%reason, winner = ?winner, "Match finished");
                    return Ok(BotOutcome {
                        reason,
                        winner,
                        username: self.username.clone(),
                    });
                }
                ServerMessage::Error(text) => warn!(%text, "Server reported an error"),
            }
        }

        bail!("Server closed the connection before the match ended")
    }
}

fn mirror_move(game: &mut Game, username: &str, pos: Position) {
    let expected = game.current_player().username().to_string();
    if expected != username {
        warn!(%username, %expected, "Move broadcast out of turn order");
    }
    if let Err(e) = game.do_move(pos) {
        warn!(%username, %pos, error = %e, "Local mirror rejected move");
    }
}

async fn send<W: AsyncWrite + Unpin>(writer: &mut W, command: ClientCommand) -> Result<()> {
    debug!(%command, "Sending");
    writer.write_all(format!("{}\n", command).as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

