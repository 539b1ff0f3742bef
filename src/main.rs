//! Strictly Go - Unified CLI
//!
//! Go server, automated client and local self-play.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_go::{
    BotClient, GoServer, LocalMatch, RandomStrategy, ServerConfig, Strategy, TracingObserver,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            board_size,
        } => run_server(config, host, port, board_size).await,
        Command::Bot {
            server,
            name,
            board_size,
            seed,
            pass_probability,
        } => run_bot(server, name, board_size, seed, pass_probability).await,
        Command::Local {
            board_size,
            seed,
            max_turns,
        } => run_local(board_size, seed, max_turns).await,
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,strictly_go=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the Go server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(
    config_path: std::path::PathBuf,
    host: Option<String>,
    port: Option<u16>,
    board_size: Option<usize>,
) -> Result<()> {
    let config = if config_path.exists() {
        ServerConfig::from_file(&config_path)?
    } else {
        info!("Config file not found, using defaults");
        ServerConfig::default()
    };
    let config = config.with_overrides(host, port, board_size)?;

    info!(address = %config.address(), board_size = config.board_size(), "Starting Strictly Go server");
    let server = GoServer::bind(config).await?;
    info!(address = %server.local_addr()?, "Server ready");
    server.run().await
}

fn random_player(name: impl Into<String>, seed: Option<u64>) -> RandomStrategy {
    match seed {
        Some(seed) => RandomStrategy::seeded(name, seed),
        None => RandomStrategy::new(name),
    }
}

/// Run an automated client for one match
#[instrument(skip(pass_probability))]
async fn run_bot(
    server: String,
    name: String,
    board_size: usize,
    seed: Option<u64>,
    pass_probability: f64,
) -> Result<()> {
    let strategy = random_player(name, seed).with_pass_probability(pass_probability);
    let mut bot = BotClient::new(Box::new(strategy), board_size);
    let outcome = bot.connect(&server).await?;
    info!(
        reason = %outcome.reason,
        winner = ?outcome.winner,
        won = outcome.won(),
        "Match over"
    );
    Ok(())
}

/// Run a local match between two random strategies
#[instrument]
async fn run_local(board_size: usize, seed: Option<u64>, max_turns: usize) -> Result<()> {
    let black = random_player("Black", seed);
    let white = random_player("White", seed.map(|s| s.wrapping_add(1)));
    info!(black = black.name(), white = white.name(), "Starting local match");

    let mut local = LocalMatch::new(Box::new(black), Box::new(white), board_size)
        .with_max_turns(max_turns);
    local.add_observer(Box::new(TracingObserver::new("local")));
    let result = local.run().await?;

    println!("{}", local.game().board());
    println!(
        "Black {} - White {}: {}",
        result.score.black, result.score.white, result.outcome
    );
    Ok(())
}
