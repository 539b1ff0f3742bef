//! Command-line interface for strictly_go.

use clap::{Parser, Subcommand};

/// Strictly Go - networked two-player Go server
#[derive(Parser, Debug)]
#[command(name = "strictly_go")]
#[command(about = "Two-player Go server with matchmaking and area scoring", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Path to the server config file (defaults are used if it is missing)
        #[arg(short, long, default_value = "strictly_go.toml")]
        config: std::path::PathBuf,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Board side length (overrides config)
        #[arg(long)]
        board_size: Option<usize>,
    },

    /// Connect to a server and play one match with the random strategy
    Bot {
        /// Server address
        #[arg(long, default_value = "127.0.0.1:8888")]
        server: String,

        /// Username to request
        #[arg(short, long, default_value = "RandomBot")]
        name: String,

        /// Board side length used by the server
        #[arg(long, default_value = "9")]
        board_size: usize,

        /// Seed for reproducible play
        #[arg(long)]
        seed: Option<u64>,

        /// Chance of passing on any turn (0.0 - 1.0)
        #[arg(long, default_value = "0.0")]
        pass_probability: f64,
    },

    /// Play two random strategies against each other locally
    Local {
        /// Board side length
        #[arg(long, default_value = "9")]
        board_size: usize,

        /// Seed for reproducible play
        #[arg(long)]
        seed: Option<u64>,

        /// Turn cap before both sides pass
        #[arg(long, default_value = "500")]
        max_turns: usize,
    },
}
