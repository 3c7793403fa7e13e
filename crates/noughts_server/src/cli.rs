//! Command-line interface for the `noughts` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Noughts - tic-tac-toe game server
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Two-player tic-tac-toe over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,

        /// Keep everything in memory instead of SQLite
        #[arg(long)]
        memory: bool,
    },

    /// Apply pending database migrations
    Migrate {
        /// Path to the database file
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print the leaderboard
    Rankings {
        /// Path to the database file
        #[arg(long)]
        db_path: Option<String>,
    },
}
