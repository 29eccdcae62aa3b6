use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// guet — web page change monitor
///
/// Captures a reference screenshot of a single page, re-checks it on a
/// jittered schedule, and alerts through Telegram and the desktop when the
/// page changes.
#[derive(Parser, Debug)]
#[command(name = "guet")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture the reference snapshot of the target page
    #[command(alias = "c")]
    Capture,

    /// Arm monitoring and keep checking until interrupted
    #[command(alias = "w")]
    Watch,

    /// Run a single check cycle against the reference
    Check,

    /// Disarm monitoring
    Stop,

    /// Show current monitoring status
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save Telegram credentials and the keyword list
    Settings {
        /// Telegram bot token
        #[arg(long)]
        bot_token: Option<String>,

        /// Telegram chat identifier
        #[arg(long)]
        chat_id: Option<String>,

        /// Keyword to watch (repeatable; replaces the stored list)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
}
