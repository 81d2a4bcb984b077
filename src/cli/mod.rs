//! CLI module for Scriptwright.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::SearchRanking;
use clap::{Parser, Subcommand};

/// Scriptwright - YouTube research and script drafting backend
///
/// Finds videos on a topic, pulls their transcripts and asks an AI agent to
/// turn them into a new script. Run `serve` for the HTTP API, or use the
/// other commands to run a single flow from the terminal.
#[derive(Parser, Debug)]
#[command(name = "scriptwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search YouTube for videos on a topic
    FetchVideos {
        /// Topic to search for
        topic: String,

        /// Extra comma-separated keywords
        #[arg(short, long)]
        keywords: Option<String>,

        /// Preferred video language (e.g. "en")
        #[arg(short, long)]
        language: Option<String>,

        /// Result ranking: relevance or view_count (default from config)
        #[arg(short, long)]
        ranking: Option<SearchRanking>,
    },

    /// Fetch transcripts for one or more YouTube URLs
    Transcribe {
        /// YouTube video URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Draft a video script with the AI agent
    CreateScript {
        /// Host's name
        #[arg(long)]
        host_name: String,

        /// Channel name
        #[arg(long)]
        channel_name: String,

        /// Source transcript text (repeatable)
        #[arg(short, long = "transcript")]
        transcripts: Vec<String>,

        /// Read a source transcript from a file (repeatable)
        #[arg(long = "transcript-file")]
        transcript_files: Vec<String>,

        /// Closing line the script must end with (repeatable, in order)
        #[arg(short, long = "signature-line")]
        signature_lines: Vec<String>,

        /// Style and format instructions
        #[arg(short, long, default_value = "")]
        instructions: String,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (credentials are masked)
    Show,

    /// Show configuration file path
    Path,
}
