//! Scriptwright - YouTube research and script drafting backend
//!
//! A small HTTP service that helps creators research a topic on YouTube and
//! draft a new video script from what they find.
//!
//! # Overview
//!
//! Scriptwright allows you to:
//! - Search YouTube for videos on a topic
//! - Pull the transcripts of the videos you pick, in order
//! - Ask an AI agent to plan and write a script in your own voice
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings and prompt templates
//! - `youtube` - Video search, video id extraction and transcripts
//! - `agent` - Plan-then-run agent and script instruction building
//! - `pool` - Bounded, time-limited execution of upstream calls
//! - `orchestrator` - Wires the flows together
//! - `server` - HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use scriptwright::config::Settings;
//! use scriptwright::orchestrator::Orchestrator;
//! use scriptwright::youtube::VideoSearchQuery;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let query = VideoSearchQuery::new("rust async").with_keywords("tokio, tutorial");
//!     for video in orchestrator.fetch_videos(&query).await? {
//!         println!("{} - {}", video.title, video.url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod pool;
pub mod server;
pub mod youtube;

pub use error::{Result, ScriptwrightError};
