//! Pre-flight checks before calling external services.
//!
//! Validates that the credentials an operation needs are configured, so the
//! CLI can fail with a hint instead of midway through a flow.

use crate::config::Settings;
use crate::error::{Result, ScriptwrightError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Video search requires the YouTube Data API key.
    FetchVideos,
    /// Script generation requires the agent API key.
    CreateScript,
    /// Transcripts need no credentials.
    Transcribe,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::FetchVideos => {
            check_key(settings.youtube.api_key(), "YOUTUBE_API_KEY", "youtube.api_key")
        }
        Operation::CreateScript => {
            check_key(settings.agent.api_key(), "GOOGLE_API_KEY", "agent.api_key")
        }
        Operation::Transcribe => Ok(()),
    }
}

fn check_key(value: Option<&str>, env_var: &str, config_key: &str) -> Result<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(ScriptwrightError::MissingCredential(format!(
            "{} (set it with: export {}='...', or {} in the config file)",
            env_var, env_var, config_key
        ))),
    }
}
