//! OpenAI-compatible client configuration for the agent service.

use crate::config::AgentSettings;
use crate::error::{Result, ScriptwrightError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for agent API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the configured agent endpoint.
///
/// Fails with `MissingCredential` when no API key is configured.
pub fn create_client(settings: &AgentSettings) -> Result<Client<OpenAIConfig>> {
    let api_key = settings
        .api_key()
        .ok_or_else(|| ScriptwrightError::MissingCredential("GOOGLE_API_KEY".to_string()))?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(settings.base_url.trim_end_matches('/'));

    Ok(Client::with_config(config).with_http_client(http_client))
}
