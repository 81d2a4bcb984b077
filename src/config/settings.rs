//! Configuration settings for Scriptwright.

use crate::error::{Result, ScriptwrightError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub server: ServerSettings,
    pub youtube: YoutubeSettings,
    pub transcript: TranscriptSettings,
    pub agent: AgentSettings,
    pub prompts: PromptSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Project title, shown by the root endpoint.
    pub project_name: String,
    /// Prefix all API routes are mounted under.
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,
    /// Maximum upstream calls in flight across all requests.
    pub max_concurrent_upstream: usize,
    /// Timeout for a single upstream call, in seconds.
    pub upstream_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            project_name: "AI YouTube Script Generator".to_string(),
            api_prefix: "/api/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
            ],
            max_concurrent_upstream: 16,
            upstream_timeout_secs: 300,
        }
    }
}

/// Ordering requested from the video search provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchRanking {
    #[default]
    Relevance,
    ViewCount,
}

impl SearchRanking {
    /// Value of the `order` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchRanking::Relevance => "relevance",
            SearchRanking::ViewCount => "viewCount",
        }
    }
}

impl std::str::FromStr for SearchRanking {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(SearchRanking::Relevance),
            "view_count" | "viewcount" | "views" => Ok(SearchRanking::ViewCount),
            _ => Err(format!("Unknown search ranking: {}", s)),
        }
    }
}

impl std::fmt::Display for SearchRanking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchRanking::Relevance => write!(f, "relevance"),
            SearchRanking::ViewCount => write!(f, "view_count"),
        }
    }
}

/// What the search flow does when the provider returns an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamErrorPolicy {
    /// Log the failure and return no videos.
    #[default]
    Empty,
    /// Surface the failure to the caller.
    Fail,
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key.
    pub api_key: Option<String>,
    /// Base URL of the Data API.
    pub base_url: String,
    pub ranking: SearchRanking,
    /// Number of results requested per search.
    pub max_results: u32,
    /// `videoDefinition` filter (any, high, standard).
    pub video_definition: String,
    /// `videoCaption` filter (any, closedCaption, none).
    pub video_caption: String,
    /// Default `relevanceLanguage` when the request gives none.
    pub relevance_language: String,
    pub on_upstream_error: UpstreamErrorPolicy,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            ranking: SearchRanking::Relevance,
            max_results: 1,
            video_definition: "high".to_string(),
            video_caption: "any".to_string(),
            relevance_language: "en".to_string(),
            on_upstream_error: UpstreamErrorPolicy::Empty,
        }
    }
}

/// Transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred transcript languages, in order.
    pub languages: Vec<String>,
    /// Maximum transcripts fetched at once within a batch.
    pub max_concurrent: usize,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            max_concurrent: 4,
        }
    }
}

/// Agent planning/execution service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// API key for the OpenAI-compatible endpoint.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.as_str()).filter(|s| !s.trim().is_empty())
}

impl YoutubeSettings {
    /// The configured API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_ref())
    }
}

impl AgentSettings {
    /// The configured API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_ref())
    }
}

impl Settings {
    /// Load settings from the default configuration file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment variables override values from the file.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("PROJECT_NAME") {
            self.server.project_name = name;
        }
        if let Some(prefix) = lookup("API_V1_STR") {
            self.server.api_prefix = prefix;
        }
        if let Some(origins) = lookup("BACKEND_CORS_ORIGINS") {
            self.server.cors_origins = serde_json::from_str(&origins).map_err(|e| {
                ScriptwrightError::Config(format!(
                    "BACKEND_CORS_ORIGINS must be a JSON array of strings: {}",
                    e
                ))
            })?;
        }
        if let Some(key) = lookup("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.agent.api_key = Some(key);
        }
        Ok(())
    }

    /// Copy of these settings with credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.youtube.api_key().is_some() {
            copy.youtube.api_key = Some("********".to_string());
        }
        if copy.agent.api_key().is_some() {
            copy.agent.api_key = Some("********".to_string());
        }
        copy
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptwright")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
