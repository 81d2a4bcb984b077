//! Transcript retrieval for batches of videos.

use super::decode_html_entities;
use super::video_id::extract_video_id;
use crate::config::TranscriptSettings;
use crate::error::{Result, ScriptwrightError};
use crate::pool::UpstreamPool;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use yt_transcript_rs::YouTubeTranscriptApi;

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the text snippets of a video's transcript, in playback order.
    ///
    /// `languages` lists acceptable transcript languages by preference.
    async fn fetch_snippets(&self, video_id: &str, languages: &[String]) -> Result<Vec<String>>;
}

/// Transcript provider backed by YouTube's caption tracks.
#[derive(Debug, Default, Clone, Copy)]
pub struct YoutubeTranscripts;

impl YoutubeTranscripts {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    #[instrument(skip(self, languages))]
    async fn fetch_snippets(&self, video_id: &str, languages: &[String]) -> Result<Vec<String>> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| ScriptwrightError::Transcript(e.to_string()))?;

        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();
        let fetched = api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| ScriptwrightError::Transcript(e.to_string()))?;

        Ok(fetched.parts().iter().map(|p| p.text.clone()).collect())
    }
}

/// Join snippet texts into one transcript string.
///
/// Entities are decoded, line breaks inside snippets become spaces and blank
/// snippets are dropped, so words are always separated by a single space.
pub fn join_snippets(snippets: &[String]) -> String {
    snippets
        .iter()
        .map(|s| decode_html_entities(s).replace('\n', " ").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check that every entry is an absolute http(s) URL.
pub fn validate_urls(urls: &[String]) -> Result<()> {
    for raw in urls {
        let parsed = url::Url::parse(raw.trim())
            .map_err(|e| ScriptwrightError::InvalidInput(format!("Invalid URL '{}': {}", raw, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScriptwrightError::InvalidInput(format!(
                "Invalid URL '{}': scheme must be http or https",
                raw
            )));
        }
    }
    Ok(())
}

/// Fetches transcripts for many videos, one result per input URL.
pub struct TranscriptBatch {
    source: Arc<dyn TranscriptSource>,
    pool: UpstreamPool,
    languages: Vec<String>,
    max_concurrent: usize,
}

impl TranscriptBatch {
    pub fn new(source: Arc<dyn TranscriptSource>, pool: UpstreamPool) -> Self {
        Self::with_config(source, pool, &TranscriptSettings::default())
    }

    pub fn with_config(
        source: Arc<dyn TranscriptSource>,
        pool: UpstreamPool,
        settings: &TranscriptSettings,
    ) -> Self {
        let languages = if settings.languages.is_empty() {
            TranscriptSettings::default().languages
        } else {
            settings.languages.clone()
        };

        Self {
            source,
            pool,
            languages,
            max_concurrent: settings.max_concurrent.max(1),
        }
    }

    /// Fetch and join the transcript for one video URL.
    pub async fn fetch_one(&self, url: &str) -> Result<String> {
        let video_id = extract_video_id(url)?;
        let snippets = self
            .pool
            .run(
                "transcript fetch",
                self.source.fetch_snippets(&video_id, &self.languages),
            )
            .await?;

        debug!("Fetched {} snippets for {}", snippets.len(), video_id);
        Ok(join_snippets(&snippets))
    }

    /// Fetch transcripts for all URLs.
    ///
    /// The output has one entry per URL in input order. A URL whose transcript
    /// cannot be retrieved yields an empty string.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<String> {
        info!("Fetching transcripts for {} videos", urls.len());

        stream::iter(urls.to_vec())
            .map(|url| async move {
                match self.fetch_one(&url).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(url = %url, error = %e, "Transcript unavailable");
                        String::new()
                    }
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
