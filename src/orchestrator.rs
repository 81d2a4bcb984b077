//! Flow coordinator for Scriptwright.
//!
//! Owns the providers and the upstream pool, and runs the three request flows:
//! video search, transcript retrieval and script generation.

use crate::agent::{OpenAIPlanner, PlanningAgent, ScriptRequest, ScriptWriter};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::pool::UpstreamPool;
use crate::youtube::{
    apply_error_policy, validate_urls, FetchedVideo, TranscriptBatch, TranscriptSource,
    VideoSearch, VideoSearchQuery, YoutubeSearch, YoutubeTranscripts,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for Scriptwright.
pub struct Orchestrator {
    settings: Settings,
    pool: UpstreamPool,
    search: Arc<dyn VideoSearch>,
    transcripts: TranscriptBatch,
    writer: ScriptWriter,
}

impl Orchestrator {
    /// Create an orchestrator with the real providers.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let search: Arc<dyn VideoSearch> = Arc::new(YoutubeSearch::new(settings.youtube.clone()));
        let source: Arc<dyn TranscriptSource> = Arc::new(YoutubeTranscripts::new());
        let agent: Arc<dyn PlanningAgent> = Arc::new(OpenAIPlanner::with_prompts(
            settings.agent.clone(),
            prompts.clone(),
        ));

        info!(
            "Using agent model {} at {}",
            settings.agent.model, settings.agent.base_url
        );

        Ok(Self::with_components(settings, prompts, search, source, agent))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        search: Arc<dyn VideoSearch>,
        source: Arc<dyn TranscriptSource>,
        agent: Arc<dyn PlanningAgent>,
    ) -> Self {
        let pool = UpstreamPool::from_settings(&settings.server);
        let transcripts = TranscriptBatch::with_config(source, pool.clone(), &settings.transcript);
        let writer = ScriptWriter::new(agent, prompts, pool.clone());

        Self {
            settings,
            pool,
            search,
            transcripts,
            writer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Search for videos on a topic.
    #[instrument(skip(self, query), fields(topic = %query.topic))]
    pub async fn fetch_videos(&self, query: &VideoSearchQuery) -> Result<Vec<FetchedVideo>> {
        // Reject bad input before spending quota
        query.search_terms()?;

        let result = self.pool.run("video search", self.search.search(query)).await;
        let videos = apply_error_policy(result, self.settings.youtube.on_upstream_error)?;

        info!("Found {} videos", videos.len());
        Ok(videos)
    }

    /// Fetch transcripts for a list of video URLs, one entry per URL.
    #[instrument(skip(self, urls), fields(count = urls.len()))]
    pub async fn create_transcripts(&self, urls: &[String]) -> Result<Vec<String>> {
        validate_urls(urls)?;
        Ok(self.transcripts.fetch_all(urls).await)
    }

    /// Draft a script from transcripts and channel details.
    pub async fn create_script(&self, request: &ScriptRequest) -> Result<String> {
        self.writer.generate(request).await
    }
}
