//! Fetch-videos command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{SearchRanking, Settings};
use crate::orchestrator::Orchestrator;
use crate::youtube::VideoSearchQuery;
use anyhow::Result;

/// Run the fetch-videos command.
pub async fn run_fetch_videos(
    topic: &str,
    keywords: Option<String>,
    language: Option<String>,
    ranking: Option<SearchRanking>,
    mut settings: Settings,
) -> Result<()> {
    preflight::check(Operation::FetchVideos, &settings)?;
    if let Some(ranking) = ranking {
        settings.youtube.ranking = ranking;
    }
    let ranking = settings.youtube.ranking;
    let orchestrator = Orchestrator::new(settings)?;

    let query = VideoSearchQuery {
        topic: topic.to_string(),
        keywords,
        video_language: language,
    };
    Output::info(&format!(
        "Searching YouTube for '{}' (ranked by {})",
        query.search_terms()?,
        ranking
    ));

    let spinner = Output::spinner("Searching...");
    let result = orchestrator.fetch_videos(&query).await;
    spinner.finish_and_clear();

    match result {
        Ok(videos) if videos.is_empty() => {
            Output::warning("No videos found.");
        }
        Ok(videos) => {
            Output::success(&format!("Found {} video(s)", videos.len()));
            for video in &videos {
                Output::video(&video.title, &video.url, video.thumbnail.as_deref());
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
