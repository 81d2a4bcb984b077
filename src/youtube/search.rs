//! Video search through the YouTube Data API.

use super::decode_html_entities;
use super::video_id::watch_url;
use crate::config::{UpstreamErrorPolicy, YoutubeSettings};
use crate::error::{Result, ScriptwrightError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// A video search request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VideoSearchQuery {
    pub topic: String,
    /// Comma-separated extra keywords.
    #[serde(default)]
    pub keywords: Option<String>,
    /// Preferred result language.
    #[serde(default)]
    pub video_language: Option<String>,
}

impl VideoSearchQuery {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            ..Self::default()
        }
    }

    pub fn with_keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.video_language = Some(language.to_string());
        self
    }

    /// Build the search string: the topic, then each keyword, separated by spaces.
    ///
    /// Keywords are trimmed and blank ones dropped, so an empty keyword string
    /// yields the same query as no keywords at all.
    pub fn search_terms(&self) -> Result<String> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(ScriptwrightError::InvalidInput(
                "topic must not be empty".to_string(),
            ));
        }

        let mut terms = vec![topic];
        if let Some(keywords) = &self.keywords {
            terms.extend(keywords.split(',').map(str::trim).filter(|k| !k.is_empty()));
        }
        Ok(terms.join(" "))
    }

    /// Requested language, if the caller gave a non-blank one.
    pub fn language(&self) -> Option<&str> {
        self.video_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// A normalized search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchedVideo {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Trait for video search providers.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Run a single search and return normalized results.
    async fn search(&self, query: &VideoSearchQuery) -> Result<Vec<FetchedVideo>>;
}

/// Apply the configured policy to a failed search.
///
/// Bad input and missing credentials always fail; other errors either fail or
/// degrade to an empty result.
pub fn apply_error_policy(
    result: Result<Vec<FetchedVideo>>,
    policy: UpstreamErrorPolicy,
) -> Result<Vec<FetchedVideo>> {
    match result {
        Ok(videos) => Ok(videos),
        Err(e @ ScriptwrightError::InvalidInput(_))
        | Err(e @ ScriptwrightError::MissingCredential(_)) => Err(e),
        Err(e) => match policy {
            UpstreamErrorPolicy::Fail => Err(e),
            UpstreamErrorPolicy::Empty => {
                warn!(error = %e, "Video search failed, returning no results");
                Ok(Vec::new())
            }
        },
    }
}

/// YouTube Data API v3 `search.list` client.
pub struct YoutubeSearch {
    client: reqwest::Client,
    settings: YoutubeSettings,
}

impl YoutubeSearch {
    pub fn new(settings: YoutubeSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VideoSearch for YoutubeSearch {
    #[instrument(skip(self, query), fields(topic = %query.topic))]
    async fn search(&self, query: &VideoSearchQuery) -> Result<Vec<FetchedVideo>> {
        let api_key = self
            .settings
            .api_key()
            .ok_or_else(|| ScriptwrightError::MissingCredential("YOUTUBE_API_KEY".to_string()))?;

        let terms = query.search_terms()?;
        let language = query
            .language()
            .unwrap_or(self.settings.relevance_language.as_str());
        let max_results = self.settings.max_results.to_string();

        info!("Searching YouTube for '{}'", terms);

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", terms.as_str()),
                ("order", self.settings.ranking.as_param()),
                ("maxResults", max_results.as_str()),
                ("relevanceLanguage", language),
                ("videoDefinition", self.settings.video_definition.as_str()),
                ("videoCaption", self.settings.video_caption.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.text().await {
                Ok(body) => api_error_message(&body),
                Err(e) => {
                    warn!("Could not read YouTube error body: {}", e);
                    format!("unreadable response body ({})", e)
                }
            };
            return Err(ScriptwrightError::Upstream(format!(
                "YouTube API error ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let listing: SearchListResponse = response.json().await?;
        let videos = normalize(listing);
        debug!("YouTube returned {} usable results", videos.len());
        Ok(videos)
    }
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize, Default)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Snippet {
    title: Option<String>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Map raw search items to normalized records, skipping items without a video ID.
fn normalize(listing: SearchListResponse) -> Vec<FetchedVideo> {
    listing
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
            let title = item
                .snippet
                .title
                .map(|t| decode_html_entities(&t))
                .unwrap_or_else(|| "No Title".to_string());
            let thumbnail = item.snippet.thumbnails.get("high").map(|t| t.url.clone());

            Some(FetchedVideo {
                url: watch_url(&video_id),
                title,
                thumbnail,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchRanking;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> YoutubeSettings {
        YoutubeSettings {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            ..YoutubeSettings::default()
        }
    }

    #[test]
    fn test_search_terms() {
        let query = VideoSearchQuery::new("cats").with_keywords("funny, cute");
        assert_eq!(query.search_terms().unwrap(), "cats funny cute");
    }

    #[test]
    fn test_empty_keywords_match_no_keywords() {
        let plain = VideoSearchQuery::new("rust async");
        let empty = VideoSearchQuery::new("rust async").with_keywords("");
        let blanks = VideoSearchQuery::new("rust async").with_keywords(" , ,");
        assert_eq!(plain.search_terms().unwrap(), empty.search_terms().unwrap());
        assert_eq!(plain.search_terms().unwrap(), blanks.search_terms().unwrap());
    }

    #[test]
    fn test_blank_topic_rejected() {
        let query = VideoSearchQuery::new("   ").with_keywords("cats");
        assert!(matches!(
            query.search_terms(),
            Err(ScriptwrightError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_normalize_skips_items_without_id() {
        let listing: SearchListResponse = serde_json::from_value(json!({
            "items": [
                {"id": {"kind": "youtube#channel", "channelId": "UC123"}, "snippet": {"title": "A channel"}},
                {
                    "id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"},
                    "snippet": {
                        "title": "Never Gonna Give You Up &amp; more",
                        "thumbnails": {"high": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"}}
                    }
                },
                {"id": {"videoId": "abc12345678"}}
            ]
        }))
        .unwrap();

        let videos = normalize(listing);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(videos[0].title, "Never Gonna Give You Up & more");
        assert_eq!(
            videos[0].thumbnail.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        assert_eq!(videos[1].title, "No Title");
        assert!(videos[1].thumbnail.is_none());
    }

    #[test]
    fn test_error_policy() {
        let upstream = || Err(ScriptwrightError::Upstream("quota exceeded".to_string()));

        assert!(apply_error_policy(upstream(), UpstreamErrorPolicy::Empty)
            .unwrap()
            .is_empty());
        assert!(apply_error_policy(upstream(), UpstreamErrorPolicy::Fail).is_err());
        assert!(matches!(
            apply_error_policy(
                Err(ScriptwrightError::MissingCredential("YOUTUBE_API_KEY".to_string())),
                UpstreamErrorPolicy::Empty
            ),
            Err(ScriptwrightError::MissingCredential(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let search = YoutubeSearch::new(YoutubeSettings::default());
        let result = search.search(&VideoSearchQuery::new("cats")).await;
        assert!(matches!(result, Err(ScriptwrightError::MissingCredential(_))));
    }

    #[tokio::test]
    async fn test_search_sends_expected_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "cats funny cute"))
            .and(query_param("type", "video"))
            .and(query_param("order", "viewCount"))
            .and(query_param("maxResults", "1"))
            .and(query_param("relevanceLanguage", "de"))
            .and(query_param("videoDefinition", "high"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": {"videoId": "wysAcLUQBd0"},
                    "snippet": {"title": "Funny cats", "thumbnails": {}}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = YoutubeSettings {
            ranking: SearchRanking::ViewCount,
            ..settings_for(&server)
        };
        let search = YoutubeSearch::new(settings);
        let query = VideoSearchQuery::new("cats")
            .with_keywords("funny, cute")
            .with_language("de");

        let videos = search.search(&query).await.unwrap();
        assert_eq!(
            videos,
            vec![FetchedVideo {
                url: "https://www.youtube.com/watch?v=wysAcLUQBd0".to_string(),
                title: "Funny cats".to_string(),
                thumbnail: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_api_error_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}
            })))
            .mount(&server)
            .await;

        let search = YoutubeSearch::new(settings_for(&server));
        match search.search(&VideoSearchQuery::new("cats")).await {
            Err(ScriptwrightError::Upstream(msg)) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("exceeded your quota"));
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("  Backend unavailable \n"))
            .mount(&server)
            .await;

        let search = YoutubeSearch::new(settings_for(&server));
        match search.search(&VideoSearchQuery::new("cats")).await {
            Err(ScriptwrightError::Upstream(msg)) => {
                assert_eq!(msg, "YouTube API error (503): Backend unavailable");
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }
    }
}
