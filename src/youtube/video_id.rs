//! Video identifier extraction.

use crate::error::{Result, ScriptwrightError};
use regex::Regex;
use std::sync::OnceLock;

/// URL shapes we accept, tried in order.
fn rules() -> &'static [Regex] {
    static RULES: OnceLock<Vec<Regex>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            // youtube.com/watch?v=<id>, including v= after other query parameters
            r"[?&]v=([0-9A-Za-z_-]{11})",
            // youtube.com/embed/<id>
            r"/embed/([0-9A-Za-z_-]{11})",
            // youtu.be/<id>
            r"youtu\.be/([0-9A-Za-z_-]{11})",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
        .collect()
    })
}

/// Extract the video identifier from a YouTube URL.
///
/// Returns the first identifier captured by the watch, embed and short-link rules,
/// in that order.
pub fn extract_video_id(url: &str) -> Result<String> {
    let url = url.trim();
    rules()
        .iter()
        .find_map(|rule| rule.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ScriptwrightError::InvalidInput(format!("Invalid YouTube URL: {}", url)))
}

/// Canonical watch URL for a video identifier.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
