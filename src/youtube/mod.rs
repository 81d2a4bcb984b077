//! YouTube integrations: identifier extraction, video search and transcripts.

mod search;
mod transcript;
mod video_id;

pub use search::{apply_error_policy, FetchedVideo, VideoSearch, VideoSearchQuery, YoutubeSearch};
pub use transcript::{join_snippets, validate_urls, TranscriptBatch, TranscriptSource, YoutubeTranscripts};
pub use video_id::{extract_video_id, watch_url};

/// Decode the HTML entities YouTube leaves in titles and caption text.
pub(crate) fn decode_html_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        // Last, so "&amp;lt;" decodes to "&lt;" and not "<"
        .replace("&amp;", "&")
}
