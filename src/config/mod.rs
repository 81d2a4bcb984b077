//! Configuration module for Scriptwright.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts, ScriptPrompts};
pub use settings::{
    AgentSettings, PromptSettings, SearchRanking, ServerSettings, Settings, TranscriptSettings,
    UpstreamErrorPolicy, YoutubeSettings,
};
