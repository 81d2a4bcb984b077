//! CLI command implementations.

mod config;
mod create_script;
mod doctor;
mod fetch_videos;
mod serve;
mod transcribe;

pub use config::run_config;
pub use create_script::run_create_script;
pub use doctor::run_doctor;
pub use fetch_videos::run_fetch_videos;
pub use serve::run_serve;
pub use transcribe::run_transcribe;
