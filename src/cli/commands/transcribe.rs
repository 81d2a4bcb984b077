//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the transcribe command.
pub async fn run_transcribe(urls: &[String], settings: Settings) -> Result<()> {
    preflight::check(Operation::Transcribe, &settings)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Fetching {} transcript(s)...", urls.len()));
    let result = orchestrator.create_transcripts(urls).await;
    spinner.finish_and_clear();

    let transcripts = result?;
    let found = transcripts.iter().filter(|t| !t.is_empty()).count();

    for (url, text) in urls.iter().zip(&transcripts) {
        Output::transcript(url, text);
    }
    println!();

    if found == transcripts.len() {
        Output::success(&format!("Fetched {} transcript(s)", found));
    } else {
        Output::warning(&format!(
            "Fetched {} of {} transcript(s); the rest were unavailable",
            found,
            transcripts.len()
        ));
    }

    Ok(())
}
