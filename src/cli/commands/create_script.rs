//! Create-script command implementation.

use crate::agent::ScriptRequest;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};

/// Run the create-script command.
pub async fn run_create_script(
    host_name: &str,
    channel_name: &str,
    transcripts: &[String],
    transcript_files: &[String],
    signature_lines: &[String],
    instructions: &str,
    settings: Settings,
) -> Result<()> {
    preflight::check(Operation::CreateScript, &settings)?;

    let mut all_transcripts = transcripts.to_vec();
    for path in transcript_files {
        let path = Settings::expand_path(path);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript file {}", path.display()))?;
        all_transcripts.push(text.trim().to_string());
    }

    let request = ScriptRequest {
        host_name: host_name.to_string(),
        channel_name: channel_name.to_string(),
        transcripts: all_transcripts,
        signature_lines: signature_lines.to_vec(),
        additional_instructions: instructions.to_string(),
    };

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Planning and writing the script...");
    let result = orchestrator.create_script(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(script) => {
            Output::header("Script");
            println!();
            println!("{}", script);
        }
        Err(e) => {
            Output::error(&format!("Script generation failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
