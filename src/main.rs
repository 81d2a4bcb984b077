//! Scriptwright CLI entry point.

use anyhow::Result;
use clap::Parser;
use scriptwright::cli::{commands, Cli, Commands};
use scriptwright::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scriptwright={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.as_deref(), *port, settings).await?;
        }

        Commands::FetchVideos {
            topic,
            keywords,
            language,
            ranking,
        } => {
            commands::run_fetch_videos(
                topic,
                keywords.clone(),
                language.clone(),
                *ranking,
                settings,
            )
            .await?;
        }

        Commands::Transcribe { urls } => {
            commands::run_transcribe(urls, settings).await?;
        }

        Commands::CreateScript {
            host_name,
            channel_name,
            transcripts,
            transcript_files,
            signature_lines,
            instructions,
        } => {
            commands::run_create_script(
                host_name,
                channel_name,
                transcripts,
                transcript_files,
                signature_lines,
                instructions,
                settings,
            )
            .await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
