//! Serve command - run the HTTP API.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::server;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or(settings.server.host.as_str()).to_string();
    let port = port.unwrap_or(settings.server.port);
    let prefix = server::normalize_prefix(&settings.server.api_prefix);

    let orchestrator = Orchestrator::new(settings)?;
    let listener = server::bind(&host, port).await?;
    let settings = orchestrator.settings();

    Output::header(&settings.server.project_name);
    println!();
    Output::success(&format!("Listening on http://{}", listener.local_addr()?));
    println!();
    println!("Endpoints:");
    Output::kv("Fetch Videos", &format!("POST {}/agent/fetch-videos", prefix));
    Output::kv("Create Script", &format!("POST {}/agent/create-script", prefix));
    Output::kv("Transcripts", &format!("POST {}/transcript/create", prefix));
    Output::kv("Health", "GET  /health");
    println!();

    if settings.youtube.api_key().is_none() {
        Output::warning("YOUTUBE_API_KEY is not set; video search requests will fail.");
    }
    if settings.agent.api_key().is_none() {
        Output::warning("GOOGLE_API_KEY is not set; script requests will fail.");
    }
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(orchestrator, listener).await?;

    Ok(())
}
