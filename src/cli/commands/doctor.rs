//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Scriptwright Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Credentials").bold());
    let credential_checks = vec![
        check_key(
            "YOUTUBE_API_KEY",
            settings.youtube.api_key(),
            "Video search will fail. Set with: export YOUTUBE_API_KEY='...'",
        ),
        check_key(
            "GOOGLE_API_KEY",
            settings.agent.api_key(),
            "Script generation will fail. Set with: export GOOGLE_API_KEY='...'",
        ),
    ];
    for check in &credential_checks {
        check.print();
    }
    checks.extend(credential_checks);

    println!();

    println!("{}", style("Server").bold());
    let server_checks = vec![
        check_api_prefix(&settings.server.api_prefix),
        check_cors(&settings.server.cors_origins),
    ];
    for check in &server_checks {
        check.print();
    }
    checks.extend(server_checks);

    println!();

    println!("{}", style("Agent").bold());
    let agent_check = check_agent_endpoint(&settings.agent.base_url, &settings.agent.model);
    agent_check.print();
    checks.push(agent_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(&Settings::default_config_path());
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before starting the server.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Scriptwright is ready to use.");
    }

    Ok(())
}

/// Check that a credential is present. Missing keys are warnings since the
/// server still starts and the other flows keep working.
fn check_key(name: &str, value: Option<&str>, hint: &str) -> CheckResult {
    match value {
        Some(key) => CheckResult::ok(name, &format!("configured ({})", mask(key))),
        None => CheckResult::warning(name, "not set", hint),
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_api_prefix(prefix: &str) -> CheckResult {
    let trimmed = prefix.trim();
    if trimmed.is_empty() || trimmed == "/" {
        CheckResult::warning(
            "API prefix",
            "empty (routes are served at the root)",
            "Set API_V1_STR (e.g. /api/v1) to match the frontend",
        )
    } else if !trimmed.starts_with('/') {
        CheckResult::warning(
            "API prefix",
            &format!("{} (a leading slash will be added)", trimmed),
            "Write the prefix as /api/v1",
        )
    } else {
        CheckResult::ok("API prefix", trimmed)
    }
}

fn check_cors(origins: &[String]) -> CheckResult {
    if origins.is_empty() {
        return CheckResult::warning(
            "CORS origins",
            "none (browsers on other origins are blocked)",
            "Set BACKEND_CORS_ORIGINS='[\"http://localhost:3000\"]'",
        );
    }
    if origins.iter().any(|o| o.trim() == "*") {
        return CheckResult::warning(
            "CORS origins",
            "any origin (credentials disabled)",
            "List explicit origins to allow credentialed requests",
        );
    }
    let invalid: Vec<&String> = origins
        .iter()
        .filter(|o| url::Url::parse(o.trim()).is_err())
        .collect();
    if let Some(bad) = invalid.first() {
        return CheckResult::error(
            "CORS origins",
            &format!("'{}' is not a valid origin", bad),
            "Origins look like http://localhost:3000",
        );
    }
    CheckResult::ok("CORS origins", &origins.join(", "))
}

fn check_agent_endpoint(base_url: &str, model: &str) -> CheckResult {
    match url::Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let host = url.host_str().unwrap_or(base_url);
            CheckResult::ok("Agent model", &format!("{} via {}", model, host))
        }
        _ => CheckResult::error(
            "Agent model",
            &format!("invalid base URL '{}'", base_url),
            "Set agent.base_url to an OpenAI-compatible endpoint",
        ),
    }
}

fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override defaults", path.display()),
        )
    }
}
