//! Script generation on top of the planning agent.

use super::planner::PlanningAgent;
use crate::config::Prompts;
use crate::error::{Result, ScriptwrightError};
use crate::pool::UpstreamPool;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Inputs for a new video script.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScriptRequest {
    pub host_name: String,
    pub channel_name: String,
    /// Source transcripts to synthesize, in order.
    #[serde(default)]
    pub transcripts: Vec<String>,
    /// Lines the script must end with, in order.
    #[serde(default)]
    pub signature_lines: Vec<String>,
    /// Free-text style guidelines.
    #[serde(default)]
    pub additional_instructions: String,
}

impl ScriptRequest {
    /// Render the natural-language task for the agent.
    pub fn instruction(&self, prompts: &Prompts) -> String {
        let mut vars = HashMap::new();
        vars.insert("host_name".to_string(), self.host_name.clone());
        vars.insert("channel_name".to_string(), self.channel_name.clone());
        vars.insert(
            "additional_instructions".to_string(),
            self.additional_instructions.clone(),
        );
        vars.insert("transcripts".to_string(), numbered_list(&self.transcripts));
        vars.insert("signature_lines".to_string(), bullet_list(&self.signature_lines));

        prompts.render_with_custom(&prompts.script.instruction, &vars)
    }
}

fn numbered_list(items: &[String]) -> String {
    if items.is_empty() {
        return "  (no transcripts provided)".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}. \"{}\"", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "  (no closing lines required)".to_string();
    }
    items
        .iter()
        .map(|item| format!("  - \"{}\"", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drafts scripts by planning and running a task on the agent service.
pub struct ScriptWriter {
    agent: Arc<dyn PlanningAgent>,
    prompts: Prompts,
    pool: UpstreamPool,
}

impl ScriptWriter {
    pub fn new(agent: Arc<dyn PlanningAgent>, prompts: Prompts, pool: UpstreamPool) -> Self {
        Self {
            agent,
            prompts,
            pool,
        }
    }

    /// Generate a script.
    ///
    /// A missing credential is reported as such; every other failure becomes
    /// an agent error carrying the upstream message.
    #[instrument(skip(self, request), fields(host = %request.host_name, channel = %request.channel_name))]
    pub async fn generate(&self, request: &ScriptRequest) -> Result<String> {
        let instruction = request.instruction(&self.prompts);

        info!("Step 1: generating the plan");
        let plan = self
            .pool
            .run("agent plan", self.agent.plan(&instruction))
            .await
            .map_err(into_agent_error)?;

        info!("Step 2: executing the plan ({} steps)", plan.steps.len());
        let run = self
            .pool
            .run("agent run", self.agent.run_plan(&plan))
            .await
            .map_err(into_agent_error)?;

        Ok(run.outputs.into_text())
    }
}

fn into_agent_error(error: ScriptwrightError) -> ScriptwrightError {
    match error {
        e @ ScriptwrightError::MissingCredential(_) => e,
        e @ ScriptwrightError::Agent(_) => e,
        ScriptwrightError::Upstream(msg) | ScriptwrightError::Transcript(msg) => {
            ScriptwrightError::Agent(msg)
        }
        other => ScriptwrightError::Agent(other.to_string()),
    }
}
