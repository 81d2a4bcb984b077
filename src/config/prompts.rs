//! Prompt templates for Scriptwright.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub script: ScriptPrompts,
    pub agent: AgentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for the script-writing task handed to the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    pub instruction: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            instruction: r#"Generate a complete and engaging YouTube video script based on the following detailed requirements:

**Host and Channel:**
- The host's name is "{{host_name}}".
- The channel is called "{{channel_name}}".

**Core Content to Synthesize:**
- The script must smoothly integrate these topics:
{{transcripts}}

**Style and Format Instructions:**
- Adhere strictly to these creative guidelines: "{{additional_instructions}}".

**Mandatory Outro:**
- The script must end *exactly* with the following lines, in this order:
{{signature_lines}}

Execute this task and provide only the final, complete script as your output."#
                .to_string(),
        }
    }
}

/// Prompts for the plan-then-run agent protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub plan_system: String,
    pub plan_user: String,
    pub step_system: String,
    pub step_user: String,
    /// Appended to the last step so it answers with a structured output.
    pub final_step: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            plan_system: r#"You are a planning agent. You break a task into a short ordered list of concrete steps that a writer can execute one after another.

Respond with a JSON object only, no prose:
{"steps": [{"task": "<what to do>", "output": "$<short_label>"}]}

Use between 1 and 5 steps. The last step must produce the final deliverable."#
                .to_string(),

            plan_user: r#"Create a plan for this task:

{{query}}"#
                .to_string(),

            step_system: r#"You are an execution agent. You carry out one step of a plan at a time, using the original task and the results of earlier steps.

Do exactly what the current step asks. Do not describe what you are doing; produce the result itself."#
                .to_string(),

            step_user: r#"Original task:
{{query}}

Results of earlier steps:
{{previous}}

Current step ({{step_number}} of {{step_count}}):
{{task}}"#
                .to_string(),

            final_step: r#"This is the final step. Respond with a JSON object only: {"output": "<the complete final deliverable>"}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }

            let agent_path = custom_path.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass, so placeholders inside substituted values are left alone.
    /// Unknown placeholders are kept verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let placeholder = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("valid regex"));

        placeholder
            .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
