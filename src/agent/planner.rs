//! Plan-then-run protocol against an OpenAI-compatible chat endpoint.

use crate::config::{AgentSettings, Prompts};
use crate::error::{Result, ScriptwrightError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// One step of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    /// What the step should do.
    pub task: String,
    /// Label for the step's result, e.g. `$outline`.
    #[serde(default)]
    pub output: Option<String>,
}

/// An ordered plan for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// The task the plan was made for.
    pub query: String,
    pub steps: Vec<PlanStep>,
}

#[derive(Deserialize)]
struct PlanReply {
    steps: Vec<PlanStep>,
}

impl Plan {
    /// A plan that performs the task in one step.
    pub fn single_step(query: &str) -> Self {
        Self {
            query: query.to_string(),
            steps: vec![PlanStep {
                task: query.to_string(),
                output: Some("$output".to_string()),
            }],
        }
    }

    /// Parse a planner reply.
    ///
    /// A reply that is not plan JSON falls back to a single-step plan. A plan
    /// with no steps is an error.
    pub fn parse(query: &str, reply: &str) -> Result<Self> {
        match serde_json::from_str::<PlanReply>(strip_code_fence(reply)) {
            Ok(parsed) if parsed.steps.is_empty() => Err(ScriptwrightError::Upstream(
                "planner returned a plan with no steps".to_string(),
            )),
            Ok(parsed) => Ok(Self {
                query: query.to_string(),
                steps: parsed.steps,
            }),
            Err(e) => {
                debug!("Planner reply is not a plan ({}), using a single step", e);
                Ok(Self::single_step(query))
            }
        }
    }
}

/// Final output of a plan run.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutput {
    Text(String),
    Structured(serde_json::Value),
}

impl PlanOutput {
    /// Interpret the last step's reply: JSON objects and strings are structured, anything else is text.
    pub fn from_reply(reply: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(strip_code_fence(reply)) {
            Ok(value @ serde_json::Value::Object(_)) | Ok(value @ serde_json::Value::String(_)) => {
                PlanOutput::Structured(value)
            }
            _ => PlanOutput::Text(reply.to_string()),
        }
    }

    /// The final text: plain text as-is, a JSON string's contents, an object's
    /// `output` field, or the JSON rendering of anything else.
    pub fn into_text(self) -> String {
        match self {
            PlanOutput::Text(text) => text,
            PlanOutput::Structured(serde_json::Value::String(text)) => text,
            PlanOutput::Structured(serde_json::Value::Object(mut map)) => match map.remove("output") {
                Some(serde_json::Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => serde_json::Value::Object(map).to_string(),
            },
            PlanOutput::Structured(other) => other.to_string(),
        }
    }
}

/// Result of running a plan.
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub plan: Plan,
    pub outputs: PlanOutput,
}

/// An agent service that plans a task and then executes the plan.
#[async_trait]
pub trait PlanningAgent: Send + Sync {
    /// Produce a plan for a natural-language task.
    async fn plan(&self, query: &str) -> Result<Plan>;

    /// Execute a plan and return its final output.
    async fn run_plan(&self, plan: &Plan) -> Result<PlanRun>;
}

/// Planning agent backed by an OpenAI-compatible chat-completions API.
pub struct OpenAIPlanner {
    settings: AgentSettings,
    prompts: Prompts,
}

impl OpenAIPlanner {
    pub fn new(settings: AgentSettings) -> Self {
        Self::with_prompts(settings, Prompts::default())
    }

    pub fn with_prompts(settings: AgentSettings, prompts: Prompts) -> Self {
        Self { settings, prompts }
    }

    /// Send one system+user exchange and return the reply text.
    async fn complete(
        &self,
        client: &Client<OpenAIConfig>,
        system: &str,
        user: String,
    ) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| ScriptwrightError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| ScriptwrightError::Agent(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .build()
            .map_err(|e| ScriptwrightError::Agent(e.to_string()))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| ScriptwrightError::Upstream(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScriptwrightError::Upstream("No response from model".to_string()))
    }
}

#[async_trait]
impl PlanningAgent for OpenAIPlanner {
    #[instrument(skip(self, query))]
    async fn plan(&self, query: &str) -> Result<Plan> {
        let client = create_client(&self.settings)?;

        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        let user = self
            .prompts
            .render_with_custom(&self.prompts.agent.plan_user, &vars);

        let reply = self
            .complete(&client, &self.prompts.agent.plan_system, user)
            .await?;
        let plan = Plan::parse(query, &reply)?;

        info!("Plan generated with {} steps", plan.steps.len());
        Ok(plan)
    }

    #[instrument(skip(self, plan), fields(steps = plan.steps.len()))]
    async fn run_plan(&self, plan: &Plan) -> Result<PlanRun> {
        if plan.steps.is_empty() {
            return Err(ScriptwrightError::Agent("cannot run an empty plan".to_string()));
        }

        let client = create_client(&self.settings)?;
        let step_count = plan.steps.len();
        let mut step_outputs: Vec<String> = Vec::with_capacity(step_count);

        for (idx, step) in plan.steps.iter().enumerate() {
            debug!("Executing step {}/{}: {}", idx + 1, step_count, step.task);

            let mut vars = HashMap::new();
            vars.insert("query".to_string(), plan.query.clone());
            vars.insert("task".to_string(), step.task.clone());
            vars.insert("step_number".to_string(), (idx + 1).to_string());
            vars.insert("step_count".to_string(), step_count.to_string());
            vars.insert(
                "previous".to_string(),
                format_previous(&plan.steps, &step_outputs),
            );

            let mut user = self
                .prompts
                .render_with_custom(&self.prompts.agent.step_user, &vars);
            if idx + 1 == step_count {
                user.push_str("\n\n");
                user.push_str(&self.prompts.agent.final_step);
            }

            let reply = self
                .complete(&client, &self.prompts.agent.step_system, user)
                .await?;
            step_outputs.push(reply);
        }

        let last = step_outputs.last().cloned().unwrap_or_default();
        info!("Plan executed ({} steps)", step_count);

        Ok(PlanRun {
            plan: plan.clone(),
            outputs: PlanOutput::from_reply(&last),
        })
    }
}

/// Render completed step results for the next step's prompt.
fn format_previous(steps: &[PlanStep], outputs: &[String]) -> String {
    if outputs.is_empty() {
        return "(none yet)".to_string();
    }

    steps
        .iter()
        .zip(outputs)
        .enumerate()
        .map(|(i, (step, output))| {
            let label = step
                .output
                .clone()
                .unwrap_or_else(|| format!("Step {}", i + 1));
            format!("{}:\n{}", label, output)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Strip a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.strip_suffix("```").unwrap_or(body).trim()
}
