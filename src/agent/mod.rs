//! Script generation through an agent planning/execution service.
//!
//! The agent receives one natural-language task, produces a plan for it and
//! then runs that plan. [`ScriptWriter`] builds the task from a
//! [`ScriptRequest`] and extracts the finished script from the run.

mod planner;
mod script;

pub use planner::{OpenAIPlanner, Plan, PlanOutput, PlanRun, PlanStep, PlanningAgent};
pub use script::{ScriptRequest, ScriptWriter};
