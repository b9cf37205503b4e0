//! # fathom-agents
//!
//! The reasoning stages of a research run. Each stage builds a narrow
//! prompt, calls the reasoning model through [`reasoning::ReasoningClient`],
//! parses the reply into typed values and falls back deterministically when
//! the model fails or answers in an unusable shape.

pub mod evaluator;
pub mod orchestrator;
pub mod planner;
pub mod prompts;
pub mod reasoning;
pub mod synthesiser;

pub use evaluator::AnswerEvaluator;
pub use orchestrator::IntentOrchestrator;
pub use planner::QueryPlanner;
pub use reasoning::{ModelReply, ReasoningClient};
pub use synthesiser::AnswerSynthesiser;
