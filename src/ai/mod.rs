//! Report content generation.
//!
//! - `generator` - the `ReportGenerator` entry points used by the router
//! - `provider` - text-completion backends (OpenAI-compatible HTTP)
//! - `prompts` - instructional prompt templates
//! - `fallback` - deterministic report text used when no backend answers
//! - `memory` - in-process per-user and shared conversation logs

pub mod fallback;
pub mod generator;
pub mod memory;
pub mod prompts;
pub mod provider;

pub use generator::ReportGenerator;
pub use memory::{ConversationTurn, MemoryStore, TurnRole};
pub use provider::{CompletionError, OpenAiCompletion, TextCompletion};

/// Token budget for plain reports.
pub const BASIC_MAX_TOKENS: u32 = 2000;
/// Token budget for context and history reports.
pub const ENHANCED_MAX_TOKENS: u32 = 3000;
