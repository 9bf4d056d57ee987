//! The three report-generation entry points.
//!
//! Every entry point is total: completion failures are logged and replaced by
//! the matching fallback text, so callers always receive a non-empty report.

use std::sync::Arc;

use super::memory::MemoryStore;
use super::prompts;
use super::provider::{OpenAiCompletion, TextCompletion};
use super::{fallback, BASIC_MAX_TOKENS, ENHANCED_MAX_TOKENS};
use crate::config::OpenAiConfig;

/// Number of shared-log turns shown to history-based generation.
const HISTORY_TURNS: usize = 5;

pub struct ReportGenerator {
    completion: Option<Arc<dyn TextCompletion>>,
    memory: Arc<MemoryStore>,
}

impl ReportGenerator {
    pub fn new(completion: Option<Arc<dyn TextCompletion>>) -> Self {
        Self {
            completion,
            memory: Arc::new(MemoryStore::new()),
        }
    }

    /// Generator that only ever returns fallback text.
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Wire the OpenAI backend when configured; otherwise fallback-only.
    pub fn from_config(config: Option<&OpenAiConfig>, client: reqwest::Client) -> Self {
        match config {
            Some(openai) => {
                let backend: Arc<dyn TextCompletion> =
                    Arc::new(OpenAiCompletion::new(openai.clone(), client));
                Self::new(Some(backend))
            }
            None => {
                log::info!("No completion backend configured. Using fallback content generation.");
                Self::fallback_only()
            }
        }
    }

    /// Whether a completion backend is wired in.
    pub fn is_available(&self) -> bool {
        self.completion.is_some()
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    async fn try_complete(&self, prompt: &str, max_tokens: u32) -> Option<String> {
        let backend = self.completion.as_ref()?;
        match backend.complete(prompt, max_tokens).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    log::warn!("Completion backend returned empty text, using fallback");
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                log::error!("Completion failed, using fallback: {}", e);
                None
            }
        }
    }

    /// Plain report on `topic`.
    pub async fn generate_report_content(&self, topic: &str) -> String {
        let prompt = prompts::basic_report_prompt(topic);
        match self.try_complete(&prompt, BASIC_MAX_TOKENS).await {
            Some(text) => text,
            None => fallback::basic_report(topic),
        }
    }

    /// Report that folds in caller-supplied context and, when `user_id` has a
    /// memory entry, the user's previous interests. A successful generation
    /// records the topic as a new interest.
    pub async fn generate_enhanced_report(
        &self,
        topic: &str,
        context: Option<&str>,
        user_id: Option<i64>,
    ) -> String {
        if !self.is_available() {
            return fallback::enhanced_report(topic);
        }

        let context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(prompts::NO_CONTEXT);
        let memory = user_id
            .and_then(|id| self.memory.user_memory(id))
            .map(|log| format!("User's previous interests and preferences: {}", log))
            .unwrap_or_else(|| prompts::NO_MEMORY.to_string());

        let prompt = prompts::enhanced_report_prompt(topic, context, &memory);
        match self.try_complete(&prompt, ENHANCED_MAX_TOKENS).await {
            Some(text) => {
                if let Some(id) = user_id {
                    self.memory.record_interest(id, topic);
                    log::debug!("Recorded interest '{}' for user {}", topic, id);
                }
                text
            }
            None => fallback::enhanced_report(topic),
        }
    }

    /// Report personalised from the last turns of the shared conversation log.
    /// A successful generation is appended to that log.
    pub async fn generate_report_with_memory(&self, topic: &str, user_id: i64) -> String {
        if !self.is_available() {
            return fallback::enhanced_report(topic);
        }

        let history = self
            .memory
            .recent_history_text(HISTORY_TURNS)
            .unwrap_or_else(|| prompts::NO_HISTORY.to_string());

        let prompt = prompts::history_report_prompt(topic, &history, user_id);
        match self.try_complete(&prompt, ENHANCED_MAX_TOKENS).await {
            Some(text) => {
                self.memory.record_exchange(
                    &format!("Generated report on: {}", topic),
                    "Report generated successfully",
                );
                text
            }
            None => fallback::enhanced_report(topic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::CompletionError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every prompt and answers with a fixed report.
    struct RecordingCompletion {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingCompletion {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            })
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl TextCompletion for RecordingCompletion {
        async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
            self.prompts.lock().push(prompt.to_string());
            Ok(format!("  {}  \n", self.reply))
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl TextCompletion for FailingCompletion {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
            Err(CompletionError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    fn failing() -> ReportGenerator {
        ReportGenerator::new(Some(Arc::new(FailingCompletion)))
    }

    #[tokio::test]
    async fn test_plain_generation_without_backend_is_fallback() {
        let generator = ReportGenerator::fallback_only();

        let text = generator.generate_report_content("Smart Cities").await;

        assert_eq!(text, fallback::basic_report("Smart Cities"));
        assert!(!generator.is_available());
    }

    #[tokio::test]
    async fn test_plain_generation_with_failing_backend_is_fallback() {
        let text = failing().generate_report_content("Smart Cities").await;
        assert_eq!(text, fallback::basic_report("Smart Cities"));
    }

    #[tokio::test]
    async fn test_plain_generation_returns_trimmed_completion() {
        let backend = RecordingCompletion::new("Report about Smart Cities");
        let generator = ReportGenerator::new(Some(backend.clone()));

        let text = generator.generate_report_content("Smart Cities").await;

        assert_eq!(text, "Report about Smart Cities");
        assert!(backend.last_prompt().contains("\"Smart Cities\""));
    }

    #[tokio::test]
    async fn test_blank_completion_falls_back() {
        let generator = ReportGenerator::new(Some(RecordingCompletion::new("   ")));
        let text = generator.generate_report_content("Mining").await;
        assert_eq!(text, fallback::basic_report("Mining"));
    }

    #[tokio::test]
    async fn test_enhanced_generation_records_and_reuses_interest() {
        let backend = RecordingCompletion::new("enhanced");
        let generator = ReportGenerator::new(Some(backend.clone()));

        generator
            .generate_enhanced_report("Batteries", Some("grid storage"), Some(4))
            .await;
        let first_prompt = backend.last_prompt();
        assert!(first_prompt.contains("Additional Context: grid storage"));
        assert!(first_prompt.contains(prompts::NO_MEMORY));

        generator
            .generate_enhanced_report("Hydrogen", None, Some(4))
            .await;
        let second_prompt = backend.last_prompt();
        assert!(second_prompt.contains(prompts::NO_CONTEXT));
        assert!(second_prompt
            .contains("User's previous interests and preferences: Interested in: Batteries"));

        assert_eq!(
            generator.memory().user_memory(4).as_deref(),
            Some("Interested in: Batteries\nInterested in: Hydrogen")
        );
    }

    #[tokio::test]
    async fn test_enhanced_generation_without_user_leaves_memory_untouched() {
        let generator = ReportGenerator::new(Some(RecordingCompletion::new("enhanced")));
        generator.generate_enhanced_report("Batteries", None, None).await;
        assert_eq!(generator.memory().tracked_users(), 0);
    }

    #[tokio::test]
    async fn test_failed_enhanced_generation_does_not_record_interest() {
        let generator = failing();

        let text = generator
            .generate_enhanced_report("Batteries", Some("ctx"), Some(4))
            .await;

        assert_eq!(text, fallback::enhanced_report("Batteries"));
        assert_eq!(generator.memory().user_memory(4), None);
    }

    #[tokio::test]
    async fn test_history_generation_shares_log_across_users() {
        let backend = RecordingCompletion::new("history");
        let generator = ReportGenerator::new(Some(backend.clone()));

        generator.generate_report_with_memory("Chips", 1).await;
        assert!(backend.last_prompt().contains(prompts::NO_HISTORY));

        generator.generate_report_with_memory("Lasers", 2).await;
        let prompt = backend.last_prompt();
        assert!(prompt.contains("User ID: 2"));
        assert!(prompt.contains("human: Generated report on: Chips"));
        assert!(prompt.contains("ai: Report generated successfully"));
        assert_eq!(generator.memory().conversation_len(), 4);
    }

    #[tokio::test]
    async fn test_history_generation_uses_only_last_five_turns() {
        let backend = RecordingCompletion::new("history");
        let generator = ReportGenerator::new(Some(backend.clone()));

        for topic in ["a1", "a2", "a3", "a4"] {
            generator.generate_report_with_memory(topic, 1).await;
        }
        generator.generate_report_with_memory("final", 1).await;

        let prompt = backend.last_prompt();
        assert!(!prompt.contains("Generated report on: a1"));
        assert!(!prompt.contains("Generated report on: a2"));
        assert!(prompt.contains("Generated report on: a3"));
        assert!(prompt.contains("Generated report on: a4"));
    }

    #[tokio::test]
    async fn test_history_generation_falls_back_without_backend() {
        let generator = ReportGenerator::fallback_only();
        let text = generator.generate_report_with_memory("Chips", 1).await;
        assert_eq!(text, fallback::enhanced_report("Chips"));
        assert_eq!(generator.memory().conversation_len(), 0);
    }
}
