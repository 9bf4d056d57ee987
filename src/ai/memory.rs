//! In-process memory used to bias later generations.
//!
//! Two logs live here:
//! - a per-user interest log (user id -> append-only text), fed by
//!   context-augmented generation;
//! - one conversation log shared by every user, fed by history-based
//!   generation.
//!
//! Neither is persisted or pruned; both are lost on restart.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Ai,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::Human => write!(f, "human"),
            TurnRole::Ai => write!(f, "ai"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl fmt::Display for ConversationTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.content)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    user_interests: Mutex<HashMap<i64, String>>,
    conversation: Mutex<Vec<ConversationTurn>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's interest log, if anything has been recorded for them.
    pub fn user_memory(&self, user_id: i64) -> Option<String> {
        self.user_interests
            .lock()
            .get(&user_id)
            .map(|log| log.trim().to_string())
            .filter(|log| !log.is_empty())
    }

    /// Append `Interested in: {topic}` to the user's log, creating it if absent.
    pub fn record_interest(&self, user_id: i64, topic: &str) {
        let mut interests = self.user_interests.lock();
        let log = interests.entry(user_id).or_default();
        log.push_str("\nInterested in: ");
        log.push_str(topic);
    }

    /// Append one human/ai exchange to the shared conversation log.
    pub fn record_exchange(&self, input: &str, output: &str) {
        let mut conversation = self.conversation.lock();
        conversation.push(ConversationTurn {
            role: TurnRole::Human,
            content: input.to_string(),
        });
        conversation.push(ConversationTurn {
            role: TurnRole::Ai,
            content: output.to_string(),
        });
    }

    /// The last `limit` turns of the shared log, oldest first.
    pub fn recent_turns(&self, limit: usize) -> Vec<ConversationTurn> {
        let conversation = self.conversation.lock();
        let start = conversation.len().saturating_sub(limit);
        conversation[start..].to_vec()
    }

    /// Recent turns rendered one per line as `role: content`.
    pub fn recent_history_text(&self, limit: usize) -> Option<String> {
        let turns = self.recent_turns(limit);
        if turns.is_empty() {
            return None;
        }
        Some(
            turns
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn tracked_users(&self) -> usize {
        self.user_interests.lock().len()
    }

    pub fn conversation_len(&self) -> usize {
        self.conversation.lock().len()
    }
}
