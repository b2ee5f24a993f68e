//! Reflective feedback on decrypted entries.
//!
//! Feedback is best-effort: a provider failure turns into an inline message
//! rather than an error, and only [`JournalEntry`] values (already
//! decrypted) can be submitted, so ciphertext never leaves the process.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{InkwellError, Result};
use crate::journal::JournalEntry;

/// System prompt sent with every feedback request.
pub const SYSTEM_PROMPT: &str = "You are a helpful therapist providing brief feedback on journal entries. Keep your response to 300 characters or less.";

/// Prefix placed before the entry content in the user message.
pub const USER_PROMPT_PREFIX: &str =
    "Please provide brief therapeutic feedback on this journal entry: ";

/// A text-completion service that comments on entry content.
pub trait FeedbackProvider {
    /// Return a short natural-language response to `content`.
    fn feedback(&self, content: &str) -> Result<String>;
}

/// Build the user message for an entry's content.
pub fn user_prompt(content: &str) -> String {
    format!("{}{}", USER_PROMPT_PREFIX, content)
}

/// Ask `provider` about `entry`, folding any failure into the returned text.
pub fn request_feedback<P: FeedbackProvider + ?Sized>(provider: &P, entry: &JournalEntry) -> String {
    match provider.feedback(&entry.content) {
        Ok(text) => text.trim().to_string(),
        Err(err) => {
            tracing::warn!(id = %entry.id, error = %err, "feedback request failed");
            failure_text(&err)
        }
    }
}

fn failure_text(err: &InkwellError) -> String {
    match err {
        InkwellError::Feedback(reason) => format!("Error getting feedback: {}", reason),
        other => format!("Error getting feedback: {}", other),
    }
}

/// Memoized feedback keyed by entry id and a BLAKE3 hash of its content.
///
/// Editing an entry changes the hash, so stale feedback is never served.
/// Failures are not cached.
#[derive(Debug, Default)]
pub struct FeedbackCache {
    responses: HashMap<(Uuid, blake3::Hash), String>,
}

impl FeedbackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached feedback for `entry`, asking `provider` on a miss.
    pub fn get_or_request<P: FeedbackProvider + ?Sized>(
        &mut self,
        provider: &P,
        entry: &JournalEntry,
    ) -> String {
        let key = (entry.id, blake3::hash(entry.content.as_bytes()));
        if let Some(cached) = self.responses.get(&key) {
            return cached.clone();
        }

        match provider.feedback(&entry.content) {
            Ok(text) => {
                let text = text.trim().to_string();
                self.responses.insert(key, text.clone());
                text
            }
            Err(err) => {
                tracing::warn!(id = %entry.id, error = %err, "feedback request failed");
                failure_text(&err)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
