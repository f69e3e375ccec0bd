//! Narration use cases: chat with the game master, encounter generation,
//! and action suggestions, all sharing one backend fallback chain.

pub mod chat;
pub mod context;
pub mod encounter;
pub mod prompts;
pub mod suggestions;

use std::sync::Arc;

use crate::infrastructure::fallback::FallbackChain;

pub use chat::{ChatCommand, ChatOutcome, ChatWithDm};
pub use encounter::GenerateEncounter;
pub use suggestions::SuggestActions;

/// All narration use cases wired to one invoker.
pub struct NarrationUseCases {
    pub chat: ChatWithDm,
    pub encounter: GenerateEncounter,
}

impl NarrationUseCases {
    pub fn new(invoker: Arc<FallbackChain>) -> Self {
        Self {
            chat: ChatWithDm::new(Arc::clone(&invoker)),
            encounter: GenerateEncounter::new(invoker),
        }
    }
}

/// Remove a surrounding markdown code fence, if any, before JSON parsing.
/// Models in JSON mode still occasionally wrap their output in ```json fences.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The opening fence line may carry a language tag, e.g. ```json.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    match body.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => body.trim(),
    }
}
