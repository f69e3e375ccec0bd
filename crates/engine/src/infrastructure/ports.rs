//! Port traits for infrastructure boundaries.
//!
//! The only abstraction in the engine is the LLM backend port: everything
//! else is concrete types. Ports exist so the fallback chain can treat
//! heterogeneous providers (Gemini, OpenAI-compatible) as one capability.

use async_trait::async_trait;

use dmforge_domain::ChatTurn;

// =============================================================================
// Error Types
// =============================================================================

/// Failure of a single backend variant. Recovered locally by the fallback
/// chain and never surfaced to callers on its own.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Transport-level failure: connection, HTTP status, timeout.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    /// The backend answered but carried no usable text content.
    #[error("LLM returned an empty payload")]
    EmptyResponse,
    /// The backend answered with a body we could not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Prompt Types
// =============================================================================

/// How the model is asked to shape its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-running narrative text.
    Text,
    /// A single strict-JSON value.
    Json,
}

/// Generation parameters attached to each prompt.
///
/// These vary by call purpose (chat vs. encounter vs. suggestion), never by
/// global state.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub response_format: ResponseFormat,
}

impl GenerationConfig {
    pub fn text(max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            max_output_tokens,
            temperature,
            top_p: None,
            top_k: None,
            response_format: ResponseFormat::Text,
        }
    }

    pub fn json(max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            response_format: ResponseFormat::Json,
            ..Self::text(max_output_tokens, temperature)
        }
    }
}

/// An assembled, provider-agnostic prompt.
///
/// Built fresh per call and never mutated after construction; the call that
/// created it is its sole owner.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub system_instructions: String,
    pub context_summary: String,
    /// Bounded slice of recent turns, newest last.
    pub history_window: Vec<ChatTurn>,
    pub user_message: String,
    pub config: GenerationConfig,
}

impl PromptRequest {
    /// Flatten into a role-tagged message list for chat-completion style
    /// backends. Backends with a different call shape (Gemini) map the
    /// request fields themselves.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(&self.system_instructions)];
        if !self.context_summary.is_empty() {
            messages.push(ChatMessage::system(format!(
                "Context: {}",
                self.context_summary
            )));
        }
        for turn in &self.history_window {
            messages.push(match turn {
                ChatTurn::Player { content } => ChatMessage::user(content),
                ChatTurn::Dm { content } => ChatMessage::assistant(content),
            });
        }
        messages.push(ChatMessage::user(&self.user_message));
        messages
    }
}

/// A message in the conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Output of a successful invocation. Provenance is kept so fallback
/// behavior stays observable.
#[derive(Debug, Clone)]
pub struct ModelResult {
    pub text: String,
    pub provider: String,
}

// =============================================================================
// Backend Port
// =============================================================================

/// One concrete generative-text backend variant.
#[async_trait]
pub trait LlmPort: Send + Sync {
    /// Stable identifier for this variant, e.g. `gemini/gemini-1.5-flash`.
    fn id(&self) -> &str;

    async fn generate(&self, request: &PromptRequest) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_history_order_between_context_and_user_message() {
        let request = PromptRequest {
            system_instructions: "You are a DM".to_string(),
            context_summary: "Session: Test".to_string(),
            history_window: vec![ChatTurn::player("hello"), ChatTurn::dm("well met")],
            user_message: "I open the door".to_string(),
            config: GenerationConfig::text(800, 0.8),
        };

        let messages = request.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].content, "Context: Session: Test");
        assert_eq!(messages[2].role, MessageRole::User);
        assert_eq!(messages[3].role, MessageRole::Assistant);
        assert_eq!(messages[4].content, "I open the door");
    }

    #[test]
    fn empty_context_is_not_rendered() {
        let request = PromptRequest {
            system_instructions: "designer".to_string(),
            context_summary: String::new(),
            history_window: Vec::new(),
            user_message: "generate".to_string(),
            config: GenerationConfig::json(600, 0.9),
        };

        let messages = request.messages();
        assert_eq!(messages.len(), 2);
        assert!(!messages.iter().any(|m| m.content.starts_with("Context:")));
    }
}
