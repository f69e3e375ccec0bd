//! The main chat exchange with the game master.

use std::sync::Arc;

use crate::infrastructure::fallback::{AllBackendsExhausted, FallbackChain};
use crate::use_cases::narration::context::{build_context, history_window};
use crate::use_cases::narration::prompts;
use crate::use_cases::narration::suggestions::SuggestActions;
use dmforge_domain::{Character, ChatTurn, GameSession};

/// One player message plus whatever game state the caller has.
///
/// Character, session, and history are all optional context; a bare message
/// is a valid command.
#[derive(Debug, Clone, Default)]
pub struct ChatCommand {
    pub message: String,
    pub character: Option<Character>,
    pub session: Option<GameSession>,
    pub history: Vec<ChatTurn>,
}

/// The narrated reply plus exactly three follow-up suggestions.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub message: String,
    pub suggestions: Vec<String>,
    pub provider: String,
}

pub struct ChatWithDm {
    invoker: Arc<FallbackChain>,
    suggestions: SuggestActions,
}

impl ChatWithDm {
    pub fn new(invoker: Arc<FallbackChain>) -> Self {
        let suggestions = SuggestActions::new(Arc::clone(&invoker));
        Self {
            invoker,
            suggestions,
        }
    }

    /// Narrate a reply to the player, then synthesize suggestions from it.
    ///
    /// Suggestion synthesis depends on the narrated text, so the two model
    /// calls are strictly sequential. The only surfaced failure is total
    /// backend exhaustion on the narration call itself.
    pub async fn execute(&self, command: ChatCommand) -> Result<ChatOutcome, AllBackendsExhausted> {
        let context = build_context(command.character.as_ref(), command.session.as_ref());
        let window = history_window(&command.history);
        let prompt = prompts::chat_prompt(&command.message, context, window);

        let result = self.invoker.invoke(&prompt).await?;
        tracing::debug!(provider = %result.provider, "chat response generated");

        let class_name = command
            .character
            .as_ref()
            .map(|character| character.class_name.as_str());
        let suggestions = self
            .suggestions
            .execute(&command.message, &result.text, class_name)
            .await;

        Ok(ChatOutcome {
            message: result.text,
            suggestions,
            provider: result.provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmError, LlmPort, PromptRequest};
    use async_trait::async_trait;
    use dmforge_domain::DEFAULT_SUGGESTIONS;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Answers the first call with narration and later calls with the given
    /// suggestion payload.
    struct ScriptedBackend {
        narration: String,
        suggestion_payload: Result<String, LlmError>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LlmPort for ScriptedBackend {
        fn id(&self) -> &str {
            "mock/scripted"
        }

        async fn generate(&self, _request: &PromptRequest) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                Ok(self.narration.clone())
            } else {
                self.suggestion_payload.clone()
            }
        }
    }

    fn chat_with(backend: ScriptedBackend) -> ChatWithDm {
        ChatWithDm::new(Arc::new(FallbackChain::new(vec![Arc::new(backend)])))
    }

    #[tokio::test]
    async fn narration_and_suggestions_both_flow_into_the_outcome() {
        let chat = chat_with(ScriptedBackend {
            narration: "The door creaks open.".to_string(),
            suggestion_payload: Ok(r#"["Enter", "Listen", "Retreat"]"#.to_string()),
            calls: AtomicU32::new(0),
        });

        let outcome = chat
            .execute(ChatCommand {
                message: "I open the door".to_string(),
                ..Default::default()
            })
            .await
            .expect("chat succeeds");

        assert_eq!(outcome.message, "The door creaks open.");
        assert_eq!(outcome.suggestions, vec!["Enter", "Listen", "Retreat"]);
        assert_eq!(outcome.provider, "mock/scripted");
    }

    #[tokio::test]
    async fn suggestion_failure_does_not_fail_the_chat() {
        let chat = chat_with(ScriptedBackend {
            narration: "The door creaks open.".to_string(),
            suggestion_payload: Err(LlmError::RequestFailed("down".to_string())),
            calls: AtomicU32::new(0),
        });

        let outcome = chat
            .execute(ChatCommand {
                message: "I open the door".to_string(),
                ..Default::default()
            })
            .await
            .expect("chat still succeeds");

        assert_eq!(outcome.message, "The door creaks open.");
        assert_eq!(outcome.suggestions, DEFAULT_SUGGESTIONS.map(String::from).to_vec());
    }

    #[tokio::test]
    async fn narration_failure_surfaces_backend_exhaustion() {
        struct DeadBackend;

        #[async_trait]
        impl LlmPort for DeadBackend {
            fn id(&self) -> &str {
                "mock/dead"
            }

            async fn generate(&self, _request: &PromptRequest) -> Result<String, LlmError> {
                Err(LlmError::RequestFailed("unreachable host".to_string()))
            }
        }

        let chat = ChatWithDm::new(Arc::new(FallbackChain::new(vec![Arc::new(DeadBackend)])));
        let error = chat
            .execute(ChatCommand {
                message: "hello".to_string(),
                ..Default::default()
            })
            .await
            .expect_err("all backends down");
        assert_eq!(error.attempted_backends(), vec!["mock/dead"]);
    }
}
