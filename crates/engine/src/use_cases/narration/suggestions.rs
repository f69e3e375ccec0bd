//! Action suggestion synthesis.
//!
//! Suggestions are a non-essential enhancement: any failure at any stage is
//! absorbed and replaced with the fixed default set, never surfaced to the
//! parent chat request. Failures are still logged for operational visibility.

use std::sync::Arc;

use serde_json::Value;

use crate::infrastructure::fallback::{AllBackendsExhausted, FallbackChain};
use crate::use_cases::narration::{prompts, strip_code_fences};
use dmforge_domain::{DEFAULT_SUGGESTIONS, SUGGESTION_COUNT};

/// Produce exactly three short action labels for the player.
pub struct SuggestActions {
    invoker: Arc<FallbackChain>,
}

#[derive(Debug, thiserror::Error)]
enum SynthesisError {
    #[error(transparent)]
    Backend(#[from] AllBackendsExhausted),
    #[error("suggestion output was not a JSON array of strings")]
    Malformed,
}

impl SuggestActions {
    pub fn new(invoker: Arc<FallbackChain>) -> Self {
        Self { invoker }
    }

    /// Never fails: on any synthesis error the fixed defaults are returned.
    pub async fn execute(
        &self,
        player_message: &str,
        dm_response: &str,
        character_class: Option<&str>,
    ) -> Vec<String> {
        match self
            .synthesize(player_message, dm_response, character_class)
            .await
        {
            Ok(labels) => labels,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "suggestion synthesis failed, using default suggestions"
                );
                default_suggestions()
            }
        }
    }

    async fn synthesize(
        &self,
        player_message: &str,
        dm_response: &str,
        character_class: Option<&str>,
    ) -> Result<Vec<String>, SynthesisError> {
        let prompt = prompts::suggestion_prompt(player_message, dm_response, character_class);
        let result = self.invoker.invoke(&prompt).await?;
        let labels = parse_labels(&result.text).ok_or(SynthesisError::Malformed)?;
        Ok(normalize(labels))
    }
}

/// The fixed fallback set as owned strings.
pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Decode suggestion labels from raw model text.
///
/// The expected shape is a JSON array of strings; the `{"suggestions": [...]}`
/// object wrapper some models produce is accepted too.
fn parse_labels(raw: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(strip_code_fences(raw)).ok()?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(object) => object.get("suggestions")?.as_array()?,
        _ => return None,
    };

    let labels: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels)
    }
}

/// Enforce the exact-count invariant: truncate over-long sets, pad short
/// ones from the defaults. An under-count is a degraded-but-valid result,
/// not a failure.
fn normalize(mut labels: Vec<String>) -> Vec<String> {
    labels.truncate(SUGGESTION_COUNT);
    for default in DEFAULT_SUGGESTIONS {
        if labels.len() >= SUGGESTION_COUNT {
            break;
        }
        if !labels.iter().any(|l| l.eq_ignore_ascii_case(default)) {
            labels.push(default.to_string());
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmError, LlmPort, PromptRequest};
    use async_trait::async_trait;

    struct FixedBackend {
        outcome: Result<String, LlmError>,
    }

    #[async_trait]
    impl LlmPort for FixedBackend {
        fn id(&self) -> &str {
            "mock/backend"
        }

        async fn generate(&self, _request: &PromptRequest) -> Result<String, LlmError> {
            self.outcome.clone()
        }
    }

    fn chain_returning(outcome: Result<String, LlmError>) -> Arc<FallbackChain> {
        Arc::new(FallbackChain::new(vec![Arc::new(FixedBackend { outcome })]))
    }

    #[test]
    fn parses_a_plain_json_array() {
        let labels = parse_labels(r#"["Sneak", "Parley", "Charge"]"#).expect("valid array");
        assert_eq!(labels, vec!["Sneak", "Parley", "Charge"]);
    }

    #[test]
    fn parses_the_object_wrapper_shape() {
        let labels = parse_labels(r#"{"suggestions": ["Sneak", "Parley"]}"#).expect("wrapper");
        assert_eq!(labels, vec!["Sneak", "Parley"]);
    }

    #[test]
    fn rejects_non_array_shapes() {
        assert!(parse_labels(r#""just a string""#).is_none());
        assert!(parse_labels(r#"{"actions": ["x"]}"#).is_none());
        assert!(parse_labels("not json").is_none());
        assert!(parse_labels("[]").is_none());
    }

    #[test]
    fn normalize_truncates_to_three() {
        let labels = normalize(vec![
            "One".to_string(),
            "Two".to_string(),
            "Three".to_string(),
            "Four".to_string(),
        ]);
        assert_eq!(labels, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn normalize_pads_short_sets_from_defaults() {
        let labels = normalize(vec!["Sneak".to_string()]);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], "Sneak");
        assert!(labels.contains(&"Investigate".to_string()));
    }

    #[test]
    fn normalize_does_not_duplicate_defaults_when_padding() {
        let labels = normalize(vec!["attack".to_string()]);
        assert_eq!(labels.len(), 3);
        let attacks = labels
            .iter()
            .filter(|l| l.eq_ignore_ascii_case("attack"))
            .count();
        assert_eq!(attacks, 1);
    }

    #[tokio::test]
    async fn backend_exhaustion_is_absorbed_into_defaults() {
        let suggest = SuggestActions::new(chain_returning(Err(LlmError::RequestFailed(
            "down".to_string(),
        ))));
        let labels = suggest.execute("I hide", "You hide", Some("Rogue")).await;
        assert_eq!(labels, default_suggestions());
    }

    #[tokio::test]
    async fn malformed_output_is_absorbed_into_defaults() {
        let suggest = SuggestActions::new(chain_returning(Ok("total nonsense".to_string())));
        let labels = suggest.execute("I hide", "You hide", None).await;
        assert_eq!(labels, default_suggestions());
    }

    #[tokio::test]
    async fn non_array_json_is_absorbed_into_defaults() {
        let suggest = SuggestActions::new(chain_returning(Ok(r#"{"answer": 42}"#.to_string())));
        let labels = suggest.execute("I hide", "You hide", None).await;
        assert_eq!(labels, default_suggestions());
    }

    #[tokio::test]
    async fn successful_synthesis_returns_exactly_three_labels() {
        let suggest = SuggestActions::new(chain_returning(Ok(
            r#"["Sneak", "Parley", "Charge", "Flee"]"#.to_string(),
        )));
        let labels = suggest.execute("I hide", "You hide", Some("Rogue")).await;
        assert_eq!(labels, vec!["Sneak", "Parley", "Charge"]);
    }
}
