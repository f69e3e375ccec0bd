//! Google Gemini LLM client (generateContent API).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, PromptRequest, ResponseFormat};
use dmforge_domain::ChatTurn;

/// Default Gemini base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default primary model for Gemini.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Client for the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    id: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        // LLM requests can be slow; allow 120 seconds at the transport level.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            id: format!("gemini/{model}"),
        }
    }

    fn build_request(request: &PromptRequest) -> GeminiRequest {
        // Gemini has no system role inside `contents`; system instructions
        // and context travel in `system_instruction`.
        let mut system_text = request.system_instructions.clone();
        if !request.context_summary.is_empty() {
            system_text.push_str("\n\nContext: ");
            system_text.push_str(&request.context_summary);
        }

        let mut contents: Vec<GeminiContent> = request
            .history_window
            .iter()
            .map(|turn| match turn {
                ChatTurn::Player { content } => GeminiContent::user(content),
                ChatTurn::Dm { content } => GeminiContent::model(content),
            })
            .collect();
        contents.push(GeminiContent::user(&request.user_message));

        GeminiRequest {
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart { text: system_text }],
            },
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: request.config.temperature,
                top_p: request.config.top_p,
                top_k: request.config.top_k,
                max_output_tokens: request.config.max_output_tokens,
                response_mime_type: match request.config.response_format {
                    ResponseFormat::Json => Some("application/json".to_string()),
                    ResponseFormat::Text => None,
                },
            },
        }
    }
}

#[async_trait]
impl LlmPort for GeminiClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, request: &PromptRequest) -> Result<String, LlmError> {
        let api_request = Self::build_request(request);

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!("{status}: {error_text}")));
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = api_response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text)
    }
}

// =============================================================================
// Gemini API types
// =============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    system_instruction: GeminiSystemInstruction,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }

    fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::GenerationConfig;

    #[test]
    fn json_prompts_request_json_mime_type() {
        let prompt = PromptRequest {
            system_instructions: "designer".to_string(),
            context_summary: String::new(),
            history_window: Vec::new(),
            user_message: "generate".to_string(),
            config: GenerationConfig::json(600, 0.9),
        };

        let request = GeminiClient::build_request(&prompt);
        assert_eq!(
            request.generation_config.response_mime_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(request.generation_config.max_output_tokens, 600);
    }

    #[test]
    fn history_maps_to_user_and_model_roles() {
        let prompt = PromptRequest {
            system_instructions: "dm".to_string(),
            context_summary: "Session: Test".to_string(),
            history_window: vec![ChatTurn::player("hi"), ChatTurn::dm("hail")],
            user_message: "onward".to_string(),
            config: GenerationConfig::text(800, 0.8),
        };

        let request = GeminiClient::build_request(&prompt);
        let roles: Vec<&str> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert!(request.system_instruction.parts[0]
            .text
            .contains("Context: Session: Test"));
    }
}
