//! Prompt assembly per call type.
//!
//! Pure transforms from game state into `PromptRequest`s; no I/O happens
//! here. Generation parameters are fixed per call purpose, never global.

use crate::infrastructure::ports::{GenerationConfig, PromptRequest};
use crate::prompt_templates::{keys, resolve};
use dmforge_domain::{ChatTurn, Party};

/// Free-text chat response: roomy output, mildly creative.
const CHAT_CONFIG: (u32, f32) = (800, 0.8);

/// Strict-JSON encounter: shorter output, more adventurous sampling.
const ENCOUNTER_CONFIG: (u32, f32) = (600, 0.9);

/// Strict-JSON suggestions: tiny output, steadier sampling.
const SUGGESTION_CONFIG: (u32, f32) = (100, 0.7);

/// Assemble the prompt for a chat response.
pub fn chat_prompt(
    message: &str,
    context_summary: String,
    history_window: &[ChatTurn],
) -> PromptRequest {
    let (max_output_tokens, temperature) = CHAT_CONFIG;
    PromptRequest {
        system_instructions: resolve(keys::DM_PERSONA),
        context_summary,
        history_window: history_window.to_vec(),
        user_message: message.to_string(),
        config: GenerationConfig::text(max_output_tokens, temperature),
    }
}

/// Assemble the prompt for encounter generation. Templated: no context, no
/// history; party parameters and the expected schema are embedded directly.
pub fn encounter_prompt(party: Party) -> PromptRequest {
    let user_message = format!(
        "Generate a random D&D 5E encounter for a party of {} characters at level {}.\n\n\
         Provide a JSON response with:\n\
         - description: A vivid description of the encounter scenario\n\
         - monsters: List of monsters with their names and challenge ratings\n\
         - difficulty: \"easy\", \"medium\", \"hard\", or \"deadly\"\n\
         - setting: Where this encounter takes place\n\
         - tactics: How the monsters might behave in combat\n\n\
         Make it engaging and appropriate for the party's level.",
        party.size(),
        party.level()
    );

    let (max_output_tokens, temperature) = ENCOUNTER_CONFIG;
    PromptRequest {
        system_instructions: resolve(keys::ENCOUNTER_SYSTEM),
        context_summary: String::new(),
        history_window: Vec::new(),
        user_message,
        config: GenerationConfig::json(max_output_tokens, temperature),
    }
}

/// Assemble the prompt for suggestion synthesis. Embeds the player's message,
/// the DM's reply, and the character's class.
pub fn suggestion_prompt(
    player_message: &str,
    dm_response: &str,
    character_class: Option<&str>,
) -> PromptRequest {
    let class_name = character_class.filter(|c| !c.is_empty()).unwrap_or("Unknown");
    let user_message = format!(
        "Based on this D&D scenario:\n\
         Player said: \"{player_message}\"\n\
         DM responded: \"{dm_response}\"\n\
         Character class: {class_name}\n\n\
         Suggest 3 brief action options the player could take next. Each should be \
         1-2 words maximum.\n\
         Respond with a JSON array of exactly 3 strings: [\"action1\", \"action2\", \"action3\"]"
    );

    let (max_output_tokens, temperature) = SUGGESTION_CONFIG;
    PromptRequest {
        system_instructions: resolve(keys::SUGGESTION_SYSTEM),
        context_summary: String::new(),
        history_window: Vec::new(),
        user_message,
        config: GenerationConfig::json(max_output_tokens, temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::ResponseFormat;
    use crate::use_cases::narration::context::history_window;

    #[test]
    fn chat_prompts_are_free_text_with_chat_parameters() {
        let prompt = chat_prompt("I listen at the door", "ctx".to_string(), &[]);
        assert_eq!(prompt.config.response_format, ResponseFormat::Text);
        assert_eq!(prompt.config.max_output_tokens, 800);
        assert!((prompt.config.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(prompt.user_message, "I listen at the door");
        assert_eq!(prompt.context_summary, "ctx");
    }

    #[test]
    fn chat_prompt_contains_exactly_the_last_five_turns_in_order() {
        let history: Vec<ChatTurn> = (0..9)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::player(format!("player says {i}"))
                } else {
                    ChatTurn::dm(format!("dm says {i}"))
                }
            })
            .collect();

        let prompt = chat_prompt("next", "ctx".to_string(), history_window(&history));
        assert_eq!(prompt.history_window.len(), 5);
        assert_eq!(prompt.history_window[0].content(), "player says 4");
        assert_eq!(prompt.history_window[4].content(), "player says 8");
        // Nothing from before the window leaks into the request.
        let rendered = prompt
            .messages()
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(!rendered.contains("player says 2"));
        assert!(!rendered.contains("dm says 3"));
    }

    #[test]
    fn encounter_prompts_embed_party_and_schema() {
        let party = Party::new(7, 4).expect("valid party");
        let prompt = encounter_prompt(party);
        assert_eq!(prompt.config.response_format, ResponseFormat::Json);
        assert_eq!(prompt.config.max_output_tokens, 600);
        assert!((prompt.config.temperature - 0.9).abs() < f32::EPSILON);
        assert!(prompt.user_message.contains("party of 4 characters at level 7"));
        for field in ["description", "monsters", "difficulty", "setting", "tactics"] {
            assert!(prompt.user_message.contains(field), "schema names {field}");
        }
        assert!(prompt.history_window.is_empty());
    }

    #[test]
    fn suggestion_prompts_embed_exchange_and_class() {
        let prompt = suggestion_prompt("I hide", "You slip behind a barrel", Some("Rogue"));
        assert_eq!(prompt.config.response_format, ResponseFormat::Json);
        assert_eq!(prompt.config.max_output_tokens, 100);
        assert!((prompt.config.temperature - 0.7).abs() < f32::EPSILON);
        assert!(prompt.user_message.contains("\"I hide\""));
        assert!(prompt.user_message.contains("You slip behind a barrel"));
        assert!(prompt.user_message.contains("Character class: Rogue"));
    }

    #[test]
    fn suggestion_prompts_default_missing_class_to_unknown() {
        let prompt = suggestion_prompt("I hide", "Darkness", None);
        assert!(prompt.user_message.contains("Character class: Unknown"));
        let prompt = suggestion_prompt("I hide", "Darkness", Some(""));
        assert!(prompt.user_message.contains("Character class: Unknown"));
    }
}
