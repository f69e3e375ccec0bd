//! Configurable LLM prompt templates used by the engine.
//!
//! Each template is a constant per deployment: a hard-coded default that can
//! be overridden through an environment variable derived from its key.

/// All prompt template keys as constants.
pub mod keys {
    /// The DM persona used for every chat response.
    pub const DM_PERSONA: &str = "narration.dm_persona";
    /// System prompt for encounter generation.
    pub const ENCOUNTER_SYSTEM: &str = "narration.encounter_system";
    /// System prompt for action suggestion synthesis.
    pub const SUGGESTION_SYSTEM: &str = "narration.suggestion_system";
}

/// Default values for all prompt templates.
pub mod defaults {
    /// Versioned DM persona. Chat responses run under this instruction set.
    pub const DM_PERSONA: &str = "You are an expert Dungeon Master for D&D 5th Edition. \
You are creative, engaging, and follow the rules of D&D 5E. Your role is to:

1. Create immersive storytelling experiences
2. Respond to player actions with appropriate consequences
3. Guide the narrative while allowing player agency
4. Provide clear descriptions of scenes, NPCs, and encounters
5. Handle combat, skill checks, and other game mechanics
6. Suggest actions when players seem stuck
7. Maintain game balance and ensure everyone has fun

Always respond in character as a DM. Be descriptive but concise. Ask for dice \
rolls when appropriate. Provide multiple options for player actions when helpful.

When generating responses, consider:
- The character's background, class, and personality
- The current game session context
- Previous conversation history
- D&D 5E rules and mechanics

Format your responses in a natural, engaging way that moves the story forward.";

    pub const ENCOUNTER_SYSTEM: &str =
        "You are a D&D 5E encounter designer. Always respond with valid JSON.";

    pub const SUGGESTION_SYSTEM: &str =
        "Generate brief D&D action suggestions. Respond only with JSON.";
}

/// Look up the hard-coded default for a template key.
pub fn get_default(key: &str) -> Option<&'static str> {
    match key {
        keys::DM_PERSONA => Some(defaults::DM_PERSONA),
        keys::ENCOUNTER_SYSTEM => Some(defaults::ENCOUNTER_SYSTEM),
        keys::SUGGESTION_SYSTEM => Some(defaults::SUGGESTION_SYSTEM),
        _ => None,
    }
}

/// Environment variable name for overriding a template key.
///
/// `narration.dm_persona` -> `DMFORGE_PROMPT_NARRATION_DM_PERSONA`.
pub fn key_to_env_var(key: &str) -> String {
    let suffix: String = key
        .chars()
        .map(|c| match c {
            '.' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect();
    format!("DMFORGE_PROMPT_{suffix}")
}

/// Resolve a template: environment override first, then the default.
///
/// Unknown keys resolve to an empty string; callers always pass `keys::`
/// constants so that path is unreachable in practice.
pub fn resolve(key: &str) -> String {
    if let Ok(value) = std::env::var(key_to_env_var(key)) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    get_default(key).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_a_default() {
        for key in [keys::DM_PERSONA, keys::ENCOUNTER_SYSTEM, keys::SUGGESTION_SYSTEM] {
            assert!(get_default(key).is_some(), "missing default for {key}");
        }
    }

    #[test]
    fn env_var_names_are_derived_from_keys() {
        assert_eq!(
            key_to_env_var(keys::DM_PERSONA),
            "DMFORGE_PROMPT_NARRATION_DM_PERSONA"
        );
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(resolve(keys::ENCOUNTER_SYSTEM), defaults::ENCOUNTER_SYSTEM);
    }
}
