//! Encounter generation and structured-output repair.

use std::sync::Arc;

use serde_json::Value;

use crate::infrastructure::fallback::{AllBackendsExhausted, FallbackChain};
use crate::use_cases::narration::{prompts, strip_code_fences};
use dmforge_domain::entities::encounter::defaults;
use dmforge_domain::{Difficulty, Encounter, EncounterMonster, Party};

/// Generate a random encounter sized for one party.
pub struct GenerateEncounter {
    invoker: Arc<FallbackChain>,
}

impl GenerateEncounter {
    pub fn new(invoker: Arc<FallbackChain>) -> Self {
        Self { invoker }
    }

    /// The only surfaced failure is total backend exhaustion; malformed model
    /// output degrades through [`repair_encounter`] instead.
    pub async fn execute(&self, party: Party) -> Result<Encounter, AllBackendsExhausted> {
        let prompt = prompts::encounter_prompt(party);
        let result = self.invoker.invoke(&prompt).await?;
        tracing::debug!(provider = %result.provider, "encounter text generated");
        Ok(repair_encounter(&result.text))
    }
}

/// Turn raw model text into a fully-populated encounter.
///
/// Two-level defaulting: if the text does not decode as a JSON object, the
/// raw text verbatim becomes the description and every other field takes its
/// named default. If it decodes but fields are missing, each missing field is
/// defaulted independently. This never fails.
pub fn repair_encounter(raw: &str) -> Encounter {
    let parsed: Option<Value> = serde_json::from_str(strip_code_fences(raw)).ok();
    let Some(object) = parsed.as_ref().and_then(Value::as_object) else {
        tracing::warn!("encounter output was not a JSON object, returning degraded encounter");
        return Encounter::degraded(raw);
    };

    Encounter {
        description: string_field(object.get("description"))
            .unwrap_or_else(|| defaults::DESCRIPTION.to_string()),
        monsters: object
            .get("monsters")
            .and_then(Value::as_array)
            .map(|monsters| monsters.iter().filter_map(monster_from_value).collect())
            .unwrap_or_default(),
        difficulty: string_field(object.get("difficulty"))
            .map(|raw| Difficulty::parse(&raw))
            .unwrap_or_default(),
        setting: string_field(object.get("setting"))
            .unwrap_or_else(|| defaults::SETTING.to_string()),
        tactics: string_field(object.get("tactics"))
            .unwrap_or_else(|| defaults::TACTICS.to_string()),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn monster_from_value(value: &Value) -> Option<EncounterMonster> {
    match value {
        // Bare name, e.g. ["Goblin", "Orc"]
        Value::String(name) => Some(EncounterMonster {
            name: name.clone(),
            challenge_rating: String::new(),
        }),
        Value::Object(object) => {
            let name = object
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(defaults::MONSTER_NAME)
                .to_string();
            let challenge_rating = object
                .get("challenge_rating")
                .or_else(|| object.get("challengeRating"))
                .or_else(|| object.get("cr"))
                .map(|cr| match cr {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            Some(EncounterMonster {
                name,
                challenge_rating,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_yields_raw_text_as_description_and_defaults() {
        let raw = "The goblins ambush you from the ridge!";
        let encounter = repair_encounter(raw);
        assert_eq!(encounter.description, raw);
        assert!(encounter.monsters.is_empty());
        assert_eq!(encounter.difficulty, Difficulty::Medium);
        assert_eq!(encounter.setting, defaults::SETTING);
        assert_eq!(encounter.tactics, defaults::TACTICS);
    }

    #[test]
    fn json_array_is_degraded_like_malformed_text() {
        let raw = r#"["not", "an", "object"]"#;
        let encounter = repair_encounter(raw);
        assert_eq!(encounter.description, raw);
    }

    #[test]
    fn missing_fields_default_independently() {
        let encounter = repair_encounter(r#"{"description": "A lone troll blocks the bridge"}"#);
        assert_eq!(encounter.description, "A lone troll blocks the bridge");
        assert_eq!(encounter.difficulty, Difficulty::Medium);
        assert_eq!(encounter.setting, defaults::SETTING);
        assert_eq!(encounter.tactics, defaults::TACTICS);
        assert!(encounter.monsters.is_empty());
    }

    #[test]
    fn complete_output_passes_through_untouched() {
        let raw = r#"{
            "description": "Wolves circle the camp",
            "monsters": [{"name": "Wolf", "challenge_rating": "1/4"}],
            "difficulty": "hard",
            "setting": "Snowy forest",
            "tactics": "Pack flanking"
        }"#;
        let encounter = repair_encounter(raw);
        assert_eq!(encounter.description, "Wolves circle the camp");
        assert_eq!(encounter.monsters.len(), 1);
        assert_eq!(encounter.monsters[0].name, "Wolf");
        assert_eq!(encounter.monsters[0].challenge_rating, "1/4");
        assert_eq!(encounter.difficulty, Difficulty::Hard);
        assert_eq!(encounter.setting, "Snowy forest");
        assert_eq!(encounter.tactics, "Pack flanking");
    }

    #[test]
    fn unrecognized_difficulty_passes_through() {
        let encounter =
            repair_encounter(r#"{"description": "x", "difficulty": "catastrophic"}"#);
        assert_eq!(
            encounter.difficulty,
            Difficulty::Other("catastrophic".to_string())
        );
    }

    #[test]
    fn numeric_challenge_ratings_become_text() {
        let encounter = repair_encounter(
            r#"{"description": "x", "monsters": [{"name": "Ogre", "challenge_rating": 2}]}"#,
        );
        assert_eq!(encounter.monsters[0].challenge_rating, "2");
    }

    #[test]
    fn bare_monster_names_are_accepted() {
        let encounter =
            repair_encounter(r#"{"description": "x", "monsters": ["Goblin", "Orc"]}"#);
        let names: Vec<&str> = encounter.monsters.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin", "Orc"]);
    }

    #[test]
    fn fenced_json_is_unwrapped_before_parsing() {
        let raw = "```json\n{\"description\": \"Bandits on the road\"}\n```";
        let encounter = repair_encounter(raw);
        assert_eq!(encounter.description, "Bandits on the road");
    }
}
