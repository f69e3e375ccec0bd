//! Player character as supplied by the caller.
//!
//! The engine never persists characters; each request carries its own copy
//! and the engine only reads the fields it embeds into prompt context.

use serde::{Deserialize, Serialize};

/// A player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    /// Character level, 1 or greater.
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub race: String,
    #[serde(rename = "class", default)]
    pub class_name: String,
    /// Free text; only the first 200 characters are embedded in context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
}

fn default_level() -> u32 {
    1
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            race: String::new(),
            class_name: String::new(),
            backstory: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = race.into();
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = Some(backstory.into());
        self
    }
}
