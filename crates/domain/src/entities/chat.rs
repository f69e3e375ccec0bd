//! Conversation turns between the player and the DM.

use serde::{Deserialize, Serialize};

/// Only the most recent turns within this window are read per request.
/// Older turns stay in the caller's history but are invisible to the model,
/// which bounds prompt size.
pub const HISTORY_WINDOW: usize = 5;

/// One turn in the conversation, tagged by speaker.
///
/// Insertion order is chronological order; the engine never reorders turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatTurn {
    Player { content: String },
    Dm { content: String },
}

impl ChatTurn {
    pub fn player(content: impl Into<String>) -> Self {
        Self::Player {
            content: content.into(),
        }
    }

    pub fn dm(content: impl Into<String>) -> Self {
        Self::Dm {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Player { content } | Self::Dm { content } => content,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_are_tagged_by_speaker() {
        let turn: ChatTurn = serde_json::from_str(r#"{"type": "player", "content": "I attack"}"#)
            .expect("valid turn JSON");
        assert_eq!(turn, ChatTurn::player("I attack"));

        let json = serde_json::to_string(&ChatTurn::dm("Roll initiative"))
            .expect("turn serializes");
        assert!(json.contains(r#""type":"dm""#));
    }
}
