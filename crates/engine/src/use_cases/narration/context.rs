//! Context assembly from character and session state.
//!
//! Pure, total functions: no I/O, no failure modes. Absent entities and
//! fields are skipped rather than rendered as placeholders.

use dmforge_domain::{ChatTurn, Character, GameSession, HISTORY_WINDOW};

/// Context emitted when neither a character nor a session is supplied, so the
/// prompt assembler never sees an empty context field.
pub const FALLBACK_CONTEXT: &str = "New adventure beginning";

/// Backstory is cut to its first this-many characters in context.
pub const BACKSTORY_EXCERPT_CHARS: usize = 200;

/// Session notes are cut to their last this-many characters in context.
pub const NOTES_EXCERPT_CHARS: usize = 300;

const SEPARATOR: &str = " | ";

/// Build the single-string context summary embedded in every chat prompt.
///
/// Fields render in a fixed order: character summary, backstory excerpt,
/// session name, current scene, notes excerpt.
pub fn build_context(character: Option<&Character>, session: Option<&GameSession>) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(character) = character {
        parts.push(
            format!(
                "Character: {} - Level {} {} {}",
                character.name, character.level, character.race, character.class_name
            )
            .trim_end()
            .to_string(),
        );
        if let Some(backstory) = character.backstory.as_deref().filter(|b| !b.is_empty()) {
            parts.push(format!(
                "Background: {}...",
                head_chars(backstory, BACKSTORY_EXCERPT_CHARS)
            ));
        }
    }

    if let Some(session) = session {
        if let Some(name) = session.name.as_deref().filter(|n| !n.is_empty()) {
            parts.push(format!("Session: {name}"));
        }
        if let Some(scene) = session.current_scene.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Current Scene: {scene}"));
        }
        if let Some(notes) = session.notes.as_deref().filter(|n| !n.is_empty()) {
            parts.push(format!(
                "Notes: {}...",
                tail_chars(notes, NOTES_EXCERPT_CHARS)
            ));
        }
    }

    if parts.is_empty() {
        FALLBACK_CONTEXT.to_string()
    } else {
        parts.join(SEPARATOR)
    }
}

/// Select the most recent turns, preserving original order. Turns beyond the
/// window are silently excluded; this is a deliberate lossy policy, not an
/// error.
pub fn history_window(history: &[ChatTurn]) -> &[ChatTurn] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}

fn head_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn tail_chars(text: &str, limit: usize) -> &str {
    let total = text.chars().count();
    if total <= limit {
        return text;
    }
    match text.char_indices().nth(total - limit) {
        Some((byte_index, _)) => &text[byte_index..],
        None => text,
    }
}
