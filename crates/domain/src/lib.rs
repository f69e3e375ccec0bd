//! DMForge domain types.
//!
//! Pure data: no I/O, no async, no HTTP. The engine builds prompts from these
//! and returns them to callers; nothing here knows about LLM backends.

pub mod entities;
pub mod error;

pub use entities::{
    ChatTurn, Character, Difficulty, Encounter, EncounterMonster, GameSession, Party,
    DEFAULT_SUGGESTIONS, HISTORY_WINDOW, SUGGESTION_COUNT,
};
pub use error::DomainError;
