//! Game entities consumed and produced by the narrator engine.

pub mod chat;
pub mod character;
pub mod encounter;
pub mod party;
pub mod session;

pub use chat::{ChatTurn, HISTORY_WINDOW};
pub use character::Character;
pub use encounter::{Difficulty, Encounter, EncounterMonster};
pub use party::Party;
pub use session::GameSession;

/// Fixed fallback action labels used whenever suggestion synthesis fails.
pub const DEFAULT_SUGGESTIONS: [&str; 3] = ["Investigate", "Attack", "Negotiate"];

/// Suggestion sets always contain exactly this many labels.
pub const SUGGESTION_COUNT: usize = 3;
