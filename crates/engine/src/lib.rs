//! DMForge Engine - server-side orchestration for an AI game master.
//!
//! The engine assembles prompts from caller-supplied game state, invokes a
//! generative backend through a priority-ordered fallback chain, and shapes
//! the raw model text into complete domain entities. It holds no persistent
//! state; every request is a self-contained unit of work.

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod prompt_templates;
pub mod use_cases;
