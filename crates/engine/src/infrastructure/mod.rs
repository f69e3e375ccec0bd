//! Infrastructure - external system adapters.

pub mod fallback;
pub mod gemini;
pub mod openai;
pub mod ports;
pub mod srd;
