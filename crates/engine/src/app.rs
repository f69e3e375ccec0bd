//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::fallback::FallbackChain;
use crate::infrastructure::srd::SrdClient;
use crate::use_cases::UseCases;

/// Main application state.
///
/// Holds the use cases and shared infrastructure clients.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub llm: Arc<FallbackChain>,
    pub srd: Arc<SrdClient>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(llm: Arc<FallbackChain>, srd: Arc<SrdClient>) -> Self {
        Self {
            use_cases: UseCases::new(Arc::clone(&llm)),
            llm,
            srd,
        }
    }
}
