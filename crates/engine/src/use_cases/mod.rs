//! Application use cases, grouped by concern.

pub mod narration;

use std::sync::Arc;

use crate::infrastructure::fallback::FallbackChain;
use narration::NarrationUseCases;

/// Every use case the API layer can reach.
pub struct UseCases {
    pub narration: NarrationUseCases,
}

impl UseCases {
    pub fn new(invoker: Arc<FallbackChain>) -> Self {
        Self {
            narration: NarrationUseCases::new(invoker),
        }
    }
}
