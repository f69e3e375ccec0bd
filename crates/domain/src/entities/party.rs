//! Party parameters for encounter generation.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A party descriptor: level and size are both 1 or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    level: u32,
    size: u32,
}

impl Party {
    pub fn new(level: u32, size: u32) -> Result<Self, DomainError> {
        if level < 1 {
            return Err(DomainError::validation("party level must be at least 1"));
        }
        if size < 1 {
            return Err(DomainError::validation("party size must be at least 1"));
        }
        Ok(Self { level, size })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_level_and_size() {
        assert!(Party::new(0, 4).is_err());
        assert!(Party::new(3, 0).is_err());
        let party = Party::new(3, 4).expect("valid party");
        assert_eq!(party.level(), 3);
        assert_eq!(party.size(), 4);
    }
}
