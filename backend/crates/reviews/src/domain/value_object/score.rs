//! Score Value Object
//!
//! Review score, an integer from 1 to 10 inclusive.

use std::fmt;
use thiserror::Error;

pub const SCORE_MIN: i16 = 1;
pub const SCORE_MAX: i16 = 10;

/// Score validation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Score must be between {SCORE_MIN} and {SCORE_MAX}, got {0}")]
    OutOfRange(i16),
}

/// Validated review score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(i16);

impl Score {
    pub fn new(value: i16) -> Result<Self, ScoreError> {
        if (SCORE_MIN..=SCORE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreError::OutOfRange(value))
        }
    }

    /// Reconstruct from a trusted store without re-validation
    pub fn from_db(value: i16) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
