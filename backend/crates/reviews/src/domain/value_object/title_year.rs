//! Title Year Value Object
//!
//! Release year of a title. Accepts `-5500 <= year < current_year`:
//! old enough for ancient works, and never in the future.

use std::fmt;
use thiserror::Error;

/// Oldest accepted year
pub const TITLE_YEAR_MIN: i32 = -5500;

/// Year validation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleYearError {
    #[error("Year {0} is out of the accepted range")]
    OutOfRange(i32),
}

/// Validated release year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TitleYear(i32);

impl TitleYear {
    /// Validate against the caller-supplied current year, so the upper
    /// bound follows the clock instead of a baked-in constant.
    pub fn new(value: i32, current_year: i32) -> Result<Self, TitleYearError> {
        if (TITLE_YEAR_MIN..current_year).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TitleYearError::OutOfRange(value))
        }
    }

    /// Reconstruct from a trusted store without re-validation
    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TitleYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
