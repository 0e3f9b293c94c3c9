//! Slug Value Object
//!
//! URL-safe identifier for categories and genres. Lowercase ASCII
//! letters, digits, `_` and `-`, at most 50 characters.

use std::fmt;
use thiserror::Error;

/// Maximum slug length
pub const SLUG_MAX_LENGTH: usize = 50;

/// Slug validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("Slug cannot be empty")]
    Empty,

    #[error("Slug cannot exceed {SLUG_MAX_LENGTH} characters")]
    TooLong,

    #[error("Slug contains forbidden character: '{0}'")]
    ForbiddenChar(char),
}

/// Validated slug
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if value.chars().count() > SLUG_MAX_LENGTH {
            return Err(SlugError::TooLong);
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
        {
            return Err(SlugError::ForbiddenChar(c));
        }

        Ok(Self(value))
    }

    /// Reconstruct from a trusted store without re-validation
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
