//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開識別子（ハンドル）**。
//! 登録、ログイン、`/users/{username}` ルーティングに使用される。
//!
//! ## 設計方針
//! - ASCII文字のみ許可（a-z, A-Z, 0-9, _ . - +）
//! - 大文字入力は受け付けるが、canonical（正規形）は小文字
//! - NFKC正規化 → 検証 → 小文字化 の順で処理
//! - `me` は自己プロフィールエンドポイント用に予約済み
//!
//! ## 不変条件
//! - 長さ: 1〜150文字（正規化後）
//! - 空白を含まない
//! - 予約名（`me`）ではない

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 150;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Names reserved for routing. `me` resolves to the requester's own
/// profile, so no account may claim it.
const RESERVED_NAMES: &[&str] = &["me"];

/// User name validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be at most {USER_NAME_MAX_LENGTH} characters")]
    TooLong,

    #[error("User name contains forbidden character '{0}'")]
    ForbiddenChar(char),

    #[error("User name '{0}' is reserved")]
    Reserved(String),
}

/// Validated user name
///
/// Keeps the original casing for display and a lowercased canonical
/// form for uniqueness checks and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Create a user name: NFKC-normalize, validate, then canonicalize
    pub fn new(input: impl Into<String>) -> Result<Self, UserNameError> {
        let normalized: String = input.into().trim().nfkc().collect();

        if normalized.is_empty() {
            return Err(UserNameError::Empty);
        }
        if normalized.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong);
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !ALLOWED_SPECIAL_CHARS.contains(c))
        {
            return Err(UserNameError::ForbiddenChar(bad));
        }

        let canonical = normalized.to_lowercase();
        if RESERVED_NAMES.contains(&canonical.as_str()) {
            return Err(UserNameError::Reserved(canonical));
        }

        Ok(Self {
            original: normalized,
            canonical,
        })
    }

    /// Rebuild from database values (assumed already validated)
    pub fn from_db(original: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            canonical: canonical.into(),
        }
    }

    /// Display form, as the user typed it
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercased canonical form used for uniqueness and lookups
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
