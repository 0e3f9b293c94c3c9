//! Confirmation Codes
//!
//! Single-purpose codes proving control of the registered email.
//! A code is `"<ts-base36>-<mac>"` where the MAC is HMAC-SHA256 over
//! `user_id | created_at | is_active | ts`. Because `is_active` is part
//! of the MAC input, redeeming a code (which flips the flag) makes every
//! code issued before activation fail deterministically - no stored
//! nonce or consumed-flag is needed. The embedded timestamp additionally
//! bounds code lifetime to a configurable TTL.

use std::time::Duration;

use chrono::Utc;
use platform::crypto::{constant_time_eq, hmac_sha256, to_base64url};

use crate::domain::entity::User;

/// Truncated MAC length in bytes (96 bits, base64url-encoded)
const MAC_LEN: usize = 12;

/// Confirmation-code generator/verifier
#[derive(Clone)]
pub struct ConfirmationCodes {
    secret: [u8; 32],
    ttl: Duration,
}

impl ConfirmationCodes {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Derive a fresh code bound to the user's current identity state
    pub fn make_code(&self, user: &User) -> String {
        self.make_code_at(user, Utc::now().timestamp())
    }

    fn make_code_at(&self, user: &User, ts: i64) -> String {
        let mac = self.state_mac(user, ts);
        format!("{}-{}", to_base36(ts), to_base64url(&mac[..MAC_LEN]))
    }

    /// Check a code against the user's current state and the TTL
    pub fn check_code(&self, user: &User, code: &str) -> bool {
        self.check_code_at(user, code, Utc::now().timestamp())
    }

    fn check_code_at(&self, user: &User, code: &str, now: i64) -> bool {
        let Some((ts_part, _)) = code.split_once('-') else {
            return false;
        };
        let Some(ts) = from_base36(ts_part) else {
            return false;
        };

        if ts > now || now - ts > self.ttl.as_secs() as i64 {
            return false;
        }

        let expected = self.make_code_at(user, ts);
        constant_time_eq(expected.as_bytes(), code.as_bytes())
    }

    /// MAC over the mutable identity state; changes when `is_active` flips
    fn state_mac(&self, user: &User, ts: i64) -> [u8; 32] {
        let payload = format!(
            "{}|{}|{}|{}",
            user.user_id,
            user.created_at.timestamp_millis(),
            user.is_active,
            ts
        );
        hmac_sha256(&self.secret, payload.as_bytes())
    }
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 13 {
        return None;
    }
    let mut value: i64 = 0;
    for c in s.chars() {
        let digit = c.to_digit(36)?;
        value = value.checked_mul(36)?.checked_add(digit as i64)?;
    }
    Some(value)
}
