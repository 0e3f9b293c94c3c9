//! Opaque Signed Tokens
//!
//! Issues access/refresh token pairs bound to a subject (user) identity.
//! A token is `base64url(payload) . base64url(hmac)` where the payload
//! carries the subject, the token kind, and the expiry. Verification
//! recomputes the MAC over the payload and checks kind and expiry.
//!
//! Tokens are stateless: there is no server-side session row. Revocation
//! is by expiry only, so the access TTL is kept short.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::crypto::{constant_time_eq, from_base64url, hmac_sha256, to_base64url};
use thiserror::Error;

/// Token verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token does not have the `payload.signature` shape
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the payload
    #[error("Invalid token signature")]
    BadSignature,

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Access token presented where refresh expected (or vice versa)
    #[error("Wrong token kind")]
    WrongKind,
}

/// Kind of token in a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, authenticates API requests
    Access,
    /// Longer-lived, exchanged for new access tokens
    Refresh,
}

impl TokenKind {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "access" => Some(Self::Access),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An access/refresh token pair for one subject
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Stateless token issuer/verifier
#[derive(Clone)]
pub struct TokenService {
    secret: [u8; 32],
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: [u8; 32], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a fresh access/refresh pair for `subject`
    pub fn issue_pair(&self, subject: &str) -> TokenPair {
        let now_ms = now_unix_ms();
        TokenPair {
            access: self.issue(subject, TokenKind::Access, now_ms),
            refresh: self.issue(subject, TokenKind::Refresh, now_ms),
        }
    }

    /// Issue a single token of the given kind
    pub fn issue(&self, subject: &str, kind: TokenKind, now_ms: i64) -> String {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires_at_ms = now_ms + ttl.as_millis() as i64;
        let payload = format!("{}:{}:{}", subject, kind.code(), expires_at_ms);
        let mac = hmac_sha256(&self.secret, payload.as_bytes());
        format!("{}.{}", to_base64url(payload.as_bytes()), to_base64url(&mac))
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<String, TokenError> {
        self.verify_at(token, expected, now_unix_ms())
    }

    /// Verify against an explicit clock (tests)
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now_ms: i64,
    ) -> Result<String, TokenError> {
        let (payload_b64, mac_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;

        let payload = from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
        let mac = from_base64url(mac_b64).map_err(|_| TokenError::Malformed)?;

        let expected_mac = hmac_sha256(&self.secret, &payload);
        if !constant_time_eq(&expected_mac, &mac) {
            return Err(TokenError::BadSignature);
        }

        let payload = String::from_utf8(payload).map_err(|_| TokenError::Malformed)?;
        let mut parts = payload.rsplitn(3, ':');
        let expires_at_ms: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(TokenError::Malformed)?;
        let kind = parts
            .next()
            .and_then(TokenKind::from_code)
            .ok_or(TokenError::Malformed)?;
        let subject = parts.next().ok_or(TokenError::Malformed)?;

        if kind != expected {
            return Err(TokenError::WrongKind);
        }
        if now_ms >= expires_at_ms {
            return Err(TokenError::Expired);
        }

        Ok(subject.to_string())
    }
}

fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            [7u8; 32],
            Duration::from_secs(15 * 60),
            Duration::from_secs(7 * 24 * 3600),
        )
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let svc = service();
        let pair = svc.issue_pair("5f0c3a");

        assert_eq!(svc.verify(&pair.access, TokenKind::Access).unwrap(), "5f0c3a");
        assert_eq!(svc.verify(&pair.refresh, TokenKind::Refresh).unwrap(), "5f0c3a");
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let svc = service();
        let pair = svc.issue_pair("subject");

        assert_eq!(
            svc.verify(&pair.access, TokenKind::Refresh),
            Err(TokenError::WrongKind)
        );
        assert_eq!(
            svc.verify(&pair.refresh, TokenKind::Access),
            Err(TokenError::WrongKind)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = service();
        let token = svc.issue("subject", TokenKind::Access, 0);
        let far_future = 10 * 365 * 24 * 3600 * 1000i64;

        assert_eq!(
            svc.verify_at(&token, TokenKind::Access, far_future),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let pair = svc.issue_pair("subject");

        // Flip the payload, keep the signature
        let (_, sig) = pair.access.split_once('.').unwrap();
        let forged = format!("{}.{}", crate::crypto::to_base64url(b"other:access:9999999999999"), sig);

        assert_eq!(
            svc.verify(&forged, TokenKind::Access),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let svc = service();
        let other = TokenService::new(
            [8u8; 32],
            Duration::from_secs(900),
            Duration::from_secs(3600),
        );
        let pair = svc.issue_pair("subject");

        assert_eq!(
            other.verify(&pair.access, TokenKind::Access),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_malformed_token_rejected() {
        let svc = service();
        assert_eq!(
            svc.verify("not-a-token", TokenKind::Access),
            Err(TokenError::Malformed)
        );
        assert_eq!(
            svc.verify("a.b.c!!", TokenKind::Access),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_subject_with_colons_survives() {
        // rsplitn keeps any ':' inside the subject intact
        let svc = service();
        let token = svc.issue("a:b:c", TokenKind::Access, now_unix_ms());
        assert_eq!(svc.verify(&token, TokenKind::Access).unwrap(), "a:b:c");
    }
}
