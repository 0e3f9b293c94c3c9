//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::token::TokenService;

use crate::domain::confirmation::ConfirmationCodes;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for confirmation-code MACs (32 bytes)
    pub code_secret: [u8; 32],
    /// Secret for access/refresh token signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Confirmation-code lifetime (24 hours)
    pub code_ttl: Duration,
    /// Access token lifetime (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token lifetime (1 week)
    pub refresh_ttl: Duration,
    /// Sender address for confirmation mail
    pub mail_from: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            code_secret: [0u8; 32],
            token_secret: [0u8; 32],
            code_ttl: Duration::from_secs(24 * 3600),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            mail_from: "noreply@localhost".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development)
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;
        let mut code_secret = [0u8; 32];
        let mut token_secret = [0u8; 32];
        rand::rng().fill_bytes(&mut code_secret);
        rand::rng().fill_bytes(&mut token_secret);
        Self {
            code_secret,
            token_secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secrets()
    }

    /// Confirmation-code service for this configuration
    pub fn codes(&self) -> ConfirmationCodes {
        ConfirmationCodes::new(self.code_secret, self.code_ttl)
    }

    /// Token service for this configuration
    pub fn tokens(&self) -> TokenService {
        TokenService::new(self.token_secret, self.access_ttl, self.refresh_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secrets_differ() {
        let config = AuthConfig::with_random_secrets();
        assert_ne!(config.code_secret, config.token_secret);
        assert_ne!(config.code_secret, [0u8; 32]);
    }

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::default();
        assert!(config.access_ttl < config.refresh_ttl);
        assert_eq!(config.code_ttl, Duration::from_secs(24 * 3600));
    }
}
