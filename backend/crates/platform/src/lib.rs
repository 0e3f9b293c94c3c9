//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Opaque signed token issuance (access/refresh pairs)
//! - Mail delivery abstraction

pub mod crypto;
pub mod mailer;
pub mod token;
