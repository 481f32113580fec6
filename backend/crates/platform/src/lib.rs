//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations that carry no domain meaning:
//! - Password hashing and verification (Argon2id, zeroized plaintext)

pub mod password;
