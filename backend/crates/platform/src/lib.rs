//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, Base64, token digests)
//! - Password hashing (Argon2id) and password policy checks
//! - Free-text sanitization for user-supplied fields

pub mod crypto;
pub mod password;
pub mod sanitize;
