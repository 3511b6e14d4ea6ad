//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256 digests, URL-safe Base64, random bytes)
//! - Password hashing (Argon2id with tunable cost and optional pepper)
//! - Cookie management (build, clear and read `Set-Cookie`/`Cookie` headers)

pub mod cookie;
pub mod crypto;
pub mod password;
