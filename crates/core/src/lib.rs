//! Framework-free building blocks for username/password authentication.
//!
//! - [`validation`] -- signup/signin payload schemas and constraint checks.
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`token`] -- HS256 identity-token issuance and verification.
//!
//! The pieces are independent and stateless; the calling application wires
//! them together. None of them retain or log the payloads they are given.

pub mod password;
pub mod token;
pub mod validation;
