//! Axum integration for the authkit building blocks.
//!
//! - [`gate`] -- the token-verifying middleware and its 401 rejections.
//! - [`identity`] -- the typed per-request identity attached by the gate.

pub mod gate;
pub mod identity;

pub use gate::{require_identity, GateConfig, GateRejection};
pub use identity::Identity;
