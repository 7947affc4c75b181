//! Signup/signin payload schemas.
//!
//! Constraints are declared with the `validator` derive and evaluated
//! per field, so a bad username and a bad password both show up in the
//! same [`validator::ValidationErrors`] value.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Why a candidate object failed to become a typed payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The candidate was not an object of the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// One or more fields violated their constraints, itemized per field.
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Candidate signup payload. Validated, then discarded by this crate --
/// persistence is the caller's business.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupPayload {
    #[validate(length(min = 5, max = 20))]
    pub username: String,

    #[validate(length(min = 5, max = 50), custom(function = password_complexity))]
    pub password: String,

    /// Length-checked only; no structural email validation is performed so
    /// addresses accepted by existing deployments keep validating.
    #[validate(length(min = 8, max = 40))]
    pub email: Option<String>,
}

/// Candidate signin payload. Same username/password rules as signup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SigninPayload {
    #[validate(length(min = 5, max = 20))]
    pub username: String,

    #[validate(length(min = 5, max = 50), custom(function = password_complexity))]
    pub password: String,
}

impl SignupPayload {
    /// Validate an untyped candidate object into a typed signup payload.
    pub fn parse(candidate: serde_json::Value) -> Result<Self, PayloadError> {
        let payload: Self = serde_json::from_value(candidate)?;
        payload.validate()?;
        Ok(payload)
    }
}

impl SigninPayload {
    /// Validate an untyped candidate object into a typed signin payload.
    pub fn parse(candidate: serde_json::Value) -> Result<Self, PayloadError> {
        let payload: Self = serde_json::from_value(candidate)?;
        payload.validate()?;
        Ok(payload)
    }
}

/// Require one ASCII uppercase letter, one lowercase letter, one digit, and
/// one character that is none of those (symbol, punctuation, or space).
fn password_complexity(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_upper && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_complexity");
        error.message = Some(
            "password must contain an uppercase letter, a lowercase letter, a digit, and a symbol"
                .into(),
        );
        Err(error)
    }
}
