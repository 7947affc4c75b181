//! HS256 identity-token issuance and verification.
//!
//! Tokens bind a subject identifier as the `_id` claim (wire compatibility
//! with existing token consumers) plus the standard `iat` and, when the
//! caller opts in, `exp` claims. The secret is explicit configuration
//! passed on every call; there is no ambient or module-level secret.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in every identity token.
///
/// Ephemeral: exists only inside a single issuance or verification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the identifier the token proves possession of.
    #[serde(rename = "_id")]
    pub subject: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp). Absent on non-expiring tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds. `None` issues non-expiring tokens, which
    /// matches historical behavior; production deployments should opt in.
    pub expiry_secs: Option<i64>,
}

impl TokenConfig {
    /// Non-expiring tokens signed with `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiry_secs: None,
        }
    }

    /// Tokens that expire `expiry_secs` seconds after issuance.
    #[must_use]
    pub fn with_expiry(mut self, expiry_secs: i64) -> Self {
        self.expiry_secs = Some(expiry_secs);
        self
    }

    /// Load token configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default        |
    /// |--------------------------|----------|----------------|
    /// | `AUTH_TOKEN_SECRET`      | **yes**  | --             |
    /// | `AUTH_TOKEN_EXPIRY_SECS` | no       | non-expiring   |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_TOKEN_SECRET` is unset or empty, or if
    /// `AUTH_TOKEN_EXPIRY_SECS` is set but not a valid `i64`.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_TOKEN_SECRET")
            .expect("AUTH_TOKEN_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_TOKEN_SECRET must not be empty");

        let expiry_secs = std::env::var("AUTH_TOKEN_EXPIRY_SECS").ok().map(|raw| {
            raw.parse()
                .expect("AUTH_TOKEN_EXPIRY_SECS must be a valid i64")
        });

        Self {
            secret,
            expiry_secs,
        }
    }
}

/// Opaque signed encoding of a subject identifier, handed to the client at
/// signin and presented back on later requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityToken {
    pub token: String,
}

/// Token-layer failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing primitive failed while issuing a token.
    #[error("token signing failed")]
    Issuance(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed token, or expired token. The underlying
    /// cause is kept as `source` for internal logging only; callers should
    /// not surface it past their own boundary.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issue an HS256 token binding `subject_id` as the `_id` claim.
///
/// The token carries an `exp` claim only when the config sets
/// [`TokenConfig::expiry_secs`].
pub fn issue_token(subject_id: &str, config: &TokenConfig) -> Result<IdentityToken, TokenError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        subject: subject_id.to_string(),
        iat: now,
        exp: config.expiry_secs.map(|secs| now + secs),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(TokenError::Issuance)?;

    Ok(IdentityToken { token })
}

/// Verify a token against the same secret used to sign it, returning the
/// embedded [`Claims`].
///
/// `exp` is checked when the token carries it; tokens without it are
/// accepted so non-expiring deployments keep working. Every failure mode
/// collapses into [`TokenError::Invalid`].
pub fn verify_token(token: &str, config: &TokenConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims::<&str>(&[]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(TokenError::Invalid)?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Helper to build a test config with a known secret.
    fn test_config() -> TokenConfig {
        TokenConfig::new("test-secret-that-is-long-enough-for-hmac")
    }

    #[test]
    fn test_issue_and_verify_recovers_subject() {
        let config = test_config();
        let issued = issue_token("user-42", &config).expect("issuance should succeed");

        let claims = verify_token(&issued.token, &config).expect("verification should succeed");
        assert_eq!(claims.subject, "user-42");
        assert!(claims.iat > 0);
        assert!(claims.exp.is_none(), "default config issues no expiry");
    }

    #[test]
    fn test_wrong_secret_fails() {
        let issued =
            issue_token("user-1", &TokenConfig::new("secret-alpha")).expect("issuance should succeed");

        let result = verify_token(&issued.token, &TokenConfig::new("secret-bravo"));
        assert_matches!(result, Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_tampered_token_fails() {
        let config = test_config();
        let issued = issue_token("user-1", &config).expect("issuance should succeed");

        let mut tampered = issued.token.clone();
        tampered.push('x');
        let result = verify_token(&tampered, &config);
        assert_matches!(result, Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_configured_expiry_is_embedded_and_enforced() {
        let config = test_config().with_expiry(3600);
        let issued = issue_token("user-1", &config).expect("issuance should succeed");

        let claims = verify_token(&issued.token, &config).expect("fresh token should verify");
        let exp = claims.exp.expect("expiring config must embed exp");
        assert!(exp > claims.iat);

        // An already-expired token must fail, well past the default
        // 60-second leeway.
        let expired = issue_token("user-1", &test_config().with_expiry(-300))
            .expect("issuance should succeed");
        let result = verify_token(&expired.token, &config);
        assert_matches!(result, Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_non_expiring_token_passes_an_expiry_enforcing_verifier() {
        // A token without an exp claim stays valid even when the verifying
        // config opts in to expiry; exp is enforced only when present.
        let issued = issue_token("user-1", &test_config()).expect("issuance should succeed");

        let claims = verify_token(&issued.token, &test_config().with_expiry(3600))
            .expect("non-expiring token should verify");
        assert_eq!(claims.subject, "user-1");
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_malformed_token_fails() {
        let result = verify_token("not.a.jwt", &test_config());
        assert_matches!(result, Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_subject_serializes_as_underscore_id() {
        let claims = Claims {
            subject: "abc".to_string(),
            iat: 0,
            exp: None,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["_id"], "abc");
        assert!(
            value.get("exp").is_none(),
            "absent expiry must not serialize as null"
        );
    }
}
