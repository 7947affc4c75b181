//! Token-verifying middleware for axum routers.
//!
//! The gate runs once per request: it pulls a token from the
//! `Authorization: Bearer` header or, failing that, the `token` cookie,
//! verifies it against the deployment secret, and attaches the caller's
//! [`Identity`] to the request before handing off to the inner service.
//! Every verification failure maps to the same opaque 401 so a client
//! cannot tell a forged token from an expired one; the variants are
//! distinguished only in internal logs.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use authkit_core::token::{verify_token, TokenConfig};

use crate::identity::Identity;

/// Per-deployment configuration captured when the gate is installed.
///
/// Cheaply cloneable; passed to [`axum::middleware::from_fn_with_state`].
#[derive(Debug, Clone)]
pub struct GateConfig {
    token: TokenConfig,
}

impl GateConfig {
    pub fn new(token: TokenConfig) -> Self {
        Self { token }
    }

    /// The token configuration the gate verifies against.
    pub fn token(&self) -> &TokenConfig {
        &self.token
    }
}

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    /// Neither the `Authorization` header nor the `token` cookie carried a
    /// non-empty token.
    #[error("no token provided")]
    MissingToken,
    /// The token failed verification, or verified to an empty subject.
    #[error("invalid token")]
    InvalidToken,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let message = match self {
            GateRejection::MissingToken => "No Token Provided",
            GateRejection::InvalidToken => "Invalid Token",
        };
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "message": message })),
        )
            .into_response()
    }
}

/// Verify the request's token and attach [`Identity`] for downstream
/// handlers.
///
/// Install with [`axum::middleware::from_fn_with_state`]:
///
/// ```ignore
/// let config = GateConfig::new(TokenConfig::new(secret));
/// let app = Router::new()
///     .route("/me", get(me))
///     .layer(middleware::from_fn_with_state(config, require_identity));
/// ```
///
/// A single verification attempt per request; failures are terminal and the
/// caller must re-authenticate.
pub async fn require_identity(
    State(config): State<GateConfig>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, GateRejection> {
    // Header first; the cookie is consulted only when no Bearer header is
    // present at all. A present-but-empty Bearer value does not fall back.
    let token = bearer_token(&request)
        .map(str::to_owned)
        .or_else(|| jar.get("token").map(|c| c.value().to_owned()));

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => {
            tracing::debug!("request carried no bearer token or token cookie");
            return Err(GateRejection::MissingToken);
        }
    };

    let claims = verify_token(&token, config.token()).map_err(|err| {
        tracing::debug!(error = ?err, "token failed verification");
        GateRejection::InvalidToken
    })?;

    // A verified token with an empty subject proves nothing; treat it the
    // same as a forged one instead of silently continuing.
    if claims.subject.is_empty() {
        tracing::warn!("verified token carried an empty subject claim");
        return Err(GateRejection::InvalidToken);
    }

    request.extensions_mut().insert(Identity {
        user_id: claims.subject,
    });

    Ok(next.run(request).await)
}

/// The token portion of an `Authorization: Bearer <token>` header, if any.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}
