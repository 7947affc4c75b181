//! Typed per-request identity attached by the auth gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// The verified identity of the caller for the lifetime of one request.
///
/// Inserted into the request extensions by
/// [`require_identity`](crate::gate::require_identity) and read by
/// downstream handlers as an extractor:
///
/// ```ignore
/// async fn me(identity: Identity) -> Json<Profile> {
///     tracing::info!(user_id = %identity.user_id, "handling request");
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    /// Subject id recovered from the token's `_id` claim.
    pub user_id: String,
}

/// Rejection for [`Identity`] on a route the gate never ran on.
///
/// That is a router wiring mistake, not an authentication failure, so it
/// maps to 500 rather than 401.
#[derive(Debug, Clone, Copy)]
pub struct IdentityUnavailable;

impl IntoResponse for IdentityUnavailable {
    fn into_response(self) -> Response {
        tracing::error!("Identity extractor used on a route without the auth gate");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(serde_json::json!({ "message": "identity not available" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = IdentityUnavailable;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(IdentityUnavailable)
    }
}
