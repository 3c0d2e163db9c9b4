//! JWT authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::envelope::ApiResponse;
use crate::api::state::AppState;
use crate::domain::user::User;

/// Extractor that requires a valid bearer JWT.
///
/// The token comes from the `Authorization: Bearer <jwt>` header; the
/// subject must resolve to an existing user.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiResponse<()>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating JWT token");

        let claims = state
            .jwt
            .validate(&token)
            .map_err(|e| ApiResponse::unauthorized(e.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|e| ApiResponse::unauthorized(e.to_string()))?;

        let uow = state.uow_factory.create();
        let user = uow
            .users()
            .get_by_id(user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed during authentication");
                ApiResponse::error_with_status("An internal error occurred", vec![], 500)
            })?
            .ok_or_else(|| ApiResponse::unauthorized("User not found"))?;

        Ok(RequireUser(user))
    }
}

/// Extract the bearer token from the Authorization header.
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiResponse<()>> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiResponse::error("Invalid Authorization header encoding", vec![]))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiResponse::unauthorized(
        "Authentication required. Provide a token via 'Authorization: Bearer <token>' header",
    ))
}
