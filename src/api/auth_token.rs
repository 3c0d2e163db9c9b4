//! Auth token endpoints, bearer auth required

use axum::extract::State;

use super::envelope::ApiResponse;
use super::middleware::RequireUser;
use super::state::AppState;
use crate::domain::dto::AuthTokenResponseDto;

pub async fn list(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
) -> ApiResponse<Vec<AuthTokenResponseDto>> {
    state.auth_token_service.get_all().await
}
