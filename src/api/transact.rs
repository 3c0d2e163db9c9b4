//! Transaction endpoints, bearer auth required

use axum::extract::State;

use super::envelope::ApiResponse;
use super::extract::Json;
use super::middleware::RequireUser;
use super::state::AppState;
use crate::domain::dto::{TransactRequestDto, TransactResponseDto};

pub async fn list(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
) -> ApiResponse<Vec<TransactResponseDto>> {
    state.transact_service.get_all().await
}

pub async fn create(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Json(request): Json<TransactRequestDto>,
) -> ApiResponse<bool> {
    state.transact_service.create(request).await
}
