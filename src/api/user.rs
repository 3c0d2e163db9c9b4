//! User endpoints

use axum::extract::{Path, State};

use super::envelope::ApiResponse;
use super::extract::Json;
use super::state::AppState;
use crate::domain::dto::{LoginRequestDto, RegisterRequestDto, UserResponseDto};

pub async fn list(State(state): State<AppState>) -> ApiResponse<Vec<UserResponseDto>> {
    state.user_service.get_all().await
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResponse<UserResponseDto> {
    state.user_service.get_by_id(id).await
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequestDto>,
) -> ApiResponse<bool> {
    state.user_service.register(request).await
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequestDto>,
) -> ApiResponse<UserResponseDto> {
    state.user_service.login(request).await
}
