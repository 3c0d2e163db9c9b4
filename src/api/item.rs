//! Item catalog endpoints

use axum::extract::{Path, State};

use super::envelope::ApiResponse;
use super::state::AppState;
use crate::domain::dto::ItemResponseDto;

pub async fn list(State(state): State<AppState>) -> ApiResponse<Vec<ItemResponseDto>> {
    state.item_service.get_all().await
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResponse<ItemResponseDto> {
    state.item_service.get_by_id(id).await
}
