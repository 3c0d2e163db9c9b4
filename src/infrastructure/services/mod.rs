//! Application services: validation, unit-of-work orchestration, DTO
//! mapping, envelope construction

mod auth_token_service;
mod item_service;
mod transact_service;
mod user_service;

pub use auth_token_service::AuthTokenService;
pub use item_service::ItemService;
pub use transact_service::TransactService;
pub use user_service::UserService;

use crate::api::envelope::ApiResponse;
use crate::domain::error::DomainError;

/// Translate a domain failure into an envelope. Unexpected failures are
/// logged in full and answered with a generic message.
pub(crate) fn failure_envelope<T>(err: DomainError) -> ApiResponse<T> {
    match &err {
        DomainError::NotFound { message } => {
            ApiResponse::error_with_status(message.clone(), vec![], 404)
        }
        DomainError::Validation { message } => {
            ApiResponse::error(message.clone(), vec![])
        }
        DomainError::Conflict { message } => {
            ApiResponse::error(message.clone(), vec![])
        }
        DomainError::Unauthorized { message } => ApiResponse::unauthorized(message.clone()),
        DomainError::Unsupported { message } => {
            ApiResponse::error_with_status(message.clone(), vec![], 501)
        }
        DomainError::Storage { .. }
        | DomainError::Configuration { .. }
        | DomainError::Internal { .. } => {
            tracing::error!(error = %err, "Request failed");
            ApiResponse::error_with_status("An internal error occurred", vec![], 500)
        }
    }
}
