//! Uniform response envelope
//!
//! Every endpoint answers with the same camelCase envelope; the embedded
//! `statusCode` doubles as the HTTP status when the envelope is converted
//! into a response.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub errors: Vec<String>,
    pub validation_errors: BTreeMap<String, Vec<String>>,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    pub trace_id: Uuid,
}

impl<T> ApiResponse<T> {
    fn base(success: bool, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success,
            message: message.into(),
            data: None,
            errors: Vec::new(),
            validation_errors: BTreeMap::new(),
            status_code,
            timestamp: Utc::now(),
            trace_id: Uuid::new_v4(),
        }
    }

    /// 200 with payload.
    pub fn success_response(data: T, message: impl Into<String>) -> Self {
        let mut response = Self::base(true, message, 200);
        response.data = Some(data);
        response
    }

    /// 201 with payload.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        let mut response = Self::base(true, message, 201);
        response.data = Some(data);
        response
    }

    /// Failure with a default status of 400.
    pub fn error(message: impl Into<String>, errors: Vec<String>) -> Self {
        let mut response = Self::base(false, message, 400);
        response.errors = errors;
        response
    }

    /// Failure with an explicit status code.
    pub fn error_with_status(
        message: impl Into<String>,
        errors: Vec<String>,
        status_code: u16,
    ) -> Self {
        let mut response = Self::base(false, message, status_code);
        response.errors = errors;
        response
    }

    /// 422 with per-field messages.
    pub fn validation_error(
        message: impl Into<String>,
        validation_errors: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut response = Self::base(false, message, 422);
        response.validation_errors = validation_errors;
        response
    }

    /// 404 naming the missing resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::base(false, format!("{} not found", resource.into()), 404)
    }

    /// 401.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::base(false, message, 401)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let response = ApiResponse::success_response(vec![1, 2], "ok");

        assert!(response.success);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.data, Some(vec![1, 2]));
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created(true, "registered");
        assert_eq!(response.status_code, 201);
    }

    #[test]
    fn test_error_defaults_to_400() {
        let response: ApiResponse<()> = ApiResponse::error("bad", vec!["reason".into()]);

        assert!(!response.success);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.errors, vec!["reason".to_string()]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let response: ApiResponse<()> = ApiResponse::not_found("User");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["statusCode"], 404);
        assert!(json.get("validationErrors").is_some());
        assert!(json.get("traceId").is_some());
        assert_eq!(json["message"], "User not found");
    }

    #[test]
    fn test_unauthorized_status() {
        let response: ApiResponse<()> = ApiResponse::unauthorized("Invalid credentials");
        assert_eq!(response.status_code, 401);
    }
}
