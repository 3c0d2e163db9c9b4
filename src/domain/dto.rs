//! Request and response transfer types
//!
//! Wire shapes for the HTTP layer, all serialized camelCase. Entity-to-DTO
//! transcription lives in the infrastructure mapper.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reference to an existing entity by id, as the frontend sends it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    pub username: String,
    pub email: String,
    /// Historical wire name; the value is the raw password and is hashed
    /// server side before storage.
    pub password_hash: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactRequestDto {
    pub transaction_date: DateTime<Utc>,
    pub user: EntityRef,
    #[serde(default)]
    pub items: Vec<EntityRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub auth_tokens: Vec<AuthTokenResponseDto>,
    pub transactions: Vec<TransactResponseDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponseDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactResponseDto {
    pub id: i32,
    pub transaction_date: DateTime<Utc>,
    pub user_id: i32,
    pub items: Vec<ItemResponseDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponseDto {
    pub id: i32,
    pub emission_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_uses_camel_case() {
        let dto: RegisterRequestDto = serde_json::from_str(
            r#"{
                "username": "alice",
                "email": "alice@example.com",
                "passwordHash": "secret-password",
                "confirmPassword": "secret-password"
            }"#,
        )
        .unwrap();

        assert_eq!(dto.username, "alice");
        assert_eq!(dto.password_hash, "secret-password");
    }

    #[test]
    fn test_transact_request_defaults_items_to_empty() {
        let dto: TransactRequestDto = serde_json::from_str(
            r#"{
                "transactionDate": "2024-06-01T12:00:00Z",
                "user": {"id": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(dto.user.id, 1);
        assert!(dto.items.is_empty());
    }

    #[test]
    fn test_user_response_serializes_camel_case() {
        let dto = UserResponseDto {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            token: None,
            auth_tokens: vec![],
            transactions: vec![],
        };

        let json = serde_json::to_value(&dto).unwrap();

        assert!(json.get("authTokens").is_some());
        assert!(json.get("token").is_none());
    }
}
