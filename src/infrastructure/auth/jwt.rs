//! JWT generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::repository::Entity;
use crate::domain::user::User;
use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user id)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Parsed user id from the subject claim.
    pub fn user_id(&self) -> Result<i32, DomainError> {
        self.sub
            .parse()
            .map_err(|_| DomainError::unauthorized("Invalid token subject"))
    }
}

/// Configuration for JWT signing and validation
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            expiration_minutes,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            issuer: "transact-api".to_string(),
            audience: "transact-frontend".to_string(),
            expiration_minutes: 60,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a signed token for a persisted user.
    fn generate(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a token's signature, issuer, audience and lifetime.
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<String, DomainError> {
        let id = user
            .id()
            .ok_or_else(|| DomainError::internal("Cannot issue a token for an unsaved user"))?;

        let now = Utc::now();
        let claims = JwtClaims {
            sub: id.to_string(),
            username: user.username().to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::from_storage(7, "testuser", "test@example.com", "$argon2id$stub")
    }

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new(
            "test-secret-key-12345",
            "transact-api",
            "transact-frontend",
            60,
        ))
    }

    #[test]
    fn test_generate_and_validate() {
        let service = create_service();
        let user = create_test_user();

        let token = service.generate(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_unsaved_user_cannot_get_token() {
        let service = create_service();
        let user = User::new("ghost", "ghost@example.com", "$argon2id$stub");

        assert!(service.generate(&user).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        assert!(service.validate("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_fails_validation() {
        let service1 = JwtService::new(JwtConfig::new("secret-1", "iss", "aud", 60));
        let service2 = JwtService::new(JwtConfig::new("secret-2", "iss", "aud", 60));

        let token = service1.generate(&create_test_user()).unwrap();

        assert!(service2.validate(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_fails_validation() {
        let issuing = JwtService::new(JwtConfig::new("secret", "other-issuer", "aud", 60));
        let validating = JwtService::new(JwtConfig::new("secret", "transact-api", "aud", 60));

        let token = issuing.generate(&create_test_user()).unwrap();

        assert!(validating.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_fails_validation() {
        let service = create_service();

        let past = Utc::now() - Duration::hours(2);
        let claims = JwtClaims {
            sub: "7".to_string(),
            username: "testuser".to_string(),
            iss: "transact-api".to_string(),
            aud: "transact-frontend".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(60)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }
}
