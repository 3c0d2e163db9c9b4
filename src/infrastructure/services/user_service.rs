//! User registration, login and lookup

use std::collections::BTreeMap;
use std::sync::Arc;

use super::failure_envelope;
use crate::api::envelope::ApiResponse;
use crate::domain::dto::{
    LoginRequestDto, RegisterRequestDto, TransactResponseDto, UserResponseDto,
};
use crate::domain::repository::Entity;
use crate::domain::uow::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::user::{validate_email, validate_password, validate_username, User};
use crate::domain::DomainError;
use crate::infrastructure::auth::{JwtGenerator, PasswordHasher};
use crate::infrastructure::mapping::DtoMapper;

pub struct UserService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    mapper: Arc<DtoMapper>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: Arc<dyn JwtGenerator>,
}

impl UserService {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        mapper: Arc<DtoMapper>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            uow_factory,
            mapper,
            hasher,
            jwt,
        }
    }

    /// Full user projection: auth tokens and transactions included.
    async fn user_dto(
        &self,
        uow: &dyn UnitOfWork,
        user: &User,
        token: Option<String>,
    ) -> Result<UserResponseDto, DomainError> {
        let id = user
            .id()
            .ok_or_else(|| DomainError::internal("Cannot map an unsaved user"))?;

        let auth_tokens = uow.auth_tokens().list_by_user(id).await?;
        let transacts = uow.transacts().list_by_user(id).await?;
        let items = uow.items().get_all().await?;

        let transactions = transacts
            .iter()
            .map(|t| self.mapper.transact_to_response(t, &items))
            .collect::<Result<Vec<TransactResponseDto>, _>>()?;

        self.mapper
            .user_to_response(user, token, &auth_tokens, transactions)
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<UserResponseDto>> {
        let uow = self.uow_factory.create();

        let result: Result<Vec<UserResponseDto>, DomainError> = async {
            let users = uow.users().get_all().await?;
            let mut dtos = Vec::with_capacity(users.len());
            for user in &users {
                dtos.push(self.user_dto(uow.as_ref(), user, None).await?);
            }
            Ok(dtos)
        }
        .await;

        match result {
            Ok(dtos) => ApiResponse::success_response(dtos, "Users retrieved"),
            Err(err) => failure_envelope(err),
        }
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResponse<UserResponseDto> {
        if id <= 0 {
            return ApiResponse::error("User id must be positive", vec![]);
        }

        let uow = self.uow_factory.create();
        match uow.users().get_by_id(id).await {
            Ok(Some(user)) => match self.user_dto(uow.as_ref(), &user, None).await {
                Ok(dto) => ApiResponse::success_response(dto, "User retrieved"),
                Err(err) => failure_envelope(err),
            },
            Ok(None) => ApiResponse::not_found("User"),
            Err(err) => failure_envelope(err),
        }
    }

    /// Field validation, the awaited duplicate-email check, Argon2 hashing,
    /// then a staged insert.
    pub async fn register(&self, request: RegisterRequestDto) -> ApiResponse<bool> {
        let mut validation_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        if let Err(e) = validate_username(&request.username) {
            validation_errors
                .entry("username".into())
                .or_default()
                .push(e.to_string());
        }
        if let Err(e) = validate_email(&request.email) {
            validation_errors
                .entry("email".into())
                .or_default()
                .push(e.to_string());
        }
        if let Err(e) = validate_password(&request.password_hash) {
            validation_errors
                .entry("passwordHash".into())
                .or_default()
                .push(e.to_string());
        }
        if request.password_hash != request.confirm_password {
            validation_errors
                .entry("confirmPassword".into())
                .or_default()
                .push("Passwords do not match".to_string());
        }

        if !validation_errors.is_empty() {
            return ApiResponse::validation_error("Validation failed", validation_errors);
        }

        let uow = self.uow_factory.create();

        match uow.users().email_exists(&request.email).await {
            Ok(true) => return ApiResponse::error("Email is already registered", vec![]),
            Ok(false) => {}
            Err(err) => return failure_envelope(err),
        }

        let password_hash = match self.hasher.hash(&request.password_hash) {
            Ok(hash) => hash,
            Err(err) => return failure_envelope(err),
        };

        let user = User::new(request.username, request.email, password_hash);
        if let Err(err) = uow.users().add(user).await {
            return failure_envelope(err);
        }

        match uow.save_changes().await {
            Ok(_) => ApiResponse::created(true, "User registered"),
            Err(err) => failure_envelope(err),
        }
    }

    /// Credential check and token issuance. Unknown email and wrong
    /// password answer identically.
    pub async fn login(&self, request: LoginRequestDto) -> ApiResponse<UserResponseDto> {
        let uow = self.uow_factory.create();

        let user = match uow.users().get_by_email(&request.email).await {
            Ok(Some(user)) => user,
            Ok(None) => return ApiResponse::unauthorized("Invalid credentials"),
            Err(err) => return failure_envelope(err),
        };

        if !self.hasher.verify(&request.password, user.password_hash()) {
            return ApiResponse::unauthorized("Invalid credentials");
        }

        let token = match self.jwt.generate(&user) {
            Ok(token) => token,
            Err(err) => return failure_envelope(err),
        };

        let user_id = match user.id() {
            Some(id) => id,
            None => return failure_envelope(DomainError::internal("Persisted user without id")),
        };

        if let Err(err) = uow.auth_tokens().create_for_user(user_id).await {
            return failure_envelope(err);
        }
        if let Err(err) = uow.save_changes().await {
            return failure_envelope(err);
        }

        match self.user_dto(uow.as_ref(), &user, Some(token)).await {
            Ok(dto) => ApiResponse::success_response(dto, "Login successful"),
            Err(err) => failure_envelope(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::{Argon2Hasher, JwtConfig, JwtService};
    use crate::infrastructure::memory::{MemStore, MemUnitOfWorkFactory};

    async fn service() -> UserService {
        let store = MemStore::new();
        let hasher = Argon2Hasher::new();
        store.seed(&hasher).await.unwrap();

        UserService::new(
            Arc::new(MemUnitOfWorkFactory::new(store)),
            Arc::new(DtoMapper::new()),
            Arc::new(hasher),
            Arc::new(JwtService::new(JwtConfig::default())),
        )
    }

    fn register_request(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "sup3rsecret".to_string(),
            confirm_password: "sup3rsecret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service().await;

        let response = service.register(register_request("alice@example.com")).await;
        assert_eq!(response.status_code, 201);

        let response = service
            .login(LoginRequestDto {
                email: "alice@example.com".to_string(),
                password: "sup3rsecret".to_string(),
            })
            .await;

        assert_eq!(response.status_code, 200);
        let dto = response.data.unwrap();
        assert!(dto.token.is_some());
        assert_eq!(dto.auth_tokens.len(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service().await;

        let response = service.register(register_request("admin@example.com")).await;

        assert_eq!(response.status_code, 400);
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_register_field_validation() {
        let service = service().await;

        let response = service
            .register(RegisterRequestDto {
                username: "a".to_string(),
                email: "not-an-email".to_string(),
                password_hash: "short".to_string(),
                confirm_password: "different".to_string(),
            })
            .await;

        assert_eq!(response.status_code, 422);
        assert!(response.validation_errors.contains_key("username"));
        assert!(response.validation_errors.contains_key("email"));
        assert!(response.validation_errors.contains_key("passwordHash"));
        assert!(response.validation_errors.contains_key("confirmPassword"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service().await;

        let response = service
            .login(LoginRequestDto {
                email: "admin@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert_eq!(response.status_code, 401);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = service().await;

        let response = service
            .login(LoginRequestDto {
                email: "nobody@example.com".to_string(),
                password: "whatever123".to_string(),
            })
            .await;

        assert_eq!(response.status_code, 401);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let service = service().await;

        assert_eq!(service.get_by_id(999).await.status_code, 404);
        assert_eq!(service.get_by_id(-1).await.status_code, 400);
    }

    #[tokio::test]
    async fn test_response_never_carries_password_hash() {
        let service = service().await;

        let response = service.get_by_id(1).await;
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }
}
