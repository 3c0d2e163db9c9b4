//! Auth token record listing

use std::sync::Arc;

use super::failure_envelope;
use crate::api::envelope::ApiResponse;
use crate::domain::dto::AuthTokenResponseDto;
use crate::domain::uow::UnitOfWorkFactory;
use crate::infrastructure::mapping::DtoMapper;

pub struct AuthTokenService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    mapper: Arc<DtoMapper>,
}

impl AuthTokenService {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, mapper: Arc<DtoMapper>) -> Self {
        Self {
            uow_factory,
            mapper,
        }
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<AuthTokenResponseDto>> {
        let uow = self.uow_factory.create();

        let tokens = match uow.auth_tokens().get_all().await {
            Ok(tokens) => tokens,
            Err(err) => return failure_envelope(err),
        };

        match tokens
            .iter()
            .map(|t| self.mapper.auth_token_to_response(t))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(dtos) => ApiResponse::success_response(dtos, "Auth tokens retrieved"),
            Err(err) => failure_envelope(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::uow::UnitOfWork;
    use crate::infrastructure::auth::Argon2Hasher;
    use crate::infrastructure::memory::{MemStore, MemUnitOfWorkFactory, MemUnitOfWork};

    #[tokio::test]
    async fn test_list_issued_tokens() {
        let store = MemStore::new();
        store.seed(&Argon2Hasher::new()).await.unwrap();

        let uow = MemUnitOfWork::new(store.clone());
        uow.auth_tokens().create_for_user(1).await.unwrap();
        uow.save_changes().await.unwrap();

        let service = AuthTokenService::new(
            Arc::new(MemUnitOfWorkFactory::new(store)),
            Arc::new(DtoMapper::new()),
        );

        let response = service.get_all().await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.data.unwrap().len(), 1);
    }
}
