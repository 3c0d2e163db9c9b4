//! Entity-to-DTO transcription
//!
//! One explicitly constructed mapper, built at startup and shared by the
//! services. Mapping an unsaved entity is a programming error and surfaces
//! as an internal failure, never a panic.

use crate::domain::auth_token::AuthToken;
use crate::domain::dto::{
    AuthTokenResponseDto, ItemResponseDto, TransactResponseDto, UserResponseDto,
};
use crate::domain::item::Item;
use crate::domain::transact::Transact;
use crate::domain::user::User;
use crate::domain::DomainError;

#[derive(Debug, Clone, Default)]
pub struct DtoMapper;

impl DtoMapper {
    pub fn new() -> Self {
        Self
    }

    fn persisted_id(id: Option<i32>, entity: &str) -> Result<i32, DomainError> {
        id.ok_or_else(|| DomainError::internal(format!("Cannot map an unsaved {}", entity)))
    }

    /// User projection; the password hash never crosses this boundary.
    pub fn user_to_response(
        &self,
        user: &User,
        token: Option<String>,
        auth_tokens: &[AuthToken],
        transactions: Vec<TransactResponseDto>,
    ) -> Result<UserResponseDto, DomainError> {
        use crate::domain::repository::Entity;

        let auth_tokens = auth_tokens
            .iter()
            .map(|t| self.auth_token_to_response(t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserResponseDto {
            id: Self::persisted_id(user.id(), "user")?,
            username: user.username().to_string(),
            email: user.email().to_string(),
            token,
            auth_tokens,
            transactions,
        })
    }

    pub fn item_to_response(&self, item: &Item) -> Result<ItemResponseDto, DomainError> {
        use crate::domain::repository::Entity;

        Ok(ItemResponseDto {
            id: Self::persisted_id(item.id(), "item")?,
            name: item.name().to_string(),
            description: item.description().to_string(),
            price: item.price(),
        })
    }

    /// Transaction projection; `items` must carry the catalog rows the
    /// transaction references.
    pub fn transact_to_response(
        &self,
        transact: &Transact,
        items: &[Item],
    ) -> Result<TransactResponseDto, DomainError> {
        use crate::domain::repository::Entity;

        let items = transact
            .item_ids()
            .iter()
            .map(|item_id| {
                items
                    .iter()
                    .find(|i| i.id() == Some(*item_id))
                    .ok_or_else(|| {
                        DomainError::internal(format!(
                            "Transaction references unknown item {}",
                            item_id
                        ))
                    })
                    .and_then(|i| self.item_to_response(i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransactResponseDto {
            id: Self::persisted_id(transact.id(), "transaction")?,
            transaction_date: transact.transaction_date(),
            user_id: transact.user_id(),
            items,
        })
    }

    pub fn auth_token_to_response(
        &self,
        token: &AuthToken,
    ) -> Result<AuthTokenResponseDto, DomainError> {
        use crate::domain::repository::Entity;

        Ok(AuthTokenResponseDto {
            id: Self::persisted_id(token.id(), "auth token")?,
            emission_date: token.emission_date(),
            expiration_date: token.expiration_date(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_mapping_excludes_password_hash() {
        let mapper = DtoMapper::new();
        let user = User::from_storage(1, "alice", "alice@example.com", "$argon2id$secret");

        let dto = mapper.user_to_response(&user, None, &[], vec![]).unwrap();
        let json = serde_json::to_string(&dto).unwrap();

        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_unsaved_user_cannot_be_mapped() {
        let mapper = DtoMapper::new();
        let user = User::new("alice", "alice@example.com", "hash");

        assert!(mapper.user_to_response(&user, None, &[], vec![]).is_err());
    }

    #[test]
    fn test_transact_mapping_resolves_items() {
        let mapper = DtoMapper::new();
        let items = vec![
            Item::with_id(1, "sword", "sharp", dec!(150.0)),
            Item::with_id(2, "potion", "heals", dec!(25.0)),
        ];
        let transact = Transact::from_storage(5, 1, chrono::Utc::now(), vec![2, 1]);

        let dto = mapper.transact_to_response(&transact, &items).unwrap();

        assert_eq!(dto.items.len(), 2);
        assert_eq!(dto.items[0].id, 2);
        assert_eq!(dto.items[1].id, 1);
    }

    #[test]
    fn test_transact_mapping_fails_on_unknown_item() {
        let mapper = DtoMapper::new();
        let transact = Transact::from_storage(5, 1, chrono::Utc::now(), vec![9]);

        assert!(mapper.transact_to_response(&transact, &[]).is_err());
    }
}
