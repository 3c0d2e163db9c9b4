//! Application state shared by the handlers

use std::sync::Arc;

use crate::config::Environment;
use crate::domain::uow::UnitOfWorkFactory;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::services::{
    AuthTokenService, ItemService, TransactService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub item_service: Arc<ItemService>,
    pub transact_service: Arc<TransactService>,
    pub auth_token_service: Arc<AuthTokenService>,
    pub jwt: Arc<dyn JwtGenerator>,
    pub uow_factory: Arc<dyn UnitOfWorkFactory>,
    pub environment: Environment,
}
