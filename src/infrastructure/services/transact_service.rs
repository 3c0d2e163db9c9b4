//! Transaction creation and listing

use std::sync::Arc;

use super::failure_envelope;
use crate::api::envelope::ApiResponse;
use crate::domain::dto::{TransactRequestDto, TransactResponseDto};
use crate::domain::transact::Transact;
use crate::domain::uow::UnitOfWorkFactory;
use crate::infrastructure::mapping::DtoMapper;

pub struct TransactService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    mapper: Arc<DtoMapper>,
}

impl TransactService {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, mapper: Arc<DtoMapper>) -> Self {
        Self {
            uow_factory,
            mapper,
        }
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<TransactResponseDto>> {
        let uow = self.uow_factory.create();

        let transacts = match uow.transacts().get_all().await {
            Ok(transacts) => transacts,
            Err(err) => return failure_envelope(err),
        };
        let items = match uow.items().get_all().await {
            Ok(items) => items,
            Err(err) => return failure_envelope(err),
        };

        match transacts
            .iter()
            .map(|t| self.mapper.transact_to_response(t, &items))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(dtos) => ApiResponse::success_response(dtos, "Transactions retrieved"),
            Err(err) => failure_envelope(err),
        }
    }

    /// An empty item list is rejected before anything is staged; a missing
    /// user is a 404. Item references are left to the referential
    /// constraints, which reject the whole batch at save.
    pub async fn create(&self, request: TransactRequestDto) -> ApiResponse<bool> {
        if request.items.is_empty() {
            return ApiResponse::error("A transaction must contain at least one item", vec![]);
        }

        let uow = self.uow_factory.create();

        match uow.users().get_by_id(request.user.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ApiResponse::not_found("User"),
            Err(err) => return failure_envelope(err),
        }

        let item_ids = request.items.iter().map(|i| i.id).collect();
        let transact = Transact::new(request.user.id, request.transaction_date, item_ids);

        if let Err(err) = uow.transacts().create(transact).await {
            return failure_envelope(err);
        }

        match uow.save_changes().await {
            Ok(_) => ApiResponse::created(true, "Transaction created"),
            Err(err) => failure_envelope(err),
        }
    }
}
