//! Item catalog lookups

use std::sync::Arc;

use super::failure_envelope;
use crate::api::envelope::ApiResponse;
use crate::domain::dto::ItemResponseDto;
use crate::domain::uow::UnitOfWorkFactory;
use crate::infrastructure::mapping::DtoMapper;

pub struct ItemService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    mapper: Arc<DtoMapper>,
}

impl ItemService {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, mapper: Arc<DtoMapper>) -> Self {
        Self {
            uow_factory,
            mapper,
        }
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<ItemResponseDto>> {
        let uow = self.uow_factory.create();

        let items = match uow.items().get_all().await {
            Ok(items) => items,
            Err(err) => return failure_envelope(err),
        };

        match items
            .iter()
            .map(|i| self.mapper.item_to_response(i))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(dtos) => ApiResponse::success_response(dtos, "Items retrieved"),
            Err(err) => failure_envelope(err),
        }
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResponse<ItemResponseDto> {
        if id <= 0 {
            return ApiResponse::error("Item id must be positive", vec![]);
        }

        let uow = self.uow_factory.create();
        match uow.items().get_by_id(id).await {
            Ok(Some(item)) => match self.mapper.item_to_response(&item) {
                Ok(dto) => ApiResponse::success_response(dto, "Item retrieved"),
                Err(err) => failure_envelope(err),
            },
            Ok(None) => ApiResponse::not_found("Item"),
            Err(err) => failure_envelope(err),
        }
    }
}
