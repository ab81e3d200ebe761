use crate::error::{ApiError, ErrorCode};
use crate::models::{Product, ProductDraft, ProductId, ProductPatch};
use crate::services::{Page, ProductFilter};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

/// Longest accepted `name` filter, in UTF-16 code units.
pub const MAX_NAME_FILTER_LEN: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    fn filter(&self) -> Result<ProductFilter, ApiError> {
        match self.name.as_deref() {
            Some(name) if name.encode_utf16().count() > MAX_NAME_FILTER_LEN => {
                Err(ApiError::NameTooLong)
            }
            Some(name) if !name.is_empty() => Ok(ProductFilter {
                name: Some(name.to_string()),
            }),
            _ => Ok(ProductFilter::default()),
        }
    }

    fn page(&self) -> Result<Page, ApiError> {
        let number = match self.page.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                ApiError::BadRequest(format!("Invalid page number: {}", raw))
            })?),
        };
        Ok(Page::numbered(number))
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = params.filter()?;
    let page = params.page()?;

    let products = state
        .store
        .find(&filter, page)
        .await
        .map_err(ApiError::internal(ErrorCode::ListProducts))?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(draft), _): WithRejection<Json<ProductDraft>, ApiError>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .store
        .create(draft)
        .await
        .map_err(ApiError::internal(ErrorCode::CreateProduct))?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok(Json(product))
}

pub async fn get_product(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Product>, ApiError> {
    if id.is_empty() {
        return Err(ApiError::MissingId);
    }

    let Some(product_id) = ProductId::parse(&id) else {
        return Err(ApiError::NotFound(id));
    };

    state
        .store
        .find_by_id(&product_id)
        .await
        .map_err(ApiError::internal(ErrorCode::FetchProduct))?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// `/products/` with any id method: the id segment is present but empty.
pub async fn missing_product_id() -> ApiError {
    ApiError::MissingId
}

pub async fn delete_product(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Option<Product>>, ApiError> {
    let Some(product_id) = ProductId::parse(&id) else {
        return Ok(Json(None));
    };

    let deleted = state
        .store
        .find_one_and_delete(&product_id)
        .await
        .map_err(ApiError::internal(ErrorCode::DeleteProduct))?;

    if deleted.is_some() {
        tracing::info!(product_id = %product_id, "Product deleted");
    }

    Ok(Json(deleted))
}

pub async fn update_product(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(patch), _): WithRejection<Json<ProductPatch>, ApiError>,
) -> Result<Json<Option<Product>>, ApiError> {
    let Some(product_id) = ProductId::parse(&id) else {
        return Ok(Json(None));
    };

    let updated = state
        .store
        .find_one_and_update(&product_id, patch)
        .await
        .map_err(ApiError::internal(ErrorCode::UpdateProduct))?;

    Ok(Json(updated))
}
