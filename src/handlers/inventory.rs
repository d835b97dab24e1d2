use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::{parse_categories, query_params};
use crate::{
    errors::ServiceError,
    services::inventory::{InventoryFilter, InventoryService, InventoryView, MAX_STOCK_LIMIT},
    ApiResponse, AppState,
};

/// Query parameters for the inventory view
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct InventoryQuery {
    /// Minimum stock, inclusive (default: 0)
    #[param(minimum = 0, maximum = 100)]
    pub min_stock: Option<u32>,
    /// Maximum stock, inclusive (default: 200)
    #[param(minimum = 0, maximum = 200)]
    pub max_stock: Option<u32>,
    /// Comma-separated categories (default: all)
    pub categories: Option<String>,
}

/// Stock levels, inventory value and stock distribution per category
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(InventoryQuery),
    responses(
        (status = 200, description = "Inventory view computed", body = ApiResponse<InventoryView>),
        (status = 400, description = "Malformed or out-of-range stock bounds", body = crate::errors::ErrorResponse)
    ),
    tag = "Views"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    query: Result<Query<InventoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<InventoryView>>, ServiceError> {
    let params = query_params(query)?;
    let filter = InventoryFilter {
        min_stock: params.min_stock.unwrap_or(0),
        max_stock: params.max_stock.unwrap_or(MAX_STOCK_LIMIT),
        categories: parse_categories(params.categories.as_deref()),
    };

    let inventory_service = InventoryService::new(state.data, state.config.low_stock_threshold);
    let view = inventory_service.analyze(&filter)?;

    Ok(Json(ApiResponse::success(view)))
}
