use axum::{extract::State, response::Json};

use crate::{
    errors::ServiceError,
    services::{menu, ViewInfo},
    ApiResponse, AppState,
};

/// Dashboard views in menu order
#[utoipa::path(
    get,
    path = "/api/v1/views",
    responses(
        (status = 200, description = "Available views", body = ApiResponse<Vec<ViewInfo>>)
    ),
    tag = "Catalog"
)]
pub async fn list_views() -> Result<Json<ApiResponse<Vec<ViewInfo>>>, ServiceError> {
    Ok(Json(ApiResponse::success(menu())))
}

/// Distinct product categories in catalog order
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Product categories", body = ApiResponse<Vec<String>>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.data.categories())))
}
