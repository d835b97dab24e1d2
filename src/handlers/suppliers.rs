use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::query_params;
use crate::{
    errors::ServiceError,
    services::suppliers::{SupplierSelector, SupplierService, SuppliersView},
    ApiResponse, AppState,
};

/// Supplier to drill into
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SupplierQuery {
    /// Supplier id; takes precedence over `supplier_name`
    #[param(example = "SUP01")]
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
}

/// Purchase performance per supplier plus a drill-down for one supplier
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    params(SupplierQuery),
    responses(
        (status = 200, description = "Supplier view computed", body = ApiResponse<SuppliersView>),
        (status = 400, description = "Malformed query", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown supplier", body = crate::errors::ErrorResponse)
    ),
    tag = "Views"
)]
pub async fn get_suppliers(
    State(state): State<AppState>,
    query: Result<Query<SupplierQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SuppliersView>>, ServiceError> {
    let params = query_params(query)?;
    let selector = SupplierSelector {
        supplier_id: params.supplier_id,
        supplier_name: params.supplier_name,
    };

    let supplier_service = SupplierService::new(state.data);
    let view = supplier_service.analyze(&selector)?;

    Ok(Json(ApiResponse::success(view)))
}
