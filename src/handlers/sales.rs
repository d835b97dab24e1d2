use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::{dataset_date_range, parse_categories, query_params};
use crate::{
    errors::ServiceError,
    services::sales::{SalesFilter, SalesService, SalesView},
    ApiResponse, AppState,
};

/// Query parameters for the sales view
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SalesQuery {
    /// Inclusive start date (default: first day of the dataset)
    #[param(value_type = Option<String>, example = "2023-01-01")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date (default: last day of the dataset)
    #[param(value_type = Option<String>, example = "2023-12-31")]
    pub end_date: Option<NaiveDate>,
    /// Comma-separated categories (default: all)
    #[param(example = "Elektronik,Komponen")]
    pub categories: Option<String>,
}

/// Sales filtered by date range and category
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Sales view computed", body = ApiResponse<SalesView>),
        (status = 400, description = "Malformed date or start date after end date", body = crate::errors::ErrorResponse)
    ),
    tag = "Views"
)]
pub async fn get_sales(
    State(state): State<AppState>,
    query: Result<Query<SalesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SalesView>>, ServiceError> {
    let params = query_params(query)?;
    let (first_day, last_day) = dataset_date_range(&state.config.data);
    let filter = SalesFilter {
        start_date: params.start_date.unwrap_or(first_day),
        end_date: params.end_date.unwrap_or(last_day),
        categories: parse_categories(params.categories.as_deref()),
    };

    let sales_service = SalesService::new(state.data, state.config.currency_symbol);
    let view = sales_service.analyze(&filter)?;

    Ok(Json(ApiResponse::success(view)))
}
