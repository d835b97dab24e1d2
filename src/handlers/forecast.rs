use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::query_params;
use crate::{
    errors::ServiceError,
    services::forecasting::{ForecastService, ForecastView, ProductSelector},
    ApiResponse, AppState,
};

/// Query parameters for the demand forecast
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Product id; takes precedence over `product_name`
    #[param(example = "P001")]
    pub product_id: Option<String>,
    /// Product name, exact match
    pub product_name: Option<String>,
    /// Moving-average window in months (default: 3)
    #[param(minimum = 2, maximum = 6)]
    pub window: Option<usize>,
}

/// Moving-average demand forecast and purchase recommendation for one product
///
/// A product with fewer than two months of sales returns `status =
/// insufficient_data` and a warning instead of a forecast.
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Forecast computed", body = ApiResponse<ForecastView>),
        (status = 400, description = "Malformed or out-of-range window", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse)
    ),
    tag = "Views"
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ForecastView>>, ServiceError> {
    let params = query_params(query)?;
    let selector = ProductSelector {
        product_id: params.product_id,
        product_name: params.product_name,
    };

    let forecast_service = ForecastService::new(state.data);
    let view = forecast_service.forecast(&selector, params.window)?;

    Ok(Json(ApiResponse::success(view)))
}
