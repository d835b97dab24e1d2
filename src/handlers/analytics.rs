use axum::{extract::State, response::Json};

use crate::{
    errors::ServiceError,
    services::analytics::{AnalyticsService, DashboardView},
    ApiResponse, AppState,
};

/// Overview metrics, monthly revenue trend and best-selling products
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard view computed", body = ApiResponse<DashboardView>)
    ),
    tag = "Views"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardView>>, ServiceError> {
    let analytics_service = AnalyticsService::new(state.data, state.config.currency_symbol);
    Ok(Json(ApiResponse::success(analytics_service.dashboard())))
}
