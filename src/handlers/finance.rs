use axum::{extract::State, response::Json};

use crate::{
    errors::ServiceError,
    services::finance::{FinanceService, FinanceView},
    ApiResponse, AppState,
};

/// Revenue against purchase cost, margins per category, product profit and ROI
#[utoipa::path(
    get,
    path = "/api/v1/finance",
    responses(
        (status = 200, description = "Finance report computed", body = ApiResponse<FinanceView>)
    ),
    tag = "Views"
)]
pub async fn get_finance(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FinanceView>>, ServiceError> {
    let finance_service = FinanceService::new(state.data, state.config.currency_symbol);
    Ok(Json(ApiResponse::success(finance_service.report())))
}
