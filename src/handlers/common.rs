use axum::extract::{rejection::QueryRejection, Query};
use chrono::{Days, NaiveDate};

use crate::{config::DataConfig, errors::ServiceError};

/// Unwraps query parameters, reporting malformed ones in the standard error body.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))
}

/// Splits a comma-separated category list.
///
/// Blank entries are dropped; an absent or blank list selects every category.
pub fn parse_categories(raw: Option<&str>) -> Option<Vec<String>> {
    let categories: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    (!categories.is_empty()).then_some(categories)
}

/// First and last day covered by the generated dataset.
pub fn dataset_date_range(cfg: &DataConfig) -> (NaiveDate, NaiveDate) {
    let last = cfg
        .start_date
        .checked_add_days(Days::new(u64::from(cfg.day_span.saturating_sub(1))))
        .unwrap_or(NaiveDate::MAX);
    (cfg.start_date, last)
}
