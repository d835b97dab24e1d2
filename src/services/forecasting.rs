//! Moving-average demand forecast and purchase recommendation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::aggregate::group_sum;
use crate::{
    data::Dataset,
    errors::ServiceError,
    models::Product,
    reports::{ChartSpec, Series},
};

pub const MIN_WINDOW: usize = 2;
pub const MAX_WINDOW: usize = 6;
pub const DEFAULT_WINDOW: usize = 3;

/// Order enough to cover this many months of average demand.
pub const COVERAGE_FACTOR: f64 = 1.5;

/// Trailing moving average: `out[i]` is the mean of `values[i - window..i]`.
///
/// The current period is excluded, so the first `window` entries are `None`.
/// A zero window yields no forecast at all.
pub fn moving_average_forecast(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            (window > 0 && i >= window)
                .then(|| values[i - window..i].iter().sum::<f64>() / window as f64)
        })
        .collect()
}

/// `max(0, round(COVERAGE_FACTOR * average_monthly - stock))`, rounding half to even.
pub fn recommended_order(average_monthly: f64, current_stock: u32) -> u64 {
    let raw = (average_monthly * COVERAGE_FACTOR - f64::from(current_stock)).round_ties_even();
    if raw.is_finite() && raw > 0.0 {
        raw as u64
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    Ok,
    /// Fewer than two months of sales; no forecast is produced
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyDemand {
    #[schema(example = "2023-04")]
    pub month: String,
    pub quantity: u64,
    /// Mean of the preceding `window` months; `null` while history is too short
    pub forecast: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRecommendation {
    pub current_stock: u32,
    pub average_monthly_sales: f64,
    /// Average monthly sales rounded half to even, as displayed
    pub average_monthly_sales_rounded: i64,
    pub recommended_order: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastView {
    pub product: Product,
    pub window: usize,
    pub status: ForecastStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub months: Vec<MonthlyDemand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<PurchaseRecommendation>,
}

/// Which product to forecast. Id wins over name; neither selects the first product.
#[derive(Debug, Clone, Default)]
pub struct ProductSelector {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
}

#[derive(Clone)]
pub struct ForecastService {
    data: Arc<Dataset>,
}

impl ForecastService {
    pub fn new(data: Arc<Dataset>) -> Self {
        Self { data }
    }

    pub fn resolve_product(&self, selector: &ProductSelector) -> Result<&Product, ServiceError> {
        match (&selector.product_id, &selector.product_name) {
            (Some(id), _) => self
                .data
                .product(id)
                .ok_or_else(|| ServiceError::NotFound(format!("product {}", id))),
            (None, Some(name)) => self
                .data
                .product_by_name(name)
                .ok_or_else(|| ServiceError::NotFound(format!("product named {}", name))),
            (None, None) => self
                .data
                .products()
                .first()
                .ok_or_else(|| ServiceError::NotFound("no products available".into())),
        }
    }

    /// Monthly quantity sold for one product, months ascending.
    pub fn monthly_quantities(&self, product_id: &str) -> Vec<(String, u64)> {
        group_sum(
            self.data
                .sales()
                .iter()
                .filter(|sale| sale.product_id == product_id),
            |sale| sale.month(),
            |sale| u64::from(sale.quantity),
        )
        .into_iter()
        .collect()
    }

    pub fn forecast(
        &self,
        selector: &ProductSelector,
        window: Option<usize>,
    ) -> Result<ForecastView, ServiceError> {
        let window = window.unwrap_or(DEFAULT_WINDOW);
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
            return Err(ServiceError::ValidationError(format!(
                "window must be between {} and {}",
                MIN_WINDOW, MAX_WINDOW
            )));
        }

        let product = self.resolve_product(selector)?.clone();
        let monthly = self.monthly_quantities(&product.product_id);

        if monthly.len() < 2 {
            warn!(
                product_id = %product.product_id,
                months = monthly.len(),
                "Not enough sales history to forecast"
            );
            return Ok(ForecastView {
                warning: Some(format!(
                    "Not enough sales data to forecast {}. Choose another product.",
                    product.product_name
                )),
                product,
                window,
                status: ForecastStatus::InsufficientData,
                months: monthly
                    .into_iter()
                    .map(|(month, quantity)| MonthlyDemand {
                        month,
                        quantity,
                        forecast: None,
                    })
                    .collect(),
                chart: None,
                recommendation: None,
            });
        }

        let quantities: Vec<f64> = monthly.iter().map(|(_, q)| *q as f64).collect();
        let forecasts = moving_average_forecast(&quantities, window);
        let months: Vec<MonthlyDemand> = monthly
            .into_iter()
            .zip(forecasts)
            .map(|((month, quantity), forecast)| MonthlyDemand {
                month,
                quantity,
                forecast,
            })
            .collect();

        let average = quantities.iter().sum::<f64>() / quantities.len() as f64;
        let recommendation = PurchaseRecommendation {
            current_stock: product.stock,
            average_monthly_sales: average,
            average_monthly_sales_rounded: average.round_ties_even() as i64,
            recommended_order: recommended_order(average, product.stock),
        };

        let chart = ChartSpec::line(format!("Demand forecast for {}", product.product_name))
            .axes("Month", "Units sold")
            .with_series(Series::dense(
                "Actual",
                months.iter().map(|m| (m.month.clone(), m.quantity as f64)),
            ))
            .with_series(Series::new(
                "Forecast",
                months.iter().map(|m| (m.month.clone(), m.forecast)),
            ));

        info!(
            product_id = %product.product_id,
            window,
            months = months.len(),
            recommended_order = recommendation.recommended_order,
            "Demand forecast computed"
        );

        Ok(ForecastView {
            product,
            window,
            status: ForecastStatus::Ok,
            warning: None,
            months,
            chart: Some(chart),
            recommendation: Some(recommendation),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use assert_matches::assert_matches;

    fn service() -> ForecastService {
        ForecastService::new(Arc::new(fixtures::small()))
    }

    #[test]
    fn forecast_excludes_current_month() {
        let out = moving_average_forecast(&[3.0, 6.0, 9.0, 12.0], 2);
        assert_eq!(out, vec![None, None, Some(4.5), Some(7.5)]);
    }

    #[test]
    fn short_series_has_no_forecast() {
        assert_eq!(moving_average_forecast(&[1.0, 2.0], 3), vec![None, None]);
        assert_eq!(moving_average_forecast(&[1.0, 2.0], 0), vec![None, None]);
        assert!(moving_average_forecast(&[], 2).is_empty());
    }

    #[test]
    fn recommendation_is_clamped_at_zero() {
        assert_eq!(recommended_order(10.0, 0), 15);
        assert_eq!(recommended_order(10.0, 100), 0);
        assert_eq!(recommended_order(0.0, 0), 0);
    }

    #[test]
    fn recommendation_rounds_half_to_even() {
        // 1.5 * 5 - 5 = 2.5 -> 2
        assert_eq!(recommended_order(5.0, 5), 2);
        // 1.5 * 7 - 7 = 3.5 -> 4
        assert_eq!(recommended_order(7.0, 7), 4);
    }

    #[test]
    fn forecast_for_product_with_history() {
        let view = service()
            .forecast(
                &ProductSelector {
                    product_id: Some("P001".into()),
                    ..Default::default()
                },
                Some(2),
            )
            .unwrap();

        assert_eq!(view.status, ForecastStatus::Ok);
        let months: Vec<_> = view.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2023-01", "2023-02", "2023-04"]);
        let quantities: Vec<_> = view.months.iter().map(|m| m.quantity).collect();
        assert_eq!(quantities, vec![2, 1, 4]);
        assert_eq!(view.months[2].forecast, Some(1.5));

        let rec = view.recommendation.unwrap();
        assert_eq!(rec.current_stock, 5);
        assert!((rec.average_monthly_sales - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(rec.average_monthly_sales_rounded, 2);
        // 1.5 * 2.333 - 5 = -1.5 -> 0
        assert_eq!(rec.recommended_order, 0);
        assert_eq!(view.chart.unwrap().series.len(), 2);
    }

    #[test]
    fn single_month_of_sales_yields_warning() {
        let view = service()
            .forecast(
                &ProductSelector {
                    product_name: Some("Mouse".into()),
                    ..Default::default()
                },
                None,
            )
            .unwrap();

        assert_eq!(view.status, ForecastStatus::InsufficientData);
        assert_eq!(view.window, DEFAULT_WINDOW);
        assert!(view.warning.unwrap().contains("Mouse"));
        assert!(view.chart.is_none());
        assert!(view.recommendation.is_none());
    }

    #[test]
    fn default_selector_picks_first_product() {
        let view = service().forecast(&ProductSelector::default(), None).unwrap();
        assert_eq!(view.product.product_id, "P001");
    }

    #[test]
    fn out_of_range_window_is_rejected() {
        let svc = service();
        assert_matches!(
            svc.forecast(&ProductSelector::default(), Some(1)),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            svc.forecast(&ProductSelector::default(), Some(7)),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn unknown_product_is_not_found() {
        let result = service().forecast(
            &ProductSelector {
                product_id: Some("P999".into()),
                ..Default::default()
            },
            None,
        );
        assert_matches!(result, Err(ServiceError::NotFound(_)));
    }
}
