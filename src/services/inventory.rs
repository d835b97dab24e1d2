use std::{collections::BTreeMap, sync::Arc};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::aggregate::{category_selected, format_count, group_sum, to_f64};
use crate::{
    data::Dataset,
    errors::ServiceError,
    models::Product,
    reports::{BoxStats, ChartSpec, Metric, Series},
};

pub const MIN_STOCK_LIMIT: u32 = 100;
pub const MAX_STOCK_LIMIT: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryFilter {
    /// Lower stock bound, `0..=MIN_STOCK_LIMIT`
    pub min_stock: u32,
    /// Upper stock bound, `0..=MAX_STOCK_LIMIT`
    pub max_stock: u32,
    pub categories: Option<Vec<String>>,
}

impl Default for InventoryFilter {
    fn default() -> Self {
        Self {
            min_stock: 0,
            max_stock: MAX_STOCK_LIMIT,
            categories: None,
        }
    }
}

impl InventoryFilter {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.min_stock > MIN_STOCK_LIMIT {
            return Err(ServiceError::ValidationError(format!(
                "min_stock must be between 0 and {}",
                MIN_STOCK_LIMIT
            )));
        }
        if self.max_stock > MAX_STOCK_LIMIT {
            return Err(ServiceError::ValidationError(format!(
                "max_stock must be between 0 and {}",
                MAX_STOCK_LIMIT
            )));
        }
        Ok(())
    }

    fn matches(&self, product: &Product) -> bool {
        product.stock >= self.min_stock
            && product.stock <= self.max_stock
            && category_selected(self.categories.as_deref(), &product.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockSummary {
    pub total_items: u64,
    pub out_of_stock: usize,
    /// Products with `0 < stock <= low_stock_threshold`
    pub low_stock: usize,
    pub low_stock_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryValue {
    pub category: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryView {
    pub min_stock: u32,
    pub max_stock: u32,
    pub categories: Vec<String>,
    pub metrics: Vec<Metric>,
    /// Computed over the whole catalog, independent of the filter
    pub summary: StockSummary,
    pub value_by_category: Vec<CategoryValue>,
    pub stock_distribution: Vec<BoxStats>,
    pub rows: Vec<Product>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Clone)]
pub struct InventoryService {
    data: Arc<Dataset>,
    low_stock_threshold: u32,
}

impl InventoryService {
    pub fn new(data: Arc<Dataset>, low_stock_threshold: u32) -> Self {
        Self {
            data,
            low_stock_threshold,
        }
    }

    pub fn summary(&self) -> StockSummary {
        let products = self.data.products();
        StockSummary {
            total_items: products.iter().map(|p| u64::from(p.stock)).sum(),
            out_of_stock: products.iter().filter(|p| p.stock == 0).count(),
            low_stock: products
                .iter()
                .filter(|p| p.stock > 0 && p.stock <= self.low_stock_threshold)
                .count(),
            low_stock_threshold: self.low_stock_threshold,
        }
    }

    pub fn analyze(&self, filter: &InventoryFilter) -> Result<InventoryView, ServiceError> {
        filter.validate()?;

        let summary = self.summary();
        let rows: Vec<Product> = self
            .data
            .products()
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        let value_by_category: Vec<CategoryValue> =
            group_sum(&rows, |p| p.category.clone(), |p| p.inventory_value())
                .into_iter()
                .map(|(category, value)| CategoryValue { category, value })
                .collect();

        let stock_distribution = stock_distribution(&rows);

        let metrics = vec![
            Metric::new(
                "total_items",
                "Total Items in Inventory",
                format_count(summary.total_items),
            ),
            Metric::new(
                "out_of_stock",
                "Out of Stock",
                format_count(summary.out_of_stock as u64),
            ),
            Metric::new(
                "low_stock",
                &format!("Low Stock (<={})", summary.low_stock_threshold),
                format_count(summary.low_stock as u64),
            ),
        ];

        let charts = vec![
            ChartSpec::bar("Inventory Value by Category")
                .axes("Category", "Value")
                .with_series(Series::dense(
                    "Value",
                    value_by_category
                        .iter()
                        .map(|c| (c.category.clone(), to_f64(c.value))),
                )),
            ChartSpec::box_plot("Stock Distribution by Category", stock_distribution.clone())
                .axes("Category", "Stock"),
        ];

        info!(
            min_stock = filter.min_stock,
            max_stock = filter.max_stock,
            rows = rows.len(),
            "Inventory view computed"
        );

        Ok(InventoryView {
            min_stock: filter.min_stock,
            max_stock: filter.max_stock,
            categories: filter
                .categories
                .clone()
                .unwrap_or_else(|| self.data.categories()),
            metrics,
            summary,
            value_by_category,
            stock_distribution,
            rows,
            charts,
        })
    }
}

/// Box statistics of stock per category, categories ascending like `value_by_category`.
fn stock_distribution(rows: &[Product]) -> Vec<BoxStats> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for product in rows {
        groups
            .entry(product.category.as_str())
            .or_default()
            .push(f64::from(product.stock));
    }
    groups
        .into_iter()
        .filter_map(|(category, values)| BoxStats::from_values(category, &values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::small;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn service() -> InventoryService {
        InventoryService::new(Arc::new(small()), 10)
    }

    #[test]
    fn summary_counts_stock_levels() {
        let summary = service().summary();
        assert_eq!(summary.total_items, 35);
        assert_eq!(summary.out_of_stock, 1);
        // Laptop has 5 units
        assert_eq!(summary.low_stock, 1);
    }

    #[test]
    fn threshold_is_configurable() {
        let summary = InventoryService::new(Arc::new(small()), 30).summary();
        assert_eq!(summary.low_stock, 2);
    }

    #[test]
    fn default_filter_keeps_every_product() {
        let view = service().analyze(&InventoryFilter::default()).unwrap();
        assert_eq!(view.rows.len(), 3);
        assert_eq!(
            view.value_by_category,
            vec![
                CategoryValue {
                    category: "Aksesori".into(),
                    value: dec!(6000),
                },
                CategoryValue {
                    category: "Elektronik".into(),
                    value: dec!(5000),
                },
            ]
        );
    }

    #[test]
    fn stock_bounds_filter_rows_but_not_summary() {
        let filter = InventoryFilter {
            min_stock: 1,
            max_stock: 10,
            categories: None,
        };
        let view = service().analyze(&filter).unwrap();
        let ids: Vec<_> = view.rows.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P001"]);
        assert_eq!(view.summary.total_items, 35);
    }

    #[test]
    fn distribution_groups_by_category() {
        let view = service().analyze(&InventoryFilter::default()).unwrap();
        let labels: Vec<_> = view
            .stock_distribution
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Aksesori", "Elektronik"]);
        assert_eq!(view.stock_distribution[0].median, 15.0);
    }

    #[test]
    fn both_charts_list_categories_in_the_same_order() {
        let view = service().analyze(&InventoryFilter::default()).unwrap();
        let value_order: Vec<_> = view
            .value_by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        let box_order: Vec<_> = view
            .stock_distribution
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(value_order, box_order);
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let filter = InventoryFilter {
            min_stock: 50,
            max_stock: 10,
            categories: None,
        };
        let view = service().analyze(&filter).unwrap();
        assert!(view.rows.is_empty());
        assert!(view.stock_distribution.is_empty());
    }

    #[test]
    fn out_of_range_bounds_are_rejected() {
        let svc = service();
        let too_low = InventoryFilter {
            min_stock: 101,
            ..Default::default()
        };
        let too_high = InventoryFilter {
            max_stock: 201,
            ..Default::default()
        };
        assert_matches!(svc.analyze(&too_low), Err(ServiceError::ValidationError(_)));
        assert_matches!(svc.analyze(&too_high), Err(ServiceError::ValidationError(_)));
    }
}
