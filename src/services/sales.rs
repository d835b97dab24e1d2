use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use super::aggregate::{
    category_selected, format_count, format_currency, group_sum, mean, to_f64, top_n,
};
use crate::{
    data::Dataset,
    errors::ServiceError,
    reports::{ChartSpec, Metric, Series},
};

pub const TOP_PRODUCTS: usize = 5;

/// Date range (inclusive) and category selection for the sales view
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` selects all categories
    pub categories: Option<Vec<String>>,
}

impl SalesFilter {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            categories: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.start_date > self.end_date {
            return Err(ServiceError::ValidationError(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

/// A sale joined with its product's name and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesRow {
    pub sale_id: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRevenue {
    pub product_id: String,
    pub product_name: String,
    pub revenue: Decimal,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesView {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Categories the filter was applied with
    pub categories: Vec<String>,
    pub metrics: Vec<Metric>,
    pub total_revenue: Decimal,
    /// Absent when no sale matches the filter
    pub average_sale: Option<Decimal>,
    pub total_quantity: u64,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub rows: Vec<SalesRow>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Clone)]
pub struct SalesService {
    data: Arc<Dataset>,
    currency_symbol: String,
}

impl SalesService {
    pub fn new(data: Arc<Dataset>, currency_symbol: impl Into<String>) -> Self {
        Self {
            data,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Sales inside the filter, in generation order, joined with product details.
    pub fn filtered_rows(&self, filter: &SalesFilter) -> Vec<SalesRow> {
        self.data
            .sales()
            .iter()
            .filter(|sale| sale.date >= filter.start_date && sale.date <= filter.end_date)
            .filter_map(|sale| {
                let product = self.data.product(&sale.product_id)?;
                category_selected(filter.categories.as_deref(), &product.category).then(|| {
                    SalesRow {
                        sale_id: sale.sale_id.clone(),
                        product_id: sale.product_id.clone(),
                        product_name: product.product_name.clone(),
                        category: product.category.clone(),
                        quantity: sale.quantity,
                        unit_price: sale.unit_price,
                        total_price: sale.total_price,
                        date: sale.date,
                    }
                })
            })
            .collect()
    }

    pub fn analyze(&self, filter: &SalesFilter) -> Result<SalesView, ServiceError> {
        filter.validate()?;

        let rows = self.filtered_rows(filter);
        debug!(matched = rows.len(), "Sales filter applied");

        let total_revenue: Decimal = rows.iter().map(|r| r.total_price).sum();
        let average_sale = mean(total_revenue, rows.len());
        let total_quantity: u64 = rows.iter().map(|r| u64::from(r.quantity)).sum();

        let revenue_by_category: Vec<CategoryRevenue> =
            group_sum(&rows, |r| r.category.clone(), |r| r.total_price)
                .into_iter()
                .map(|(category, revenue)| CategoryRevenue { category, revenue })
                .collect();

        let top_products = self.top_products_by_revenue(&rows, TOP_PRODUCTS);

        let metrics = vec![
            Metric::new(
                "total_revenue",
                "Total Sales (Filtered)",
                format_currency(&self.currency_symbol, total_revenue),
            ),
            Metric::new(
                "average_sale",
                "Average Sale (Filtered)",
                average_sale
                    .map(|avg| format_currency(&self.currency_symbol, avg))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Metric::new("total_quantity", "Items Sold", format_count(total_quantity)),
        ];

        let charts = vec![
            ChartSpec::pie("Sales Distribution by Category").with_series(Series::dense(
                "Revenue",
                revenue_by_category
                    .iter()
                    .map(|c| (c.category.clone(), to_f64(c.revenue))),
            )),
            ChartSpec::bar(format!("Top {} Products by Revenue", TOP_PRODUCTS))
                .axes("Product", "Revenue")
                .with_series(Series::dense(
                    "Revenue",
                    top_products
                        .iter()
                        .map(|p| (p.product_name.clone(), to_f64(p.revenue))),
                )),
        ];

        info!(
            start = %filter.start_date,
            end = %filter.end_date,
            rows = rows.len(),
            "Sales view computed"
        );

        Ok(SalesView {
            start_date: filter.start_date,
            end_date: filter.end_date,
            categories: filter
                .categories
                .clone()
                .unwrap_or_else(|| self.data.categories()),
            metrics,
            total_revenue,
            average_sale,
            total_quantity,
            revenue_by_category,
            top_products,
            rows,
            charts,
        })
    }

    fn top_products_by_revenue(&self, rows: &[SalesRow], n: usize) -> Vec<ProductRevenue> {
        let revenue = group_sum(rows, |r| r.product_id.clone(), |r| r.total_price);
        let quantity = group_sum(rows, |r| r.product_id.clone(), |r| u64::from(r.quantity));

        let totals: Vec<ProductRevenue> = revenue
            .into_iter()
            .map(|(product_id, revenue)| ProductRevenue {
                product_name: self
                    .data
                    .product(&product_id)
                    .map(|p| p.product_name.clone())
                    .unwrap_or_else(|| product_id.clone()),
                quantity: quantity.get(&product_id).copied().unwrap_or_default(),
                product_id,
                revenue,
            })
            .collect();

        top_n(totals, n, |p| p.revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{date, small};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn service() -> SalesService {
        SalesService::new(Arc::new(small()), "Rp")
    }

    fn full_year() -> SalesFilter {
        SalesFilter::new(date(2023, 1, 1), date(2023, 12, 31))
    }

    #[test]
    fn unfiltered_view_covers_every_sale() {
        let view = service().analyze(&full_year()).unwrap();
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.total_revenue, dec!(8100));
        assert_eq!(view.total_quantity, 15);
        assert_eq!(view.categories, vec!["Elektronik", "Aksesori"]);
    }

    #[test]
    fn category_revenue_partitions_total() {
        let view = service().analyze(&full_year()).unwrap();
        let sum: Decimal = view.revenue_by_category.iter().map(|c| c.revenue).sum();
        assert_eq!(sum, view.total_revenue);
        // BTreeMap ordering: Aksesori before Elektronik
        assert_eq!(view.revenue_by_category[0].category, "Aksesori");
        assert_eq!(view.revenue_by_category[0].revenue, dec!(1100));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = SalesFilter::new(date(2023, 2, 3), date(2023, 3, 15));
        let view = service().analyze(&filter).unwrap();
        let ids: Vec<_> = view.rows.iter().map(|r| r.sale_id.as_str()).collect();
        assert_eq!(ids, vec!["S0001", "S0002", "S0003"]);
    }

    #[test]
    fn category_filter_limits_rows() {
        let filter = full_year().with_categories(vec!["Aksesori".into()]);
        let view = service().analyze(&filter).unwrap();
        assert!(view.rows.iter().all(|r| r.category == "Aksesori"));
        assert_eq!(view.total_revenue, dec!(1100));
        assert_eq!(view.top_products[0].product_name, "Keyboard");
    }

    #[test]
    fn empty_selection_has_no_average() {
        let filter = full_year().with_categories(vec!["Tidak Ada".into()]);
        let view = service().analyze(&filter).unwrap();
        assert!(view.rows.is_empty());
        assert_eq!(view.total_revenue, Decimal::ZERO);
        assert_eq!(view.average_sale, None);
        assert_eq!(view.metrics[1].value, "-");
    }

    #[test]
    fn top_products_ranked_by_revenue() {
        let view = service().analyze(&full_year()).unwrap();
        let top: Vec<_> = view
            .top_products
            .iter()
            .map(|p| (p.product_id.as_str(), p.revenue, p.quantity))
            .collect();
        assert_eq!(
            top,
            vec![
                ("P001", dec!(7000), 7),
                ("P003", dec!(600), 3),
                ("P002", dec!(500), 5),
            ]
        );
    }

    #[test]
    fn reversed_range_is_rejected() {
        let filter = SalesFilter::new(date(2023, 6, 1), date(2023, 1, 1));
        assert_matches!(
            service().analyze(&filter),
            Err(ServiceError::ValidationError(_))
        );
    }
}
