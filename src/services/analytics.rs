use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::aggregate::{format_count, format_currency, group_sum, mean, to_f64, top_n};
use crate::{
    data::Dataset,
    reports::{ChartSpec, Metric, Series},
};

pub const TOP_PRODUCTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyAmount {
    #[schema(example = "2023-01")]
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductQuantity {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u64,
}

/// Headline figures for the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    pub metrics: Vec<Metric>,
    pub total_sales: Decimal,
    pub product_count: usize,
    pub inventory_value: Decimal,
    /// Mean sale value; zero when there are no sales
    pub average_sale: Decimal,
    pub monthly_revenue: Vec<MonthlyAmount>,
    pub top_products: Vec<ProductQuantity>,
    pub charts: Vec<ChartSpec>,
}

/// Overview analytics over the full dataset
#[derive(Clone)]
pub struct AnalyticsService {
    data: Arc<Dataset>,
    currency_symbol: String,
}

impl AnalyticsService {
    pub fn new(data: Arc<Dataset>, currency_symbol: impl Into<String>) -> Self {
        Self {
            data,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn dashboard(&self) -> DashboardView {
        let sales = self.data.sales();
        let total_sales: Decimal = sales.iter().map(|s| s.total_price).sum();
        let average_sale = mean(total_sales, sales.len()).unwrap_or(Decimal::ZERO);
        let product_count = self.data.products().len();
        let inventory_value: Decimal = self
            .data
            .products()
            .iter()
            .map(|p| p.inventory_value())
            .sum();

        let monthly_revenue = self.monthly_revenue();
        let top_products = self.top_products_by_quantity(TOP_PRODUCTS);

        let metrics = vec![
            Metric::new(
                "total_sales",
                "Total Sales",
                format_currency(&self.currency_symbol, total_sales),
            ),
            Metric::new(
                "product_count",
                "Products",
                format_count(product_count as u64),
            ),
            Metric::new(
                "inventory_value",
                "Inventory Value",
                format_currency(&self.currency_symbol, inventory_value),
            ),
            Metric::new(
                "average_sale",
                "Average Sale",
                format_currency(&self.currency_symbol, average_sale),
            ),
        ];

        let charts = vec![
            ChartSpec::line("Monthly Sales Trend")
                .axes("Month", "Revenue")
                .with_series(Series::dense(
                    "Revenue",
                    monthly_revenue
                        .iter()
                        .map(|m| (m.month.clone(), to_f64(m.amount))),
                )),
            ChartSpec::bar(format!("Top {} Products by Quantity Sold", TOP_PRODUCTS))
                .axes("Product", "Quantity")
                .with_series(Series::dense(
                    "Quantity",
                    top_products
                        .iter()
                        .map(|p| (p.product_name.clone(), p.quantity as f64)),
                )),
        ];

        info!(
            sales = sales.len(),
            months = monthly_revenue.len(),
            "Dashboard view computed"
        );

        DashboardView {
            metrics,
            total_sales,
            product_count,
            inventory_value,
            average_sale,
            monthly_revenue,
            top_products,
            charts,
        }
    }

    /// Revenue per month, months ascending; months without sales are absent.
    pub fn monthly_revenue(&self) -> Vec<MonthlyAmount> {
        group_sum(self.data.sales(), |s| s.month(), |s| s.total_price)
            .into_iter()
            .map(|(month, amount)| MonthlyAmount { month, amount })
            .collect()
    }

    /// Products ranked by units sold. Ties keep product id order.
    pub fn top_products_by_quantity(&self, n: usize) -> Vec<ProductQuantity> {
        let totals: Vec<ProductQuantity> = group_sum(
            self.data.sales(),
            |s| s.product_id.clone(),
            |s| u64::from(s.quantity),
        )
        .into_iter()
        .map(|(product_id, quantity)| ProductQuantity {
            product_name: self
                .data
                .product(&product_id)
                .map(|p| p.product_name.clone())
                .unwrap_or_else(|| product_id.clone()),
            product_id,
            quantity,
        })
        .collect();

        top_n(totals, n, |p| p.quantity)
    }
}
