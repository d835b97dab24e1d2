use std::{collections::BTreeSet, sync::Arc};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::aggregate::{format_currency, group_sum, percent, round2, to_f64, top_n};
use crate::{
    data::Dataset,
    reports::{ChartSpec, Metric, Series},
};

pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfitSummary {
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub profit: Decimal,
    /// `profit / revenue * 100` to two decimals; zero when there is no revenue
    pub profit_margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryMargin {
    pub category: String,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub margin: Decimal,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductProfit {
    pub product_id: String,
    pub product_name: String,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRoi {
    pub product_id: String,
    pub product_name: String,
    pub profit: Decimal,
    pub cost: Decimal,
    /// `profit / cost * 100`
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinanceView {
    pub metrics: Vec<Metric>,
    pub summary: ProfitSummary,
    pub category_margins: Vec<CategoryMargin>,
    pub product_profit: Vec<ProductProfit>,
    pub top_profitable: Vec<ProductProfit>,
    pub top_roi: Vec<ProductRoi>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Clone)]
pub struct FinanceService {
    data: Arc<Dataset>,
    currency_symbol: String,
}

impl FinanceService {
    pub fn new(data: Arc<Dataset>, currency_symbol: impl Into<String>) -> Self {
        Self {
            data,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn summary(&self) -> ProfitSummary {
        let total_revenue: Decimal = self.data.sales().iter().map(|s| s.total_price).sum();
        let total_expense: Decimal = self.data.purchases().iter().map(|p| p.total_cost).sum();
        let profit = total_revenue - total_expense;
        let profit_margin_pct = if total_revenue > Decimal::ZERO {
            percent(profit, total_revenue).map(round2).unwrap_or_default()
        } else {
            0.0
        };

        ProfitSummary {
            total_revenue,
            total_expense,
            profit,
            profit_margin_pct,
        }
    }

    /// Revenue against purchase cost per category.
    ///
    /// Only categories with both sales and purchases appear; categories with
    /// zero revenue are dropped.
    pub fn category_margins(&self) -> Vec<CategoryMargin> {
        let category = |product_id: &str| self.data.category_of(product_id).map(str::to_string);

        let revenue = group_sum(
            self.data
                .sales()
                .iter()
                .filter(|s| self.data.product(&s.product_id).is_some()),
            |s| category(&s.product_id).unwrap_or_default(),
            |s| s.total_price,
        );
        let cost = group_sum(
            self.data
                .purchases()
                .iter()
                .filter(|p| self.data.product(&p.product_id).is_some()),
            |p| category(&p.product_id).unwrap_or_default(),
            |p| p.total_cost,
        );

        revenue
            .into_iter()
            .filter(|(_, revenue)| !revenue.is_zero())
            .filter_map(|(category, revenue)| {
                let cost = *cost.get(&category)?;
                let margin = revenue - cost;
                Some(CategoryMargin {
                    margin_pct: percent(margin, revenue).unwrap_or_default(),
                    category,
                    revenue,
                    cost,
                    margin,
                })
            })
            .collect()
    }

    /// Revenue and cost per product; a product missing from either side counts as zero.
    pub fn product_profit(&self) -> Vec<ProductProfit> {
        let revenue = group_sum(
            self.data.sales(),
            |s| s.product_id.clone(),
            |s| s.total_price,
        );
        let cost = group_sum(
            self.data.purchases(),
            |p| p.product_id.clone(),
            |p| p.total_cost,
        );

        let ids: BTreeSet<&String> = revenue.keys().chain(cost.keys()).collect();
        ids.into_iter()
            .filter_map(|id| {
                let product = self.data.product(id)?;
                let revenue = revenue.get(id).copied().unwrap_or_default();
                let cost = cost.get(id).copied().unwrap_or_default();
                Some(ProductProfit {
                    product_id: id.clone(),
                    product_name: product.product_name.clone(),
                    revenue,
                    cost,
                    profit: revenue - cost,
                })
            })
            .collect()
    }

    pub fn roi(&self, profits: &[ProductProfit]) -> Vec<ProductRoi> {
        profits
            .iter()
            .filter_map(|p| {
                let roi = percent(p.profit, p.cost)?;
                Some(ProductRoi {
                    product_id: p.product_id.clone(),
                    product_name: p.product_name.clone(),
                    profit: p.profit,
                    cost: p.cost,
                    roi,
                })
            })
            .collect()
    }

    pub fn report(&self) -> FinanceView {
        let summary = self.summary();
        let category_margins = self.category_margins();
        let product_profit = self.product_profit();
        let top_profitable = top_n(product_profit.clone(), TOP_PRODUCTS, |p| p.profit);
        let top_roi = top_n(self.roi(&product_profit), TOP_PRODUCTS, |p| p.roi);

        let metrics = vec![
            Metric::new(
                "total_revenue",
                "Total Revenue",
                format_currency(&self.currency_symbol, summary.total_revenue),
            ),
            Metric::new(
                "total_expense",
                "Total Expense",
                format_currency(&self.currency_symbol, summary.total_expense),
            ),
            Metric::new(
                "profit",
                "Profit/Loss",
                format_currency(&self.currency_symbol, summary.profit),
            )
            .with_delta(format!("{:.2}%", summary.profit_margin_pct)),
        ];

        let charts = vec![
            ChartSpec::bar("Margin by Category (%)")
                .axes("Category", "Margin %")
                .with_series(Series::dense(
                    "Margin %",
                    category_margins
                        .iter()
                        .map(|c| (c.category.clone(), c.margin_pct)),
                )),
            ChartSpec::bar(format!("Top {} Most Profitable Products", TOP_PRODUCTS))
                .axes("Product", "Profit")
                .with_series(Series::dense(
                    "Profit",
                    top_profitable
                        .iter()
                        .map(|p| (p.product_name.clone(), to_f64(p.profit))),
                )),
            ChartSpec::bar(format!("Top {} Products by ROI", TOP_PRODUCTS))
                .axes("Product", "ROI %")
                .with_series(Series::dense(
                    "ROI %",
                    top_roi.iter().map(|p| (p.product_name.clone(), p.roi)),
                )),
        ];

        info!(
            revenue = %summary.total_revenue,
            expense = %summary.total_expense,
            "Finance report computed"
        );

        FinanceView {
            metrics,
            summary,
            category_margins,
            product_profit,
            top_profitable,
            top_roi,
            charts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::fixtures::{date, product, small},
        models::Sale,
    };
    use rust_decimal_macros::dec;

    fn service() -> FinanceService {
        FinanceService::new(Arc::new(small()), "Rp")
    }

    #[test]
    fn revenue_expense_profit() {
        let summary = service().summary();
        assert_eq!(summary.total_revenue, dec!(8100));
        // 7000 + 2800 + 7000
        assert_eq!(summary.total_expense, dec!(16800));
        assert_eq!(summary.profit, dec!(-8700));
        assert_eq!(summary.profit_margin_pct, -107.41);
    }

    #[test]
    fn margin_without_revenue_is_zero() {
        let products = vec![product("P001", "Laptop", "Elektronik", dec!(10), 1)];
        let data = Dataset::from_parts(products, vec![], vec![], vec![]).unwrap();
        let summary = FinanceService::new(Arc::new(data), "Rp").summary();
        assert_eq!(summary.profit_margin_pct, 0.0);
    }

    #[test]
    fn category_margins_inner_join() {
        let margins = service().category_margins();
        let rows: Vec<_> = margins
            .iter()
            .map(|m| (m.category.as_str(), m.revenue, m.cost, m.margin))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Aksesori", dec!(1100), dec!(2800), dec!(-1700)),
                ("Elektronik", dec!(7000), dec!(14000), dec!(-7000)),
            ]
        );
        assert_eq!(margins[1].margin_pct, -100.0);
    }

    #[test]
    fn category_without_purchases_is_dropped() {
        let products = vec![
            product("P001", "Laptop", "Elektronik", dec!(1000), 5),
            product("P002", "Kabel", "Jaringan", dec!(50), 5),
        ];
        let sales = vec![Sale::new("S0000".into(), &products[1], 2, date(2023, 1, 1))];
        let data = Dataset::from_parts(products, sales, vec![], vec![]).unwrap();
        let margins = FinanceService::new(Arc::new(data), "Rp").category_margins();
        assert!(margins.is_empty());
    }

    #[test]
    fn product_profit_outer_join_fills_zero() {
        let profits = service().product_profit();
        let rows: Vec<_> = profits
            .iter()
            .map(|p| (p.product_id.as_str(), p.revenue, p.cost, p.profit))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("P001", dec!(7000), dec!(14000), dec!(-7000)),
                ("P002", dec!(500), dec!(0), dec!(500)),
                ("P003", dec!(600), dec!(2800), dec!(-2200)),
            ]
        );
    }

    #[test]
    fn roi_skips_products_without_cost() {
        let svc = service();
        let roi = svc.roi(&svc.product_profit());
        assert!(roi.iter().all(|r| !r.cost.is_zero()));
        assert_eq!(roi.len(), 2);
        assert_eq!(roi[0].roi, -50.0);
    }

    #[test]
    fn report_ranks_top_products() {
        let view = service().report();
        let profitable: Vec<_> = view
            .top_profitable
            .iter()
            .map(|p| p.product_name.as_str())
            .collect();
        assert_eq!(profitable, vec!["Mouse", "Keyboard", "Laptop"]);
        assert_eq!(view.top_roi[0].product_name, "Laptop");
        assert_eq!(view.metrics[2].delta.as_deref(), Some("-107.41%"));
        assert_eq!(view.charts.len(), 3);
    }
}
