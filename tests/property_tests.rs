//! Property-based tests for dataset generation and the analytics calculations.
//!
//! Datasets are generated from arbitrary seeds and sizes so the invariants hold
//! for more than the default configuration.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use ppic_dashboard::{
    config::DataConfig,
    data::{self, Dataset},
    services::{
        finance::FinanceService,
        forecasting::{moving_average_forecast, recommended_order},
        sales::{SalesFilter, SalesService},
    },
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn data_config_strategy() -> impl Strategy<Value = DataConfig> {
    (any::<u64>(), 1usize..300, 1usize..80, 1u32..400).prop_map(
        |(seed, sales_count, purchase_count, day_span)| DataConfig {
            seed,
            sales_count,
            purchase_count,
            day_span,
            ..DataConfig::default()
        },
    )
}

fn generated(cfg: &DataConfig) -> Dataset {
    data::generate(cfg).expect("generated dataset")
}

fn category_subset_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(vec!["Elektronik", "Aksesori", "Komponen", "Jaringan"], 0..=4)
        .prop_map(|cats| cats.into_iter().map(String::from).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn same_seed_gives_identical_dataset(cfg in data_config_strategy()) {
        let first = generated(&cfg);
        let second = generated(&cfg);

        prop_assert_eq!(first.products(), second.products());
        prop_assert_eq!(first.sales(), second.sales());
        prop_assert_eq!(first.purchases(), second.purchases());
    }

    #[test]
    fn generated_rows_are_consistent(cfg in data_config_strategy()) {
        let dataset = generated(&cfg);
        let last_day = cfg.start_date + Duration::days(i64::from(cfg.day_span) - 1);

        prop_assert_eq!(dataset.sales().len(), cfg.sales_count);
        prop_assert_eq!(dataset.purchases().len(), cfg.purchase_count);

        for sale in dataset.sales() {
            let product = dataset.product(&sale.product_id);
            prop_assert!(product.is_some(), "dangling product {}", sale.product_id);
            prop_assert_eq!(sale.unit_price, product.unwrap().unit_price);
            prop_assert_eq!(sale.total_price, sale.unit_price * Decimal::from(sale.quantity));
            prop_assert!((1..10).contains(&sale.quantity));
            prop_assert!(sale.date >= cfg.start_date && sale.date <= last_day);
        }

        for purchase in dataset.purchases() {
            let product = dataset.product(&purchase.product_id);
            prop_assert!(product.is_some());
            prop_assert!(dataset.supplier(&purchase.supplier_id).is_some());
            prop_assert_eq!(purchase.unit_cost, product.unwrap().unit_price * dec!(0.7));
            prop_assert_eq!(
                purchase.total_cost,
                purchase.unit_cost * Decimal::from(purchase.quantity)
            );
            prop_assert!((10..100).contains(&purchase.quantity));
        }

        prop_assert!(dataset.validate().is_ok());
    }

    #[test]
    fn category_revenue_partitions_total(
        cfg in data_config_strategy(),
        categories in category_subset_strategy(),
        start_offset in 0i64..200,
        span in 0i64..200,
    ) {
        let dataset = Arc::new(generated(&cfg));
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Duration::days(start_offset);
        let filter = SalesFilter::new(start, start + Duration::days(span)).with_categories(categories);

        let view = SalesService::new(dataset, "Rp").analyze(&filter).unwrap();
        let per_category: Decimal = view.revenue_by_category.iter().map(|c| c.revenue).sum();
        let row_total: Decimal = view.rows.iter().map(|r| r.total_price).sum();

        prop_assert_eq!(per_category, view.total_revenue);
        prop_assert_eq!(row_total, view.total_revenue);
        prop_assert!(view.top_products.len() <= 5);
    }

    #[test]
    fn roi_never_divides_by_zero_cost(cfg in data_config_strategy()) {
        let service = FinanceService::new(Arc::new(generated(&cfg)), "Rp");
        let profits = service.product_profit();

        let keys: Vec<&str> = profits.iter().map(|p| p.product_id.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys, sorted);

        for row in service.roi(&profits) {
            prop_assert!(row.cost != Decimal::ZERO);
            prop_assert!(row.roi.is_finite());
        }

        let summary = service.summary();
        prop_assert_eq!(summary.profit, summary.total_revenue - summary.total_expense);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn forecast_leaves_window_leading_gaps(
        values in prop::collection::vec(0.0f64..500.0, 0..24),
        window in 2usize..=6,
    ) {
        let forecast = moving_average_forecast(&values, window);
        prop_assert_eq!(forecast.len(), values.len());

        for (i, point) in forecast.iter().enumerate() {
            if i < window {
                prop_assert!(point.is_none());
            } else {
                let expected = values[i - window..i].iter().sum::<f64>() / window as f64;
                prop_assert!((point.unwrap() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn recommended_order_covers_demand(average in 0.0f64..10_000.0, stock in 0u32..10_000) {
        let order = recommended_order(average, stock);
        let shortfall = average * 1.5 - f64::from(stock);

        if shortfall <= 0.0 {
            prop_assert_eq!(order, 0);
        } else {
            prop_assert!((order as f64 - shortfall).abs() <= 0.5);
        }
    }
}
