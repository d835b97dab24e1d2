use std::{collections::BTreeMap, sync::Arc};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::{
    aggregate::{group_sum, to_f64},
    analytics::MonthlyAmount,
};
use crate::{
    data::Dataset,
    errors::ServiceError,
    models::{Product, Purchase, Supplier},
    reports::{ChartSpec, Series},
};

/// Purchase totals for one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierPerformance {
    pub supplier_name: String,
    pub total_cost: Decimal,
    pub total_items: u64,
    /// Distinct products bought from this supplier
    pub product_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierProduct {
    pub product_name: String,
    pub quantity: u64,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierDetail {
    pub supplier: Supplier,
    pub total_cost: Decimal,
    pub products: Vec<SupplierProduct>,
    pub monthly_cost: Vec<MonthlyAmount>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuppliersView {
    /// One row per supplier with purchases, ordered by supplier name
    pub performance: Vec<SupplierPerformance>,
    pub charts: Vec<ChartSpec>,
    pub detail: SupplierDetail,
}

/// Which supplier to drill into. Id wins over name; neither selects the first supplier.
#[derive(Debug, Clone, Default)]
pub struct SupplierSelector {
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
}

/// A purchase joined with its supplier and product
struct PurchaseLine<'a> {
    purchase: &'a Purchase,
    supplier: &'a Supplier,
    product: &'a Product,
}

#[derive(Clone)]
pub struct SupplierService {
    data: Arc<Dataset>,
}

impl SupplierService {
    pub fn new(data: Arc<Dataset>) -> Self {
        Self { data }
    }

    fn lines(&self) -> Vec<PurchaseLine<'_>> {
        self.data
            .purchases()
            .iter()
            .filter_map(|purchase| {
                Some(PurchaseLine {
                    supplier: self.data.supplier(&purchase.supplier_id)?,
                    product: self.data.product(&purchase.product_id)?,
                    purchase,
                })
            })
            .collect()
    }

    pub fn performance(&self) -> Vec<SupplierPerformance> {
        #[derive(Default)]
        struct Totals<'a> {
            cost: Decimal,
            items: u64,
            products: Vec<&'a str>,
        }

        let lines = self.lines();
        let mut by_name: BTreeMap<&str, Totals<'_>> = BTreeMap::new();
        for line in &lines {
            let totals = by_name
                .entry(line.supplier.supplier_name.as_str())
                .or_default();
            totals.cost += line.purchase.total_cost;
            totals.items += u64::from(line.purchase.quantity);
            if !totals.products.contains(&line.product.product_id.as_str()) {
                totals.products.push(&line.product.product_id);
            }
        }

        by_name
            .into_iter()
            .map(|(name, totals)| SupplierPerformance {
                supplier_name: name.to_string(),
                total_cost: totals.cost,
                total_items: totals.items,
                product_count: totals.products.len(),
            })
            .collect()
    }

    pub fn resolve_supplier(&self, selector: &SupplierSelector) -> Result<&Supplier, ServiceError> {
        match (&selector.supplier_id, &selector.supplier_name) {
            (Some(id), _) => self
                .data
                .supplier(id)
                .ok_or_else(|| ServiceError::NotFound(format!("supplier {}", id))),
            (None, Some(name)) => self
                .data
                .supplier_by_name(name)
                .ok_or_else(|| ServiceError::NotFound(format!("supplier named {}", name))),
            (None, None) => self
                .data
                .suppliers()
                .first()
                .ok_or_else(|| ServiceError::NotFound("no suppliers available".into())),
        }
    }

    pub fn detail(&self, selector: &SupplierSelector) -> Result<SupplierDetail, ServiceError> {
        let supplier = self.resolve_supplier(selector)?.clone();
        let lines: Vec<PurchaseLine<'_>> = self
            .lines()
            .into_iter()
            .filter(|line| line.supplier.supplier_id == supplier.supplier_id)
            .collect();

        let quantities = group_sum(
            &lines,
            |l| l.product.product_name.clone(),
            |l| u64::from(l.purchase.quantity),
        );
        let costs = group_sum(
            &lines,
            |l| l.product.product_name.clone(),
            |l| l.purchase.total_cost,
        );
        let products: Vec<SupplierProduct> = quantities
            .into_iter()
            .map(|(product_name, quantity)| SupplierProduct {
                total_cost: costs.get(&product_name).copied().unwrap_or_default(),
                product_name,
                quantity,
            })
            .collect();

        let monthly_cost: Vec<MonthlyAmount> =
            group_sum(&lines, |l| l.purchase.month(), |l| l.purchase.total_cost)
                .into_iter()
                .map(|(month, amount)| MonthlyAmount { month, amount })
                .collect();

        let total_cost = lines.iter().map(|l| l.purchase.total_cost).sum();

        let charts = vec![
            ChartSpec::pie(format!("Purchases from {}", supplier.supplier_name)).with_series(
                Series::dense(
                    "Quantity",
                    products
                        .iter()
                        .map(|p| (p.product_name.clone(), p.quantity as f64)),
                ),
            ),
            ChartSpec::line(format!("Purchase Trend for {}", supplier.supplier_name))
                .axes("Month", "Total cost")
                .with_series(Series::dense(
                    "Total cost",
                    monthly_cost
                        .iter()
                        .map(|m| (m.month.clone(), to_f64(m.amount))),
                )),
        ];

        Ok(SupplierDetail {
            supplier,
            total_cost,
            products,
            monthly_cost,
            charts,
        })
    }

    pub fn analyze(&self, selector: &SupplierSelector) -> Result<SuppliersView, ServiceError> {
        let detail = self.detail(selector)?;
        let performance = self.performance();

        let charts = vec![ChartSpec::bar("Total Purchases per Supplier")
            .axes("Supplier", "Total cost")
            .with_series(Series::dense(
                "Total cost",
                performance
                    .iter()
                    .map(|p| (p.supplier_name.clone(), to_f64(p.total_cost))),
            ))];

        info!(
            suppliers = performance.len(),
            selected = %detail.supplier.supplier_id,
            "Supplier view computed"
        );

        Ok(SuppliersView {
            performance,
            charts,
            detail,
        })
    }
}
