use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Product, Supplier};

/// Purchase cost as a fraction of the product's selling price.
pub const COST_RATIO: Decimal = dec!(0.7);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Purchase {
    #[schema(example = "PUR0000")]
    pub purchase_id: String,

    #[schema(example = "P001")]
    pub product_id: String,

    #[schema(example = "SUP01")]
    pub supplier_id: String,

    pub quantity: u32,

    /// `COST_RATIO * product.unit_price`
    pub unit_cost: Decimal,

    /// Always `quantity * unit_cost`
    pub total_cost: Decimal,

    pub date: NaiveDate,
}

impl Purchase {
    pub fn new(
        purchase_id: String,
        product: &Product,
        supplier: &Supplier,
        quantity: u32,
        date: NaiveDate,
    ) -> Self {
        let unit_cost = product.unit_price * COST_RATIO;
        Self {
            purchase_id,
            product_id: product.product_id.clone(),
            supplier_id: supplier.supplier_id.clone(),
            quantity,
            unit_cost,
            total_cost: Decimal::from(quantity) * unit_cost,
            date,
        }
    }

    pub fn month(&self) -> String {
        super::month_key(self.date)
    }
}
