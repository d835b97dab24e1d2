use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Product;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    #[schema(example = "S0000")]
    pub sale_id: String,

    #[schema(example = "P001")]
    pub product_id: String,

    pub quantity: u32,

    /// Product list price at the time of the sale
    pub unit_price: Decimal,

    /// Always `quantity * unit_price`
    pub total_price: Decimal,

    pub date: NaiveDate,
}

impl Sale {
    /// Builds a sale of `quantity` units of `product`, copying its current price.
    pub fn new(sale_id: String, product: &Product, quantity: u32, date: NaiveDate) -> Self {
        let unit_price = product.unit_price;
        Self {
            sale_id,
            product_id: product.product_id.clone(),
            quantity,
            unit_price,
            total_price: Decimal::from(quantity) * unit_price,
            date,
        }
    }

    pub fn month(&self) -> String {
        super::month_key(self.date)
    }
}
