use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = "P001")]
    pub product_id: String,

    #[schema(example = "Laptop ASUS X441")]
    pub product_name: String,

    #[schema(example = "Elektronik")]
    pub category: String,

    pub unit_price: Decimal,

    pub stock: u32,
}

impl Product {
    /// Value of the units on hand at list price.
    pub fn inventory_value(&self) -> Decimal {
        Decimal::from(self.stock) * self.unit_price
    }
}
