//! The frozen in-memory dataset every view is computed from.

pub mod catalog;
pub mod generator;

pub use generator::generate;

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    errors::ServiceError,
    models::{purchase::COST_RATIO, Product, Purchase, Sale, Supplier},
};

/// Products, sales, suppliers and purchases, indexed by id.
///
/// Built once and never mutated; construction checks referential integrity
/// and the `total = quantity * unit amount` invariant.
#[derive(Debug, Clone)]
pub struct Dataset {
    products: Vec<Product>,
    sales: Vec<Sale>,
    suppliers: Vec<Supplier>,
    purchases: Vec<Purchase>,
    product_index: HashMap<String, usize>,
    supplier_index: HashMap<String, usize>,
}

impl Dataset {
    pub fn from_parts(
        products: Vec<Product>,
        sales: Vec<Sale>,
        suppliers: Vec<Supplier>,
        purchases: Vec<Purchase>,
    ) -> Result<Self, ServiceError> {
        let product_index = index_unique(
            products.iter().map(|p| p.product_id.as_str()),
            "product",
        )?;
        let supplier_index = index_unique(
            suppliers.iter().map(|s| s.supplier_id.as_str()),
            "supplier",
        )?;

        let dataset = Self {
            products,
            sales,
            suppliers,
            purchases,
            product_index,
            supplier_index,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.product_index
            .get(product_id)
            .map(|&idx| &self.products[idx])
    }

    pub fn product_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_name == name)
    }

    pub fn supplier(&self, supplier_id: &str) -> Option<&Supplier> {
        self.supplier_index
            .get(supplier_id)
            .map(|&idx| &self.suppliers[idx])
    }

    pub fn supplier_by_name(&self, name: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.supplier_name == name)
    }

    /// Category of a product id; `None` for ids outside the product table.
    pub fn category_of(&self, product_id: &str) -> Option<&str> {
        self.product(product_id).map(|p| p.category.as_str())
    }

    /// Distinct categories in order of first appearance in the product table.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category) {
                seen.push(product.category.clone());
            }
        }
        seen
    }

    /// Checks foreign keys and row arithmetic.
    pub fn validate(&self) -> Result<(), ServiceError> {
        for sale in &self.sales {
            let product = self.product(&sale.product_id).ok_or_else(|| {
                ServiceError::DataIntegrity(format!(
                    "sale {} references unknown product {}",
                    sale.sale_id, sale.product_id
                ))
            })?;
            if sale.unit_price != product.unit_price {
                return Err(ServiceError::DataIntegrity(format!(
                    "sale {} unit price differs from product {}",
                    sale.sale_id, product.product_id
                )));
            }
            if sale.total_price != Decimal::from(sale.quantity) * sale.unit_price {
                return Err(ServiceError::DataIntegrity(format!(
                    "sale {} total does not equal quantity x unit price",
                    sale.sale_id
                )));
            }
        }

        for purchase in &self.purchases {
            let product = self.product(&purchase.product_id).ok_or_else(|| {
                ServiceError::DataIntegrity(format!(
                    "purchase {} references unknown product {}",
                    purchase.purchase_id, purchase.product_id
                ))
            })?;
            if self.supplier(&purchase.supplier_id).is_none() {
                return Err(ServiceError::DataIntegrity(format!(
                    "purchase {} references unknown supplier {}",
                    purchase.purchase_id, purchase.supplier_id
                )));
            }
            if purchase.unit_cost != product.unit_price * COST_RATIO {
                return Err(ServiceError::DataIntegrity(format!(
                    "purchase {} unit cost is not {} of the product price",
                    purchase.purchase_id, COST_RATIO
                )));
            }
            if purchase.total_cost != Decimal::from(purchase.quantity) * purchase.unit_cost {
                return Err(ServiceError::DataIntegrity(format!(
                    "purchase {} total does not equal quantity x unit cost",
                    purchase.purchase_id
                )));
            }
        }

        Ok(())
    }
}

fn index_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
) -> Result<HashMap<String, usize>, ServiceError> {
    let mut index = HashMap::new();
    for (pos, id) in ids.enumerate() {
        if index.insert(id.to_string(), pos).is_some() {
            return Err(ServiceError::DataIntegrity(format!(
                "duplicate {} id {}",
                kind, id
            )));
        }
    }
    Ok(index)
}
