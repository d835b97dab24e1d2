//! Row types for the four in-memory tables.

pub mod product;
pub mod purchase;
pub mod sale;
pub mod supplier;

pub use product::Product;
pub use purchase::Purchase;
pub use sale::Sale;
pub use supplier::Supplier;

use chrono::{Datelike, NaiveDate};

/// Month bucket used by every monthly series, formatted `YYYY-MM`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
