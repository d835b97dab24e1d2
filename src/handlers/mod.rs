pub mod analytics;
pub mod catalog;
pub mod common;
pub mod finance;
pub mod forecast;
pub mod frontend;
pub mod inventory;
pub mod sales;
pub mod suppliers;
