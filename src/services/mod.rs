// Shared aggregation helpers
pub mod aggregate;

// One service per dashboard view
pub mod analytics;
pub mod finance;
pub mod forecasting;
pub mod inventory;
pub mod sales;
pub mod suppliers;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use utoipa::ToSchema;

/// Dashboard views in menu order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewKind {
    Dashboard,
    Sales,
    Inventory,
    Forecast,
    Suppliers,
    Finance,
}

impl ViewKind {
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Dashboard => "Dashboard",
            ViewKind::Sales => "Sales Analysis",
            ViewKind::Inventory => "Inventory Management",
            ViewKind::Forecast => "Demand Forecasting",
            ViewKind::Suppliers => "Supplier Analysis",
            ViewKind::Finance => "Financial Report",
        }
    }

    /// JSON endpoint serving this view.
    pub fn endpoint(&self) -> String {
        format!("/api/v1/{}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ViewInfo {
    pub key: ViewKind,
    pub title: String,
    pub endpoint: String,
}

pub fn menu() -> Vec<ViewInfo> {
    ViewKind::iter()
        .map(|kind| ViewInfo {
            key: kind,
            title: kind.title().to_string(),
            endpoint: kind.endpoint(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lists_six_views_in_order() {
        let keys: Vec<_> = menu().into_iter().map(|v| v.key).collect();
        assert_eq!(
            keys,
            vec![
                ViewKind::Dashboard,
                ViewKind::Sales,
                ViewKind::Inventory,
                ViewKind::Forecast,
                ViewKind::Suppliers,
                ViewKind::Finance,
            ]
        );
    }

    #[test]
    fn endpoints_follow_view_key() {
        assert_eq!(ViewKind::Suppliers.endpoint(), "/api/v1/suppliers");
        assert_eq!(
            serde_json::to_value(ViewKind::Forecast).unwrap(),
            serde_json::json!("forecast")
        );
    }
}
