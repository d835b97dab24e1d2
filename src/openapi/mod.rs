use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PPIC Dashboard API",
        version = "0.1.0",
        description = r#"
# PPIC Dashboard API

Read-only analytics over a synthetic inventory dataset (products, sales,
suppliers, purchases) generated once at startup.

## Views

- **Dashboard**: headline totals, monthly revenue, best sellers
- **Sales**: date and category filters, revenue per category, top products
- **Inventory**: stock levels, value per category, stock distribution
- **Forecast**: moving-average demand forecast and purchase recommendation
- **Suppliers**: purchase performance and per-supplier drill-down
- **Finance**: revenue against cost, category margins, profit and ROI

Every chart is returned as a chart spec (`kind`, `title`, axes, `series`).

## Error Handling

Errors share one body format:

```json
{
  "error": "Bad Request",
  "message": "window must be between 2 and 6",
  "request_id": "6c1f...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Views", description = "Dashboard view endpoints"),
        (name = "Catalog", description = "Menu and category listings")
    ),
    paths(
        crate::handlers::catalog::list_views,
        crate::handlers::catalog::list_categories,
        crate::handlers::analytics::get_dashboard,
        crate::handlers::sales::get_sales,
        crate::handlers::inventory::get_inventory,
        crate::handlers::forecast::get_forecast,
        crate::handlers::suppliers::get_suppliers,
        crate::handlers::finance::get_finance,
    ),
    components(
        schemas(
            crate::models::Product,
            crate::models::Sale,
            crate::models::Supplier,
            crate::models::Purchase,
            crate::reports::ChartSpec,
            crate::reports::Metric,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_view() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("PPIC Dashboard API"));
        for path in [
            "/api/v1/dashboard",
            "/api/v1/sales",
            "/api/v1/inventory",
            "/api/v1/forecast",
            "/api/v1/suppliers",
            "/api/v1/finance",
        ] {
            assert!(json.contains(path), "missing {}", path);
        }
    }
}
