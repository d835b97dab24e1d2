use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Single-page dashboard; views and charts are fetched from the JSON API.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
