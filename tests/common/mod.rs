use std::str::FromStr;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use ppic_dashboard::{
    build_router,
    config::{AppConfig, DataConfig},
    data, AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

/// Router over a freshly generated dataset, driven in-process with `oneshot`.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Application over the default-sized dataset.
    pub fn new() -> Self {
        Self::with_data_config(DataConfig::default())
    }

    pub fn with_data_config(data_config: DataConfig) -> Self {
        let cfg = AppConfig {
            environment: "test".to_string(),
            data: data_config,
            ..AppConfig::default()
        };
        let dataset = data::generate(&cfg.data).expect("dataset generation");
        let state = AppState::new(cfg, dataset);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub async fn request(&self, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri).await
    }

    /// GET `uri` and decode the JSON body, asserting the status code.
    pub async fn get_json(&self, uri: &str, status: u16) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), status, "unexpected status for {}", uri);
        response_json(response).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Decimals serialize as strings.
pub fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).expect("decimal")
}
