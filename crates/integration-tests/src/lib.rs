//! Integration test support for Raincheck.
//!
//! Builds the full application router against two mocked upstreams - the
//! hosted data store and the weather API - so the HTTP surface can be
//! exercised end-to-end with `tower::ServiceExt::oneshot`, no network or
//! credentials required.

// Test support: panicking on malformed fixtures is the desired behavior.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use secrecy::SecretString;
use tower::ServiceExt;
use wiremock::MockServer;

use raincheck_server::config::{RaincheckConfig, StoreConfig, WeatherConfig};
use raincheck_server::state::AppState;

/// The merchant identifier used by most tests.
pub const MERCHANT: &str = "m-1";

/// The merchant header every scoped route requires.
pub const MERCHANT_HEADER: &str = "x-user-id";

/// A full application instance wired to mocked upstreams.
pub struct TestContext {
    pub app: Router,
    /// Mocked hosted data store (PostgREST dialect).
    pub store: MockServer,
    /// Mocked weather API.
    pub weather: MockServer,
}

impl TestContext {
    /// Start both mock upstreams and build the app against them.
    pub async fn new() -> Self {
        let store = MockServer::start().await;
        let weather = MockServer::start().await;

        let config = RaincheckConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            http_timeout: Duration::from_secs(2),
            store: StoreConfig {
                url: store.uri(),
                api_key: SecretString::from("test-store-key"),
            },
            weather: WeatherConfig {
                base_url: weather.uri(),
                api_key: SecretString::from("test-weather-key"),
                default_city: "Jakarta".to_owned(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("failed to build app state");

        Self {
            app: raincheck_server::app(state),
            store,
            weather,
        }
    }

    /// Send one request through the router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        merchant: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(merchant) = merchant {
            builder = builder.header(MERCHANT_HEADER, merchant);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A `products` row as the store returns it.
#[must_use]
pub fn product_row(id: i64, merchant: &str, name: &str, stock: i64, price: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user_id": merchant,
        "name": name,
        "stock": stock,
        "price": price,
    })
}

/// A `sales_log` row as the store returns it.
#[must_use]
pub fn sale_row(
    id: i64,
    merchant: &str,
    product_id: i64,
    quantity: i64,
    date: &str,
    weather: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user_id": merchant,
        "product_id": product_id,
        "quantity_sold": quantity,
        "date": date,
        "recorded_weather": weather,
    })
}
