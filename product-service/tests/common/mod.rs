#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use product_service::config::ProductConfig;
use product_service::services::{InMemoryProductStore, MongoDb, ProductStore};
use product_service::{build_router, AppState, Application};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }
}

/// Router over a fresh in-memory store, plus the store for inspection.
pub fn in_memory_app() -> (Router, Arc<InMemoryProductStore>) {
    let store = Arc::new(InMemoryProductStore::new());
    (router_over(store.clone()), store)
}

pub fn router_over(store: Arc<dyn ProductStore>) -> Router {
    build_router(AppState::new(store))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(app, builder.body(body).unwrap()).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
    use tower::ServiceExt;

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

/// Create a product through the API and return its id.
pub async fn create(app: &Router, body: Value) -> String {
    let response = send(app, Method::POST, "/products", Some(body)).await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()["_id"]
        .as_str()
        .expect("created product has an _id")
        .to_string()
}

/// A running server backed by a real MongoDB, for end-to-end tests.
pub struct TestApp {
    pub address: String,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("product_test_{}", ObjectId::new().to_hex());
        let mut config: ProductConfig = config::Config::builder()
            .set_override(
                "database.url",
                std::env::var("MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            )
            .unwrap()
            .set_override("database.name", db_name.clone())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .expect("Failed to load configuration");
        config.common.port = 0;

        let db = MongoDb::connect(
            config.database.url.expose_secret(),
            &config.database.name,
            &config.database.app_name,
        )
        .await
        .expect("Failed to connect to MongoDB");

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the root endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
