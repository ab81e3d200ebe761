mod common;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{router_over, send};
use product_service::error::StoreError;
use product_service::models::{Product, ProductDraft, ProductId, ProductPatch};
use product_service::services::{Page, ProductFilter, ProductStore};
use serde_json::json;
use std::sync::Arc;

const SOME_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

/// Every operation fails as if the database had gone away.
struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Unavailable("server selection timeout: db.internal:27017".to_string())
}

#[async_trait]
impl ProductStore for UnreachableStore {
    async fn find(&self, _: &ProductFilter, _: Page) -> Result<Vec<Product>, StoreError> {
        Err(unreachable())
    }

    async fn create(&self, _: ProductDraft) -> Result<Product, StoreError> {
        Err(unreachable())
    }

    async fn find_by_id(&self, _: &ProductId) -> Result<Option<Product>, StoreError> {
        Err(unreachable())
    }

    async fn find_one_and_delete(&self, _: &ProductId) -> Result<Option<Product>, StoreError> {
        Err(unreachable())
    }

    async fn find_one_and_update(
        &self,
        _: &ProductId,
        _: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        Err(unreachable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

/// Panics inside the handler's storage call.
struct PanickingStore;

#[async_trait]
impl ProductStore for PanickingStore {
    async fn find(&self, _: &ProductFilter, _: Page) -> Result<Vec<Product>, StoreError> {
        panic!("cursor exploded")
    }

    async fn create(&self, _: ProductDraft) -> Result<Product, StoreError> {
        panic!("insert exploded")
    }

    async fn find_by_id(&self, _: &ProductId) -> Result<Option<Product>, StoreError> {
        panic!("lookup exploded")
    }

    async fn find_one_and_delete(&self, _: &ProductId) -> Result<Option<Product>, StoreError> {
        panic!("delete exploded")
    }

    async fn find_one_and_update(
        &self,
        _: &ProductId,
        _: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        panic!("update exploded")
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

async fn assert_internal(method: Method, uri: &str, body: Option<serde_json::Value>, code: &str) {
    let app = router_over(Arc::new(UnreachableStore));

    let response = send(&app, method, uri, body).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({ "code": code, "message": "An internal error has occurred" })
    );
    assert!(!response.text().contains("db.internal"));
}

#[tokio::test]
async fn list_failure_maps_to_err_6778() {
    assert_internal(Method::GET, "/products", None, "ERR_6778").await;
}

#[tokio::test]
async fn create_failure_maps_to_err_6779() {
    assert_internal(
        Method::POST,
        "/products",
        Some(json!({ "name": "Widget" })),
        "ERR_6779",
    )
    .await;
}

#[tokio::test]
async fn fetch_failure_maps_to_err_6779() {
    assert_internal(Method::GET, &format!("/products/{}", SOME_ID), None, "ERR_6779").await;
}

#[tokio::test]
async fn delete_failure_maps_to_err_6780() {
    assert_internal(
        Method::DELETE,
        &format!("/products/{}", SOME_ID),
        None,
        "ERR_6780",
    )
    .await;
}

#[tokio::test]
async fn update_failure_maps_to_err_6781() {
    assert_internal(
        Method::PATCH,
        &format!("/products/{}", SOME_ID),
        Some(json!({ "name": "Renamed" })),
        "ERR_6781",
    )
    .await;
}

#[tokio::test]
async fn validation_runs_before_storage() {
    let app = router_over(Arc::new(UnreachableStore));
    let name = "x".repeat(150);

    let response = send(&app, Method::GET, &format!("/products?name={}", name), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "message": "The name is too long" }));
}

#[tokio::test]
async fn panics_become_generic_json_500() {
    let app = router_over(Arc::new(PanickingStore));

    for (method, uri, body) in [
        (Method::GET, "/products".to_string(), None),
        (
            Method::DELETE,
            format!("/products/{}", SOME_ID),
            None,
        ),
        (
            Method::PATCH,
            format!("/products/{}", SOME_ID),
            Some(json!({ "name": "x" })),
        ),
    ] {
        let response = send(&app, method, &uri, body).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json(),
            json!({ "code": "ERR_6700", "message": "An internal error has occurred" })
        );
    }
}

#[tokio::test]
async fn health_reports_unavailable_storage() {
    let app = router_over(Arc::new(UnreachableStore));

    let health = send(&app, Method::GET, "/health", None).await;
    let ready = send(&app, Method::GET, "/ready", None).await;

    assert_eq!(health.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health.json()["status"], "unhealthy");
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
}
