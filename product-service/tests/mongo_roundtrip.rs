mod common;

use common::TestApp;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "Requires MongoDB (set MONGODB_URI, default mongodb://localhost:27017)"]
async fn crud_round_trip_against_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();
    let products = format!("{}/products", app.address);

    let created: Value = client
        .post(&products)
        .json(&json!({ "name": "Widget", "price": 10, "color": "red" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["_id"].as_str().unwrap().to_string();
    let product_url = format!("{}/{}", products, id);

    let fetched = client.get(&product_url).send().await.unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(fetched.json::<Value>().await.unwrap(), created);

    let updated: Value = client
        .patch(&product_url)
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        updated,
        json!({ "_id": id, "name": "Renamed", "price": 10, "color": "red" })
    );

    let deleted = client.delete(&product_url).send().await.unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(deleted.json::<Value>().await.unwrap(), updated);

    let gone = client.get(&product_url).send().await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB (set MONGODB_URI, default mongodb://localhost:27017)"]
async fn name_filter_and_paging_against_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();
    let products = format!("{}/products", app.address);

    for i in 0..25 {
        let name = if i % 2 == 0 {
            format!("Widget {}", i)
        } else {
            format!("gadget {}", i)
        };
        client
            .post(&products)
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
    }

    let widgets: Vec<Value> = client
        .get(format!("{}?name=WIDGET", products))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(widgets.len(), 10);
    assert!(widgets
        .iter()
        .all(|p| p["name"].as_str().unwrap().starts_with("Widget")));

    let third_page: Vec<Value> = client
        .get(format!("{}?page=2", products))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(third_page.len(), 5);
    assert_eq!(third_page[0]["name"], "Widget 20");

    app.cleanup().await;
}
