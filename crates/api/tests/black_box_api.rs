use reqwest::StatusCode;
use serde_json::{Value, json};

use shop_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.put(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    async fn create(&self, path: &str, body: Value) -> Value {
        let res = self.post(path, body).await;
        let status = res.status();
        if status != StatusCode::CREATED {
            let body = res.text().await.unwrap_or_default();
            panic!("expected 201 from POST {path}, got {status} body={body}");
        }
        res.json().await.unwrap()
    }

    async fn create_category(&self, name: &str) -> i64 {
        let created = self.create("/categories/", json!({ "name": name })).await;
        created["id"].as_i64().unwrap()
    }

    async fn create_product(&self, title: &str, category_id: i64) -> i64 {
        let created = self
            .create(
                "/products/",
                json!({
                    "title": title,
                    "description": "A thing",
                    "price": "19.99",
                    "category_id": category_id,
                }),
            )
            .await;
        created["id"].as_i64().unwrap()
    }

    async fn create_review(&self, product_id: i64, stars: f64) -> i64 {
        let created = self
            .create(
                "/reviews/",
                json!({ "text": "worth it", "stars": stars, "product_id": product_id }),
            )
            .await;
        created["id"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_keeps_the_category_it_was_created_with() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Stationery").await;
    let product_id = srv.create_product("Notebook", category_id).await;

    let res = srv.get(&format!("/products/{product_id}/")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["category_id"].as_i64(), Some(category_id));
    assert_eq!(body["title"], "Notebook");
    assert_eq!(body["price"], "19.99");
}

#[tokio::test]
async fn deleting_category_cascades_to_products_and_reviews() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Seasonal").await;
    let product_id = srv.create_product("Snow globe", category_id).await;
    let review_id = srv.create_review(product_id, 4.0).await;

    let res = srv.delete(&format!("/categories/{category_id}/")).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    for path in [
        format!("/categories/{category_id}/"),
        format!("/products/{product_id}/"),
        format!("/reviews/{review_id}/"),
    ] {
        assert_eq!(srv.get(&path).await.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn products_reviews_reports_average_and_explicit_absence() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Audio").await;
    let rated = srv.create_product("Headphones", category_id).await;
    let unrated = srv.create_product("Cable", category_id).await;
    srv.create_review(rated, 4.0).await;
    srv.create_review(rated, 5.0).await;

    let res = srv.get("/products/reviews").await;
    assert_eq!(res.status(), StatusCode::OK);
    let items: Vec<Value> = res.json().await.unwrap();
    assert_eq!(items.len(), 2);

    let rated_row = items.iter().find(|p| p["id"] == rated).unwrap();
    assert_eq!(rated_row["rating"], "4.5");
    assert_eq!(
        rated_row["reviews"],
        json!([
            { "text": "worth it", "stars": "4.0" },
            { "text": "worth it", "stars": "5.0" },
        ])
    );

    let unrated_row = items.iter().find(|p| p["id"] == unrated).unwrap();
    assert!(unrated_row["rating"].is_null());
    assert_eq!(unrated_row["reviews"], json!([]));
}

#[tokio::test]
async fn short_title_is_rejected_and_nothing_is_created() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Kitchen").await;

    let res = srv
        .post(
            "/products/",
            json!({ "title": "K", "price": "5.00", "category_id": category_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(body["fields"]["title"].is_array());

    let products: Vec<Value> = srv.get("/products/").await.json().await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn missing_product_is_not_found_never_server_error() {
    let srv = TestServer::spawn().await;

    for path in ["/products/999/", "/products/abc/", "/reviews/1/", "/categories/0/"] {
        let res = srv.get(path).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "not_found");
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }
}

#[tokio::test]
async fn category_listing_counts_products() {
    let srv = TestServer::spawn().await;
    let busy = srv.create_category("Busy").await;
    let empty = srv.create_category("Empty").await;
    srv.create_product("One", busy).await;
    srv.create_product("Two", busy).await;

    let items: Vec<Value> = srv.get("/categories/").await.json().await.unwrap();
    assert_eq!(
        items,
        vec![
            json!({ "id": busy, "name": "Busy", "products_count": 2 }),
            json!({ "id": empty, "name": "Empty", "products_count": 0 }),
        ]
    );
}

#[tokio::test]
async fn update_replaces_fields_and_validates_references() {
    let srv = TestServer::spawn().await;
    let first = srv.create_category("First").await;
    let second = srv.create_category("Second").await;
    let product_id = srv.create_product("Chair", first).await;

    let res = srv
        .put(
            &format!("/products/{product_id}/"),
            json!({ "title": "Armchair", "price": 250, "category_id": second }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "Armchair");
    assert_eq!(body["price"], "250.00");
    assert_eq!(body["category_id"].as_i64(), Some(second));
    assert!(body["description"].is_null());

    let res = srv
        .put(
            &format!("/products/{product_id}/"),
            json!({ "title": "Armchair", "price": 250, "category_id": 777 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["fields"]["category_id"].is_array());

    let res = srv
        .put("/products/4242/", json!({ "title": "Ghost", "price": 1, "category_id": first }))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_defaults_and_validation() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Books").await;
    let product_id = srv.create_product("Novel", category_id).await;

    let created = srv
        .create("/reviews/", json!({ "text": "ok", "product_id": product_id }))
        .await;
    assert_eq!(created["stars"], "1.0");
    assert_eq!(created["product_id"].as_i64(), Some(product_id));

    let res = srv
        .post("/reviews/", json!({ "text": "ghost", "stars": 3, "product_id": 31337 }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["fields"]["product_id"].is_array());

    let reviews: Vec<Value> = srv.get("/reviews/").await.json().await.unwrap();
    assert_eq!(reviews.len(), 1);
}

#[tokio::test]
async fn badly_typed_fields_are_reported_one_by_one() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(
            "/products/",
            json!({ "title": "K", "price": "abc", "category_id": "x" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["fields"],
        json!({
            "category_id": ["A valid integer is required."],
            "price": ["A valid number is required."],
            "title": ["Ensure this field has at least 2 characters."],
        })
    );

    let category_id = srv.create_category("Garden").await;
    let created = srv
        .create(
            "/products/",
            json!({ "title": "Hose", "price": "10.5", "category_id": category_id.to_string() }),
        )
        .await;
    assert_eq!(created["price"], "10.50");
    assert_eq!(created["category_id"].as_i64(), Some(category_id));
}

#[tokio::test]
async fn trailing_slash_is_optional() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Lighting").await;
    let product_id = srv.create_product("Lamp", category_id).await;

    for path in [
        format!("/products/{product_id}"),
        format!("/categories/{category_id}"),
        "/products".to_string(),
        "/products/reviews/".to_string(),
        format!("/api/v1/products/{product_id}"),
    ] {
        assert_eq!(srv.get(&path).await.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .post(srv.url("/categories/"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn catalog_is_also_served_under_api_v1() {
    let srv = TestServer::spawn().await;
    let category_id = srv.create_category("Prefixed").await;

    let res = srv.get(&format!("/api/v1/categories/{category_id}/")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .get(srv.url("/products/"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}
