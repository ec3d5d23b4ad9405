//! End-to-end HTTP tests over the in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pvz_server::api;
use pvz_server::auth::{JwtConfig, JwtService};
use pvz_server::state::AppState;
use pvz_server::store::MemoryStore;
use pvz_server::telemetry::Metrics;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    metrics: Arc<Metrics>,
}

impl TestApp {
    fn new() -> Self {
        let metrics = Arc::new(Metrics::new().unwrap());
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            JwtService::with_config(JwtConfig::new("http-test-secret", 1)),
            metrics.clone(),
        );
        Self {
            router: api::build_app(state),
            metrics,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn token(&self, role: &str) -> String {
        let (status, body) = self
            .call("POST", "/dummyLogin", None, Some(json!({ "role": role })))
            .await;
        assert_eq!(status, StatusCode::OK, "dummyLogin failed: {body}");
        body.as_str().unwrap().to_string()
    }

    async fn create_pvz(&self, moderator: &str, city: &str) -> String {
        let (status, body) = self
            .call("POST", "/pvz", Some(moderator), Some(json!({ "city": city })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create pvz failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_moderator_creates_pickup_point() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;

    let (status, body) = app
        .call("POST", "/pvz", Some(&moderator), Some(json!({ "city": "Moscow" })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["city"], "Moscow");
    assert!(body["id"].as_str().is_some());
    assert!(body["registrationDate"].as_str().is_some());
}

#[tokio::test]
async fn test_pickup_point_with_supplied_id_and_duplicate() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;
    let payload = json!({
        "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "registrationDate": "2025-04-01T09:00:00Z",
        "city": "Kazan",
    });

    let (status, body) = app
        .call("POST", "/pvz", Some(&moderator), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "3fa85f64-5717-4562-b3fc-2c963f66afa6");

    let (status, body) = app.call("POST", "/pvz", Some(&moderator), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn test_pickup_point_rejections() {
    let app = TestApp::new();
    let employee = app.token("employee").await;
    let moderator = app.token("moderator").await;

    let (status, body) = app
        .call("POST", "/pvz", Some(&employee), Some(json!({ "city": "Moscow" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = app
        .call("POST", "/pvz", None, Some(json!({ "city": "Moscow" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = app
        .call("POST", "/pvz", Some(&moderator), Some(json!({ "city": "Paris" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3003);

    let (status, body) = app
        .call("POST", "/pvz", Some("not-a-jwt"), Some(json!({ "city": "Moscow" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;

    let request = Request::builder()
        .method("POST")
        .uri("/pvz")
        .header(header::AUTHORIZATION, format!("Bearer {moderator}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"city\":"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_reception_lifecycle() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;
    let employee = app.token("employee").await;
    let pvz_id = app.create_pvz(&moderator, "Saint Petersburg").await;

    // moderators cannot open receptions
    let (status, _) = app
        .call("POST", "/receptions", Some(&moderator), Some(json!({ "pvzId": pvz_id })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, reception) = app
        .call("POST", "/receptions", Some(&employee), Some(json!({ "pvzId": pvz_id })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reception["status"], "open");
    assert_eq!(reception["pvzId"], pvz_id.as_str());

    let (status, body) = app
        .call("POST", "/receptions", Some(&employee), Some(json!({ "pvzId": pvz_id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    // nothing to delete yet
    let delete_uri = format!("/pvz/{pvz_id}/delete_last_product");
    let (status, body) = app.call("POST", &delete_uri, Some(&employee), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    for product_type in ["electronics", "clothes", "shoes"] {
        let (status, product) = app
            .call(
                "POST",
                "/products",
                Some(&employee),
                Some(json!({ "type": product_type, "pvzId": pvz_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["type"], product_type);
        assert_eq!(product["receptionId"], reception["id"]);
    }

    let (status, body) = app.call("POST", &delete_uri, Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let close_uri = format!("/pvz/{pvz_id}/close_last_reception");
    let (status, closed) = app.call("POST", &close_uri, Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "closed");
    assert_eq!(closed["id"], reception["id"]);

    let (status, body) = app
        .call(
            "POST",
            "/products",
            Some(&employee),
            Some(json!({ "type": "shoes", "pvzId": pvz_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    let (status, listing) = app.call("GET", "/pvz", Some(&moderator), None).await;
    assert_eq!(status, StatusCode::OK);
    let products = &listing[0]["receptions"][0]["products"];
    let types: Vec<&str> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["electronics", "clothes"]);
}

#[tokio::test]
async fn test_unknown_and_malformed_pickup_point_ids() {
    let app = TestApp::new();
    let employee = app.token("employee").await;

    let (status, body) = app
        .call(
            "POST",
            "/receptions",
            Some(&employee),
            Some(json!({ "pvzId": "6f1c2d1e-0d3a-4b8a-9b52-6c7d8e9f0a1b" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    let (status, body) = app
        .call("POST", "/pvz/pvz-1/close_last_reception", Some(&employee), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn test_listing_pagination_and_filters() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;
    let employee = app.token("employee").await;

    let first = app.create_pvz(&moderator, "Moscow").await;
    let _second = app.create_pvz(&moderator, "Kazan").await;
    let (status, _) = app
        .call("POST", "/receptions", Some(&employee), Some(json!({ "pvzId": first })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.call("GET", "/pvz?page=1&limit=1", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.call("GET", "/pvz?startDate=2000-01-01", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["pvz"]["id"], first.as_str());

    let (status, body) = app.call("GET", "/pvz?endDate=2000-01-01", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app.call("GET", "/pvz?page=0", Some(&employee), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);

    let (status, body) = app.call("GET", "/pvz?limit=ten", Some(&employee), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, _) = app.call("GET", "/pvz", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new();
    let credentials = json!({ "email": "Clerk@Example.com", "password": "hunter2", "role": "employee" });

    let (status, user) = app.call("POST", "/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "clerk@example.com");
    assert_eq!(user["role"], "employee");
    assert!(user.get("password").is_none());

    let (status, body) = app.call("POST", "/register", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6001);

    let (status, token) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({ "email": "clerk@example.com", "password": "hunter2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = token.as_str().unwrap().to_string();

    // the issued token carries the employee role
    let (status, _) = app
        .call("POST", "/pvz", Some(&token), Some(json!({ "city": "Moscow" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({ "email": "clerk@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn test_dummy_login_rejects_unknown_role() {
    let app = TestApp::new();
    let (status, body) = app
        .call("POST", "/dummyLogin", None, Some(json!({ "role": "admin" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);
}

#[tokio::test]
async fn test_requests_are_counted_by_route_template() {
    let app = TestApp::new();
    let employee = app.token("employee").await;
    let pvz_id = "6f1c2d1e-0d3a-4b8a-9b52-6c7d8e9f0a1b";

    app.call(
        "POST",
        &format!("/pvz/{pvz_id}/close_last_reception"),
        Some(&employee),
        None,
    )
    .await;

    let text = app.metrics.render().unwrap();
    assert!(
        text.contains(r#"path="/pvz/{pvzId}/close_last_reception""#),
        "metrics output:\n{text}"
    );
    assert!(text.contains(r#"path="/dummyLogin""#));
}

#[tokio::test]
async fn test_wrong_role_is_refused_before_the_body_is_read() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;
    let employee = app.token("employee").await;

    let (status, body) = app
        .call("POST", "/receptions", Some(&moderator), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = app
        .call("POST", "/products", Some(&moderator), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = app
        .call("POST", "/pvz", Some(&employee), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    // the right role still gets the body validated
    let (status, body) = app
        .call("POST", "/receptions", Some(&employee), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_malformed_authorization_header_is_not_authenticated() {
    let app = TestApp::new();
    let moderator = app.token("moderator").await;

    for header_value in [
        format!("Basic {moderator}"),
        "Bearer ".to_string(),
        moderator.clone(),
    ] {
        let request = Request::builder()
            .method("GET")
            .uri("/pvz")
            .header(header::AUTHORIZATION, header_value.as_str())
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {header_value:?}");
        assert_eq!(body["code"], 1001, "header {header_value:?}");
    }
}
