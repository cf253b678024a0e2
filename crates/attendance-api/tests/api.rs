//! End-to-end router tests over an in-memory store and cache.

use attendance_api::{ApiContext, build_router};
use attendance_persistence::cache::keys;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    ctx: ApiContext,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let ctx = ApiContext::in_memory().await.unwrap();
        let router = build_router(ctx.clone());
        Self { ctx, router }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post(&self, uri: &str, body: Value) -> Value {
        let (status, _, text) = self.send("POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{text}");
        serde_json::from_str(&text).unwrap()
    }
}

#[tokio::test]
async fn class_lifecycle_scenario() {
    let app = TestApp::new().await;

    let (status, location, body) = app
        .send("POST", "/api/classes", Some(json!({"ClassName": "Math101"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(location.as_deref(), Some("/api/classes/1"));
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"ClassId": 1, "ClassName": "Math101"})
    );

    let (status, _, first) = app.send("GET", "/api/classes/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, body);
    assert!(app.ctx.cache.get_json::<Value>(&keys::class(1)).await.unwrap().is_some());

    let (_, _, second) = app.send("GET", "/api/classes/1", None).await;
    assert_eq!(second, first);

    let (status, _, text) = app.send("DELETE", "/api/classes/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Class deleted successfully.");

    let (status, _, text) = app.send("GET", "/api/classes/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text, "Class not found.");
}

#[tokio::test]
async fn duplicate_student_reuses_id() {
    let app = TestApp::new().await;

    let first = app.post("/api/students", json!({"StudentName": "Alice"})).await;
    let second = app.post("/api/students", json!({"StudentName": "Alice"})).await;
    assert_eq!(first["StudentId"], second["StudentId"]);

    let (status, _, text) = app.send("GET", "/api/students", None).await;
    assert_eq!(status, StatusCode::OK);
    let all: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn empty_collection_is_ok() {
    let app = TestApp::new().await;

    let (status, _, text) = app.send("GET", "/api/Attendances", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn put_replaces_and_refreshes_cache() {
    let app = TestApp::new().await;
    let student = app.post("/api/students", json!({"StudentName": "Alice"})).await;
    let id = student["StudentId"].as_i64().unwrap();
    app.send("GET", &format!("/api/students/{id}"), None).await;

    let (status, _, text) = app
        .send(
            "PUT",
            &format!("/api/students/{id}"),
            Some(json!({"StudentId": 99, "StudentName": "Alicia"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({"StudentId": id, "StudentName": "Alicia"})
    );

    let (_, _, text) = app.send("GET", &format!("/api/students/{id}"), None).await;
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["StudentName"], "Alicia");

    let (status, _, text) = app
        .send("PUT", "/api/students/404", Some(json!({"StudentName": "Nobody"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text, "Student not found.");
}

#[tokio::test]
async fn patch_student() {
    let app = TestApp::new().await;
    app.post("/api/students", json!({"StudentName": "Alice"})).await;

    let (status, _, text) = app
        .send(
            "PATCH",
            "/api/students/1",
            Some(json!([{"op": "replace", "path": "/StudentName", "value": "Bob"}])),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(text.is_empty());

    let (_, _, text) = app.send("GET", "/api/students/1", None).await;
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["StudentName"], "Bob");
}

#[tokio::test]
async fn patch_failures() {
    let app = TestApp::new().await;
    app.post("/api/students", json!({"StudentName": "Alice"})).await;

    let (status, _, text) = app
        .send(
            "PATCH",
            "/api/students/1",
            Some(json!([
                {"op": "replace", "path": "/StudentName", "value": "Bob"},
                {"op": "replace", "path": "/Nickname", "value": "Bobby"}
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text, "Property 'Nickname' not found on the 'Student' object.");

    let (status, _, text) = app
        .send(
            "PATCH",
            "/api/students/1",
            Some(json!([{"op": "add", "path": "StudentName", "value": null}])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Value cannot be null for the 'add' operation.");

    let (status, _, text) = app
        .send(
            "PATCH",
            "/api/students/1",
            Some(json!([{"op": "replace", "path": "StudentName", "value": {"first": "Bob"}}])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Invalid data type for the property.");

    let (status, _, text) = app
        .send(
            "PATCH",
            "/api/students/1",
            Some(json!([
                {"op": "replace", "path": "/StudentName", "value": "Bob"},
                {"op": "replace", "path": "/StudentName", "value": ["Bob"]}
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Invalid data type for the property.");

    // Nothing from the failed documents landed
    let (_, _, text) = app.send("GET", "/api/students/1", None).await;
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["StudentName"], "Alice");

    let (status, _, text) = app
        .send(
            "PATCH",
            "/api/students/7",
            Some(json!([{"op": "replace", "path": "StudentName", "value": "Ghost"}])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text, "Student not found.");
}

#[tokio::test]
async fn attendance_flow() {
    let app = TestApp::new().await;
    let student = app.post("/api/students", json!({"StudentName": "Alice"})).await;
    let class = app.post("/api/classes", json!({"ClassName": "Math101"})).await;

    let (status, location, text) = app
        .send(
            "POST",
            "/api/Attendances",
            Some(json!({
                "StudentId": student["StudentId"],
                "ClassId": class["ClassId"],
                "Time": "2024-09-02T09:00:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{text}");
    assert_eq!(location.as_deref(), Some("/api/Attendances/1"));
    let attendance: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(attendance["Time"], "2024-09-02T09:00:00Z");

    let (status, _, text) = app.send("GET", "/api/Attendances/1/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), attendance);

    let (status, _, text) = app
        .send(
            "PUT",
            "/api/Attendances/1/1",
            Some(json!({"Time": "2024-09-02T10:30:00Z"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["Time"], "2024-09-02T10:30:00Z");

    let (_, _, text) = app.send("GET", "/api/Attendances/1", None).await;
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["Time"], "2024-09-02T10:30:00Z");

    let (status, _, text) = app.send("DELETE", "/api/Attendances/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Attendance deleted successfully.");

    let (status, _, text) = app.send("GET", "/api/Attendances/1/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text, "Attendance not found.");
}

#[tokio::test]
async fn attendance_for_missing_student_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _, text) = app
        .send(
            "POST",
            "/api/Attendances",
            Some(json!({"StudentId": 5, "ClassId": 5, "Time": "2024-09-02T09:00:00Z"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.starts_with("Failed to create attendance. Error: "), "{text}");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _, text) = app
        .send("POST", "/api/classes", Some(json!({"Name": "Math101"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.starts_with("Failed to create class. Error: "), "{text}");
}

#[tokio::test]
async fn deleting_class_cascades_attendance() {
    let app = TestApp::new().await;
    app.post("/api/students", json!({"StudentName": "Alice"})).await;
    app.post("/api/classes", json!({"ClassName": "Math101"})).await;
    app.post(
        "/api/Attendances",
        json!({"StudentId": 1, "ClassId": 1, "Time": "2024-09-02T09:00:00Z"}),
    )
    .await;
    app.send("GET", "/api/Attendances", None).await;

    let (status, _, _) = app.send("DELETE", "/api/classes/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, text) = app.send("GET", "/api/Attendances", None).await;
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn health_and_docs() {
    let app = TestApp::new().await;

    let (status, _, text) = app.send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");

    let (status, location, _) = app.send("GET", "/", None).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/swagger-ui"));

    let (status, _, text) = app.send("GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["info"]["title"], "Student Attendance API");
    assert!(doc["paths"]["/api/Attendances/{id}/{class_id}"]["put"].is_object());
    assert!(doc["components"]["schemas"]["Student"].is_object());
}
