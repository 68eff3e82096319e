use axum::Router;
use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use tower::Service;
use uuid::Uuid;

use crate::api::JwtKeys;
use crate::notifier::Notifier;
use crate::scratchpad::Scratchpad;
use crate::uploads::UploadStore;

/// Boundary used by the multipart test requests
const BOUNDARY: &str = "portal-test-boundary";

/// A fully wired portal app over fresh storage and temp upload buckets
pub struct TestApp {
    pub router: Router,

    // kept alive so the bucket directories survive the test
    _upload_dir: &'static TempDir,
}

/// Setup the portal app for a test
///
/// Every call gets its own empty storage, scratchpad and bucket directories.
pub async fn setup_test_app() -> TestApp {
    // leaked so the bucket directories outlive the returned router even when
    // the caller keeps only `TestApp::router`
    let upload_dir: &'static TempDir = Box::leak(Box::new(TempDir::new().unwrap()));

    let upload_store = UploadStore::open(
        upload_dir.path().join("network-diagrams"),
        upload_dir.path().join("work-reports"),
    )
    .await
    .unwrap();

    let router = crate::create_router(
        crate::storage::setup().await,
        upload_store,
        Scratchpad::new(),
        Notifier::log_only(),
        JwtKeys::new(b"verysecret"),
    );

    TestApp {
        router,
        _upload_dir: upload_dir,
    }
}

/// Perform a request with an optional token and optional JSON payload
pub async fn request(
    app: &mut Router,
    method: Method,
    uri: &str,
    access_token: Option<&str>,
    payload: Option<Value>,
) -> (StatusCode, Value) {
    let (status_code, _, body) = raw_request(app, method, uri, access_token, payload).await;

    (
        status_code,
        serde_json::from_slice(body.as_bytes()).unwrap_or(Value::Null),
    )
}

/// Perform a request and keep the raw body and headers
pub async fn raw_request(
    app: &mut Router,
    method: Method,
    uri: &str,
    access_token: Option<&str>,
    payload: Option<Value>,
) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(access_token) = access_token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {access_token}"));
    }

    let request = if let Some(payload) = payload {
        builder
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.call(request).await.unwrap();

    let status_code = response.status();
    let headers = response.headers().clone();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8_lossy(&body[..]).to_string();

    (status_code, headers, body)
}

/// Perform a multipart request with text fields and PDF-ish file fields
pub async fn multipart_request(
    app: &mut Router,
    uri: &str,
    text_fields: &[(&str, &str)],
    file_fields: &[(&str, &str, &[u8])],
) -> (StatusCode, Value) {
    let mut body = Vec::new();

    for (name, value) in text_fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for (name, file_name, data) in file_fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        serde_json::from_slice(&body).unwrap_or(Value::Null),
    )
}

pub async fn register(
    app: &mut Router,
    username: &str,
    password: &str,
) -> (StatusCode, Value) {
    request(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

pub async fn login(app: &mut Router, username: &str, password: &str) -> (StatusCode, Option<String>) {
    let (status_code, body) = request(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;

    let access_token = body["data"]["access_token"]
        .as_str()
        .map(ToString::to_string);

    (status_code, access_token)
}

/// Register the default test account and log in with it
pub async fn register_and_login(app: &mut Router) -> String {
    let (status_code, _) = register(app, "admin", "verysecret").await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, access_token) = login(app, "admin", "verysecret").await;
    assert_eq!(StatusCode::OK, status_code);

    access_token.unwrap()
}

pub async fn create_project(
    app: &mut Router,
    access_token: &str,
    name: &str,
) -> (StatusCode, Option<Uuid>) {
    let (status_code, body) = request(
        app,
        Method::POST,
        "/projects",
        Some(access_token),
        Some(json!({ "name": name })),
    )
    .await;

    (status_code, data_id(&body))
}

pub async fn create_issue(
    app: &mut Router,
    access_token: &str,
    project_id: &Uuid,
    payload: Value,
) -> (StatusCode, Option<Uuid>, Value) {
    let (status_code, body) = request(
        app,
        Method::POST,
        &format!("/projects/{project_id}/issues"),
        Some(access_token),
        Some(payload),
    )
    .await;

    let id = data_id(&body);

    (status_code, id, body)
}

pub async fn list_issues(
    app: &mut Router,
    access_token: &str,
    project_id: &Uuid,
) -> (StatusCode, Value) {
    request(
        app,
        Method::GET,
        &format!("/projects/{project_id}/issues"),
        Some(access_token),
        None,
    )
    .await
}

pub async fn update_issue(
    app: &mut Router,
    access_token: &str,
    issue_id: &Uuid,
    payload: Value,
) -> (StatusCode, Value) {
    request(
        app,
        Method::POST,
        &format!("/issues/{issue_id}/update"),
        Some(access_token),
        Some(payload),
    )
    .await
}

pub async fn add_trip(app: &mut Router, payload: Value) -> (StatusCode, Option<Uuid>, Value) {
    let (status_code, body) = request(app, Method::POST, "/business_trip", None, Some(payload)).await;

    let id = data_id(&body);

    (status_code, id, body)
}

pub async fn list_trips(app: &mut Router, participant: Option<&str>) -> (StatusCode, Value) {
    let uri = match participant {
        Some(participant) => format!("/business_trip?participant={participant}"),
        None => "/business_trip".to_string(),
    };

    request(app, Method::GET, &uri, None, None).await
}

/// The `data.id` of a response body, when present
pub fn data_id(body: &Value) -> Option<Uuid> {
    body["data"]["id"]
        .as_str()
        .and_then(|id| id.parse::<Uuid>().ok())
}

/// The `error` message of a response body
pub fn error_message(body: &Value) -> String {
    body["error"].as_str().unwrap_or_default().to_string()
}
