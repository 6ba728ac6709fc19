//! Test harness that drives the axum router in-process.
//!
//! Requests go straight through `Router::oneshot`, so no port is bound and
//! every test gets its own store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use hostname_extraction::{testing::FailingStore, MemoryStore, RecordStore, SqliteStore};
use server_core::{
    server::{build_app, AppState},
    Config,
};
use tower::ServiceExt;

pub const BOUNDARY: &str = "----hostname-extraction-test-boundary";

/// A response with its body read into memory.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The router plus a handle on the store behind it.
pub struct TestHarness {
    pub app: Router,
    pub store: Arc<dyn RecordStore>,
}

impl TestHarness {
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        // Uses try_init() so repeated harnesses don't panic.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let config = Config::in_memory();
        let state = AppState::new(store.clone(), &config);
        let app = build_app(state, config.max_upload_bytes);
        Self { app, store }
    }

    pub fn memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub async fn sqlite() -> Self {
        let store = SqliteStore::in_memory()
            .await
            .expect("Failed to open in-memory SQLite store");
        Self::with_store(Arc::new(store))
    }

    pub fn failing() -> Self {
        Self::with_store(Arc::new(FailingStore::new()))
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// POST /upload with a file and, when given, the `download` field.
    pub async fn upload(
        &self,
        filename: &str,
        contents: &[u8],
        download: Option<&str>,
    ) -> TestResponse {
        let body = MultipartBody::new()
            .file("file", filename, contents)
            .field_opt("download", download)
            .finish();
        self.post_multipart(body).await
    }

    pub async fn post_multipart(&self, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }
}

/// Hand-rolled multipart/form-data encoder for test requests.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, filename: &str, contents: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                BOUNDARY, name, filename
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(contents);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn field_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.buf
    }
}
