//! Shared helpers for the router tests.

#![allow(dead_code)]

use aircraft_registry::{server, Config};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "acreg-test-boundary";

/// A router over a fresh database and uploads directory.
#[derive(Debug)]
pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_body_limit(1024 * 1024)
    }

    pub fn with_body_limit(max_body_bytes: usize) -> Self {
        Self::with_config(max_body_bytes, |_| {})
    }

    pub fn with_url_prefix(url_prefix: &str) -> Self {
        Self::with_config(1024 * 1024, |config| {
            config.uploads.url_prefix = url_prefix.to_string();
        })
    }

    /// Build over a validated configuration adjusted by `configure`.
    pub fn with_config(max_body_bytes: usize, configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.database_path = Some(dir.path().join("registry.db"));
        config.uploads.dir = Some(dir.path().join("uploads"));
        configure(&mut config);
        config.validate().unwrap();

        let router = server::router(server::build_service(&config), max_body_bytes);
        Self { router, dir }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), 16 * 1024 * 1024).await.unwrap();
        (status, bytes.to_vec(), content_type)
    }

    pub async fn json(&self, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, bytes, _) = self.send(req).await;
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn text(&self, req: Request<Body>) -> (StatusCode, String) {
        let (status, bytes, _) = self.send(req).await;
        (status, String::from_utf8(bytes).unwrap())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.json(get(uri)).await
    }

    /// Create a record through the API and return its id.
    pub async fn create(&self, form: &Form) -> String {
        let (status, body) = self.json(form.request("POST", "/api/aircraft")).await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
}

/// A multipart form submission.
#[derive(Debug, Default, Clone)]
pub struct Form {
    fields: Vec<(String, String)>,
    file: Option<(String, String, Vec<u8>)>,
}

impl Form {
    /// The example Cessna 172 submission.
    pub fn cessna() -> Self {
        Self::default()
            .field("aircraftName", "Cessna 172")
            .field("aircraftType", "Fixed-wing")
            .field("registrationNumber", "N12345")
            .field("manufacturer", "Cessna")
            .field("year", "1998")
            .field("description", "")
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn image(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.file = Some((file_name.to_string(), content_type.to_string(), bytes.to_vec()));
        self
    }

    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                     {value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = &self.file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn request(&self, method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body()))
            .unwrap()
    }
}
