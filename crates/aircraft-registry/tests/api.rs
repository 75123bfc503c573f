//! JSON API tests driving the full router.

mod common;

use axum::http::StatusCode;
use common::{delete, get, Form, TestApp};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

#[tokio::test]
async fn test_list_empty_collection() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/api/aircraft").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = TestApp::new();

    let (status, body) = app.json(Form::cessna().request("POST", "/api/aircraft")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Aircraft saved successfully");
    let id = body["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let (status, record) = app.get_json(&format!("/api/aircraft/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["success"], true);
    assert_eq!(record["id"], id);
    assert_eq!(record["aircraftName"], "Cessna 172");
    assert_eq!(record["aircraftType"], "Fixed-wing");
    assert_eq!(record["registrationNumber"], "N12345");
    assert_eq!(record["manufacturer"], "Cessna");
    assert_eq!(record["year"], "1998");
    assert_eq!(record["description"], "");
    assert_eq!(record["imageUrl"], "");
    assert!(record["createdAt"].is_string());
}

#[tokio::test]
async fn test_missing_fields_are_stored_empty() {
    let app = TestApp::new();
    let id = app.create(&Form::default().field("aircraftName", "Mystery")).await;

    let (_, record) = app.get_json(&format!("/api/aircraft/{id}")).await;
    assert_eq!(record["aircraftName"], "Mystery");
    assert_eq!(record["manufacturer"], "");
    assert_eq!(record["year"], "");
}

#[tokio::test]
async fn test_list_in_creation_order() {
    let app = TestApp::new();
    let first = app.create(&Form::cessna()).await;
    let second = app
        .create(&Form::default().field("aircraftName", "Piper Cub"))
        .await;

    let (status, body) = app.get_json("/api/aircraft").await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], first.as_str());
    assert_eq!(records[1]["id"], second.as_str());
    assert_eq!(records[1]["aircraftName"], "Piper Cub");
    // createdAt is an RFC 3339 string
    let created = records[0]["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
}

#[tokio::test]
async fn test_get_unknown_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/api/aircraft/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({ "success": false, "message": "Not found" }));
}

#[tokio::test]
async fn test_create_with_image_serves_file() {
    let app = TestApp::new();
    let id = app
        .create(&Form::cessna().image("n12345.png", "image/png", PNG))
        .await;

    let (_, record) = app.get_json(&format!("/api/aircraft/{id}")).await;
    let image_url = record["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with("_n12345.png"));

    let (status, bytes, content_type) = app.send(get(image_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, PNG);
    assert_eq!(content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_custom_url_prefix_serves_images() {
    for prefix in ["/media/images", "/aircraft-images", "/apix"] {
        let app = TestApp::with_url_prefix(prefix);
        let id = app
            .create(&Form::cessna().image("n12345.png", "image/png", PNG))
            .await;

        let (_, record) = app.get_json(&format!("/api/aircraft/{id}")).await;
        let image_url = record["imageUrl"].as_str().unwrap();
        assert!(image_url.starts_with(&format!("{prefix}/")), "{image_url}");

        let (status, bytes, _) = app.send(get(image_url)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, PNG);

        let (status, list) = app.get_json("/api/aircraft").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_update_without_image_keeps_existing() {
    let app = TestApp::new();
    let id = app
        .create(&Form::cessna().image("a.png", "image/png", PNG))
        .await;
    let uri = format!("/api/aircraft/{id}");
    let (_, before) = app.get_json(&uri).await;
    let image_url = before["imageUrl"].as_str().unwrap().to_string();

    let form = Form::cessna()
        .field("description", "New paint")
        .field("existingImage", &image_url);
    let (status, body) = app.json(form.request("PUT", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "success": true, "message": "Aircraft updated" }));

    let (_, after) = app.get_json(&uri).await;
    assert_eq!(after["imageUrl"], image_url.as_str());
    assert_eq!(after["description"], "New paint");
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert!(after["updatedAt"].is_string());
}

#[tokio::test]
async fn test_update_with_empty_file_keeps_existing() {
    let app = TestApp::new();
    let id = app
        .create(&Form::cessna().image("a.png", "image/png", PNG))
        .await;
    let uri = format!("/api/aircraft/{id}");
    let (_, before) = app.get_json(&uri).await;

    let form = Form::cessna()
        .field("existingImage", before["imageUrl"].as_str().unwrap())
        .image("", "application/octet-stream", b"");
    let (status, _) = app.json(form.request("PUT", &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = app.get_json(&uri).await;
    assert_eq!(after["imageUrl"], before["imageUrl"]);
}

#[tokio::test]
async fn test_update_with_image_replaces_reference_and_keeps_old_file() {
    let app = TestApp::new();
    let id = app
        .create(&Form::cessna().image("old.png", "image/png", PNG))
        .await;
    let uri = format!("/api/aircraft/{id}");
    let (_, before) = app.get_json(&uri).await;
    let old_url = before["imageUrl"].as_str().unwrap().to_string();

    let form = Form::cessna()
        .field("existingImage", &old_url)
        .image("new.jpg", "image/jpeg", b"jpeg bytes");
    let (status, _) = app.json(form.request("PUT", &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = app.get_json(&uri).await;
    let new_url = after["imageUrl"].as_str().unwrap();
    assert_ne!(new_url, old_url);
    assert!(new_url.ends_with("_new.jpg"));

    let (status, _, _) = app.send(get(&old_url)).await;
    assert_eq!(status, StatusCode::OK, "old image must stay reachable");
    let (status, bytes, content_type) = app.send(get(new_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"jpeg bytes");
    assert_eq!(content_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn test_update_unknown_is_not_found_and_writes_nothing() {
    let app = TestApp::new();

    let form = Form::cessna().image("a.png", "image/png", PNG);
    let (status, body) = app.json(form.request("PUT", "/api/aircraft/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let uploads = app.dir.path().join("uploads");
    let stored = std::fs::read_dir(&uploads).map_or(0, Iterator::count);
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_delete_removes_record() {
    let app = TestApp::new();
    let keep = app.create(&Form::cessna()).await;
    let gone = app
        .create(&Form::cessna().image("gone.png", "image/png", PNG))
        .await;
    let uri = format!("/api/aircraft/{gone}");
    let (_, record) = app.get_json(&uri).await;
    let image_url = record["imageUrl"].as_str().unwrap().to_string();

    let (status, body) = app.json(delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], format!("Aircraft {gone} deleted"));

    let (status, _) = app.get_json(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.get_json("/api/aircraft").await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![keep.as_str()]);

    // The image file is left on disk
    let (status, _, _) = app.send(get(&image_url)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_unknown_succeeds() {
    let app = TestApp::new();

    let (status, body) = app.json(delete("/api/aircraft/never-existed")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_create_rejects_non_multipart_body() {
    let app = TestApp::new();

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/aircraft")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(r#"{"aircraftName":"Cessna"}"#))
        .unwrap();
    let (status, body) = app.json(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid form submission");
    assert!(body["error"].as_str().unwrap().starts_with("invalid request: "));

    let (_, list) = app.get_json("/api/aircraft").await;
    assert_eq!(list, serde_json::json!([]));
}

#[tokio::test]
async fn test_body_limit() {
    let app = TestApp::with_body_limit(1024);

    let form = Form::cessna().image("big.png", "image/png", &[0u8; 8 * 1024]);
    let (status, body) = app.json(form.request("POST", "/api/aircraft")).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid form submission");
    assert!(body["error"].as_str().unwrap().starts_with("request too large: "));

    let (_, list) = app.get_json("/api/aircraft").await;
    assert_eq!(list, serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_image_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/uploads/1_missing.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
