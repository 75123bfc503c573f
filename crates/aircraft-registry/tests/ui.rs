//! Page tests driving the full router.

mod common;

use axum::http::{header, StatusCode};
use common::{delete, get, Form, TestApp};
use tower::ServiceExt;

#[tokio::test]
async fn test_root_redirects_to_list() {
    let app = TestApp::new();

    let resp = app.router.clone().oneshot(get("/")).await.unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[header::LOCATION], "/aircraft");
}

#[tokio::test]
async fn test_empty_list_page() {
    let app = TestApp::new();

    let (status, html) = app.text(get("/aircraft")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No aircraft found."));
    assert!(html.contains("+ Add New Aircraft"));
    assert!(html.contains("<th>Registration #</th>"));
}

#[tokio::test]
async fn test_list_page_shows_records() {
    let app = TestApp::new();
    let id = app.create(&Form::cessna()).await;

    let (status, html) = app.text(get("/aircraft")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<td>Cessna 172</td>"));
    assert!(html.contains(&format!("/aircraft/{id}/edit")));
    assert!(!html.contains("No aircraft found."));
}

#[tokio::test]
async fn test_rows_fragment_reflects_delete() {
    let app = TestApp::new();
    let id = app.create(&Form::cessna()).await;

    let (_, rows) = app.text(get("/aircraft/rows")).await;
    assert!(rows.contains(&format!(r#"data-delete="{id}""#)));
    assert!(!rows.contains("<html"));

    app.json(delete(&format!("/api/aircraft/{id}"))).await;
    let (_, rows) = app.text(get("/aircraft/rows")).await;
    assert!(rows.contains("No aircraft found."));
}

#[tokio::test]
async fn test_create_page() {
    let app = TestApp::new();

    let (status, html) = app.text(get("/aircraft/create")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"data-method="POST""#));
    assert!(html.contains(r#"name="aircraftName""#));
}

#[tokio::test]
async fn test_edit_page_is_populated() {
    let app = TestApp::new();
    let id = app
        .create(&Form::cessna().field("description", "<b>Bold</b> & co"))
        .await;

    let (status, html) = app.text(get(&format!("/aircraft/{id}/edit"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"value="Cessna 172""#));
    assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; &amp; co"));
    assert!(html.contains(&format!(r#"data-action="/api/aircraft/{id}""#)));
}

#[tokio::test]
async fn test_edit_page_for_unknown_record() {
    let app = TestApp::new();

    let (status, html) = app.text(get("/aircraft/missing/edit")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Aircraft not found"));
}

#[tokio::test]
async fn test_scripts_are_served() {
    let app = TestApp::new();

    for path in ["/assets/aircraft-list.js", "/assets/aircraft-form.js"] {
        let (status, bytes, content_type) = app.send(get(path)).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(!bytes.is_empty());
        assert!(content_type.unwrap().starts_with("text/javascript"));
    }
}
