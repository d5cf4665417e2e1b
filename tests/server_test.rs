mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::RecordingCms;
use folio_cms::cms::endpoints;
use folio_cms::handlers::{router, AppState};
use folio_cms::menu::MenuSource;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn(cms: RecordingCms) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(Arc::new(cms), "website_contact"));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

#[tokio::test]
async fn healthz_answers_ok() {
    let addr = spawn(RecordingCms::new()).await;
    let res = reqwest::get(url(addr, "/healthz")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn page_found_and_missing() {
    let cms = RecordingCms::new()
        .respond(
            endpoints::page_by_slug("about"),
            json!({ "data": [ { "id": "1", "type": "node--pages",
                                "attributes": { "title": "About", "body": { "processed": "<p>hi</p>" } } } ] }),
        )
        .respond(endpoints::page_by_slug("nope"), json!({ "data": [] }));
    let addr = spawn(cms).await;

    let res = reqwest::get(url(addr, "/api/pages/about")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "title": "About", "html": "<p>hi</p>" }));

    let res = reqwest::get(url(addr, "/api/pages/nope")).await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Page not found");
}

#[tokio::test]
async fn project_missing_is_404_and_upstream_failure_is_500() {
    let cms = RecordingCms::new()
        .respond(endpoints::project_by_slug("ghost"), json!({ "data": [] }))
        .fail(endpoints::project_by_slug("broken"), 502)
        .fail(endpoints::projects(), 500);
    let addr = spawn(cms).await;

    let res = reqwest::get(url(addr, "/api/projects/ghost")).await.unwrap();
    assert_eq!(res.status(), 404);

    let res = reqwest::get(url(addr, "/api/projects/broken")).await.unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch project");

    let res = reqwest::get(url(addr, "/api/projects")).await.unwrap();
    assert_eq!(res.status(), 500);
}

#[tokio::test]
async fn projects_listing_and_category() {
    let cms = RecordingCms::new().respond(
        endpoints::projects(),
        json!({
            "data": [ {
                "id": "1", "type": "node--projects",
                "attributes": { "title": "One", "field_slug": "one" },
                "relationships": { "field_category": { "data": [ { "type": "taxonomy_term--c", "id": "t1" } ] } }
            } ],
            "included": [ { "id": "t1", "type": "taxonomy_term--c", "attributes": { "name": "Brand Identity" } } ]
        }),
    );
    let addr = spawn(cms).await;

    let body: Value = reqwest::get(url(addr, "/api/projects"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!([ { "id": "1", "slug": "one", "title": "One", "categories": ["Brand Identity"] } ])
    );

    let res = reqwest::get(url(addr, "/api/projects/category/brand-identity")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Brand Identity");
    assert_eq!(body["projects"].as_array().unwrap().len(), 1);

    let res = reqwest::get(url(addr, "/api/projects/category/unknown")).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn menu_endpoint_returns_sorted_items() {
    let cms = RecordingCms::new().respond(
        MenuSource::LinkContent.endpoint("main"),
        json!({ "data": [
            { "id": "2", "type": "menu_link_content--menu_link_content",
              "attributes": { "title": "Contact", "link": { "uri": "internal:/contact" }, "weight": 9 } },
            { "id": "1", "type": "menu_link_content--menu_link_content",
              "attributes": { "title": "Home", "link": { "uri": "internal:/" }, "weight": 0 } }
        ] }),
    );
    let addr = spawn(cms).await;
    let body: Value = reqwest::get(url(addr, "/api/menu/main"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!([
            { "title": "Home", "href": "/", "weight": 0 },
            { "title": "Contact", "href": "/contact", "weight": 9 }
        ])
    );
}

#[tokio::test]
async fn contact_status_codes() {
    let cms = RecordingCms::new().post_results(vec![Ok(json!({})), Err(500)]);
    let addr = spawn(cms.clone()).await;
    let http = reqwest::Client::new();

    let res = http
        .post(url(addr, "/api/contact"))
        .json(&json!({ "name": "Ann", "email": "ann@example.com", "message": "Hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = http
        .post(url(addr, "/api/contact"))
        .json(&json!({ "name": "Ann", "message": "Hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "All fields are required");

    let res = http
        .post(url(addr, "/api/contact"))
        .json(&json!({ "name": "Ann", "email": "ann@", "message": "Hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = http
        .post(url(addr, "/api/contact"))
        .json(&json!({ "name": "Ann", "email": "ann@example.com", "message": "Hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    assert_eq!(cms.posts().len(), 2);
}

#[tokio::test]
async fn malformed_contact_body_is_json_error() {
    let cms = RecordingCms::new();
    let addr = spawn(cms.clone()).await;
    let http = reqwest::Client::new();

    let res = http
        .post(url(addr, "/api/contact"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid request body" }));

    let res = http
        .post(url(addr, "/api/contact"))
        .body("name=Ann")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request body");

    assert!(cms.posts().is_empty());
}
