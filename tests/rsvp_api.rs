//! Guest RSVP endpoint.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_string, seed_site, test_config};
use serde_json::{json, Value};
use wedsite::http::HttpServer;
use wedsite::sites::SiteStore;

fn post_rsvp(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/rsvp")
        .header("host", "example.com")
        .header("content-type", "application/json")
        .header("origin", "https://john-mary.example.com")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn setup(published: bool) -> (HttpServer, SiteStore, uuid::Uuid) {
    let store = SiteStore::default();
    let site = seed_site(&store, "John", "Mary", published);
    let server = HttpServer::new(Arc::new(test_config()), store.clone()).unwrap();
    (server, store, site.id)
}

async fn json_body(res: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(res).await).unwrap()
}

#[tokio::test]
async fn test_rsvp_recorded_for_published_site() {
    let (server, store, id) = setup(true);
    let body = json!({
        "subdomain": "john-mary",
        "guestName": "Ada Lovelace",
        "email": "ada@example.com",
        "attending": true,
        "plusOne": true,
        "plusOneName": "Charles",
        "dietaryRequirements": "vegetarian"
    });

    let res = server.handle(post_rsvp(&body.to_string())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let json = json_body(res).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["guestName"], "Ada Lovelace");

    let rsvps = store.rsvps_for(id).unwrap();
    assert_eq!(rsvps.len(), 1);
    assert_eq!(rsvps[0].plus_one_name.as_deref(), Some("Charles"));
}

#[tokio::test]
async fn test_rsvp_for_unpublished_or_unknown_site_is_404() {
    let (server, store, id) = setup(false);

    for subdomain in ["john-mary", "nobody-here"] {
        let body = json!({
            "subdomain": subdomain,
            "guestName": "Ada",
            "email": "ada@example.com",
            "attending": false
        });
        let res = server.handle(post_rsvp(&body.to_string())).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", subdomain);
    }
    assert!(store.rsvps_for(id).unwrap().is_empty());
}

#[tokio::test]
async fn test_rsvp_validation_lists_fields() {
    let (server, _, _) = setup(true);
    let body = json!({
        "subdomain": "",
        "guestName": "  ",
        "email": "not-an-email",
        "attending": true,
        "plusOneName": "Charles"
    });

    let res = server.handle(post_rsvp(&body.to_string())).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = json_body(res).await;
    assert_eq!(json["success"], false);
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"subdomain"));
    assert!(fields.contains(&"guestName"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"plusOneName"));
}

#[tokio::test]
async fn test_malformed_subdomain_is_400_not_404() {
    let (server, _, _) = setup(true);
    let body = json!({
        "subdomain": "John Mary!",
        "guestName": "Ada",
        "email": "ada@example.com",
        "attending": true
    });

    let res = server.handle(post_rsvp(&body.to_string())).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = json_body(res).await;
    assert_eq!(json["details"][0]["field"], "subdomain");
}

#[tokio::test]
async fn test_malformed_json_is_400_envelope() {
    let (server, _, _) = setup(true);
    let res = server.handle(post_rsvp("{not json")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = json_body(res).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Validation failed");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let (server, _, _) = setup(true);
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/rsvp")
        .header("host", "example.com")
        .header("origin", "https://john-mary.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let res = server.handle(req).await;
    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_rsvp_count_shows_on_tenant_page() {
    let (server, _, _) = setup(true);
    let body = json!({
        "subdomain": "john-mary",
        "guestName": "Ada",
        "email": "ada@example.com",
        "attending": true
    });
    server.handle(post_rsvp(&body.to_string())).await;

    let res = server
        .handle(common::get_with_host("john-mary.example.com", "/"))
        .await;
    let html = body_string(res).await;
    assert!(html.contains("1 guest has said yes so far."));
    assert!(html.contains("/api/rsvp"));
}
