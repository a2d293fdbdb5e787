//! Shared fixtures for the HTTP integration tests.

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use wayfarer_api::{build_app_with_upstream, ApiConfig};
use wayfarer_core::{NearbyPoint, VisitorCountry};
use wayfarer_upstream::Upstream;

pub fn offline_app(points: Vec<NearbyPoint>, country: Option<VisitorCountry>) -> Router {
    build_app_with_upstream(&ApiConfig::default(), Upstream::fixed(points, country))
}

pub fn app_with_config(config: &ApiConfig, upstream: Upstream) -> Router {
    build_app_with_upstream(config, upstream)
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
