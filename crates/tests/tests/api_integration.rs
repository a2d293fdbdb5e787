use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use wayfarer_api::ApiConfig;
use wayfarer_core::{Coordinates, NearbyPoint, VisitorCountry};
use wayfarer_tests::{app_with_config, get, json_body, offline_app, post_json};
use wayfarer_upstream::{FixedUpstream, HttpUpstreamConfig, Upstream};

#[tokio::test]
async fn health_reports_ok() {
    let app = offline_app(Vec::new(), None);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    assert_eq!(parsed["status"], "ok");
    assert!(parsed["metrics"].get("requests_total").is_some());
}

#[tokio::test]
async fn plan_returns_full_structure() {
    let app = offline_app(Vec::new(), None);

    let request = post_json(
        "/v1/plan",
        json!({
            "destinationName": "Paris",
            "durationDays": 3,
            "partySize": "couple",
            "budgetTier": "mid",
            "transportMode": "public",
            "nearbyPoints": []
        })
        .to_string(),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let plan = json_body(response).await;
    assert_eq!(plan["title"], "Paris • 3-day");
    assert_eq!(plan["budget"]["total"], 840);
    assert_eq!(plan["budget"]["perDayRate"], 140);
    assert_eq!(plan["budget"]["travellerCount"], 2);
    assert_eq!(
        plan["budget"]["breakdown"],
        json!([
            { "label": "Stay", "amount": 353 },
            { "label": "Food", "amount": 210 },
            { "label": "Sightseeing", "amount": 151 },
            { "label": "Transport", "amount": 126 }
        ])
    );
    assert_eq!(plan["days"].as_array().unwrap().len(), 3);
    assert_eq!(plan["days"][0]["dayNumber"], 1);
    assert_eq!(plan["days"][0]["focus"], "Arrive in Paris");
    assert_eq!(plan["days"][2]["focus"], "Local discoveries");
    assert_eq!(plan["startDate"], serde_json::Value::Null);
    assert_eq!(plan["transportMode"], "public");
    assert!(plan["transportTip"]
        .as_str()
        .unwrap()
        .contains("day-pass"));
}

#[tokio::test]
async fn plan_with_unparseable_duration_has_one_day() {
    let app = offline_app(Vec::new(), None);

    let request = post_json(
        "/v1/plan",
        json!({ "destinationName": "Tokyo", "durationDays": "abc" }).to_string(),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let plan = json_body(response).await;
    let days = plan["days"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["focus"], "Arrive in Tokyo");
}

#[tokio::test]
async fn plan_without_destination_is_client_error() {
    let app = offline_app(Vec::new(), None);

    let response = app
        .oneshot(post_json("/v1/plan", json!({ "durationDays": 2 }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "destinationName is required" }));
}

#[tokio::test]
async fn malformed_plan_body_is_client_error() {
    let app = offline_app(Vec::new(), None);

    let response = app
        .oneshot(post_json("/v1/plan", "{\"destinationName\": "))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "Invalid JSON payload" }));
}

fn geocoding_app() -> axum::Router {
    let upstream = FixedUpstream::new(vec![NearbyPoint::named("Louvre")], None).with_city(
        "Paris",
        Coordinates {
            lat: 48.8566,
            lon: 2.3522,
        },
    );
    app_with_config(&ApiConfig::default(), Upstream::Fixed(upstream))
}

#[tokio::test]
async fn oversized_plan_body_gets_json_error() {
    let app = offline_app(Vec::new(), None);
    let padding = "x".repeat(70 * 1024);
    let body = json!({ "destinationName": "Paris", "notes": padding }).to_string();

    let response = app.clone().oneshot(post_json("/v1/plan", body.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "request body too large" })
    );

    let mut declared = post_json("/v1/plan", body.clone());
    declared.headers_mut().insert(
        axum::http::header::CONTENT_LENGTH,
        body.len().to_string().parse().unwrap(),
    );
    let response = app.oneshot(declared).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "request body too large" })
    );
}

#[tokio::test]
async fn plan_keeps_long_durations() {
    let app = offline_app(Vec::new(), None);

    let response = app
        .oneshot(post_json(
            "/v1/plan",
            json!({ "destinationName": "Paris", "durationDays": 400 }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let plan = json_body(response).await;
    assert_eq!(plan["title"], "Paris • 400-day");
    assert_eq!(plan["days"].as_array().unwrap().len(), 400);
}

#[tokio::test]
async fn geocode_resolves_known_city() {
    let app = geocoding_app();

    let response = app.oneshot(get("/v1/geocode?city=paris")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "lat": 48.8566, "lon": 2.3522 })
    );
}

#[tokio::test]
async fn geocode_misses_and_blanks_are_client_errors() {
    let app = geocoding_app();

    let response = app
        .clone()
        .oneshot(get("/v1/geocode?city=Atlantis"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "no coordinates found for Atlantis" })
    );

    let response = app.oneshot(get("/v1/geocode?city=%20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attractions_accept_a_city_name() {
    let app = geocoding_app();

    let response = app
        .clone()
        .oneshot(get("/v1/attractions?city=Paris"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "items": [{ "name": "Louvre" }] })
    );

    let response = app
        .oneshot(get("/v1/attractions?city=Atlantis"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn attractions_require_coordinates() {
    let app = offline_app(Vec::new(), None);

    let response = app
        .oneshot(get("/v1/attractions?lat=48.85"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "lat & lon required" })
    );
}

#[tokio::test]
async fn attractions_return_items() {
    let app = offline_app(
        vec![
            NearbyPoint {
                id: Some("W1".to_string()),
                distance: Some(120.0),
                ..NearbyPoint::named("Louvre")
            },
            NearbyPoint::named("Orsay"),
        ],
        None,
    );

    let response = app
        .oneshot(get("/v1/attractions?lat=48.85&lon=2.35&limit=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({ "items": [{ "id": "W1", "name": "Louvre", "distance": 120.0 }] })
    );
}

#[tokio::test]
async fn attractions_without_api_key_are_unavailable() {
    let upstream = Upstream::http(HttpUpstreamConfig::default()).unwrap();
    let app = app_with_config(&ApiConfig::default(), upstream);

    let response = app
        .oneshot(get("/v1/attractions?lat=48.85&lon=2.35"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(json_body(response).await.get("error").is_some());
}

#[tokio::test]
async fn geo_falls_back_when_lookup_fails() {
    let app = offline_app(Vec::new(), None);

    let response = app.oneshot(get("/v1/geo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "country": "United States", "code": "US" })
    );
}

#[tokio::test]
async fn geo_returns_detected_country() {
    let app = offline_app(
        Vec::new(),
        Some(VisitorCountry {
            country: "Japan".to_string(),
            code: "JP".to_string(),
        }),
    );

    let response = app.oneshot(get("/v1/geo")).await.unwrap();
    assert_eq!(
        json_body(response).await,
        json!({ "country": "Japan", "code": "JP" })
    );
}

#[tokio::test]
async fn hotels_default_to_new_york() {
    let app = offline_app(Vec::new(), None);

    let response = app.clone().oneshot(get("/v1/hotels")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["hotels"][0]["name"], "New York Grand Hotel");

    let response = app.oneshot(get("/v1/hotels?city=Madrid")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["hotels"][1]["name"], "Madrid City Suites");
    assert_eq!(body["hotels"][1]["rating"], 4.4);
}

#[tokio::test]
async fn proxy_routes_are_rate_limited_per_ip() {
    let config = ApiConfig {
        rate_limit_window: Duration::from_secs(60),
        rate_limit_max: 1,
        ..ApiConfig::default()
    };
    let app = app_with_config(&config, Upstream::fixed(Vec::new(), None));

    let first = app.clone().oneshot(get("/v1/geo")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.clone().oneshot(get("/v1/geo")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    // Plans never touch third parties and are not limited.
    let plan = app
        .oneshot(post_json(
            "/v1/plan",
            json!({ "destinationName": "Rome" }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(plan.status(), StatusCode::OK);
}
