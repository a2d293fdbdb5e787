pub mod config;
pub mod error;
pub mod rate_limit;

use std::sync::Arc;

use anyhow::Result;
use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use wayfarer_agents::TripConcierge;
use wayfarer_core::{
    Coordinates, HotelSuggestion, NearbyPoint, NearbyQuery, TripPlan, VisitorCountry,
};
use wayfarer_observability::{AppMetrics, MetricsSnapshot};
use wayfarer_upstream::Upstream;

pub use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::rate_limit::IpRateLimiter;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub concierge: Arc<TripConcierge<Upstream>>,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    attractions: bool,
    geo: bool,
    geocode: bool,
    hotels: bool,
}

#[derive(Debug, Default, Deserialize)]
struct AttractionsParams {
    lat: Option<String>,
    lon: Option<String>,
    city: Option<String>,
    radius: Option<String>,
    kind: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct AttractionsResponse {
    items: Vec<NearbyPoint>,
}

#[derive(Debug, Deserialize)]
struct GeocodeParams {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HotelsParams {
    city: Option<String>,
}

#[derive(Debug, Serialize)]
struct HotelsResponse {
    hotels: Vec<HotelSuggestion>,
}

/// Builds the service against the real third-party endpoints named in `config`.
pub fn build_app(config: &ApiConfig) -> Result<Router> {
    let upstream = Upstream::http(config.upstream.clone())?;
    Ok(build_app_with_upstream(config, upstream))
}

pub fn build_app_with_upstream(config: &ApiConfig, upstream: Upstream) -> Router {
    let metrics = AppMetrics::shared();
    let concierge = Arc::new(TripConcierge::new(Arc::new(upstream), metrics));

    let state = ApiState {
        concierge,
        limiter: IpRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
        allowed_origins: Arc::new(config.allowed_origins.clone()),
    };

    build_router(state)
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/plan", post(plan_trip))
        .route("/v1/attractions", get(attractions))
        .route("/v1/geo", get(visitor_geo))
        .route("/v1/geocode", get(geocode))
        .route("/v1/hotels", get(hotels))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(payload_too_large_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.concierge.metrics().snapshot(),
        capabilities: HealthCapabilities {
            attractions: state.concierge.upstream().places_configured(),
            geo: true,
            geocode: true,
            hotels: true,
        },
    };

    Json(payload)
}

async fn plan_trip(
    State(state): State<ApiState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<TripPlan>> {
    let body = body.map_err(ApiError::from_body_rejection)?;
    let plan = state.concierge.plan_from_json(&body)?;
    Ok(Json(plan))
}

async fn attractions(
    State(state): State<ApiState>,
    Query(params): Query<AttractionsParams>,
) -> ApiResult<Json<AttractionsResponse>> {
    let origin = match coordinates_param(&params) {
        Some(origin) => origin,
        None => {
            let city = city_param(params.city.as_deref())
                .ok_or_else(|| ApiError::BadRequest("lat & lon required".to_string()))?;
            resolve_city(&state, city).await?
        }
    };

    let query = nearby_query(&params, origin);
    let items = state
        .concierge
        .nearby_points(&query)
        .await
        .map_err(ApiError::from_upstream)?;

    Ok(Json(AttractionsResponse { items }))
}

async fn geocode(
    State(state): State<ApiState>,
    Query(params): Query<GeocodeParams>,
) -> ApiResult<Json<Coordinates>> {
    let city = city_param(params.city.as_deref())
        .ok_or_else(|| ApiError::BadRequest("city required".to_string()))?;
    Ok(Json(resolve_city(&state, city).await?))
}

async fn resolve_city(state: &ApiState, city: &str) -> ApiResult<Coordinates> {
    state
        .concierge
        .geocode_city(city)
        .await
        .map_err(ApiError::from_upstream)?
        .ok_or_else(|| ApiError::CityNotFound(city.to_string()))
}

async fn visitor_geo(State(state): State<ApiState>) -> Json<VisitorCountry> {
    Json(state.concierge.locate_visitor().await)
}

async fn hotels(
    State(state): State<ApiState>,
    Query(params): Query<HotelsParams>,
) -> Json<HotelsResponse> {
    Json(HotelsResponse {
        hotels: state.concierge.hotel_suggestions(params.city.as_deref()),
    })
}

fn city_param(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|city| !city.is_empty())
}

// Explicit coordinates win over `city`.
fn coordinates_param(params: &AttractionsParams) -> Option<Coordinates> {
    let coordinate = |value: Option<&str>| {
        value
            .map(str::trim)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|parsed| parsed.is_finite())
    };

    Some(Coordinates {
        lat: coordinate(params.lat.as_deref())?,
        lon: coordinate(params.lon.as_deref())?,
    })
}

fn nearby_query(params: &AttractionsParams, origin: Coordinates) -> NearbyQuery {
    let mut query = NearbyQuery::around(origin);
    if let Some(radius) = params
        .radius
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
    {
        query.radius = radius;
    }
    if let Some(kind) = params
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
    {
        query.kind = kind.to_string();
    }
    if let Some(limit) = params
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
    {
        query.limit = limit;
    }

    query
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static("http://localhost:5173")]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// Only the routes that spend third-party quota are limited.
async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || !is_upstream_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        tracing::warn!(ip = %ip, path = %request.uri().path(), "rate limited");
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}

fn is_upstream_endpoint(path: &str) -> bool {
    matches!(path, "/v1/attractions" | "/v1/geo" | "/v1/geocode")
}

// The body limit answers 413 in plain text, either up front from
// `Content-Length` or from the `Bytes` extractor mid-stream.
async fn payload_too_large_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge.into_response();
    }
    response
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "local".to_string())
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response.headers_mut().insert(
        header::HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    response.headers_mut().insert(
        header::HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
