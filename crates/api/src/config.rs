use std::env;
use std::time::Duration;

use wayfarer_upstream::HttpUpstreamConfig;

const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub upstream: HttpUpstreamConfig,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            upstream: HttpUpstreamConfig::default(),
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 60,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let places_api_key = env::var("WAYFARER_OTM_API_KEY")
            .or_else(|_| env::var("OTM_API_KEY"))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let upstream = HttpUpstreamConfig {
            places_base_url: env::var("WAYFARER_OTM_BASE_URL")
                .unwrap_or(defaults.upstream.places_base_url),
            places_api_key,
            geo_url: env::var("WAYFARER_GEO_URL").unwrap_or(defaults.upstream.geo_url),
            geocode_url: env::var("WAYFARER_GEOCODE_URL")
                .unwrap_or(defaults.upstream.geocode_url),
            timeout: env::var("WAYFARER_UPSTREAM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.upstream.timeout),
        };

        Self {
            bind: env::var("WAYFARER_BIND").unwrap_or(defaults.bind),
            upstream,
            rate_limit_window: env::var("WAYFARER_RATE_LIMIT_WINDOW_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_window),
            rate_limit_max: env::var("WAYFARER_RATE_LIMIT_MAX")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(defaults.rate_limit_max),
            allowed_origins: env::var("WAYFARER_ALLOWED_ORIGINS")
                .ok()
                .map(|value| parse_origins(&value))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.allowed_origins),
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
