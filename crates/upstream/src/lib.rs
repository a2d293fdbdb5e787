use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use wayfarer_core::{
    coordinates_from_search, points_from_feature_collection, Coordinates, NearbyPoint,
    NearbyQuery, VisitorCountry,
};

const USER_AGENT: &str = concat!("wayfarer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("places API key is not configured")]
    PlacesNotConfigured,

    #[error("upstream {service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("no visitor country available")]
    NoCountry,
}

pub trait PlacesProvider: Send + Sync {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyPoint>>;
}

pub trait GeoProvider: Send + Sync {
    async fn locate(&self) -> Result<VisitorCountry>;
}

/// City name to coordinates. `Ok(None)` means the lookup worked but found nothing.
pub trait GeocodeProvider: Send + Sync {
    async fn geocode(&self, city: &str) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Clone)]
pub struct HttpUpstreamConfig {
    pub places_base_url: String,
    pub places_api_key: Option<String>,
    pub geo_url: String,
    pub geocode_url: String,
    pub timeout: Duration,
}

impl Default for HttpUpstreamConfig {
    fn default() -> Self {
        Self {
            places_base_url: "https://api.opentripmap.com/0.1/en".to_string(),
            places_api_key: None,
            geo_url: "https://ipapi.co/json/".to_string(),
            geocode_url: "https://nominatim.openstreetmap.org/search".to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    places_radius_url: Url,
    places_api_key: Option<String>,
    geo_url: Url,
    geocode_url: Url,
}

impl HttpUpstream {
    pub fn new(config: HttpUpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(6))
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        let places_radius_url = Url::parse(&format!(
            "{}/places/radius",
            config.places_base_url.trim_end_matches('/')
        ))
        .with_context(|| format!("invalid places base url {}", config.places_base_url))?;
        let geo_url = Url::parse(&config.geo_url)
            .with_context(|| format!("invalid geo url {}", config.geo_url))?;
        let geocode_url = Url::parse(&config.geocode_url)
            .with_context(|| format!("invalid geocode url {}", config.geocode_url))?;

        Ok(Self {
            client,
            places_radius_url,
            places_api_key: config.places_api_key.filter(|key| !key.trim().is_empty()),
            geo_url,
            geocode_url,
        })
    }

    pub fn places_configured(&self) -> bool {
        self.places_api_key.is_some()
    }

    fn radius_url(&self, query: &NearbyQuery, api_key: &str) -> Url {
        let mut url = self.places_radius_url.clone();
        url.query_pairs_mut()
            .append_pair("radius", &query.radius.to_string())
            .append_pair("lon", &query.lon.to_string())
            .append_pair("lat", &query.lat.to_string())
            .append_pair("kinds", &query.kind)
            .append_pair("limit", &query.limit.to_string())
            .append_pair("apikey", api_key);
        url
    }

    fn search_url(&self, city: &str) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("q", city);
        url
    }
}

#[derive(Debug, Deserialize)]
struct GeoLookupResponse {
    country_name: Option<String>,
    country: Option<String>,
}

impl PlacesProvider for HttpUpstream {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyPoint>> {
        let api_key = self
            .places_api_key
            .as_deref()
            .ok_or(UpstreamError::PlacesNotConfigured)?;

        let response = self
            .client
            .get(self.radius_url(query, api_key))
            .send()
            .await
            .context("places radius request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: "opentripmap",
                status: status.as_u16(),
            }
            .into());
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .context("places radius response parse failed")?;
        let points = points_from_feature_collection(&payload);
        tracing::debug!(count = points.len(), "places radius search returned");
        Ok(points)
    }
}

impl GeoProvider for HttpUpstream {
    async fn locate(&self) -> Result<VisitorCountry> {
        let response = self
            .client
            .get(self.geo_url.clone())
            .send()
            .await
            .context("geo lookup request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: "ipapi",
                status: status.as_u16(),
            }
            .into());
        }

        let body: GeoLookupResponse = response
            .json()
            .await
            .context("geo lookup response parse failed")?;
        let fallback = VisitorCountry::fallback();

        Ok(VisitorCountry {
            country: body.country_name.unwrap_or(fallback.country),
            code: body.country.unwrap_or(fallback.code),
        })
    }
}

impl GeocodeProvider for HttpUpstream {
    async fn geocode(&self, city: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(self.search_url(city))
            .send()
            .await
            .context("geocode request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: "nominatim",
                status: status.as_u16(),
            }
            .into());
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .context("geocode response parse failed")?;
        Ok(coordinates_from_search(&payload))
    }
}

/// Canned answers for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct FixedUpstream {
    points: Vec<NearbyPoint>,
    country: Option<VisitorCountry>,
    cities: Vec<(String, Coordinates)>,
}

impl FixedUpstream {
    pub fn new(points: Vec<NearbyPoint>, country: Option<VisitorCountry>) -> Self {
        Self {
            points,
            country,
            cities: Vec::new(),
        }
    }

    pub fn with_city(mut self, name: impl Into<String>, origin: Coordinates) -> Self {
        self.cities.push((name.into(), origin));
        self
    }
}

impl PlacesProvider for FixedUpstream {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyPoint>> {
        Ok(self
            .points
            .iter()
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

impl GeoProvider for FixedUpstream {
    async fn locate(&self) -> Result<VisitorCountry> {
        self.country
            .clone()
            .ok_or_else(|| UpstreamError::NoCountry.into())
    }
}

impl GeocodeProvider for FixedUpstream {
    async fn geocode(&self, city: &str) -> Result<Option<Coordinates>> {
        let city = city.trim();
        Ok(self
            .cities
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city))
            .map(|(_, origin)| *origin))
    }
}

#[derive(Debug, Clone)]
pub enum Upstream {
    Http(HttpUpstream),
    Fixed(FixedUpstream),
}

impl Upstream {
    pub fn http(config: HttpUpstreamConfig) -> Result<Self> {
        Ok(Self::Http(HttpUpstream::new(config)?))
    }

    pub fn fixed(points: Vec<NearbyPoint>, country: Option<VisitorCountry>) -> Self {
        Self::Fixed(FixedUpstream::new(points, country))
    }

    pub fn places_configured(&self) -> bool {
        match self {
            Upstream::Http(upstream) => upstream.places_configured(),
            Upstream::Fixed(_) => true,
        }
    }
}

impl PlacesProvider for Upstream {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyPoint>> {
        match self {
            Upstream::Http(upstream) => upstream.nearby(query).await,
            Upstream::Fixed(upstream) => upstream.nearby(query).await,
        }
    }
}

impl GeoProvider for Upstream {
    async fn locate(&self) -> Result<VisitorCountry> {
        match self {
            Upstream::Http(upstream) => upstream.locate().await,
            Upstream::Fixed(upstream) => upstream.locate().await,
        }
    }
}

impl GeocodeProvider for Upstream {
    async fn geocode(&self, city: &str) -> Result<Option<Coordinates>> {
        match self {
            Upstream::Http(upstream) => upstream.geocode(city).await,
            Upstream::Fixed(upstream) => upstream.geocode(city).await,
        }
    }
}
