use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, instrument, warn};
use wayfarer_core::{
    hotel_suggestions, parse_trip_request, synthesize_plan, Coordinates, HotelSuggestion,
    NearbyPoint, NearbyQuery, PlanError, TripPlan, TripRequest, VisitorCountry,
};
use wayfarer_observability::AppMetrics;
use wayfarer_upstream::{GeoProvider, GeocodeProvider, PlacesProvider};

/// Front door for every trip operation. Collaborators are handed in by the
/// caller; nothing here reaches for process-wide state.
#[derive(Clone)]
pub struct TripConcierge<U>
where
    U: PlacesProvider + GeoProvider + GeocodeProvider,
{
    upstream: Arc<U>,
    metrics: Arc<AppMetrics>,
}

impl<U> TripConcierge<U>
where
    U: PlacesProvider + GeoProvider + GeocodeProvider,
{
    pub fn new(upstream: Arc<U>, metrics: Arc<AppMetrics>) -> Self {
        Self { upstream, metrics }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub fn plan_trip(&self, request: &TripRequest) -> TripPlan {
        let started = Instant::now();
        self.metrics.inc_request();

        let plan = synthesize_plan(request);

        self.metrics.inc_plan();
        self.metrics.observe_latency(started.elapsed());
        info!(
            destination = %request.destination_name,
            days = plan.days.len(),
            budget_total = plan.budget.total,
            transport = %plan.transport_mode.as_str(),
            "trip plan synthesized"
        );
        plan
    }

    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub fn plan_from_json(&self, body: &[u8]) -> Result<TripPlan, PlanError> {
        match parse_trip_request(body) {
            Ok(request) => Ok(self.plan_trip(&request)),
            Err(error) => {
                self.metrics.inc_request();
                self.metrics.inc_validation_failure();
                warn!(kind = error.kind(), error = %error, "trip plan request rejected");
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn nearby_points(&self, query: &NearbyQuery) -> Result<Vec<NearbyPoint>> {
        self.metrics.inc_request();
        match self.upstream.nearby(query).await {
            Ok(points) => {
                info!(count = points.len(), "nearby points fetched");
                Ok(points)
            }
            Err(error) => {
                self.metrics.inc_upstream_failure();
                warn!(error = %error, "nearby points lookup failed");
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn geocode_city(&self, city: &str) -> Result<Option<Coordinates>> {
        self.metrics.inc_request();
        match self.upstream.geocode(city).await {
            Ok(found) => {
                if found.is_none() {
                    info!("city not found by geocoder");
                }
                Ok(found)
            }
            Err(error) => {
                self.metrics.inc_upstream_failure();
                warn!(error = %error, "geocode lookup failed");
                Err(error)
            }
        }
    }

    /// Fills an empty `nearby_points` list from attractions around the
    /// destination. Lookup failures leave the request as it was.
    pub async fn with_nearby_attractions(&self, mut request: TripRequest) -> TripRequest {
        if !request.nearby_points.is_empty() {
            return request;
        }

        let origin = match self.geocode_city(&request.destination_name).await {
            Ok(Some(origin)) => origin,
            Ok(None) | Err(_) => return request,
        };

        if let Ok(points) = self.nearby_points(&NearbyQuery::around(origin)).await {
            request.nearby_points = points
                .into_iter()
                .filter(|point| point.usable_name().is_some())
                .collect();
        }
        request
    }

    /// Never fails: lookup problems resolve to the fixed fallback country.
    pub async fn locate_visitor(&self) -> VisitorCountry {
        self.metrics.inc_request();
        match self.upstream.locate().await {
            Ok(country) => country,
            Err(error) => {
                self.metrics.inc_upstream_failure();
                warn!(error = %error, "visitor geo lookup failed, using fallback");
                VisitorCountry::fallback()
            }
        }
    }

    pub fn hotel_suggestions(&self, city: Option<&str>) -> Vec<HotelSuggestion> {
        self.metrics.inc_request();
        hotel_suggestions(city)
    }
}
