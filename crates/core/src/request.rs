use serde_json::{Map, Value};

use crate::error::PlanError;
use crate::models::{
    BudgetTier, NearbyPoint, PartySize, TransportMode, TripRequest, TripType,
    DEFAULT_DURATION_DAYS,
};

const MALFORMED_PAYLOAD: &str = "Invalid JSON payload";

/// Parses a raw request body. An empty body counts as `{}`.
pub fn parse_trip_request(body: &[u8]) -> Result<TripRequest, PlanError> {
    let value = if body.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice::<Value>(body)
            .map_err(|_| PlanError::MalformedRequest(MALFORMED_PAYLOAD.to_string()))?
    };

    TripRequest::from_value(&value)
}

impl TripRequest {
    /// Builds a request from loosely-typed JSON. Only a missing or blank
    /// destination is an error; every other field degrades to its default.
    pub fn from_value(value: &Value) -> Result<Self, PlanError> {
        let object = value
            .as_object()
            .ok_or_else(|| PlanError::MalformedRequest(MALFORMED_PAYLOAD.to_string()))?;

        let destination_name = field(object, &["destinationName", "mainCity"])
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(PlanError::missing_destination)?
            .to_string();

        let duration_days = field(object, &["durationDays", "duration"])
            .map(coerce_duration)
            .unwrap_or(DEFAULT_DURATION_DAYS);

        let nearby_points = field(object, &["nearbyPoints", "nearby"])
            .and_then(Value::as_array)
            .map(|items| items.iter().map(nearby_point_from_value).collect())
            .unwrap_or_default();

        Ok(Self {
            destination_name,
            duration_days,
            start_date: non_empty_str(object, &["startDate"]),
            end_date: non_empty_str(object, &["endDate"]),
            trip_type: field(object, &["tripType", "tourType"])
                .and_then(Value::as_str)
                .map(TripType::parse)
                .unwrap_or_default(),
            origin_country: non_empty_str(object, &["originCountry", "homeCountry"]),
            budget_tier: field(object, &["budgetTier"])
                .and_then(Value::as_str)
                .map(BudgetTier::parse)
                .unwrap_or_default(),
            party_size: field(object, &["partySize", "party"])
                .and_then(Value::as_str)
                .map(PartySize::parse)
                .unwrap_or_default(),
            nearby_points,
            transport_mode: field(object, &["transportMode", "transport"])
                .and_then(Value::as_str)
                .map(TransportMode::parse)
                .unwrap_or_default(),
            multi_spot: field(object, &["multiSpot"])
                .map(is_truthy)
                .unwrap_or(false),
        })
    }
}

/// `max(1, leading-integer-or-1)`. Values past `u32::MAX` saturate.
pub fn coerce_duration(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(text) => leading_integer(text),
        _ => None,
    };

    match parsed {
        Some(days) if days >= 1 => u32::try_from(days).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn nearby_point_from_value(value: &Value) -> NearbyPoint {
    let id = value.get("id").and_then(|id| match id {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    });

    NearbyPoint {
        id,
        name: value
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        kinds: value
            .get("kinds")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        distance: value
            .get("distance")
            .or_else(|| value.get("dist"))
            .and_then(Value::as_f64),
        lat: value.get("lat").and_then(Value::as_f64),
        lon: value.get("lon").and_then(Value::as_f64),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn non_empty_str(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(object, keys)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}
