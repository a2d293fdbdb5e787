use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::NearbyPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl NearbyQuery {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            radius: default_radius(),
            kind: default_kind(),
            limit: default_limit(),
        }
    }

    pub fn around(origin: Coordinates) -> Self {
        Self::new(origin.lat, origin.lon)
    }
}

fn default_radius() -> u32 {
    50_000
}

fn default_kind() -> String {
    "interesting_places".to_string()
}

fn default_limit() -> u32 {
    20
}

/// Flattens an OpenTripMap radius-search FeatureCollection. GeoJSON stores
/// coordinates as `[lon, lat]`.
pub fn points_from_feature_collection(payload: &Value) -> Vec<NearbyPoint> {
    let Some(features) = payload.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };

    features
        .iter()
        .map(|feature| {
            let properties = feature.get("properties");
            let text = |key: &str| {
                properties
                    .and_then(|props| props.get(key))
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            };
            let coordinates = feature
                .get("geometry")
                .and_then(|geometry| geometry.get("coordinates"))
                .and_then(Value::as_array);
            let coordinate = |index: usize| {
                coordinates
                    .and_then(|values| values.get(index))
                    .and_then(Value::as_f64)
            };

            NearbyPoint {
                id: text("xid"),
                name: text("name"),
                kinds: text("kinds"),
                distance: properties
                    .and_then(|props| props.get("dist"))
                    .and_then(Value::as_f64),
                lat: coordinate(1),
                lon: coordinate(0),
            }
        })
        .collect()
}

/// First hit of a Nominatim `format=json` search. Nominatim sends `lat`/`lon`
/// as decimal strings; plain numbers are accepted too.
pub fn coordinates_from_search(payload: &Value) -> Option<Coordinates> {
    let first = payload.as_array()?.first()?;
    let coordinate = |key: &str| {
        let parsed = match first.get(key)? {
            Value::String(text) => text.trim().parse::<f64>().ok(),
            Value::Number(number) => number.as_f64(),
            _ => None,
        };
        parsed.filter(|value| value.is_finite())
    };

    Some(Coordinates {
        lat: coordinate("lat")?,
        lon: coordinate("lon")?,
    })
}
