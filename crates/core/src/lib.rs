pub mod error;
pub mod hotels;
pub mod models;
pub mod places;
pub mod planner;
pub mod request;

pub use error::PlanError;
pub use hotels::hotel_suggestions;
pub use models::*;
pub use places::{coordinates_from_search, points_from_feature_collection, Coordinates, NearbyQuery};
pub use planner::{plan_from_json, synthesize_plan};
pub use request::{coerce_duration, parse_trip_request};
