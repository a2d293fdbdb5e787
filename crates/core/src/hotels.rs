use crate::models::HotelSuggestion;

const DEFAULT_CITY: &str = "New York";

/// Placeholder partner listings until a real hotel inventory is wired in.
pub fn hotel_suggestions(city: Option<&str>) -> Vec<HotelSuggestion> {
    let city = city
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .unwrap_or(DEFAULT_CITY);

    vec![
        HotelSuggestion {
            name: format!("{} Grand Hotel", city),
            rating: 4.6,
            blurb: "Central location, great reviews.".to_string(),
        },
        HotelSuggestion {
            name: format!("{} City Suites", city),
            rating: 4.4,
            blurb: "Good value, near transport.".to_string(),
        },
    ]
}
