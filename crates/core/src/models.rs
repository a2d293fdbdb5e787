use serde::{Deserialize, Serialize, Serializer};

/// Default duration applied when a request does not mention one at all.
pub const DEFAULT_DURATION_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[default]
    National,
    International,
}

impl TripType {
    pub fn parse(value: &str) -> Self {
        match value {
            "international" => Self::International,
            _ => Self::National,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::National => "national",
            Self::International => "international",
        }
    }

    /// Wording used in the outline highlight.
    pub fn outline_label(self) -> &'static str {
        match self {
            Self::National => "local",
            Self::International => "international",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Low,
    #[default]
    Mid,
    High,
}

impl BudgetTier {
    pub fn parse(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "high" => Self::High,
            "mid" => Self::Mid,
            _ => Self::Mid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }

    pub fn per_day_rate(self) -> u32 {
        match self {
            Self::Low => 80,
            Self::Mid => 140,
            Self::High => 240,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartySize {
    Solo,
    #[default]
    Couple,
    Family,
    Group,
}

impl PartySize {
    pub fn parse(value: &str) -> Self {
        match value {
            "solo" => Self::Solo,
            "family" => Self::Family,
            "group" => Self::Group,
            "couple" => Self::Couple,
            _ => Self::Couple,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Couple => "couple",
            Self::Family => "family",
            Self::Group => "group",
        }
    }

    /// Budget multiplier; families count as three and a half travellers.
    pub fn traveller_count(self) -> f64 {
        match self {
            Self::Solo => 1.0,
            Self::Couple => 2.0,
            Self::Family => 3.5,
            Self::Group => 5.0,
        }
    }
}

/// How the party gets around. Unknown modes are kept verbatim so they can be
/// echoed back, and share the generic tip with own/rental/taxi.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportMode {
    Own,
    Rental,
    Taxi,
    #[default]
    Public,
    Flight,
    Other(String),
}

impl TransportMode {
    pub fn parse(value: &str) -> Self {
        match value {
            "own" => Self::Own,
            "rental" => Self::Rental,
            "taxi" => Self::Taxi,
            "public" => Self::Public,
            "flight" => Self::Flight,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Own => "own",
            Self::Rental => "rental",
            Self::Taxi => "taxi",
            Self::Public => "public",
            Self::Flight => "flight",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            Self::Flight => {
                "Arrive a day early to buffer flight delays; keep airport transfers pre-booked."
            }
            Self::Public => "Grab a day-pass for buses/metro—fewer tickets, faster boarding.",
            Self::Own | Self::Rental | Self::Taxi | Self::Other(_) => {
                "Enable offline maps and save your parking/ride drop points."
            }
        }
    }
}

impl From<String> for TransportMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TransportMode> for String {
    fn from(value: TransportMode) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinds: Option<String>,
    #[serde(default, alias = "dist", skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl NearbyPoint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The display name, if it is usable as a day focus.
    pub fn usable_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination_name: String,
    pub duration_days: u32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub trip_type: TripType,
    pub origin_country: Option<String>,
    pub budget_tier: BudgetTier,
    pub party_size: PartySize,
    pub nearby_points: Vec<NearbyPoint>,
    pub transport_mode: TransportMode,
    pub multi_spot: bool,
}

impl TripRequest {
    pub fn new(destination_name: impl Into<String>) -> Self {
        Self {
            destination_name: destination_name.into(),
            duration_days: DEFAULT_DURATION_DAYS,
            start_date: None,
            end_date: None,
            trip_type: TripType::default(),
            origin_country: None,
            budget_tier: BudgetTier::default(),
            party_size: PartySize::default(),
            nearby_points: Vec::new(),
            transport_mode: TransportMode::default(),
            multi_spot: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub label: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub total: i64,
    pub per_day_rate: u32,
    #[serde(serialize_with = "serialize_count")]
    pub traveller_count: f64,
    pub breakdown: Vec<BudgetLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day_number: u32,
    pub focus: String,
    pub summary: String,
    pub dinner_suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub title: String,
    pub summary: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub highlights: Vec<String>,
    pub budget: Budget,
    pub days: Vec<DayPlan>,
    pub transport_mode: TransportMode,
    pub transport_tip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSuggestion {
    pub name: String,
    pub rating: f64,
    pub blurb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorCountry {
    pub country: String,
    pub code: String,
}

impl VisitorCountry {
    pub fn fallback() -> Self {
        Self {
            country: "United States".to_string(),
            code: "US".to_string(),
        }
    }
}

/// Whole traveller counts go out as integers (`2`, not `2.0`).
fn serialize_count<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 && *value >= 0.0 {
        serializer.serialize_u64(*value as u64)
    } else {
        serializer.serialize_f64(*value)
    }
}
