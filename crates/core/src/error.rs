use thiserror::Error;

/// The only two ways a plan request can fail. Every other oddity in a request
/// is defaulted rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    Validation(String),
}

impl PlanError {
    pub fn missing_destination() -> Self {
        Self::Validation("destinationName is required".to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::MalformedRequest(message) | Self::Validation(message) => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "malformed_request",
            Self::Validation(_) => "validation",
        }
    }
}
