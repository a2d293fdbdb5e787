use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use wayfarer_core::PlanError;
use wayfarer_upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("{0}")]
    BadRequest(String),

    #[error("no coordinates found for {0}")]
    CityNotFound(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("rate limit exceeded for this IP")]
    RateLimited,

    #[error("attractions lookup is not configured")]
    PlacesUnavailable,

    #[error("upstream lookup failed")]
    Upstream(#[source] anyhow::Error),
}

/// Every failure goes out as `{ "error": <message> }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn from_upstream(error: anyhow::Error) -> Self {
        match error.downcast_ref::<UpstreamError>() {
            Some(UpstreamError::PlacesNotConfigured) => Self::PlacesUnavailable,
            _ => Self::Upstream(error),
        }
    }

    pub fn from_body_rejection(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::Plan(PlanError::MalformedRequest(rejection.body_text()))
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Plan(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::PlacesUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(error) => tracing::error!(error = ?error, "upstream error"),
            _ => tracing::debug!(error = %self, "client error"),
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
