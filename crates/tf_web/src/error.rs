use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// 502 - the news or price provider failed
    Upstream(String),

    /// 503 - not configured, or the request was abandoned
    Unavailable(String),

    /// 500 - anything else
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<tf_core::Error> for ApiError {
    fn from(err: tf_core::Error) -> Self {
        use tf_core::Error;
        match err {
            Error::Configuration(msg) => ApiError::Unavailable(msg),
            Error::Cancelled => ApiError::Unavailable("Request cancelled".into()),
            e if e.is_fetch_error() => ApiError::Upstream(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}
