//! Mapping of service failures onto HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use songlib_service::ServiceError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    error: String,
}

/// An error answered as `{"error": <message>}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Translate a service failure. Client errors carry their own message;
    /// server-side failures answer with `internal` and keep the detail in
    /// the log.
    pub fn from_service(err: ServiceError, internal: &str) -> Self {
        match err {
            ServiceError::Validation(message) => Self::bad_request(message),
            ServiceError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ServiceError::Enrichment(_) | ServiceError::Storage(_) | ServiceError::Task(_) => {
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: internal.to_string(),
                }
            }
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("invalid query: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songlib_service::EnrichError;

    #[test]
    fn test_service_errors_map_to_status() {
        let cases = [
            (
                ServiceError::Validation("group must not be empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::NotFound {
                    id: "3".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Enrichment(EnrichError::Status {
                    source_name: "music-info".to_string(),
                    status: 502,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from_service(err, "failed").status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ApiError::from_service(
            ServiceError::Enrichment(EnrichError::Parse {
                source_name: "music-info".to_string(),
                message: "secret detail".to_string(),
            }),
            "failed to create song",
        );
        assert_eq!(err.message, "failed to create song");
    }
}
