//! Mapping of lookup failures onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::aggregate::LookupError;
use crate::domain::InvalidStationCode;
use crate::rtt::UpstreamError;

use super::dto::ErrorResponse;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    GatewayTimeout { message: String },
    ServiceUnavailable { message: String },
    /// An upstream 4xx passed through as-is
    Upstream { status: StatusCode, message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { status, .. } => *status,
        }
    }

    fn into_message(self) -> String {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::BadGateway { message }
            | AppError::GatewayTimeout { message }
            | AppError::ServiceUnavailable { message }
            | AppError::Upstream { message, .. } => message,
        }
    }
}

impl From<InvalidStationCode> for AppError {
    fn from(e: InvalidStationCode) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        match &e {
            UpstreamError::Unreachable(_) if e.is_timeout() => AppError::GatewayTimeout {
                message: "upstream service timed out".to_string(),
            },
            UpstreamError::Unreachable(_) => AppError::BadGateway {
                message: "upstream service unreachable".to_string(),
            },
            UpstreamError::Status { status: 404, .. } => AppError::NotFound {
                message: "not found upstream".to_string(),
            },
            UpstreamError::Status {
                status: 401 | 403, ..
            } => AppError::BadGateway {
                message: "upstream rejected the gateway's credentials".to_string(),
            },
            UpstreamError::Status { status: 429, .. } => AppError::ServiceUnavailable {
                message: "upstream rate limit reached".to_string(),
            },
            UpstreamError::Status { status, .. } if (400..500).contains(status) => {
                AppError::Upstream {
                    status: StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    message: format!("upstream returned status {status}"),
                }
            }
            UpstreamError::Status { status, .. } => AppError::BadGateway {
                message: format!("upstream returned status {status}"),
            },
            UpstreamError::Malformed { .. } => AppError::BadGateway {
                message: "upstream returned malformed data".to_string(),
            },
            UpstreamError::DetailUnavailable { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
            UpstreamError::LimiterClosed => AppError::ServiceUnavailable {
                message: "gateway is shutting down".to_string(),
            },
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Upstream(source) => source.into(),
            LookupError::PartialAggregation {
                uid,
                failed,
                total,
                source,
            } => {
                // A missing detail is a gateway failure even when the
                // upstream said 404; the route itself was found.
                let mapped = match AppError::from(source) {
                    AppError::NotFound { message } => AppError::BadGateway { message },
                    other => other,
                };
                let status = mapped.status();
                let message = format!(
                    "{failed} of {total} service details could not be fetched (first failure {uid}: {})",
                    mapped.into_message()
                );
                rebuild(status, message)
            }
        }
    }
}

fn rebuild(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::BAD_GATEWAY => AppError::BadGateway { message },
        StatusCode::GATEWAY_TIMEOUT => AppError::GatewayTimeout { message },
        StatusCode::SERVICE_UNAVAILABLE => AppError::ServiceUnavailable { message },
        status => AppError::Upstream { status, message },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.into_message();

        if status.is_server_error() {
            if status == StatusCode::SERVICE_UNAVAILABLE {
                warn!(status = status.as_u16(), %message, "request failed");
            } else {
                error!(status = status.as_u16(), %message, "request failed");
            }
        } else {
            debug!(status = status.as_u16(), %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: UpstreamError) -> StatusCode {
        AppError::from(e).status()
    }

    fn upstream_status(status: u16) -> UpstreamError {
        UpstreamError::Status {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn upstream_status_semantics_propagate() {
        assert_eq!(status_of(upstream_status(404)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(upstream_status(400)), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(upstream_status(401)), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(upstream_status(403)), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(upstream_status(429)), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(upstream_status(500)), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(upstream_status(503)), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn malformed_is_bad_gateway() {
        let e = UpstreamError::Malformed {
            message: "eof".into(),
            body: String::new(),
        };
        assert_eq!(status_of(e), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn partial_aggregation_keeps_upstream_status() {
        let e = LookupError::PartialAggregation {
            uid: "G67890".into(),
            failed: 1,
            total: 2,
            source: upstream_status(500),
        };
        let app = AppError::from(e);
        assert_eq!(app.status(), StatusCode::BAD_GATEWAY);
        let message = app.into_message();
        assert!(message.contains("G67890"));
        assert!(message.contains("1 of 2"));
    }

    #[test]
    fn missing_detail_is_not_a_404() {
        let e = LookupError::PartialAggregation {
            uid: "G67890".into(),
            failed: 1,
            total: 2,
            source: upstream_status(404),
        };
        assert_eq!(AppError::from(e).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_body_is_not_echoed() {
        let e = UpstreamError::Status {
            status: 500,
            body: "stack trace with secrets".into(),
        };
        let message = AppError::from(e).into_message();
        assert!(!message.contains("secrets"));
    }
}
