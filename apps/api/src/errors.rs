use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::hh_client::HhError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Authorization code exchange failed: {0}")]
    AuthExchangeFailed(String),

    #[error("{service} returned status {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid {service} payload: {message}")]
    InvalidPayload {
        service: &'static str,
        message: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<HhError> for AppError {
    fn from(e: HhError) -> Self {
        match e {
            HhError::AuthExchange(msg) => AppError::AuthExchangeFailed(msg),
            HhError::Upstream { status, body } => AppError::Upstream {
                service: "provider",
                status,
                message: body,
            },
            HhError::Payload(msg) => AppError::InvalidPayload {
                service: "provider",
                message: msg,
            },
            HhError::Http(e) => AppError::Internal(anyhow::Error::new(e).context("provider request")),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Upstream { status, body } => AppError::Upstream {
                service: "store",
                status,
                message: body,
            },
            StoreError::Payload(msg) => AppError::InvalidPayload {
                service: "store",
                message: msg,
            },
            StoreError::Http(e) => AppError::Internal(anyhow::Error::new(e).context("store request")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, upstream_status) = match &self {
            AppError::Unauthenticated => return Redirect::to("/").into_response(),
            AppError::AuthExchangeFailed(msg) => {
                tracing::error!("Auth error: {msg}");
                return Redirect::to("/?error=auth_failed").into_response();
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Upstream {
                service,
                status,
                message,
            } => {
                tracing::error!("{service} error {status}: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("The {service} rejected the request"),
                    Some(*status),
                )
            }
            AppError::InvalidPayload { service, message } => {
                tracing::error!("Invalid {service} payload: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INVALID_PAYLOAD",
                    format!("The {service} returned an unexpected payload"),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "upstream_status": upstream_status,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_unauthenticated_redirects_to_landing() {
        let response = AppError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[test]
    fn test_auth_exchange_failure_redirects_with_flag() {
        let response = AppError::AuthExchangeFailed("bad code".into()).into_response();
        assert_eq!(response.headers()[LOCATION], "/?error=auth_failed");
    }

    #[test]
    fn test_upstream_error_maps_to_bad_gateway() {
        let err: AppError = HhError::Upstream {
            status: 404,
            body: "not found".into(),
        }
        .into();
        assert!(matches!(err, AppError::Upstream { status: 404, .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
