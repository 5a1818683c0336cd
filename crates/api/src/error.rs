//! Unified error handling for the HTTP surface.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::shopify::ProvisionError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shop domain or access token header absent.
    #[error("Missing Shopify headers.")]
    MissingShopHeaders,

    /// Shop domain header present but unusable.
    #[error("Invalid shop domain: {0}")]
    InvalidShopDomain(String),

    /// Request body could not be read as a submission.
    #[error("Invalid product payload.")]
    InvalidPayload(String),

    /// Query string could not be read.
    #[error("Invalid query parameters.")]
    InvalidQuery(String),

    /// A pipeline stage failed.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingShopHeaders => StatusCode::UNAUTHORIZED,
            Self::InvalidShopDomain(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Provision(err) => match err {
                ProvisionError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
                ProvisionError::RemoteOperation { .. } => StatusCode::BAD_GATEWAY,
                ProvisionError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ProvisionError::Integrity(_) | ProvisionError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        // Don't expose database or internal details to clients
        let (message, errors) = match self {
            Self::Provision(ProvisionError::RemoteOperation { raw, .. }) => {
                (self.to_string(), Some(raw.clone()))
            }
            Self::Provision(ProvisionError::Validation { errors, .. }) => {
                (self.to_string(), serde_json::to_value(errors).ok())
            }
            Self::Provision(ProvisionError::Repository(_)) | Self::Internal(_) => {
                ("Unexpected server error.".to_string(), None)
            }
            Self::InvalidPayload(detail) | Self::InvalidQuery(detail) => (
                self.to_string(),
                Some(serde_json::Value::from(vec![detail.clone()])),
            ),
            _ => (self.to_string(), None),
        };

        ErrorBody {
            success: false,
            message,
            errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Provisioning request error"
            );
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

/// Render a handler panic as a generic 500.
///
/// Installed through `CatchPanicLayer::custom`; the panic message is logged
/// and reported but never sent to the client.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    AppError::Internal(format!("panic: {detail}")).into_response()
}
