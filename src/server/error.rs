//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::spotify::SpotifyError;

pub const RELOGIN_HINT: &str = "Unauthorized - please re-login";

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request parameter is absent.
    #[error("{0}")]
    MissingInput(String),

    /// A request parameter is present but unusable.
    #[error("{0}")]
    InvalidInput(String),

    /// A secret the handler depends on is not configured.
    #[error("{0}")]
    Configuration(String),

    #[error("{message}")]
    Unauthorized {
        message: String,
        details: Option<Value>,
    },

    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<Value>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn missing_config(variable: &str) -> Self {
        ApiError::Configuration(format!("Server configuration error: {} is not set", variable))
    }

    /// Maps an upstream failure: a rejected token becomes a 401 with the
    /// re-login hint, anything else a 500 carrying `message`.
    pub fn from_spotify(err: SpotifyError, message: &str) -> Self {
        if err.is_unauthorized() {
            ApiError::Unauthorized {
                message: RELOGIN_HINT.to_string(),
                details: Some(err.details()),
            }
        } else {
            ApiError::Upstream {
                message: message.to_string(),
                details: Some(err.details()),
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Configuration(_) | ApiError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}: {:?}", status, self);
        } else {
            warn!("{}: {}", status, self);
        }

        let (error, details) = match self {
            ApiError::MissingInput(message)
            | ApiError::InvalidInput(message)
            | ApiError::Configuration(message) => (message, None),
            ApiError::Unauthorized { message, details }
            | ApiError::Upstream { message, details } => (message, details),
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}
