//! Error taxonomy shared across the service layers
//!
//! Each variant maps to a distinct HTTP outcome: configuration and
//! transport problems are 500s, bad caller input is a 400, and
//! exchange failures pass the upstream status through untouched.
//! Client-visible payloads may include the upstream status and error
//! body for debuggability but never credential values.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum Error {
    /// Required exchange configuration is absent. Holds field names
    /// only, never values.
    #[error("exchange configuration missing: {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    /// Missing or empty required input from the caller.
    #[error("{0}")]
    Input(String),

    /// Non-2xx response from the exchange; status and diagnostic body
    /// are preserved, not swallowed.
    #[error("exchange returned status {status}")]
    Upstream { status: u16, body: String },

    /// A numeric field from upstream failed to parse. Callers skip the
    /// offending row rather than abort the request.
    #[error("malformed {field}: {value:?}")]
    Parse {
        field: &'static str,
        value: String,
    },

    #[error("exchange request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Dashboard endpoints require the strategy store; it was not
    /// configured at startup.
    #[error("strategy store not configured")]
    StoreUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn input(message: impl Into<String>) -> Self {
        Error::Input(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Input(_) => StatusCode::BAD_REQUEST,
            Error::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Error::Configuration { missing } => json!({
                "error": "Exchange API configuration missing",
                "missing": missing,
            }),
            Error::Input(message) => json!({ "error": message }),
            Error::Upstream { status, body } => {
                // Upstream bodies are usually JSON; fall back to the
                // raw text when they are not.
                let details: Value = serde_json::from_str(body)
                    .unwrap_or_else(|_| Value::String(body.clone()));
                json!({
                    "error": "Exchange API error",
                    "status": status,
                    "details": details,
                })
            }
            Error::Parse { field, value } => json!({
                "error": "Malformed exchange response",
                "details": format!("could not parse {} from {:?}", field, value),
            }),
            Error::Transport(e) => json!({
                "error": "Failed to reach exchange",
                "details": e.to_string(),
            }),
            Error::Database(e) => json!({
                "error": "Strategy store query failed",
                "details": e.to_string(),
            }),
            Error::StoreUnavailable => json!({
                "error": "Strategy store not configured",
            }),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        } else {
            warn!(status = %status, error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
