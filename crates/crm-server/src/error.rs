//! HTTP error envelope.
//!
//! Every failure leaves the server as `{"error": ...}`. Validation
//! failures carry the `{formErrors, fieldErrors}` object, everything
//! else a message string. Internal causes are logged, never returned.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crm_core::error::CrmError;
use crm_core::validation::FieldErrors;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    Crm(CrmError),
    /// The body could not be read or parsed as JSON.
    Body { status: StatusCode, message: String },
    MissingToken,
    InvalidToken,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        Self::Crm(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Crm(CrmError::Validation(errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::Body {
            status,
            message: rejection.body_text(),
        }
    }
}

fn entity_label(entity: &str) -> &str {
    match entity {
        "client" => "Client",
        "project" => "Project",
        "interaction_log" => "Interaction Log",
        "reminder" => "Reminder",
        "account" => "Account",
        other => other,
    }
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(json!({ "error": text.into() }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingToken => message(StatusCode::UNAUTHORIZED, "Missing token"),
            ApiError::InvalidToken => message(StatusCode::UNAUTHORIZED, "Invalid token"),
            ApiError::Body { status, message: text } => (
                status,
                Json(json!({ "error": FieldErrors::form(text) })),
            )
                .into_response(),
            ApiError::Crm(err) => match err {
                CrmError::Validation(errors) => {
                    (StatusCode::BAD_REQUEST, Json(json!({ "error": errors }))).into_response()
                }
                CrmError::NotFound { entity, .. } => message(
                    StatusCode::NOT_FOUND,
                    format!("{} not found", entity_label(&entity)),
                ),
                CrmError::AlreadyExists { entity } => message(
                    StatusCode::BAD_REQUEST,
                    format!("{} already exists", entity_label(&entity)),
                ),
                CrmError::AuthenticationFailed { reason } => {
                    warn!(%reason, "Authentication failed");
                    message(StatusCode::UNAUTHORIZED, "Invalid login credentials")
                }
                CrmError::Database(_) | CrmError::Crypto(_) => {
                    error!(error = %err, "Request failed");
                    message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
        }
    }
}
