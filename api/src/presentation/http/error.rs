use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::ports::edms_client::EdmsClientError;
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation::ValidationErrors;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ValidationErrors>,
}

/// Error response of every handler: a status plus `{error, fields?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        let message = status.canonical_reason().unwrap_or("error");
        Self::new(status, message)
    }
}

impl From<EdmsClientError> for ApiError {
    fn from(err: EdmsClientError) -> Self {
        let status = match &err {
            EdmsClientError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EdmsClientError::Forbidden(_) => StatusCode::FORBIDDEN,
            EdmsClientError::NotFound => StatusCode::NOT_FOUND,
            EdmsClientError::Rejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(StatusCode::is_client_error)
                .unwrap_or(StatusCode::BAD_GATEWAY),
            EdmsClientError::Transport(_) | EdmsClientError::Decode(_) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::error!(error = ?err, "edms_api_error");
        }
        Self::new(status, err.to_string())
    }
}

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Validation(fields) => {
                let names: Vec<&str> = fields.fields().collect();
                Self {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    message: format!("invalid {}", names.join(", ")),
                    fields: Some(fields),
                }
            }
            UseCaseError::NotAvailable(action) => {
                tracing::debug!(action, "workflow_action_not_available");
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            UseCaseError::Client(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            fields: self.fields,
        };
        (self.status, Json(body)).into_response()
    }
}
