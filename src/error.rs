use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Errors raised by activity directory operations.
///
/// The display strings are the `detail` text returned to HTTP clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Activity not found")]
    ActivityNotFound(String),

    #[error("Student is already signed up for this activity")]
    AlreadySignedUp { activity: String, email: String },

    #[error("Student is not registered for this activity")]
    NotRegistered { activity: String, email: String },
}

impl DirectoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::ActivityNotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::AlreadySignedUp { .. } | DirectoryError::NotRegistered { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
