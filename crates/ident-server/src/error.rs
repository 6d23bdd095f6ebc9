//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned in place of internal error details when they are hidden.
pub const REDACTED: &str = "Internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Rejected before consolidation ran; one entry per failed rule.
  #[error("validation error: {}", .0.join("; "))]
  Validation(Vec<String>),

  /// The store refused a write that would duplicate a contact.
  #[error("duplicate key: {0}")]
  Conflict(String),

  /// Anything else; `detail` is already redacted if configured.
  #[error("internal error: {detail}")]
  Internal { detail: String },
}

impl ApiError {
  /// Classify an engine failure. With `expose` off, internal details are
  /// replaced by [`REDACTED`].
  pub fn from_core(e: ident_core::Error, expose: bool) -> Self {
    use ident_core::Error as E;
    match e {
      E::MissingIdentifier => ApiError::Validation(vec![e.to_string()]),
      E::Conflict(_) => ApiError::Conflict(e.to_string()),
      E::DanglingPrimary { .. } | E::Store(_) => ApiError::Internal {
        detail: if expose { e.to_string() } else { REDACTED.to_owned() },
      },
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match self {
      ApiError::Validation(errors) => json!({
        "status":  "error",
        "message": "Validation error",
        "error":   errors,
      }),
      ApiError::Conflict(m) => json!({
        "status":  "error",
        "message": "Duplicate key error",
        "error":   m,
      }),
      ApiError::Internal { detail } => json!({
        "status":  "error",
        "message": "Error identifying contact",
        "error":   detail,
      }),
    };
    (status, Json(body)).into_response()
  }
}
