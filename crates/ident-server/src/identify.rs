//! Handler for `POST /contacts/identify`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use ident_core::{store::ContactStore, view::ConsolidatedIdentity};
use serde::Serialize;
use tracing::{error, info};

use crate::{AppState, error::ApiError, validate};

/// Success body: the consolidated view under a `contact` key.
#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
  pub contact: ConsolidatedIdentity,
}

/// `POST /contacts/identify` with body `{"email"?, "phoneNumber"?}`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<validate::IdentifyBody>, JsonRejection>,
) -> Result<Json<IdentifyResponse>, ApiError>
where
  S: ContactStore + 'static,
{
  let Json(body) = body.map_err(|e| ApiError::Validation(vec![e.body_text()]))?;
  let request = validate::identify(body)?;

  info!(
    email = request.email.as_deref(),
    phone_number = request.phone_number.as_deref(),
    "identify request"
  );

  let contact = state
    .engine
    .resolve(request.email.as_deref(), request.phone_number.as_deref())
    .await
    .map_err(|e| {
      error!(error = %e, "identify failed");
      ApiError::from_core(e, state.config.expose_errors)
    })?;

  Ok(Json(IdentifyResponse { contact }))
}
