//! HTTP surface for identity reconciliation.
//!
//! Exposes an axum [`Router`] that runs every request through a
//! [`Consolidator`] backed by any [`ContactStore`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = ident_server::router(AppState::new(store, config));
//! ```

pub mod config;
pub mod error;
pub mod identify;
pub mod validate;

use std::sync::Arc;

use axum::{Router, routing::post};
use ident_core::{Consolidator, store::ContactStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub engine: Arc<Consolidator<S>>,
  pub config: Arc<ServerConfig>,
}

impl<S: ContactStore> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    Self {
      engine: Arc::new(Consolidator::new(store)),
      config: Arc::new(config),
    }
  }
}

// `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      engine: Arc::clone(&self.engine),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The `/contacts` routes, without the `/api` prefix or middleware.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    .route("/contacts/identify", post(identify::handler::<S>))
    .with_state(state)
}

/// The full application: `/api` routes plus CORS and request tracing.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}
