//! Error types for `ident-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreFailure;

/// A boxed store error, kept opaque so the engine is backend-agnostic.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Neither an email nor a phone number was supplied.
  #[error("either email or phone number must be provided")]
  MissingIdentifier,

  /// A secondary points at a contact that is missing or not a primary.
  #[error(
    "secondary contact {contact_id} links to {linked_id:?}, which is not a \
     primary contact"
  )]
  DanglingPrimary {
    contact_id: Uuid,
    linked_id:  Option<Uuid>,
  },

  /// The store rejected a write that would duplicate an existing contact.
  #[error("store conflict: {0}")]
  Conflict(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl Error {
  /// Wrap a backend error, keeping uniqueness conflicts distinguishable.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StoreFailure + std::error::Error + Send + Sync + 'static,
  {
    if e.is_conflict() {
      Self::Conflict(Box::new(e))
    } else {
      Self::Store(Box::new(e))
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
