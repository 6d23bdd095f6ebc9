//! Error type for `ident-store-sqlite`.

use ident_core::store::StoreFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A write collided with the `(email, phone_number)` uniqueness index.
  #[error("duplicate contact: {0}")]
  Duplicate(tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown link precedence: {0:?}")]
  UnknownPrecedence(String),

  #[error("contact not found: {0}")]
  ContactNotFound(uuid::Uuid),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if is_unique_violation(&e) {
      Error::Duplicate(e)
    } else {
      Error::Database(e)
    }
  }
}

/// Only UNIQUE violations count; CHECK failures stay database errors.
fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

impl StoreFailure for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::Duplicate(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
