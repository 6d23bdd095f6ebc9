//! The `ContactStore` trait.
//!
//! Implemented by storage backends (e.g. `ident-store-sqlite`). The
//! consolidation engine and the HTTP layer depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::contact::{Contact, ContactMatch, NewContact};

/// Lets callers tell a uniqueness conflict apart from other store failures.
pub trait StoreFailure {
  /// `true` if the failure was a violated uniqueness constraint.
  fn is_conflict(&self) -> bool { false }
}

/// Abstraction over an identity contact store backend.
///
/// Soft-deleted contacts are invisible to every read. Each method is atomic
/// on its own; multi-step consistency is the caller's concern (see
/// [`crate::consolidate::Consolidator`]).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: StoreFailure + std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every contact matching `query`, oldest `created_at` first. Contacts
  /// created at the same instant keep insertion order. An empty query
  /// matches nothing.
  fn find_all_matching<'a>(
    &'a self,
    query: &'a ContactMatch,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// The contact with `id`, but only if it is a primary.
  fn find_primary_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// All secondaries linked to `primary_id`, oldest first.
  fn find_secondaries_by_primary_id(
    &self,
    primary_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// The contact with `id` regardless of precedence.
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new contact. The store assigns the id and both timestamps.
  fn create(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Mark contact `id` as a secondary of `new_primary_id` and refresh its
  /// `updated_at`. Errors if `id` does not exist.
  fn demote_to_secondary(
    &self,
    id: Uuid,
    new_primary_id: Uuid,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Re-point every secondary of `old_primary_id` at `new_primary_id`,
  /// returning how many rows moved.
  fn relink_secondaries(
    &self,
    old_primary_id: Uuid,
    new_primary_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
