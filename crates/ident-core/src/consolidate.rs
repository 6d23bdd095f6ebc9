//! The consolidation engine.
//!
//! [`Consolidator::resolve`] takes an email and/or phone number, folds every
//! contact that shares either value into one cluster under its oldest
//! primary, records any value the cluster has not seen before, and returns the
//! merged [`ConsolidatedIdentity`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  contact::{Contact, ContactMatch, NewContact},
  store::ContactStore,
  view::ConsolidatedIdentity,
};

/// Runs identity consolidation against a [`ContactStore`].
///
/// Every `resolve` call holds the link lock from the candidate read until the
/// view is assembled, so overlapping requests handled by one process never
/// interleave their writes. Across processes the store's uniqueness
/// constraint is the only guard; a violation surfaces as
/// [`Error::Conflict`].
pub struct Consolidator<S> {
  store:     Arc<S>,
  link_lock: Mutex<()>,
}

impl<S: ContactStore> Consolidator<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, link_lock: Mutex::new(()) }
  }

  /// Resolve the identity behind `email` / `phone_number`.
  ///
  /// Blank values count as absent. With both absent this returns
  /// [`Error::MissingIdentifier`] without touching the store.
  pub async fn resolve(
    &self,
    email: Option<&str>,
    phone_number: Option<&str>,
  ) -> Result<ConsolidatedIdentity> {
    let email = non_blank(email);
    let phone_number = non_blank(phone_number);
    let query = ContactMatch::new(email, phone_number);
    if query.is_empty() {
      return Err(Error::MissingIdentifier);
    }

    let _guard = self.link_lock.lock().await;

    let candidates = self
      .store
      .find_all_matching(&query)
      .await
      .map_err(Error::from_store)?;
    debug!(candidates = candidates.len(), "gathered matching contacts");

    let Some(oldest) = candidates.first() else {
      let contact = self
        .store
        .create(NewContact::primary(
          email.map(str::to_owned),
          phone_number.map(str::to_owned),
        ))
        .await
        .map_err(Error::from_store)?;
      info!(contact_id = %contact.id, "no existing contacts, created primary");
      return Ok(ConsolidatedIdentity::single(&contact));
    };

    let primary = self.canonical_primary(oldest).await?;

    let novel_email = email.filter(|e| {
      !candidates.iter().any(|c| c.email.as_deref() == Some(*e))
    });
    let novel_phone = phone_number.filter(|p| {
      !candidates.iter().any(|c| c.phone_number.as_deref() == Some(*p))
    });
    if novel_email.is_some() || novel_phone.is_some() {
      let secondary = self
        .store
        .create(NewContact::secondary(
          primary.id,
          novel_email.map(str::to_owned),
          novel_phone.map(str::to_owned),
        ))
        .await
        .map_err(Error::from_store)?;
      info!(
        contact_id = %secondary.id,
        primary_id = %primary.id,
        "new contact information, created secondary"
      );
    }

    for candidate in &candidates {
      if candidate.id == primary.id {
        continue;
      }
      if candidate.is_primary() {
        self.absorb_primary(candidate.id, primary.id).await?;
      } else if candidate.linked_id != Some(primary.id) {
        self
          .store
          .demote_to_secondary(candidate.id, primary.id)
          .await
          .map_err(Error::from_store)?;
        info!(
          contact_id = %candidate.id,
          from = ?candidate.linked_id,
          to = %primary.id,
          "relinked secondary to canonical primary"
        );
      }
    }

    let secondaries = self
      .store
      .find_secondaries_by_primary_id(primary.id)
      .await
      .map_err(Error::from_store)?;

    Ok(ConsolidatedIdentity::assemble(&primary, &secondaries))
  }

  /// The primary of the cluster `oldest` belongs to.
  ///
  /// Only the oldest candidate is consulted; other candidates' clusters never
  /// compete for canonical status.
  async fn canonical_primary(&self, oldest: &Contact) -> Result<Contact> {
    if oldest.is_primary() {
      return Ok(oldest.clone());
    }

    let dangling = || Error::DanglingPrimary {
      contact_id: oldest.id,
      linked_id:  oldest.linked_id,
    };
    let linked_id = oldest.linked_id.ok_or_else(dangling)?;
    self
      .store
      .find_primary_by_id(linked_id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(dangling)
  }

  /// Demote `younger` under `primary_id` and carry its secondaries along, so
  /// no secondary is left pointing at another secondary.
  async fn absorb_primary(&self, younger: Uuid, primary_id: Uuid) -> Result<()> {
    self
      .store
      .demote_to_secondary(younger, primary_id)
      .await
      .map_err(Error::from_store)?;
    let moved = self
      .store
      .relink_secondaries(younger, primary_id)
      .await
      .map_err(Error::from_store)?;
    info!(
      contact_id = %younger,
      primary_id = %primary_id,
      moved_secondaries = moved,
      "demoted primary to secondary"
    );
    Ok(())
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}
