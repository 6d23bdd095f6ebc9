//! Contact, the single stored entity of the identity graph.
//!
//! A contact carries at most one email and one phone number. Contacts that
//! belong to the same person are grouped into a cluster: one primary and any
//! number of secondaries that link straight to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a contact is the canonical member of its cluster.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkPrecedence {
  #[default]
  Primary,
  Secondary,
}

impl LinkPrecedence {
  pub fn is_primary(self) -> bool { matches!(self, Self::Primary) }
}

/// A stored contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:              Uuid,
  pub email:           Option<String>,
  pub phone_number:    Option<String>,
  /// The primary this contact belongs to. Only set on secondaries.
  pub linked_id:       Option<Uuid>,
  pub link_precedence: LinkPrecedence,
  /// Store-assigned; never changes after creation.
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  /// Soft-delete marker. Deleted contacts are invisible to every query.
  pub deleted_at:      Option<DateTime<Utc>>,
}

impl Contact {
  pub fn is_primary(&self) -> bool { self.link_precedence.is_primary() }

  /// The id of the cluster primary this contact belongs to, if known.
  ///
  /// A primary is its own cluster root; a secondary defers to `linked_id`.
  pub fn primary_id(&self) -> Option<Uuid> {
    match self.link_precedence {
      LinkPrecedence::Primary => Some(self.id),
      LinkPrecedence::Secondary => self.linked_id,
    }
  }
}

/// Input to [`crate::store::ContactStore::create`].
///
/// `id` and the timestamps are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
  pub email:           Option<String>,
  pub phone_number:    Option<String>,
  pub linked_id:       Option<Uuid>,
  pub link_precedence: LinkPrecedence,
}

impl NewContact {
  /// A fresh primary contact.
  pub fn primary(email: Option<String>, phone_number: Option<String>) -> Self {
    Self {
      email,
      phone_number,
      linked_id: None,
      link_precedence: LinkPrecedence::Primary,
    }
  }

  /// A secondary contact linked to `primary_id`.
  pub fn secondary(
    primary_id: Uuid,
    email: Option<String>,
    phone_number: Option<String>,
  ) -> Self {
    Self {
      email,
      phone_number,
      linked_id: Some(primary_id),
      link_precedence: LinkPrecedence::Secondary,
    }
  }
}

// ─── Match predicate ─────────────────────────────────────────────────────────

/// The lookup predicate for
/// [`ContactStore::find_all_matching`](crate::store::ContactStore::find_all_matching):
/// a contact matches when its email equals `email` OR its phone number equals
/// `phone_number`. An absent field never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMatch {
  pub email:        Option<String>,
  pub phone_number: Option<String>,
}

impl ContactMatch {
  pub fn new(email: Option<&str>, phone_number: Option<&str>) -> Self {
    Self {
      email:        email.map(str::to_owned),
      phone_number: phone_number.map(str::to_owned),
    }
  }

  /// `true` when neither field is set; such a predicate matches nothing.
  pub fn is_empty(&self) -> bool {
    self.email.is_none() && self.phone_number.is_none()
  }

  pub fn matches(&self, contact: &Contact) -> bool {
    let email_hit = self
      .email
      .as_deref()
      .is_some_and(|e| contact.email.as_deref() == Some(e));
    let phone_hit = self
      .phone_number
      .as_deref()
      .is_some_and(|p| contact.phone_number.as_deref() == Some(p));
    email_hit || phone_hit
  }
}
