//! The consolidated identity view.
//!
//! Never stored; always assembled from a primary and its secondaries right
//! after consolidation has run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contact::Contact;

/// The aggregate returned for one identity cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedIdentity {
  pub primary_contact_id:    Uuid,
  /// Primary's email first, then secondaries' in traversal order; no repeats.
  pub emails:                Vec<String>,
  /// Same ordering rule as `emails`.
  pub phone_numbers:         Vec<String>,
  pub secondary_contact_ids: Vec<Uuid>,
}

impl ConsolidatedIdentity {
  /// Build the view for `primary` and the secondaries linked to it, in the
  /// order given.
  pub fn assemble(primary: &Contact, secondaries: &[Contact]) -> Self {
    let mut emails = Vec::new();
    let mut phone_numbers = Vec::new();

    for contact in std::iter::once(primary).chain(secondaries) {
      push_unique(&mut emails, contact.email.as_deref());
      push_unique(&mut phone_numbers, contact.phone_number.as_deref());
    }

    Self {
      primary_contact_id: primary.id,
      emails,
      phone_numbers,
      secondary_contact_ids: secondaries.iter().map(|c| c.id).collect(),
    }
  }

  /// The view of a primary with no secondaries.
  pub fn single(primary: &Contact) -> Self { Self::assemble(primary, &[]) }
}

fn push_unique(values: &mut Vec<String>, value: Option<&str>) {
  if let Some(v) = value
    && !values.iter().any(|existing| existing == v)
  {
    values.push(v.to_owned());
  }
}
