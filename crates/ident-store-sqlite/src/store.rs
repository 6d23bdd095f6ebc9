//! [`SqliteStore`], the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ident_core::{
  contact::{Contact, ContactMatch, LinkPrecedence, NewContact},
  store::ContactStore,
};

use crate::{
  encode::{
    CONTACT_COLUMNS, RawContact, encode_dt, encode_precedence, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An identity contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Stored timestamps carry microseconds; trim in memory to match.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` over [`CONTACT_COLUMNS`] and decode every row.
  ///
  /// `filter` is everything after `FROM contacts`.
  async fn select(
    &self,
    filter: &'static str,
    params: Vec<Option<String>>,
  ) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts {filter}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  /// Insert a fully-built [`Contact`] into the `contacts` table as is.
  pub(crate) async fn insert_contact(&self, contact: &Contact) -> Result<()> {
    let id_str         = encode_uuid(contact.id);
    let email          = contact.email.clone();
    let phone_number   = contact.phone_number.clone();
    let linked_id_str  = contact.linked_id.map(encode_uuid);
    let precedence_str = encode_precedence(contact.link_precedence);
    let created_str    = encode_dt(contact.created_at);
    let updated_str    = encode_dt(contact.updated_at);
    let deleted_str    = contact.deleted_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             contact_id, email, phone_number, linked_id, link_precedence,
             created_at, updated_at, deleted_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            email,
            phone_number,
            linked_id_str,
            precedence_str,
            created_str,
            updated_str,
            deleted_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_all_matching(&self, query: &ContactMatch) -> Result<Vec<Contact>> {
    if query.is_empty() {
      return Ok(Vec::new());
    }

    // A NULL parameter never compares equal, so an absent field drops out of
    // the OR on its own.
    self
      .select(
        "WHERE deleted_at IS NULL
           AND ((?1 IS NOT NULL AND email = ?1)
             OR (?2 IS NOT NULL AND phone_number = ?2))
         ORDER BY created_at ASC, rowid ASC",
        vec![query.email.clone(), query.phone_number.clone()],
      )
      .await
  }

  async fn find_primary_by_id(&self, id: Uuid) -> Result<Option<Contact>> {
    let mut found = self
      .select(
        "WHERE contact_id = ?1
           AND link_precedence = 'primary'
           AND deleted_at IS NULL",
        vec![Some(encode_uuid(id))],
      )
      .await?;
    Ok(found.pop())
  }

  async fn find_secondaries_by_primary_id(
    &self,
    primary_id: Uuid,
  ) -> Result<Vec<Contact>> {
    self
      .select(
        "WHERE linked_id = ?1
           AND link_precedence = 'secondary'
           AND deleted_at IS NULL
         ORDER BY created_at ASC, rowid ASC",
        vec![Some(encode_uuid(primary_id))],
      )
      .await
  }

  async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
    let mut found = self
      .select(
        "WHERE contact_id = ?1 AND deleted_at IS NULL",
        vec![Some(encode_uuid(id))],
      )
      .await?;
    Ok(found.pop())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, input: NewContact) -> Result<Contact> {
    let at = now();
    let contact = Contact {
      id:              Uuid::new_v4(),
      email:           input.email,
      phone_number:    input.phone_number,
      linked_id:       input.linked_id,
      link_precedence: input.link_precedence,
      created_at:      at,
      updated_at:      at,
      deleted_at:      None,
    };

    self.insert_contact(&contact).await?;
    Ok(contact)
  }

  async fn demote_to_secondary(
    &self,
    id:             Uuid,
    new_primary_id: Uuid,
  ) -> Result<Contact> {
    let id_str         = encode_uuid(id);
    let primary_str    = encode_uuid(new_primary_id);
    let precedence_str = encode_precedence(LinkPrecedence::Secondary);
    let at_str         = encode_dt(now());

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE contacts
              SET link_precedence = ?1, linked_id = ?2, updated_at = ?3
            WHERE contact_id = ?4 AND deleted_at IS NULL",
          rusqlite::params![precedence_str, primary_str, at_str, id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"
              ),
              rusqlite::params![id_str],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::ContactNotFound(id))?
      .into_contact()
  }

  async fn relink_secondaries(
    &self,
    old_primary_id: Uuid,
    new_primary_id: Uuid,
  ) -> Result<u64> {
    let old_str = encode_uuid(old_primary_id);
    let new_str = encode_uuid(new_primary_id);
    let at_str  = encode_dt(now());

    let moved = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contacts
              SET linked_id = ?1, updated_at = ?2
            WHERE linked_id = ?3
              AND link_precedence = 'secondary'
              AND deleted_at IS NULL",
          rusqlite::params![new_str, at_str, old_str],
        )?)
      })
      .await?;

    Ok(moved as u64)
  }
}
