//! SQL schema for the identity SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted; deleted_at is a soft-delete marker.
CREATE TABLE IF NOT EXISTS contacts (
    contact_id      TEXT PRIMARY KEY,
    email           TEXT,
    phone_number    TEXT,
    linked_id       TEXT,            -- primary's contact_id; secondaries only
    link_precedence TEXT NOT NULL DEFAULT 'primary',  -- 'primary' | 'secondary'
    created_at      TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at      TEXT NOT NULL,
    deleted_at      TEXT,
    CHECK (link_precedence IN ('primary', 'secondary')),
    CHECK ((link_precedence = 'primary') = (linked_id IS NULL))
);

CREATE INDEX IF NOT EXISTS contacts_email_idx   ON contacts(email);
CREATE INDEX IF NOT EXISTS contacts_phone_idx   ON contacts(phone_number);
CREATE INDEX IF NOT EXISTS contacts_linked_idx  ON contacts(linked_id);
CREATE INDEX IF NOT EXISTS contacts_created_idx ON contacts(created_at);

-- Compound uniqueness among live rows. A missing field compares equal to
-- another missing field here, unlike a plain NULL column.
CREATE UNIQUE INDEX IF NOT EXISTS contacts_identity_uniq
    ON contacts(IFNULL(email, ''), IFNULL(phone_number, ''))
    WHERE deleted_at IS NULL;

PRAGMA user_version = 1;
";
