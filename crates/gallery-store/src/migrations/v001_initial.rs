//! v001 -- Initial schema creation.
//!
//! Creates the `kv_slots` table that backs every named slot.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Key-value slots
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS kv_slots (
    key        TEXT PRIMARY KEY NOT NULL,   -- slot name, e.g. '@gallery_items'
    value      TEXT NOT NULL,               -- UTF-8 payload (JSON for the gallery)
    updated_at TEXT NOT NULL                -- ISO-8601 / RFC-3339
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
