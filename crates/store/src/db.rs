use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// Register database schema. `execute_batch` runs the whole block, so a
/// fresh file and an already-initialized one both pass through unchanged.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS companies (
    id            TEXT PRIMARY KEY,
    org_number    TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    total_shares  INTEGER,
    nominal_value REAL,
    share_capital REAL,
    total_votes   REAL,
    generation    INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS share_classes (
    id            TEXT PRIMARY KEY,
    company_id    TEXT NOT NULL,
    name          TEXT NOT NULL,
    total_shares  INTEGER,
    nominal_value REAL,
    share_capital REAL,
    total_votes   REAL,
    remarks       TEXT,
    generation    INTEGER NOT NULL DEFAULT 0,
    UNIQUE (company_id, name),
    FOREIGN KEY (company_id) REFERENCES companies(id)
);

CREATE TABLE IF NOT EXISTS shareholders (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    name_key    TEXT NOT NULL,
    org_number  TEXT UNIQUE,
    birth_date  TEXT,
    entity_type TEXT NOT NULL,
    country     TEXT
);

CREATE INDEX IF NOT EXISTS idx_shareholders_name_key ON shareholders(name_key);
CREATE INDEX IF NOT EXISTS idx_shareholders_birth_date ON shareholders(birth_date);

CREATE TABLE IF NOT EXISTS aliases (
    id                TEXT PRIMARY KEY,
    shareholder_id    TEXT NOT NULL,
    source_company_id TEXT NOT NULL,
    name              TEXT NOT NULL,
    email             TEXT,
    UNIQUE (shareholder_id, source_company_id),
    FOREIGN KEY (shareholder_id) REFERENCES shareholders(id),
    FOREIGN KEY (source_company_id) REFERENCES companies(id)
);

CREATE TABLE IF NOT EXISTS contacts (
    id             TEXT PRIMARY KEY,
    shareholder_id TEXT NOT NULL,
    email          TEXT,
    phone          TEXT,
    address        TEXT,
    FOREIGN KEY (shareholder_id) REFERENCES shareholders(id)
);

CREATE INDEX IF NOT EXISTS idx_contacts_shareholder ON contacts(shareholder_id);

CREATE TABLE IF NOT EXISTS holdings (
    id             TEXT PRIMARY KEY,
    shareholder_id TEXT NOT NULL,
    company_id     TEXT NOT NULL,
    share_class_id TEXT,
    shares         INTEGER NOT NULL,
    ownership_pct  REAL,
    voting_pct     REAL,
    share_numbers  TEXT,
    cost_price     REAL,
    entry_date     TEXT,
    pledged        INTEGER NOT NULL DEFAULT 0,
    generation     INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (shareholder_id) REFERENCES shareholders(id),
    FOREIGN KEY (company_id) REFERENCES companies(id),
    FOREIGN KEY (share_class_id) REFERENCES share_classes(id)
);

CREATE INDEX IF NOT EXISTS idx_holdings_company ON holdings(company_id);
CREATE INDEX IF NOT EXISTS idx_holdings_shareholder ON holdings(shareholder_id);

CREATE TABLE IF NOT EXISTS import_batches (
    id               TEXT PRIMARY KEY,
    company_id       TEXT NOT NULL,
    filename         TEXT NOT NULL,
    file_sha256      TEXT NOT NULL,
    imported_at      TEXT NOT NULL,
    records_imported INTEGER NOT NULL DEFAULT 0,
    conflicts_found  INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (company_id) REFERENCES companies(id)
);

CREATE INDEX IF NOT EXISTS idx_import_batches_company ON import_batches(company_id);

CREATE TABLE IF NOT EXISTS snapshots (
    id         TEXT PRIMARY KEY,
    company_id TEXT NOT NULL,
    batch_id   TEXT NOT NULL,
    created_at TEXT NOT NULL,
    data       TEXT NOT NULL,
    FOREIGN KEY (company_id) REFERENCES companies(id),
    FOREIGN KEY (batch_id) REFERENCES import_batches(id)
);

CREATE INDEX IF NOT EXISTS idx_snapshots_company ON snapshots(company_id);
"#;

/// Open (creating if needed) a register database at `path`. The parent
/// directory must already exist; callers that derive a default path are
/// expected to create it.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    init(Connection::open(path)?)
}

pub fn open_in_memory() -> Result<Connection, StoreError> {
    init(Connection::open_in_memory()?)
}

fn init(conn: Connection) -> Result<Connection, StoreError> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
