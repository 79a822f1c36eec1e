//! `captable-store`: SQLite persistence for shareholder registers.
//!
//! Owns the schema, shareholder identity resolution, the transactional
//! import path and the snapshot projections the diff engine consumes.
//! Callers open a [`rusqlite::Connection`] through [`db::open`] and hand it
//! to the operations here; the crate never opens files on its own.

pub mod db;
pub mod error;
pub mod import;
pub mod model;
pub mod resolver;
pub mod snapshot;

pub use rusqlite::Connection;

pub use db::{open, open_in_memory};
pub use error::StoreError;
pub use import::{import_file, list_batches, preview_import};
pub use model::{
    BatchRecord, Conflict, ConflictKind, ImportResult, MatchMethod, PreviewResult,
};
pub use resolver::{resolve_shareholder, Resolution};
pub use snapshot::{find_company_id, read_company_snapshot, stored_snapshot};
