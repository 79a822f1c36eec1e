//! `captable-recon`: register snapshot model and diff engine.
//!
//! Pure engine crate: receives persisted snapshots and parsed registers,
//! returns a classified change set. No storage or CLI dependencies.

pub mod diff;
pub mod model;

pub use diff::diff;
pub use model::{
    ChangeKind, ClassChangeKind, ClassShareChange, CompanySnapshot, DiffSummary, ImportDiff,
    ShareClassChange, ShareholderChange, SnapshotClass, SnapshotHolding,
};
