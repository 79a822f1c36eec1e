use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Denormalized projection of one company's persisted state.
///
/// Produced by the store, consumed by the diff, and persisted verbatim as
/// the JSON pre-image of a committed import. Holdings arrive ordered by
/// class name, then holder name, then insertion order, so two snapshots of
/// the same state are structurally identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub company_id: String,
    pub org_number: String,
    pub name: String,
    pub total_shares: Option<i64>,
    pub nominal_value: Option<f64>,
    pub share_capital: Option<f64>,
    pub total_votes: Option<f64>,
    pub share_classes: Vec<SnapshotClass>,
    pub holdings: Vec<SnapshotHolding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotClass {
    pub name: String,
    pub total_shares: Option<i64>,
    pub nominal_value: Option<f64>,
    pub share_capital: Option<f64>,
    pub total_votes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// One holding row with the holder's identity denormalized onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHolding {
    pub shareholder_id: String,
    pub shareholder_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shareholder_org_number: Option<String>,
    /// `None` for holdings recorded without a share class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub shares: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_numbers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
    pub pledged: bool,
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Shareholder change buckets. Declaration order is presentation order;
/// the change list sorts by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Exited,
    Increased,
    Decreased,
    ClassChanged,
    Unchanged,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Exited => write!(f, "exited"),
            Self::Increased => write!(f, "increased"),
            Self::Decreased => write!(f, "decreased"),
            Self::ClassChanged => write!(f, "class_changed"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassChangeKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl std::fmt::Display for ClassChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Changed => write!(f, "changed"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One shareholder's movement between two register states.
#[derive(Debug, Clone, Serialize)]
pub struct ShareholderChange {
    pub kind: ChangeKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    pub total_shares_before: i64,
    pub total_shares_after: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_pct_after: Option<f64>,
    pub class_changes: Vec<ClassShareChange>,
}

/// Per-class share movement inside one shareholder change.
#[derive(Debug, Clone, Serialize)]
pub struct ClassShareChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub shares_before: i64,
    pub shares_after: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareClassChange {
    pub kind: ClassChangeKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_shares_before: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_shares_after: Option<i64>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffSummary {
    pub new: usize,
    pub exited: usize,
    pub increased: usize,
    pub decreased: usize,
    pub class_changed: usize,
    pub unchanged: usize,
    pub classes_added: usize,
    pub classes_removed: usize,
    pub classes_changed: usize,
    /// increased + decreased + class_changed.
    pub changed_holdings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportDiff {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_org_number: Option<String>,
    pub is_first_import: bool,
    pub share_class_changes: Vec<ShareClassChange>,
    pub changes: Vec<ShareholderChange>,
    pub summary: DiffSummary,
}
