use captable_recon::ImportDiff;
use serde::Serialize;

/// Non-fatal findings raised while resolving shareholder identities.
/// Conflicts never abort an import; they ride along in the result and in
/// the batch row for later review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Stored canonical name differs from the imported one beyond casing.
    NameMismatch,
    /// Imported email differs from every email previously seen for the
    /// identity.
    EmailMismatch,
    /// Registration number survived cleanup but matches no known shape.
    OrgNumberFormat,
    /// The imported registration number appears to belong to someone else.
    PossibleWrongOrg,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameMismatch => write!(f, "name_mismatch"),
            Self::EmailMismatch => write!(f, "email_mismatch"),
            Self::OrgNumberFormat => write!(f, "org_number_format"),
            Self::PossibleWrongOrg => write!(f, "possible_wrong_org"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub shareholder_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    pub detail: String,
}

/// How an existing shareholder identity was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    OrgNumber,
    DateOfBirth,
    Name,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrgNumber => write!(f, "org_number"),
            Self::DateOfBirth => write!(f, "date_of_birth"),
            Self::Name => write!(f, "name"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub company_name: String,
    pub company_org_number: String,
    pub shareholders_imported: usize,
    pub holdings_created: usize,
    pub conflicts: Vec<Conflict>,
    /// Provenance row id, so callers can link the result to history.
    pub batch_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResult {
    pub diff: ImportDiff,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_company_id: Option<String>,
}

/// One row of import history for a company.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub id: String,
    pub filename: String,
    pub file_sha256: String,
    pub imported_at: String,
    pub records_imported: i64,
    pub conflicts_found: i64,
}
