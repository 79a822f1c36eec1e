use std::fmt;

use captable_parse::ParseError;

#[derive(Debug)]
pub enum StoreError {
    /// The file failed to parse; nothing was written.
    Parse(ParseError),
    /// SQLite error. The surrounding transaction rolls back.
    Database(rusqlite::Error),
    /// Snapshot (de)serialization error.
    Snapshot(serde_json::Error),
    /// The file carried no company registration number. Company identity is
    /// mandatory, so both preview and commit reject the file.
    MissingOrgNumber { company_name: String },
    /// A lookup by registration number found no company.
    CompanyNotFound { org_number: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Database(e) => write!(f, "database error: {e}"),
            Self::Snapshot(e) => write!(f, "snapshot serialization error: {e}"),
            Self::MissingOrgNumber { company_name } => {
                write!(
                    f,
                    "company '{company_name}' has no registration number; cannot determine company identity"
                )
            }
            Self::CompanyNotFound { org_number } => {
                write!(f, "no company with registration number {org_number}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Database(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for StoreError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Snapshot(e)
    }
}
