use chrono::NaiveDate;
use serde::Serialize;

/// One company's register as read from a single file, language already
/// resolved away. Ephemeral: lives for one import or preview call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCompany {
    pub name: String,
    /// Canonicalized registration number from the anchor cell. `None` when
    /// the file had no `NAME (REGNUMBER)` pattern; imports reject that
    /// downstream because company identity is mandatory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    pub total_shares: Option<i64>,
    pub nominal_value: Option<f64>,
    pub share_capital: Option<f64>,
    pub total_votes: Option<f64>,
    pub share_classes: Vec<ParsedShareClass>,
    pub shareholders: Vec<ParsedShareholder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedShareClass {
    pub name: String,
    pub total_shares: Option<i64>,
    pub nominal_value: Option<f64>,
    pub share_capital: Option<f64>,
    pub total_votes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedShareholder {
    pub name: String,
    /// Canonicalized registration number; mutually exclusive with
    /// `birth_date` in practice (the source column carries one or the
    /// other).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Shareholder-level percentages: they belong to the holder, not to any
    /// single class row.
    pub ownership_pct: Option<f64>,
    pub voting_pct: Option<f64>,
    pub total_shares: Option<i64>,
    pub pledged: bool,
    pub class_holdings: Vec<ClassHolding>,
}

/// One shareholder's stake in one share class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassHolding {
    pub class_name: String,
    pub shares: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_numbers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
}

impl ParsedShareholder {
    /// Share total for diffing: the per-class sum when class holdings
    /// exist, else the shareholder-level figure.
    pub fn effective_shares(&self) -> i64 {
        if self.class_holdings.is_empty() {
            self.total_shares.unwrap_or(0)
        } else {
            self.class_holdings.iter().map(|h| h.shares).sum()
        }
    }
}
