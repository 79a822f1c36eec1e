//! Pure canonicalization helpers shared by the parser, the entity resolver
//! and the diff engine. No I/O, no state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Company,
    Person,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Company => "company",
            EntityType::Person => "person",
        }
    }

    pub fn from_str_lossy(s: &str) -> EntityType {
        match s {
            "company" => EntityType::Company,
            _ => EntityType::Person,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalize a registration number for cross-file matching.
///
/// Whitespace and dashes are stripped. A 2-letter jurisdiction prefix
/// passes through (uppercased). A bare 8-digit number is assumed to be a
/// Danish registry number and gains a `DK` prefix; Norwegian numbers are 9
/// digits and are never prefixed.
pub fn org_number(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let mut chars = cleaned.chars();
    let (a, b) = (chars.next(), chars.next());
    let has_prefix = matches!((a, b), (Some(x), Some(y)) if x.is_ascii_alphabetic() && y.is_ascii_alphabetic());
    if has_prefix {
        let prefix: String = cleaned.chars().take(2).flat_map(|c| c.to_uppercase()).collect();
        let rest: String = cleaned.chars().skip(2).collect();
        return Some(format!("{prefix}{rest}"));
    }

    if cleaned.len() == 8 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("DK{cleaned}"));
    }

    Some(cleaned)
}

/// Shape check for canonicalized registration numbers. Values that fail it
/// are still imported, but flagged for review.
pub fn is_plausible_org_number(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1].is_ascii_alphabetic() {
        let digits = &s[2..];
        return (6..=12).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
    }
    (s.len() == 8 || s.len() == 9) && bytes.iter().all(|b| b.is_ascii_digit())
}

/// Comparison key for names: trimmed, lowercased, internal whitespace
/// collapsed.
pub fn name_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when two names differ at most by casing or whitespace.
pub fn names_match_loosely(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Pick the canonical display name between a stored variant and a newly
/// imported one: prefer whichever is not entirely uppercase, else keep the
/// stored one.
pub fn best_name_variant<'a>(stored: &'a str, imported: &'a str) -> &'a str {
    if !is_all_uppercase(stored) {
        stored
    } else if !is_all_uppercase(imported) {
        imported
    } else {
        stored
    }
}

fn is_all_uppercase(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic()) && !s.chars().any(|c| c.is_lowercase())
}

pub fn email(raw: &str) -> Option<String> {
    let e = raw.trim().to_lowercase();
    if e.is_empty() {
        None
    } else {
        Some(e)
    }
}

/// Entity-type heuristic, in priority order: a birth date marks a person; a
/// registration number marks a company; a trailing corporate-form suffix
/// marks a company; default is person.
pub fn entity_type(
    has_birth_date: bool,
    org_number: Option<&str>,
    name: &str,
    vocab: &Vocabulary,
) -> EntityType {
    if has_birth_date {
        return EntityType::Person;
    }
    if org_number.is_some_and(|o| !o.is_empty()) {
        return EntityType::Company;
    }
    if vocab.is_corporate_name(name) {
        return EntityType::Company;
    }
    EntityType::Person
}
