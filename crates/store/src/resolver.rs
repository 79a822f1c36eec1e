//! Shareholder identity resolution.
//!
//! Each parsed row is matched against the persisted shareholder pool by, in
//! order: registration number, date of birth, normalized name. Matches are
//! cross-validated against the imported name, and resolution leaves the
//! identity's canonical name, alias and contact rows up to date. Findings
//! are appended as [`Conflict`]s; resolution itself never fails on
//! ambiguity, it falls through to creating a new identity.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use captable_parse::{normalize, ParsedShareholder, Vocabulary};

use crate::error::StoreError;
use crate::model::{Conflict, ConflictKind, MatchMethod};

#[derive(Debug)]
pub enum Resolution {
    Matched {
        shareholder_id: String,
        method: MatchMethod,
    },
    Created {
        shareholder_id: String,
    },
}

impl Resolution {
    pub fn shareholder_id(&self) -> &str {
        match self {
            Self::Matched { shareholder_id, .. } => shareholder_id,
            Self::Created { shareholder_id } => shareholder_id,
        }
    }
}

/// Resolve one parsed shareholder row inside the import transaction.
///
/// `source_company_id` is the company whose register is being imported; the
/// alias row is keyed to it.
pub fn resolve_shareholder(
    conn: &Connection,
    source_company_id: &str,
    sh: &ParsedShareholder,
    vocab: &Vocabulary,
    conflicts: &mut Vec<Conflict>,
) -> Result<Resolution, StoreError> {
    let name = sh.name.trim();
    let key = normalize::name_key(name);
    let entity = normalize::entity_type(sh.birth_date.is_some(), sh.org_number.as_deref(), name, vocab);

    if let Some(org) = sh.org_number.as_deref() {
        if !normalize::is_plausible_org_number(org) {
            conflicts.push(Conflict {
                kind: ConflictKind::OrgNumberFormat,
                shareholder_name: name.to_string(),
                org_number: Some(org.to_string()),
                detail: format!("registration number '{org}' has an unexpected shape"),
            });
        }
    }

    let matched: Option<(String, String, MatchMethod)> = if let Some(org) = sh.org_number.as_deref()
    {
        find_by_org(conn, org)?.map(|(id, stored)| (id, stored, MatchMethod::OrgNumber))
    } else if let Some(dob) = sh.birth_date {
        find_by_birth_date(conn, &dob.to_string(), &key)?
            .map(|(id, stored)| (id, stored, MatchMethod::DateOfBirth))
    } else {
        find_by_name(conn, &key, entity.as_str())?
            .map(|(id, stored)| (id, stored, MatchMethod::Name))
    };

    match matched {
        Some((id, stored_name, method)) => {
            let (id, stored_name, method) = if method == MatchMethod::OrgNumber {
                // org match only; sh.org_number is Some here
                let org = sh.org_number.as_deref().unwrap_or_default();
                cross_validate(conn, id, stored_name, name, &key, entity.as_str(), org, conflicts)?
            } else {
                (id, stored_name, method)
            };

            update_canonical_name(conn, &id, &stored_name, name)?;
            check_email(conn, &id, sh, name, conflicts)?;
            replace_alias(conn, &id, source_company_id, sh, name)?;
            insert_contact(conn, &id, sh)?;
            Ok(Resolution::Matched {
                shareholder_id: id,
                method,
            })
        }
        None => {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO shareholders (id, name, name_key, org_number, birth_date, entity_type, country) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    name,
                    key,
                    sh.org_number,
                    sh.birth_date.map(|d| d.to_string()),
                    entity.as_str(),
                    sh.country,
                ],
            )?;
            replace_alias(conn, &id, source_company_id, sh, name)?;
            insert_contact(conn, &id, sh)?;
            Ok(Resolution::Created { shareholder_id: id })
        }
    }
}

// ---------------------------------------------------------------------------
// Cross-validation
// ---------------------------------------------------------------------------

/// A registration-number match whose stored name disagrees with the file is
/// suspect: the file may carry the wrong number for this row. Prefer an
/// existing identity whose name matches exactly; failing that, check
/// whether the number belongs to a known company. Exactly one conflict is
/// emitted per mismatching row.
#[allow(clippy::too_many_arguments)]
fn cross_validate(
    conn: &Connection,
    matched_id: String,
    stored_name: String,
    imported_name: &str,
    imported_key: &str,
    entity: &str,
    org: &str,
    conflicts: &mut Vec<Conflict>,
) -> Result<(String, String, MatchMethod), StoreError> {
    if normalize::names_match_loosely(&stored_name, imported_name) {
        return Ok((matched_id, stored_name, MatchMethod::OrgNumber));
    }

    if let Some((alt_id, alt_name, alt_org)) =
        find_by_name_excluding(conn, imported_key, entity, &matched_id)?
    {
        conflicts.push(Conflict {
            kind: ConflictKind::PossibleWrongOrg,
            shareholder_name: imported_name.to_string(),
            org_number: Some(org.to_string()),
            detail: format!(
                "registration number {org} is stored for '{stored_name}'; matched '{alt_name}' by name instead (registration number {})",
                alt_org.as_deref().unwrap_or("none"),
            ),
        });
        return Ok((alt_id, alt_name, MatchMethod::Name));
    }

    if let Some(company_name) = company_name_by_org(conn, org)? {
        if !normalize::names_match_loosely(&company_name, imported_name) {
            conflicts.push(Conflict {
                kind: ConflictKind::PossibleWrongOrg,
                shareholder_name: imported_name.to_string(),
                org_number: Some(org.to_string()),
                detail: format!("registration number {org} belongs to company '{company_name}'"),
            });
            return Ok((matched_id, stored_name, MatchMethod::OrgNumber));
        }
    }

    conflicts.push(Conflict {
        kind: ConflictKind::NameMismatch,
        shareholder_name: imported_name.to_string(),
        org_number: Some(org.to_string()),
        detail: format!("stored as '{stored_name}', imported as '{imported_name}'"),
    });
    Ok((matched_id, stored_name, MatchMethod::OrgNumber))
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

fn find_by_org(conn: &Connection, org: &str) -> Result<Option<(String, String)>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, name FROM shareholders WHERE org_number = ?1",
            [org],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(row)
}

/// Date-of-birth candidates, filtered in process by exact normalized-name
/// equality. A shared birth date alone never merges two identities.
fn find_by_birth_date(
    conn: &Connection,
    birth_date: &str,
    name_key: &str,
) -> Result<Option<(String, String)>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name FROM shareholders \
         WHERE birth_date = ?1 AND entity_type = 'person' ORDER BY rowid",
    )?;
    let rows = stmt.query_map([birth_date], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (id, name) = row?;
        if normalize::name_key(&name) == name_key {
            return Ok(Some((id, name)));
        }
    }
    Ok(None)
}

fn find_by_name(
    conn: &Connection,
    name_key: &str,
    entity: &str,
) -> Result<Option<(String, String)>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, name FROM shareholders \
             WHERE name_key = ?1 AND entity_type = ?2 ORDER BY rowid LIMIT 1",
            params![name_key, entity],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(row)
}

fn find_by_name_excluding(
    conn: &Connection,
    name_key: &str,
    entity: &str,
    excluded_id: &str,
) -> Result<Option<(String, String, Option<String>)>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, name, org_number FROM shareholders \
             WHERE name_key = ?1 AND entity_type = ?2 AND id != ?3 ORDER BY rowid LIMIT 1",
            params![name_key, entity, excluded_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    Ok(row)
}

fn company_name_by_org(conn: &Connection, org: &str) -> Result<Option<String>, StoreError> {
    let name = conn
        .query_row(
            "SELECT name FROM companies WHERE org_number = ?1",
            [org],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name)
}

// ---------------------------------------------------------------------------
// Side effects
// ---------------------------------------------------------------------------

fn update_canonical_name(
    conn: &Connection,
    shareholder_id: &str,
    stored: &str,
    imported: &str,
) -> Result<(), StoreError> {
    let best = normalize::best_name_variant(stored, imported);
    if best != stored {
        conn.execute(
            "UPDATE shareholders SET name = ?1, name_key = ?2 WHERE id = ?3",
            params![best, normalize::name_key(best), shareholder_id],
        )?;
    }
    Ok(())
}

/// Flag an email no previous source ever used for this identity. Runs
/// before the alias replace so the previous email of this source still
/// counts as seen.
fn check_email(
    conn: &Connection,
    shareholder_id: &str,
    sh: &ParsedShareholder,
    display_name: &str,
    conflicts: &mut Vec<Conflict>,
) -> Result<(), StoreError> {
    let imported = match sh.email.as_deref().and_then(normalize::email) {
        Some(e) => e,
        None => return Ok(()),
    };
    let mut stmt = conn.prepare(
        "SELECT email FROM aliases WHERE shareholder_id = ?1 AND email IS NOT NULL \
         UNION \
         SELECT email FROM contacts WHERE shareholder_id = ?1 AND email IS NOT NULL",
    )?;
    let known: Vec<String> = stmt
        .query_map([shareholder_id], |row| row.get::<_, String>(0))?
        .collect::<Result<_, _>>()?;
    let known: Vec<String> = known.iter().filter_map(|e| normalize::email(e)).collect();
    if !known.is_empty() && !known.contains(&imported) {
        conflicts.push(Conflict {
            kind: ConflictKind::EmailMismatch,
            shareholder_name: display_name.to_string(),
            org_number: sh.org_number.clone(),
            detail: format!(
                "email '{imported}' differs from previously seen {}",
                known
                    .iter()
                    .map(|e| format!("'{e}'"))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        });
    }
    Ok(())
}

/// One alias row per (shareholder, source company), overwritten on every
/// import from that source.
fn replace_alias(
    conn: &Connection,
    shareholder_id: &str,
    source_company_id: &str,
    sh: &ParsedShareholder,
    name: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM aliases WHERE shareholder_id = ?1 AND source_company_id = ?2",
        params![shareholder_id, source_company_id],
    )?;
    conn.execute(
        "INSERT INTO aliases (id, shareholder_id, source_company_id, name, email) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            Uuid::new_v4().to_string(),
            shareholder_id,
            source_company_id,
            name,
            sh.email.as_deref().and_then(normalize::email),
        ],
    )?;
    Ok(())
}

/// Contacts accumulate across imports, deduplicated by exact field
/// equality (`IS` so missing fields compare equal).
fn insert_contact(
    conn: &Connection,
    shareholder_id: &str,
    sh: &ParsedShareholder,
) -> Result<(), StoreError> {
    let email = sh.email.as_deref().and_then(normalize::email);
    let phone = sh.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let address = sh.address.as_deref().map(str::trim).filter(|a| !a.is_empty());
    if email.is_none() && phone.is_none() && address.is_none() {
        return Ok(());
    }

    let exists = conn
        .query_row(
            "SELECT 1 FROM contacts \
             WHERE shareholder_id = ?1 AND email IS ?2 AND phone IS ?3 AND address IS ?4",
            params![shareholder_id, email, phone, address],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !exists {
        conn.execute(
            "INSERT INTO contacts (id, shareholder_id, email, phone, address) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Uuid::new_v4().to_string(),
                shareholder_id,
                email,
                phone,
                address,
            ],
        )?;
    }
    Ok(())
}
