//! Transactional register imports.
//!
//! One file becomes one transaction: company upsert, batch row, class
//! replace, per-shareholder resolution and holding replace, conflict
//! count. Any persistence error rolls the whole thing back; a parse
//! failure aborts before the transaction even opens.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use captable_parse::Vocabulary;
use captable_recon::diff;

use crate::error::StoreError;
use crate::model::{BatchRecord, Conflict, ImportResult, PreviewResult};
use crate::resolver;
use crate::snapshot;

pub fn import_file(
    conn: &mut Connection,
    vocab: &Vocabulary,
    bytes: &[u8],
    filename: &str,
) -> Result<ImportResult, StoreError> {
    let parsed = captable_parse::parse_bytes(bytes, vocab)?;
    let org_number = match parsed.org_number.clone() {
        Some(org) => org,
        None => {
            return Err(StoreError::MissingOrgNumber {
                company_name: parsed.name.clone(),
            })
        }
    };
    let file_digest = {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    };

    // Immediate mode takes the write lock up front, so two imports of the
    // same company serialize instead of interleaving the replace steps.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let now = Utc::now().to_rfc3339();

    let existing: Option<(String, i64)> = tx
        .query_row(
            "SELECT id, generation FROM companies WHERE org_number = ?1",
            [&org_number],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let (company_id, generation, pre_image) = match existing {
        Some((id, gen)) => {
            // Pre-image before any write; it becomes the batch's snapshot.
            let snap = snapshot::read_company_snapshot(&tx, &id)?;
            tx.execute(
                "UPDATE companies SET name = ?1, total_shares = ?2, nominal_value = ?3, \
                 share_capital = ?4, total_votes = ?5, generation = ?6, updated_at = ?7 \
                 WHERE id = ?8",
                params![
                    parsed.name,
                    parsed.total_shares,
                    parsed.nominal_value,
                    parsed.share_capital,
                    parsed.total_votes,
                    gen + 1,
                    now,
                    id,
                ],
            )?;
            (id, gen + 1, Some(snap))
        }
        None => {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO companies (id, org_number, name, total_shares, nominal_value, \
                 share_capital, total_votes, generation, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)",
                params![
                    id,
                    org_number,
                    parsed.name,
                    parsed.total_shares,
                    parsed.nominal_value,
                    parsed.share_capital,
                    parsed.total_votes,
                    now,
                ],
            )?;
            (id, 1, None)
        }
    };

    let batch_id = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO import_batches (id, company_id, filename, file_sha256, imported_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![batch_id, company_id, filename, file_digest, now],
    )?;
    if let Some(snap) = &pre_image {
        snapshot::persist_snapshot(&tx, &company_id, &batch_id, snap)?;
    }

    // Class replace. Holdings reference classes, so they go first.
    tx.execute("DELETE FROM holdings WHERE company_id = ?1", [&company_id])?;
    tx.execute("DELETE FROM share_classes WHERE company_id = ?1", [&company_id])?;
    let mut class_ids: HashMap<String, String> = HashMap::new();
    for class in &parsed.share_classes {
        let id = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO share_classes (id, company_id, name, total_shares, nominal_value, \
             share_capital, total_votes, remarks, generation) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                company_id,
                class.name,
                class.total_shares,
                class.nominal_value,
                class.share_capital,
                class.total_votes,
                class.remarks,
                generation,
            ],
        )?;
        class_ids.insert(class.name.clone(), id);
    }
    let sole_class_id: Option<String> = if parsed.share_classes.len() == 1 {
        class_ids.get(&parsed.share_classes[0].name).cloned()
    } else {
        None
    };

    let shareholders_imported = parsed.shareholders.len();
    let mut conflicts: Vec<Conflict> = Vec::new();

    for sh in &parsed.shareholders {
        let resolution = resolver::resolve_shareholder(&tx, &company_id, sh, vocab, &mut conflicts)?;
        let shareholder_id = resolution.shareholder_id().to_string();

        // A file can list the same resolved identity twice; the later row
        // replaces the earlier one's holdings.
        tx.execute(
            "DELETE FROM holdings WHERE shareholder_id = ?1 AND company_id = ?2",
            params![shareholder_id, company_id],
        )?;

        // Ownership and voting percentages are shareholder-level values,
        // stored on the first inserted holding row only. Fragile but
        // deliberate; readers must aggregate per shareholder.
        let mut first = true;
        if sh.class_holdings.is_empty() {
            let shares = sh.total_shares.unwrap_or(0);
            if shares != 0 {
                tx.execute(
                    "INSERT INTO holdings (id, shareholder_id, company_id, share_class_id, \
                     shares, ownership_pct, voting_pct, pledged, generation) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        Uuid::new_v4().to_string(),
                        shareholder_id,
                        company_id,
                        sole_class_id,
                        shares,
                        sh.ownership_pct,
                        sh.voting_pct,
                        sh.pledged,
                        generation,
                    ],
                )?;
            }
        } else {
            for holding in &sh.class_holdings {
                if holding.shares == 0 {
                    continue;
                }
                let class_id = class_ids.get(&holding.class_name);
                let (own, vote) = if first {
                    (sh.ownership_pct, sh.voting_pct)
                } else {
                    (None, None)
                };
                tx.execute(
                    "INSERT INTO holdings (id, shareholder_id, company_id, share_class_id, \
                     shares, ownership_pct, voting_pct, share_numbers, cost_price, entry_date, \
                     pledged, generation) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    params![
                        Uuid::new_v4().to_string(),
                        shareholder_id,
                        company_id,
                        class_id,
                        holding.shares,
                        own,
                        vote,
                        holding.share_numbers,
                        holding.cost_price,
                        holding.entry_date.map(|d| d.to_string()),
                        sh.pledged,
                        generation,
                    ],
                )?;
                first = false;
            }
        }
    }

    // A repeated identity replaces its own earlier inserts, so count the
    // rows that survived rather than the insert statements.
    let holdings_created: i64 = tx.query_row(
        "SELECT COUNT(*) FROM holdings WHERE company_id = ?1",
        [&company_id],
        |row| row.get(0),
    )?;

    tx.execute(
        "UPDATE import_batches SET records_imported = ?1, conflicts_found = ?2 WHERE id = ?3",
        params![shareholders_imported as i64, conflicts.len() as i64, batch_id],
    )?;
    tx.commit()?;

    Ok(ImportResult {
        company_name: parsed.name,
        company_org_number: org_number,
        shareholders_imported,
        holdings_created: holdings_created as usize,
        conflicts,
        batch_id,
    })
}

/// Parse and diff without writing. Mandatory company identity applies here
/// too: a file that cannot be committed cannot be previewed.
pub fn preview_import(
    conn: &Connection,
    vocab: &Vocabulary,
    bytes: &[u8],
) -> Result<PreviewResult, StoreError> {
    let parsed = captable_parse::parse_bytes(bytes, vocab)?;
    let org_number = match &parsed.org_number {
        Some(org) => org.clone(),
        None => {
            return Err(StoreError::MissingOrgNumber {
                company_name: parsed.name.clone(),
            })
        }
    };

    let existing_company_id = snapshot::find_company_id(conn, &org_number)?;
    let current = match &existing_company_id {
        Some(id) => Some(snapshot::read_company_snapshot(conn, id)?),
        None => None,
    };
    Ok(PreviewResult {
        diff: diff(current.as_ref(), &parsed),
        existing_company_id,
    })
}

/// Import history for a company, newest first.
pub fn list_batches(conn: &Connection, org_number: &str) -> Result<Vec<BatchRecord>, StoreError> {
    let company_id = snapshot::find_company_id(conn, org_number)?.ok_or_else(|| {
        StoreError::CompanyNotFound {
            org_number: org_number.to_string(),
        }
    })?;
    let mut stmt = conn.prepare(
        "SELECT id, filename, file_sha256, imported_at, records_imported, conflicts_found \
         FROM import_batches WHERE company_id = ?1 ORDER BY imported_at DESC, rowid DESC",
    )?;
    let batches = stmt
        .query_map([&company_id], |row| {
            Ok(BatchRecord {
                id: row.get(0)?,
                filename: row.get(1)?,
                file_sha256: row.get(2)?,
                imported_at: row.get(3)?,
                records_imported: row.get(4)?,
                conflicts_found: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}
