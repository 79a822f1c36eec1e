//! Denormalized company projections.
//!
//! A snapshot is what the diff engine compares against and what gets
//! persisted as the pre-image of a committed import. Ordering is fixed
//! (class name, holder name, insertion order) so snapshots of identical
//! state are structurally identical regardless of when rows were written.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use captable_recon::{CompanySnapshot, SnapshotClass, SnapshotHolding};

use crate::error::StoreError;

pub fn find_company_id(conn: &Connection, org_number: &str) -> Result<Option<String>, StoreError> {
    let id = conn
        .query_row(
            "SELECT id FROM companies WHERE org_number = ?1",
            [org_number],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn read_company_snapshot(
    conn: &Connection,
    company_id: &str,
) -> Result<CompanySnapshot, StoreError> {
    let (org_number, name, total_shares, nominal_value, share_capital, total_votes) = conn
        .query_row(
            "SELECT org_number, name, total_shares, nominal_value, share_capital, total_votes \
             FROM companies WHERE id = ?1",
            [company_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )?;

    let mut stmt = conn.prepare(
        "SELECT name, total_shares, nominal_value, share_capital, total_votes, remarks \
         FROM share_classes WHERE company_id = ?1 ORDER BY name",
    )?;
    let share_classes = stmt
        .query_map([company_id], |row| {
            Ok(SnapshotClass {
                name: row.get(0)?,
                total_shares: row.get(1)?,
                nominal_value: row.get(2)?,
                share_capital: row.get(3)?,
                total_votes: row.get(4)?,
                remarks: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT h.shareholder_id, s.name, s.org_number, sc.name, h.shares, h.ownership_pct, \
                h.voting_pct, h.share_numbers, h.cost_price, h.entry_date, h.pledged \
         FROM holdings h \
         JOIN shareholders s ON s.id = h.shareholder_id \
         LEFT JOIN share_classes sc ON sc.id = h.share_class_id \
         WHERE h.company_id = ?1 \
         ORDER BY sc.name, s.name, h.rowid",
    )?;
    let holdings = stmt
        .query_map([company_id], |row| {
            Ok(SnapshotHolding {
                shareholder_id: row.get(0)?,
                shareholder_name: row.get(1)?,
                shareholder_org_number: row.get(2)?,
                class_name: row.get(3)?,
                shares: row.get(4)?,
                ownership_pct: row.get(5)?,
                voting_pct: row.get(6)?,
                share_numbers: row.get(7)?,
                cost_price: row.get(8)?,
                entry_date: row
                    .get::<_, Option<String>>(9)?
                    .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                pledged: row.get(10)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompanySnapshot {
        company_id: company_id.to_string(),
        org_number,
        name,
        total_shares,
        nominal_value,
        share_capital,
        total_votes,
        share_classes,
        holdings,
    })
}

/// Persist the pre-import state under the batch that replaced it.
pub(crate) fn persist_snapshot(
    conn: &Connection,
    company_id: &str,
    batch_id: &str,
    snapshot: &CompanySnapshot,
) -> Result<(), StoreError> {
    let data = serde_json::to_string(snapshot)?;
    conn.execute(
        "INSERT INTO snapshots (id, company_id, batch_id, created_at, data) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            Uuid::new_v4().to_string(),
            company_id,
            batch_id,
            Utc::now().to_rfc3339(),
            data,
        ],
    )?;
    Ok(())
}

/// The pre-image stored with a batch, if any. First imports store none.
pub fn stored_snapshot(
    conn: &Connection,
    batch_id: &str,
) -> Result<Option<CompanySnapshot>, StoreError> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM snapshots WHERE batch_id = ?1",
            [batch_id],
            |row| row.get(0),
        )
        .optional()?;
    match data {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}
