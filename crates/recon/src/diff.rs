//! Pure register diff: persisted snapshot vs. freshly parsed file.

use std::collections::{BTreeMap, HashMap};

use captable_parse::model::{ParsedCompany, ParsedShareClass, ParsedShareholder};
use captable_parse::normalize;

use crate::model::{
    ChangeKind, ClassChangeKind, ClassShareChange, CompanySnapshot, DiffSummary, ImportDiff,
    ShareClassChange, ShareholderChange, SnapshotClass,
};

/// Compare persisted state against a parsed file.
///
/// No I/O and no mutation; the caller fetches the snapshot and decides
/// what to do with the result. `current` absent (or holding-free) is the
/// first-import short-circuit: every shareholder is `new` and every class
/// `added`.
pub fn diff(current: Option<&CompanySnapshot>, parsed: &ParsedCompany) -> ImportDiff {
    let is_first_import = current.map_or(true, |s| s.holdings.is_empty());

    let share_class_changes = if is_first_import {
        parsed
            .share_classes
            .iter()
            .map(|c| ShareClassChange {
                kind: ClassChangeKind::Added,
                name: c.name.trim().to_string(),
                total_shares_before: None,
                total_shares_after: c.total_shares,
            })
            .collect()
    } else {
        diff_share_classes(
            current.map(|s| s.share_classes.as_slice()).unwrap_or(&[]),
            &parsed.share_classes,
        )
    };

    let mut changes: Vec<ShareholderChange> = Vec::new();
    if is_first_import {
        for sh in &parsed.shareholders {
            changes.push(entry_change(sh));
        }
    } else {
        let mut groups = match current {
            Some(snapshot) => group_current(snapshot),
            None => Vec::new(),
        };

        for sh in &parsed.shareholders {
            match find_group(&groups, sh) {
                Some(i) => {
                    groups[i].matched = true;
                    changes.push(matched_change(&groups[i], sh));
                }
                None => changes.push(entry_change(sh)),
            }
        }

        for group in groups.iter().filter(|g| !g.matched) {
            changes.push(exit_change(group));
        }
    }

    // Bucket order is the presentation contract; sort is stable, so file
    // order survives within each bucket.
    changes.sort_by_key(|c| c.kind);

    let summary = summarize(&share_class_changes, &changes);

    ImportDiff {
        company_name: parsed.name.clone(),
        company_org_number: parsed.org_number.clone(),
        is_first_import,
        share_class_changes,
        changes,
        summary,
    }
}

/// Classes compared by trimmed name; `changed` when total shares, nominal
/// value or share capital moved. Parsed order first, removals after.
fn diff_share_classes(
    current: &[SnapshotClass],
    parsed: &[ParsedShareClass],
) -> Vec<ShareClassChange> {
    let mut changes = Vec::new();

    for pc in parsed {
        let name = pc.name.trim();
        match current.iter().find(|c| c.name.trim() == name) {
            None => changes.push(ShareClassChange {
                kind: ClassChangeKind::Added,
                name: name.to_string(),
                total_shares_before: None,
                total_shares_after: pc.total_shares,
            }),
            Some(cur) => {
                let moved = cur.total_shares != pc.total_shares
                    || cur.nominal_value != pc.nominal_value
                    || cur.share_capital != pc.share_capital;
                changes.push(ShareClassChange {
                    kind: if moved {
                        ClassChangeKind::Changed
                    } else {
                        ClassChangeKind::Unchanged
                    },
                    name: name.to_string(),
                    total_shares_before: cur.total_shares,
                    total_shares_after: pc.total_shares,
                });
            }
        }
    }

    for cur in current {
        if !parsed.iter().any(|p| p.name.trim() == cur.name.trim()) {
            changes.push(ShareClassChange {
                kind: ClassChangeKind::Removed,
                name: cur.name.trim().to_string(),
                total_shares_before: cur.total_shares,
                total_shares_after: None,
            });
        }
    }

    changes
}

/// Current holdings collapsed per shareholder, keyed by registration
/// number when present, else by persisted identity.
struct CurrentGroup {
    name: String,
    org_number: Option<String>,
    total: i64,
    by_class: BTreeMap<Option<String>, i64>,
    matched: bool,
}

fn group_current(snapshot: &CompanySnapshot) -> Vec<CurrentGroup> {
    let mut groups: Vec<CurrentGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for h in &snapshot.holdings {
        let key = match &h.shareholder_org_number {
            Some(org) => org.clone(),
            None => format!("id:{}", h.shareholder_id),
        };
        let i = match index.get(&key) {
            Some(&i) => i,
            None => {
                groups.push(CurrentGroup {
                    name: h.shareholder_name.clone(),
                    org_number: h.shareholder_org_number.clone(),
                    total: 0,
                    by_class: BTreeMap::new(),
                    matched: false,
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[i].total += h.shares;
        let class = h.class_name.as_ref().map(|s| s.trim().to_string());
        *groups[i].by_class.entry(class).or_insert(0) += h.shares;
    }

    groups
}

/// Registration number first, then exact normalized name, both against
/// not-yet-matched groups only.
fn find_group(groups: &[CurrentGroup], sh: &ParsedShareholder) -> Option<usize> {
    if let Some(org) = sh.org_number.as_deref() {
        if let Some(i) = groups
            .iter()
            .position(|g| !g.matched && g.org_number.as_deref() == Some(org))
        {
            return Some(i);
        }
    }
    let key = normalize::name_key(&sh.name);
    groups
        .iter()
        .position(|g| !g.matched && normalize::name_key(&g.name) == key)
}

/// Parsed holdings per class; classless files land under `None`.
fn parsed_by_class(sh: &ParsedShareholder) -> BTreeMap<Option<String>, i64> {
    let mut map = BTreeMap::new();
    if sh.class_holdings.is_empty() {
        let total = sh.total_shares.unwrap_or(0);
        if total != 0 {
            map.insert(None, total);
        }
    } else {
        for h in &sh.class_holdings {
            *map.entry(Some(h.class_name.trim().to_string())).or_insert(0) += h.shares;
        }
    }
    map
}

fn entry_change(sh: &ParsedShareholder) -> ShareholderChange {
    let after = parsed_by_class(sh);
    ShareholderChange {
        kind: ChangeKind::New,
        name: sh.name.clone(),
        org_number: sh.org_number.clone(),
        total_shares_before: 0,
        total_shares_after: sh.effective_shares(),
        ownership_pct_after: sh.ownership_pct,
        class_changes: after
            .into_iter()
            .map(|(class_name, shares)| ClassShareChange {
                class_name,
                shares_before: 0,
                shares_after: shares,
            })
            .collect(),
    }
}

fn exit_change(group: &CurrentGroup) -> ShareholderChange {
    ShareholderChange {
        kind: ChangeKind::Exited,
        name: group.name.clone(),
        org_number: group.org_number.clone(),
        total_shares_before: group.total,
        total_shares_after: 0,
        ownership_pct_after: None,
        class_changes: group
            .by_class
            .iter()
            .map(|(class_name, shares)| ClassShareChange {
                class_name: class_name.clone(),
                shares_before: *shares,
                shares_after: 0,
            })
            .collect(),
    }
}

fn matched_change(group: &CurrentGroup, sh: &ParsedShareholder) -> ShareholderChange {
    let after = parsed_by_class(sh);
    let after_total = sh.effective_shares();

    let mut union: BTreeMap<Option<String>, (i64, i64)> = BTreeMap::new();
    for (class, shares) in &group.by_class {
        union.entry(class.clone()).or_default().0 = *shares;
    }
    for (class, shares) in &after {
        union.entry(class.clone()).or_default().1 = *shares;
    }

    let class_changes: Vec<ClassShareChange> = union
        .into_iter()
        .map(|(class_name, (before, after))| ClassShareChange {
            class_name,
            shares_before: before,
            shares_after: after,
        })
        .collect();

    let composition_moved = class_changes
        .iter()
        .any(|c| c.shares_before != c.shares_after);

    let kind = if group.total == after_total {
        if composition_moved {
            ChangeKind::ClassChanged
        } else {
            ChangeKind::Unchanged
        }
    } else if after_total > group.total {
        ChangeKind::Increased
    } else {
        ChangeKind::Decreased
    };

    ShareholderChange {
        kind,
        name: sh.name.clone(),
        org_number: sh.org_number.clone().or_else(|| group.org_number.clone()),
        total_shares_before: group.total,
        total_shares_after: after_total,
        ownership_pct_after: sh.ownership_pct,
        class_changes,
    }
}

fn summarize(classes: &[ShareClassChange], changes: &[ShareholderChange]) -> DiffSummary {
    let count = |kind: ChangeKind| changes.iter().filter(|c| c.kind == kind).count();
    let class_count =
        |kind: ClassChangeKind| classes.iter().filter(|c| c.kind == kind).count();

    let increased = count(ChangeKind::Increased);
    let decreased = count(ChangeKind::Decreased);
    let class_changed = count(ChangeKind::ClassChanged);

    DiffSummary {
        new: count(ChangeKind::New),
        exited: count(ChangeKind::Exited),
        increased,
        decreased,
        class_changed,
        unchanged: count(ChangeKind::Unchanged),
        classes_added: class_count(ClassChangeKind::Added),
        classes_removed: class_count(ClassChangeKind::Removed),
        classes_changed: class_count(ClassChangeKind::Changed),
        changed_holdings: increased + decreased + class_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap_class(name: &str, shares: i64) -> SnapshotClass {
        SnapshotClass {
            name: name.into(),
            total_shares: Some(shares),
            nominal_value: Some(1.0),
            share_capital: None,
            total_votes: None,
            remarks: None,
        }
    }

    fn parsed_class(name: &str, shares: i64) -> ParsedShareClass {
        ParsedShareClass {
            name: name.into(),
            total_shares: Some(shares),
            nominal_value: Some(1.0),
            share_capital: None,
            total_votes: None,
            remarks: None,
        }
    }

    #[test]
    fn class_rename_reports_added_and_removed() {
        let current = vec![snap_class("Class A", 100)];
        let parsed = vec![parsed_class("Class B", 100)];
        let changes = diff_share_classes(&current, &parsed);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ClassChangeKind::Added);
        assert_eq!(changes[0].name, "Class B");
        assert_eq!(changes[1].kind, ClassChangeKind::Removed);
        assert_eq!(changes[1].name, "Class A");
        assert_eq!(changes[1].total_shares_before, Some(100));
        assert_eq!(changes[1].total_shares_after, None);
    }

    #[test]
    fn class_field_movement_is_changed() {
        let current = vec![snap_class("Ordinary shares", 1000)];
        let parsed = vec![parsed_class("Ordinary shares", 1200)];
        let changes = diff_share_classes(&current, &parsed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ClassChangeKind::Changed);
        assert_eq!(changes[0].total_shares_before, Some(1000));
        assert_eq!(changes[0].total_shares_after, Some(1200));
    }

    #[test]
    fn identical_class_is_unchanged() {
        let current = vec![snap_class("Ordinary shares", 1000)];
        let parsed = vec![parsed_class("Ordinary shares", 1000)];
        let changes = diff_share_classes(&current, &parsed);
        assert_eq!(changes[0].kind, ClassChangeKind::Unchanged);
    }

    #[test]
    fn class_names_compare_trimmed() {
        let current = vec![snap_class("Class A", 100)];
        let parsed = vec![parsed_class("  Class A ", 100)];
        let changes = diff_share_classes(&current, &parsed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ClassChangeKind::Unchanged);
    }
}
