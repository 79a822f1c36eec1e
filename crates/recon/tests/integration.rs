use captable_parse::model::{ClassHolding, ParsedCompany, ParsedShareClass, ParsedShareholder};
use captable_recon::diff;
use captable_recon::model::{
    ChangeKind, ClassChangeKind, CompanySnapshot, SnapshotClass, SnapshotHolding,
};

// -------------------------------------------------------------------------
// Builders
// -------------------------------------------------------------------------

fn company(name: &str, org: &str) -> ParsedCompany {
    ParsedCompany {
        name: name.into(),
        org_number: Some(org.into()),
        total_shares: None,
        nominal_value: None,
        share_capital: None,
        total_votes: None,
        share_classes: Vec::new(),
        shareholders: Vec::new(),
    }
}

fn parsed_class(name: &str, shares: i64) -> ParsedShareClass {
    ParsedShareClass {
        name: name.into(),
        total_shares: Some(shares),
        nominal_value: None,
        share_capital: None,
        total_votes: None,
        remarks: None,
    }
}

fn holder(name: &str, org: Option<&str>, classes: &[(&str, i64)]) -> ParsedShareholder {
    ParsedShareholder {
        name: name.into(),
        org_number: org.map(Into::into),
        birth_date: None,
        email: None,
        phone: None,
        address: None,
        country: None,
        ownership_pct: None,
        voting_pct: None,
        total_shares: None,
        pledged: false,
        class_holdings: classes
            .iter()
            .map(|(class, shares)| ClassHolding {
                class_name: (*class).into(),
                shares: *shares,
                share_numbers: None,
                cost_price: None,
                entry_date: None,
            })
            .collect(),
    }
}

fn holder_total(name: &str, org: Option<&str>, total: i64) -> ParsedShareholder {
    let mut sh = holder(name, org, &[]);
    sh.total_shares = Some(total);
    sh
}

fn snapshot(name: &str, org: &str) -> CompanySnapshot {
    CompanySnapshot {
        company_id: "c1".into(),
        org_number: org.into(),
        name: name.into(),
        total_shares: None,
        nominal_value: None,
        share_capital: None,
        total_votes: None,
        share_classes: Vec::new(),
        holdings: Vec::new(),
    }
}

fn snap_class(name: &str, shares: i64) -> SnapshotClass {
    SnapshotClass {
        name: name.into(),
        total_shares: Some(shares),
        nominal_value: None,
        share_capital: None,
        total_votes: None,
        remarks: None,
    }
}

fn holding(
    id: &str,
    name: &str,
    org: Option<&str>,
    class: Option<&str>,
    shares: i64,
) -> SnapshotHolding {
    SnapshotHolding {
        shareholder_id: id.into(),
        shareholder_name: name.into(),
        shareholder_org_number: org.map(Into::into),
        class_name: class.map(Into::into),
        shares,
        ownership_pct: None,
        voting_pct: None,
        share_numbers: None,
        cost_price: None,
        entry_date: None,
        pledged: false,
    }
}

// -------------------------------------------------------------------------
// First import
// -------------------------------------------------------------------------

#[test]
fn first_import_marks_every_row_new() {
    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 1000)];
    let mut bob = holder("Bob Smith", None, &[("Ordinary shares", 500)]);
    bob.ownership_pct = Some(50.0);
    parsed.shareholders = vec![
        bob,
        holder("Astrid Berg", None, &[("Ordinary shares", 300)]),
        holder("Holm Eiendom AS", Some("912345678"), &[("Ordinary shares", 200)]),
    ];

    let result = diff(None, &parsed);

    assert!(result.is_first_import);
    assert_eq!(result.company_name, "Alpha AS");
    assert_eq!(result.company_org_number.as_deref(), Some("910000001"));
    assert_eq!(result.changes.len(), 3);
    for change in &result.changes {
        assert_eq!(change.kind, ChangeKind::New);
        assert_eq!(change.total_shares_before, 0);
    }
    assert_eq!(result.changes[0].ownership_pct_after, Some(50.0));

    assert_eq!(result.share_class_changes.len(), 1);
    assert_eq!(result.share_class_changes[0].kind, ClassChangeKind::Added);

    assert_eq!(result.summary.new, 3);
    assert_eq!(result.summary.classes_added, 1);
    assert_eq!(result.summary.changed_holdings, 0);
}

#[test]
fn empty_snapshot_counts_as_first_import() {
    // A company row can exist with no holdings (never a normal state, but
    // reachable); the diff treats it the same as no company at all.
    let current = snapshot("Alpha AS", "910000001");
    let mut parsed = company("Alpha AS", "910000001");
    parsed.shareholders = vec![holder_total("Bob Smith", None, 100)];

    let result = diff(Some(&current), &parsed);
    assert!(result.is_first_import);
    assert_eq!(result.summary.new, 1);
}

// -------------------------------------------------------------------------
// Re-import scenarios
// -------------------------------------------------------------------------

#[test]
fn share_increase_reports_before_and_after() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.share_classes = vec![snap_class("Ordinary shares", 1000)];
    current.holdings = vec![holding("s1", "Bob Smith", None, Some("Ordinary shares"), 100)];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 1000)];
    parsed.shareholders = vec![holder("Bob Smith", None, &[("Ordinary shares", 150)])];

    let result = diff(Some(&current), &parsed);

    assert!(!result.is_first_import);
    assert_eq!(result.changes.len(), 1);
    let change = &result.changes[0];
    assert_eq!(change.kind, ChangeKind::Increased);
    assert_eq!(change.name, "Bob Smith");
    assert_eq!(change.total_shares_before, 100);
    assert_eq!(change.total_shares_after, 150);
    assert_eq!(change.class_changes.len(), 1);
    assert_eq!(change.class_changes[0].shares_before, 100);
    assert_eq!(change.class_changes[0].shares_after, 150);
    assert_eq!(result.summary.changed_holdings, 1);
}

#[test]
fn missing_shareholder_is_exited() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.holdings = vec![
        holding("s1", "Bob Smith", None, Some("Ordinary shares"), 100),
        holding("s2", "Alice Moe", None, Some("Ordinary shares"), 50),
    ];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 100)];
    parsed.shareholders = vec![holder("Bob Smith", None, &[("Ordinary shares", 100)])];

    let result = diff(Some(&current), &parsed);

    assert_eq!(result.changes.len(), 2);
    // Exited sorts before unchanged.
    let exited = &result.changes[0];
    assert_eq!(exited.kind, ChangeKind::Exited);
    assert_eq!(exited.name, "Alice Moe");
    assert_eq!(exited.total_shares_before, 50);
    assert_eq!(exited.total_shares_after, 0);
    assert_eq!(result.changes[1].kind, ChangeKind::Unchanged);
    assert_eq!(result.summary.exited, 1);
    assert_eq!(result.summary.unchanged, 1);
}

#[test]
fn identical_reimport_is_all_unchanged() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.share_classes = vec![snap_class("Class A", 600), snap_class("Class B", 400)];
    current.holdings = vec![
        holding("s1", "Holm Eiendom AS", Some("912345678"), Some("Class A"), 600),
        holding("s2", "Astrid Berg", None, Some("Class B"), 400),
    ];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Class A", 600), parsed_class("Class B", 400)];
    parsed.shareholders = vec![
        holder("Holm Eiendom AS", Some("912345678"), &[("Class A", 600)]),
        holder("Astrid Berg", None, &[("Class B", 400)]),
    ];

    let result = diff(Some(&current), &parsed);

    assert!(!result.is_first_import);
    assert!(result.changes.iter().all(|c| c.kind == ChangeKind::Unchanged));
    assert!(result
        .share_class_changes
        .iter()
        .all(|c| c.kind == ClassChangeKind::Unchanged));
    assert_eq!(result.summary.changed_holdings, 0);
    assert_eq!(result.summary.unchanged, 2);
}

#[test]
fn class_swap_keeps_total_but_flags_composition() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.holdings = vec![holding("s1", "Bob Smith", None, Some("Class A"), 100)];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Class B", 100)];
    parsed.shareholders = vec![holder("Bob Smith", None, &[("Class B", 100)])];

    let result = diff(Some(&current), &parsed);

    let change = &result.changes[0];
    assert_eq!(change.kind, ChangeKind::ClassChanged);
    assert_eq!(change.total_shares_before, 100);
    assert_eq!(change.total_shares_after, 100);
    // Union of both sides, alphabetical.
    assert_eq!(change.class_changes.len(), 2);
    assert_eq!(change.class_changes[0].class_name.as_deref(), Some("Class A"));
    assert_eq!(change.class_changes[0].shares_before, 100);
    assert_eq!(change.class_changes[0].shares_after, 0);
    assert_eq!(change.class_changes[1].class_name.as_deref(), Some("Class B"));
    assert_eq!(change.class_changes[1].shares_after, 100);
    assert_eq!(result.summary.class_changed, 1);
    assert_eq!(result.summary.changed_holdings, 1);
}

#[test]
fn changes_sort_in_bucket_order() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.holdings = vec![
        holding("s1", "Alice Moe", None, Some("Ordinary shares"), 50),
        holding("s2", "Bob Smith", None, Some("Ordinary shares"), 100),
        holding("s3", "Carol Vik", None, Some("Ordinary shares"), 70),
    ];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 250)];
    parsed.shareholders = vec![
        holder("Carol Vik", None, &[("Ordinary shares", 70)]),
        holder("Bob Smith", None, &[("Ordinary shares", 150)]),
        holder("Nora Lien", None, &[("Ordinary shares", 30)]),
    ];

    let result = diff(Some(&current), &parsed);

    let kinds: Vec<ChangeKind> = result.changes.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::New,
            ChangeKind::Exited,
            ChangeKind::Increased,
            ChangeKind::Unchanged,
        ]
    );
    assert_eq!(result.changes[0].name, "Nora Lien");
    assert_eq!(result.changes[1].name, "Alice Moe");
}

// -------------------------------------------------------------------------
// Matching rules
// -------------------------------------------------------------------------

#[test]
fn org_number_match_survives_renames() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.holdings = vec![holding(
        "s1",
        "Holm Eiendom AS",
        Some("912345678"),
        Some("Ordinary shares"),
        600,
    )];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 600)];
    parsed.shareholders = vec![holder(
        "HOLM EIENDOM AS",
        Some("912345678"),
        &[("Ordinary shares", 600)],
    )];

    let result = diff(Some(&current), &parsed);

    // Same identity, so no new/exited pair.
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].kind, ChangeKind::Unchanged);
    assert_eq!(result.changes[0].org_number.as_deref(), Some("912345678"));
}

#[test]
fn name_match_is_case_insensitive_when_org_absent() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.holdings = vec![holding("s1", "Astrid Berg", None, Some("Ordinary shares"), 400)];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 400)];
    parsed.shareholders = vec![holder("ASTRID  BERG", None, &[("Ordinary shares", 400)])];

    let result = diff(Some(&current), &parsed);
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].kind, ChangeKind::Unchanged);
}

#[test]
fn classless_totals_diff_by_shareholder_total() {
    let mut current = snapshot("Alpha AS", "910000001");
    current.holdings = vec![holding("s1", "Beta Invest Ltd", Some("GB123456"), None, 250)];

    let mut parsed = company("Alpha AS", "910000001");
    parsed.shareholders = vec![holder_total("Beta Invest Ltd", Some("GB123456"), 300)];

    let result = diff(Some(&current), &parsed);

    let change = &result.changes[0];
    assert_eq!(change.kind, ChangeKind::Increased);
    assert_eq!(change.total_shares_before, 250);
    assert_eq!(change.total_shares_after, 300);
    assert_eq!(change.class_changes.len(), 1);
    assert_eq!(change.class_changes[0].class_name, None);
}

// -------------------------------------------------------------------------
// JSON shape: lock the serialized schema
// -------------------------------------------------------------------------

#[test]
fn diff_json_shape() {
    let mut parsed = company("Alpha AS", "910000001");
    parsed.share_classes = vec![parsed_class("Ordinary shares", 100)];
    parsed.shareholders = vec![holder("Bob Smith", None, &[("Ordinary shares", 100)])];

    let result = diff(None, &parsed);
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["company_name"].is_string());
    assert!(json["is_first_import"].is_boolean());
    assert!(json["share_class_changes"].is_array());
    assert_eq!(json["share_class_changes"][0]["kind"], "added");

    let change = &json["changes"][0];
    assert_eq!(change["kind"], "new");
    assert!(change["total_shares_before"].is_number());
    assert!(change["total_shares_after"].is_number());
    assert!(change["class_changes"].is_array());

    let summary = &json["summary"];
    for field in [
        "new",
        "exited",
        "increased",
        "decreased",
        "class_changed",
        "unchanged",
        "classes_added",
        "classes_removed",
        "classes_changed",
        "changed_holdings",
    ] {
        assert!(
            summary[field].is_number(),
            "summary.{} must be a number, got {:?}",
            field,
            summary[field]
        );
    }
}
