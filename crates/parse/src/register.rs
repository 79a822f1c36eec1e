//! Layout-independent register parsing.
//!
//! Register exports come from several registry portals and from hand-edited
//! copies of their output. Nothing about row or column positions can be
//! assumed; every structural element is found by scanning and resolving
//! cell text through the alias vocabulary.

use std::collections::BTreeMap;

use crate::cell::{is_iso_date, Cell};
use crate::error::ParseError;
use crate::model::{ClassHolding, ParsedCompany, ParsedShareClass, ParsedShareholder};
use crate::normalize;
use crate::table::Table;
use crate::vocab::{normalize_key, ColumnField, FieldLabel, Vocabulary};

/// Rows scanned below the anchor for labeled company-level fields.
const FIELD_WINDOW: usize = 12;
/// Rows scanned below a class-name cell for that class's labeled fields.
const CLASS_WINDOW: usize = 6;
/// First-column values included in the no-header diagnostic.
const DIAGNOSTIC_SAMPLE: usize = 15;

/// Parse one company register from a cell grid.
pub fn parse_register(table: &Table, vocab: &Vocabulary) -> Result<ParsedCompany, ParseError> {
    if table.is_blank() {
        return Err(ParseError::EmptySheet);
    }

    let anchor = find_anchor(table, vocab);
    let header = find_header(table, vocab)?;

    let fields = scan_company_fields(table, vocab, anchor.row, header.row);
    let mut share_classes = scan_class_blocks(table, vocab, anchor.row, header.row);

    // Classes that only exist as column groups still belong to the class
    // list; the file is authoritative for class structure either way.
    for group in &header.class_groups {
        if !share_classes.iter().any(|cl| cl.name == group.name) {
            share_classes.push(ParsedShareClass {
                name: group.name.clone(),
                total_shares: None,
                nominal_value: None,
                share_capital: None,
                total_votes: None,
                remarks: None,
            });
        }
    }

    let shareholders = scan_data_rows(table, vocab, &header)?;

    Ok(ParsedCompany {
        name: anchor.name,
        org_number: anchor.org_number,
        total_shares: fields.shares,
        nominal_value: fields.nominal_value,
        share_capital: fields.share_capital,
        total_votes: fields.votes,
        share_classes,
        shareholders,
    })
}

struct Anchor {
    row: usize,
    name: String,
    org_number: Option<String>,
}

/// First cell matching `NAME (REGNUMBER)` anywhere in the sheet wins. With
/// no such cell, the first non-empty cell is taken as the bare company name;
/// imports reject that later because company identity needs the number.
fn find_anchor(table: &Table, vocab: &Vocabulary) -> Anchor {
    for (r, row) in table.rows.iter().enumerate() {
        for cell in row {
            let Some(text) = cell.as_text() else { continue };
            if let Some((name, raw_reg)) = vocab.company_anchor(&text) {
                return Anchor {
                    row: r,
                    name,
                    org_number: normalize::org_number(&raw_reg),
                };
            }
        }
    }
    for (r, row) in table.rows.iter().enumerate() {
        for cell in row {
            if let Some(text) = cell.as_text() {
                return Anchor { row: r, name: text, org_number: None };
            }
        }
    }
    // Blank tables are rejected before this point.
    Anchor { row: 0, name: String::new(), org_number: None }
}

struct HeaderLayout {
    row: usize,
    columns: BTreeMap<ColumnField, usize>,
    class_groups: Vec<ClassColumns>,
}

/// A share-class column plus the sub-columns trailing it.
struct ClassColumns {
    name: String,
    shares: usize,
    share_numbers: Option<usize>,
    cost_price: Option<usize>,
    entry_date: Option<usize>,
}

/// The header is the first row resolving to a name column plus at least one
/// other recognized column or class column.
fn find_header(table: &Table, vocab: &Vocabulary) -> Result<HeaderLayout, ParseError> {
    for r in 0..table.height() {
        let layout = build_layout(table, vocab, r);
        let recognized_others = layout
            .columns
            .keys()
            .filter(|f| **f != ColumnField::Name)
            .count()
            + layout.class_groups.len();
        if layout.columns.contains_key(&ColumnField::Name) && recognized_others >= 1 {
            return Ok(layout);
        }
    }
    Err(ParseError::NoHeaderRow { scanned: first_column_sample(table) })
}

fn build_layout(table: &Table, vocab: &Vocabulary, row: usize) -> HeaderLayout {
    let cells = table.rows.get(row).map(Vec::as_slice).unwrap_or(&[]);
    let mut columns: BTreeMap<ColumnField, usize> = BTreeMap::new();
    let mut class_groups: Vec<ClassColumns> = Vec::new();

    let mut c = 0;
    while c < cells.len() {
        let Some(text) = cells[c].as_text() else {
            c += 1;
            continue;
        };

        if let Some(canonical) = vocab.share_class(&text) {
            if class_groups.iter().any(|g| g.name == canonical) {
                c += 1;
                continue;
            }
            let mut group = ClassColumns {
                name: canonical.to_string(),
                shares: c,
                share_numbers: None,
                cost_price: None,
                entry_date: None,
            };
            // Collect sub-columns rightward until another class or an
            // unrelated recognized column ends the group.
            let mut j = c + 1;
            while j < cells.len() {
                let Some(t) = cells[j].as_text() else {
                    j += 1;
                    continue;
                };
                if vocab.share_class(&t).is_some() {
                    break;
                }
                match vocab.column(&t) {
                    Some(ColumnField::ShareNumbers) => {
                        group.share_numbers.get_or_insert(j);
                        j += 1;
                    }
                    Some(ColumnField::CostPrice) => {
                        group.cost_price.get_or_insert(j);
                        j += 1;
                    }
                    Some(ColumnField::EntryDate) => {
                        group.entry_date.get_or_insert(j);
                        j += 1;
                    }
                    Some(_) => break,
                    None => j += 1,
                }
            }
            class_groups.push(group);
            c = j;
            continue;
        }

        if let Some(field) = vocab.column(&text) {
            // First occurrence wins per canonical field.
            columns.entry(field).or_insert(c);
        }
        c += 1;
    }

    HeaderLayout { row, columns, class_groups }
}

#[derive(Default)]
struct CompanyFields {
    shares: Option<i64>,
    nominal_value: Option<f64>,
    share_capital: Option<f64>,
    votes: Option<f64>,
}

/// Labeled company fields live between the anchor and the first class
/// block. Label in one cell, value in the next non-empty cell to its right.
fn scan_company_fields(
    table: &Table,
    vocab: &Vocabulary,
    anchor_row: usize,
    header_row: usize,
) -> CompanyFields {
    let mut fields = CompanyFields::default();
    let end = header_row.min(anchor_row + 1 + FIELD_WINDOW);

    for r in (anchor_row + 1)..end {
        let row = table.rows.get(r).map(Vec::as_slice).unwrap_or(&[]);
        let starts_class_block = row.iter().any(|cell| {
            cell.as_text()
                .is_some_and(|t| vocab.share_class(&t).is_some())
        });
        if starts_class_block {
            break;
        }

        for c in 0..row.len() {
            let Some(text) = row[c].as_text() else { continue };
            let Some(label) = vocab.label(&text) else { continue };
            let value = value_right(row, c + 1, vocab);
            match label {
                FieldLabel::Shares => {
                    if fields.shares.is_none() {
                        fields.shares = value.and_then(Cell::as_count);
                    }
                }
                FieldLabel::NominalValue => {
                    if fields.nominal_value.is_none() {
                        fields.nominal_value = value.and_then(Cell::as_number);
                    }
                }
                FieldLabel::ShareCapital => {
                    if fields.share_capital.is_none() {
                        fields.share_capital = value.and_then(Cell::as_number);
                    }
                }
                FieldLabel::Votes => {
                    if fields.votes.is_none() {
                        fields.votes = value.and_then(Cell::as_number);
                    }
                }
                FieldLabel::Remarks => {}
            }
        }
    }
    fields
}

/// First non-empty cell to the right that is not itself a label or class
/// name.
fn value_right<'a>(row: &'a [Cell], from: usize, vocab: &Vocabulary) -> Option<&'a Cell> {
    for cell in row.get(from..).unwrap_or(&[]) {
        if cell.is_empty() {
            continue;
        }
        if let Some(t) = cell.as_text() {
            if vocab.label(&t).is_some() || vocab.share_class(&t).is_some() {
                return None;
            }
        }
        return Some(cell);
    }
    None
}

/// Share-class blocks between the anchor and the header: a class-name cell,
/// a bounded window of labeled fields below it, and optionally trailing
/// free-text remarks associated by class-name substring.
fn scan_class_blocks(
    table: &Table,
    vocab: &Vocabulary,
    anchor_row: usize,
    header_row: usize,
) -> Vec<ParsedShareClass> {
    // Block starts, row-major, first sighting per canonical name.
    let mut starts: Vec<(usize, String)> = Vec::new();
    for r in (anchor_row + 1)..header_row {
        for cell in table.rows.get(r).map(Vec::as_slice).unwrap_or(&[]) {
            let Some(text) = cell.as_text() else { continue };
            let Some(canonical) = vocab.share_class(&text) else { continue };
            if !starts.iter().any(|(_, n)| n == canonical) {
                starts.push((r, canonical.to_string()));
            }
        }
    }
    if starts.is_empty() {
        return Vec::new();
    }

    let mut classes: Vec<ParsedShareClass> = Vec::new();
    for (i, (block_row, name)) in starts.iter().enumerate() {
        let next_block_row = starts
            .get(i + 1)
            .map(|(r, _)| *r)
            .unwrap_or(header_row);
        let end = header_row
            .min(block_row + 1 + CLASS_WINDOW)
            .min(next_block_row);

        let mut class = ParsedShareClass {
            name: name.clone(),
            total_shares: None,
            nominal_value: None,
            share_capital: None,
            total_votes: None,
            remarks: None,
        };

        for r in (block_row + 1)..end {
            let row = table.rows.get(r).map(Vec::as_slice).unwrap_or(&[]);
            for c in 0..row.len() {
                let Some(text) = row[c].as_text() else { continue };
                let Some(label) = vocab.label(&text) else { continue };
                let value = value_right(row, c + 1, vocab);
                match label {
                    FieldLabel::Shares => {
                        if class.total_shares.is_none() {
                            class.total_shares = value.and_then(Cell::as_count);
                        }
                    }
                    FieldLabel::NominalValue => {
                        if class.nominal_value.is_none() {
                            class.nominal_value = value.and_then(Cell::as_number);
                        }
                    }
                    FieldLabel::ShareCapital => {
                        if class.share_capital.is_none() {
                            class.share_capital = value.and_then(Cell::as_number);
                        }
                    }
                    FieldLabel::Votes => {
                        if class.total_votes.is_none() {
                            class.total_votes = value.and_then(Cell::as_number);
                        }
                    }
                    FieldLabel::Remarks => {
                        if let Some(text) = value.and_then(Cell::as_text) {
                            append_remark(&mut class.remarks, &text);
                        }
                    }
                }
            }
        }
        classes.push(class);
    }

    collect_trailing_remarks(table, vocab, &starts, header_row, &mut classes);
    classes
}

/// Free-text rows after the last class block. Each remark line attaches to
/// the class whose name (any alias) appears in it, defaulting to the first
/// class.
fn collect_trailing_remarks(
    table: &Table,
    vocab: &Vocabulary,
    starts: &[(usize, String)],
    header_row: usize,
    classes: &mut [ParsedShareClass],
) {
    let Some((last_row, _)) = starts.last() else { return };

    for r in (last_row + 1)..header_row {
        let row = table.rows.get(r).map(Vec::as_slice).unwrap_or(&[]);
        let mut texts: Vec<String> = Vec::new();
        let mut resolvable = false;
        for cell in row {
            let Some(text) = cell.as_text() else { continue };
            if vocab.label(&text).is_some()
                || vocab.share_class(&text).is_some()
                || vocab.column(&text).is_some()
            {
                resolvable = true;
                break;
            }
            texts.push(text);
        }
        if resolvable || texts.is_empty() {
            continue;
        }
        let line = texts.join(" ");
        if !line.chars().any(|c| c.is_alphabetic()) {
            continue;
        }

        let key = normalize_key(&line);
        let target = classes
            .iter()
            .position(|cl| {
                vocab
                    .class_alias_keys(&cl.name)
                    .iter()
                    .any(|alias| key.contains(alias.as_str()))
            })
            .unwrap_or(0);
        append_remark(&mut classes[target].remarks, &line);
    }
}

fn append_remark(slot: &mut Option<String>, text: &str) {
    match slot {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}

fn scan_data_rows(
    table: &Table,
    vocab: &Vocabulary,
    header: &HeaderLayout,
) -> Result<Vec<ParsedShareholder>, ParseError> {
    // Presence is guaranteed by header detection.
    let name_col = match header.columns.get(&ColumnField::Name) {
        Some(&c) => c,
        None => return Err(ParseError::NoShareholderRows),
    };
    let col = |field: ColumnField| header.columns.get(&field).copied();

    let mut shareholders: Vec<ParsedShareholder> = Vec::new();
    for r in (header.row + 1)..table.height() {
        let Some(name) = table.cell(r, name_col).as_text() else { continue };
        if vocab.is_footer(&name) {
            continue;
        }

        let mut org_number: Option<String> = None;
        let mut birth_date = None;
        if let Some(c) = col(ColumnField::OrgOrBirth) {
            match table.cell(r, c) {
                Cell::Date(d) => birth_date = Some(*d),
                cell => {
                    if let Some(text) = cell.as_text() {
                        if is_iso_date(&text) {
                            birth_date = cell.as_date();
                        } else {
                            org_number = normalize::org_number(&text);
                        }
                    }
                }
            }
        }

        let mut class_holdings: Vec<ClassHolding> = Vec::new();
        for group in &header.class_groups {
            let Some(shares) = table.cell(r, group.shares).as_count() else { continue };
            if shares == 0 {
                continue;
            }
            class_holdings.push(ClassHolding {
                class_name: group.name.clone(),
                shares,
                share_numbers: group
                    .share_numbers
                    .and_then(|c| table.cell(r, c).as_text()),
                cost_price: group.cost_price.and_then(|c| table.cell(r, c).as_number()),
                entry_date: group.entry_date.and_then(|c| table.cell(r, c).as_date()),
            });
        }

        shareholders.push(ParsedShareholder {
            name,
            org_number,
            birth_date,
            email: col(ColumnField::Email).and_then(|c| table.cell(r, c).as_text()),
            phone: col(ColumnField::Phone).and_then(|c| table.cell(r, c).as_text()),
            address: col(ColumnField::Address).and_then(|c| table.cell(r, c).as_text()),
            country: col(ColumnField::Country).and_then(|c| table.cell(r, c).as_text()),
            ownership_pct: col(ColumnField::OwnershipPct)
                .and_then(|c| table.cell(r, c).as_number()),
            voting_pct: col(ColumnField::VotingPct).and_then(|c| table.cell(r, c).as_number()),
            total_shares: col(ColumnField::TotalShares)
                .and_then(|c| table.cell(r, c).as_count()),
            pledged: col(ColumnField::Pledged)
                .map(|c| table.cell(r, c).as_flag())
                .unwrap_or(false),
            class_holdings,
        });
    }

    if shareholders.is_empty() {
        return Err(ParseError::NoShareholderRows);
    }
    Ok(shareholders)
}

fn first_column_sample(table: &Table) -> Vec<String> {
    table
        .rows
        .iter()
        .filter_map(|row| row.first().and_then(Cell::as_text))
        .take(DIAGNOSTIC_SAMPLE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(rows: &[&[&str]]) -> Table {
        Table {
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|s| {
                            if s.is_empty() {
                                Cell::Empty
                            } else {
                                Cell::Text((*s).to_string())
                            }
                        })
                        .collect()
                })
                .collect(),
        }
    }

    fn norwegian_register() -> Table {
        t(&[
            &["Aksjeeierbok", ""],
            &["Kvist Invest AS (910 000 001)", ""],
            &["Antall aksjer", "1 000"],
            &["Pålydende", "1,00"],
            &["Aksjekapital", "NOK 1 000"],
            &["", ""],
            &["A-aksjer", ""],
            &["Antall aksjer", "600"],
            &["B-aksjer", ""],
            &["Antall aksjer", "400"],
            &["B-aksjer kan ikke omsettes uten styrets samtykke", ""],
            &[
                "Navn",
                "Org.nr/Fødselsdato",
                "A-aksjer",
                "Aksjenummer",
                "B-aksjer",
                "Antall aksjer",
                "Eierandel",
                "E-post",
            ],
            &[
                "Holm Eiendom AS",
                "912 345 678",
                "600",
                "1-600",
                "",
                "600",
                "60 %",
                "post@holm.no",
            ],
            &[
                "Astrid Berg",
                "1975-04-02",
                "",
                "",
                "400",
                "400",
                "40 %",
                "astrid@example.com",
            ],
            &["Totalt", "", "600", "", "400", "1 000", "", ""],
        ])
    }

    #[test]
    fn norwegian_register_parses_end_to_end() {
        let company = parse_register(&norwegian_register(), &Vocabulary::new()).unwrap();

        assert_eq!(company.name, "Kvist Invest AS");
        assert_eq!(company.org_number.as_deref(), Some("910000001"));
        assert_eq!(company.total_shares, Some(1000));
        assert_eq!(company.nominal_value, Some(1.0));
        assert_eq!(company.share_capital, Some(1000.0));

        assert_eq!(company.share_classes.len(), 2);
        let a = &company.share_classes[0];
        assert_eq!(a.name, "Class A");
        assert_eq!(a.total_shares, Some(600));
        assert_eq!(a.remarks, None);
        let b = &company.share_classes[1];
        assert_eq!(b.name, "Class B");
        assert_eq!(b.total_shares, Some(400));
        assert!(
            b.remarks.as_deref().unwrap_or("").contains("styrets samtykke"),
            "remark should attach to Class B by substring, got {:?}",
            b.remarks
        );

        // Footer row excluded.
        assert_eq!(company.shareholders.len(), 2);

        let holm = &company.shareholders[0];
        assert_eq!(holm.name, "Holm Eiendom AS");
        assert_eq!(holm.org_number.as_deref(), Some("912345678"));
        assert_eq!(holm.birth_date, None);
        assert_eq!(holm.ownership_pct, Some(60.0));
        assert_eq!(holm.total_shares, Some(600));
        assert_eq!(holm.class_holdings.len(), 1);
        assert_eq!(holm.class_holdings[0].class_name, "Class A");
        assert_eq!(holm.class_holdings[0].shares, 600);
        assert_eq!(holm.class_holdings[0].share_numbers.as_deref(), Some("1-600"));

        let astrid = &company.shareholders[1];
        assert_eq!(astrid.org_number, None);
        assert_eq!(astrid.birth_date, NaiveDate::from_ymd_opt(1975, 4, 2));
        assert_eq!(astrid.class_holdings.len(), 1);
        assert_eq!(astrid.class_holdings[0].class_name, "Class B");
        assert_eq!(astrid.effective_shares(), 400);
    }

    #[test]
    fn parsing_is_deterministic() {
        let table = norwegian_register();
        let vocab = Vocabulary::new();
        let first = parse_register(&table, &vocab).unwrap();
        let second = parse_register(&table, &vocab).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn header_detection_is_language_and_order_independent() {
        let norwegian = t(&[
            &["Alpha AS (910000001)"],
            &["Navn", "Org nr", "Antall aksjer"],
            &["Bob Smith", "", "100"],
        ]);
        let english = t(&[
            &["Alpha AS (910000001)"],
            &["Number of shares", "Name", "Org no"],
            &["100", "Bob Smith", ""],
        ]);

        let vocab = Vocabulary::new();
        let from_norwegian = parse_register(&norwegian, &vocab).unwrap();
        let from_english = parse_register(&english, &vocab).unwrap();

        assert_eq!(from_norwegian.shareholders.len(), 1);
        assert_eq!(from_english.shareholders.len(), 1);
        assert_eq!(from_norwegian.shareholders[0].name, "Bob Smith");
        assert_eq!(from_english.shareholders[0].name, "Bob Smith");
        assert_eq!(from_english.shareholders[0].total_shares, Some(100));
    }

    #[test]
    fn missing_header_reports_scanned_values() {
        let table = t(&[
            &["Alpha AS (910000001)"],
            &["Some notes"],
            &["More notes"],
        ]);
        match parse_register(&table, &Vocabulary::new()) {
            Err(ParseError::NoHeaderRow { scanned }) => {
                assert!(scanned.contains(&"Alpha AS (910000001)".to_string()));
                assert!(scanned.contains(&"Some notes".to_string()));
            }
            other => panic!("expected NoHeaderRow, got {other:?}"),
        }
    }

    #[test]
    fn all_rows_filtered_means_no_shareholders() {
        let table = t(&[
            &["Alpha AS (910000001)"],
            &["Navn", "Antall aksjer"],
            &["Totalt", "100"],
            &["https://registry.example.com/export", ""],
            &["", ""],
        ]);
        assert!(matches!(
            parse_register(&table, &Vocabulary::new()),
            Err(ParseError::NoShareholderRows)
        ));
    }

    #[test]
    fn anchor_fallback_keeps_name_without_org_number() {
        let table = t(&[
            &["Alpha Holding"],
            &["Navn", "Antall aksjer"],
            &["Bob Smith", "100"],
        ]);
        let company = parse_register(&table, &Vocabulary::new()).unwrap();
        assert_eq!(company.name, "Alpha Holding");
        assert_eq!(company.org_number, None);
    }

    #[test]
    fn eight_digit_company_numbers_gain_danish_prefix() {
        let table = t(&[
            &["Dansk Invest (12345678)"],
            &["Navn", "Antall aksjer"],
            &["Bob Smith", "100"],
        ]);
        let company = parse_register(&table, &Vocabulary::new()).unwrap();
        assert_eq!(company.org_number.as_deref(), Some("DK12345678"));
    }

    #[test]
    fn native_date_cells_classify_as_birth_dates() {
        let mut table = t(&[
            &["Alpha AS (910000001)"],
            &["Navn", "Fødselsdato", "Antall aksjer"],
            &["Astrid Berg", "", "50"],
        ]);
        table.rows[2][1] = Cell::Date(NaiveDate::from_ymd_opt(1975, 4, 2).unwrap());
        let company = parse_register(&table, &Vocabulary::new()).unwrap();
        assert_eq!(
            company.shareholders[0].birth_date,
            NaiveDate::from_ymd_opt(1975, 4, 2)
        );
        assert_eq!(company.shareholders[0].org_number, None);
    }

    #[test]
    fn zero_share_class_cells_produce_no_holdings() {
        let table = t(&[
            &["Alpha AS (910000001)"],
            &["Navn", "A-aksjer", "B-aksjer"],
            &["Bob Smith", "100", "0"],
        ]);
        let company = parse_register(&table, &Vocabulary::new()).unwrap();
        let bob = &company.shareholders[0];
        assert_eq!(bob.class_holdings.len(), 1);
        assert_eq!(bob.class_holdings[0].class_name, "Class A");
        // Column groups surface as classes even without header blocks.
        let names: Vec<&str> = company.share_classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Class A", "Class B"]);
    }

    #[test]
    fn class_subcolumns_attach_to_their_class_only() {
        let table = t(&[
            &["Alpha AS (910000001)"],
            &[
                "Navn",
                "A-aksjer",
                "Kostpris",
                "Ervervsdato",
                "B-aksjer",
                "Eierandel",
            ],
            &["Bob Smith", "100", "12,50", "2020-01-15", "25", "100"],
        ]);
        let company = parse_register(&table, &Vocabulary::new()).unwrap();
        let bob = &company.shareholders[0];
        assert_eq!(bob.class_holdings.len(), 2);

        let a = &bob.class_holdings[0];
        assert_eq!(a.class_name, "Class A");
        assert_eq!(a.cost_price, Some(12.5));
        assert_eq!(a.entry_date, NaiveDate::from_ymd_opt(2020, 1, 15));

        // B's group ended at "Eierandel"; it has no sub-columns.
        let b = &bob.class_holdings[1];
        assert_eq!(b.class_name, "Class B");
        assert_eq!(b.cost_price, None);
        assert_eq!(bob.ownership_pct, Some(100.0));
    }

    #[test]
    fn shareholder_totals_carry_files_without_class_columns() {
        let table = t(&[
            &["Alpha AS (910000001)"],
            &["Name", "Org no", "Number of shares"],
            &["Beta Invest Ltd", "GB123456", "250"],
        ]);
        let company = parse_register(&table, &Vocabulary::new()).unwrap();
        assert!(company.share_classes.is_empty());
        let beta = &company.shareholders[0];
        assert!(beta.class_holdings.is_empty());
        assert_eq!(beta.effective_shares(), 250);
        assert_eq!(beta.org_number.as_deref(), Some("GB123456"));
    }
}
