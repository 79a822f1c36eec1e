use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::cell::{excel_serial_to_date, parse_date, Cell};
use crate::error::ParseError;

/// Caps on the scanned area. Registers are small; anything past this is a
/// wrong file, not a big register.
const MAX_ROWS: usize = 65_536;
const MAX_COLS: usize = 256;

/// A rectangular grid of cells decoupled from the source format. The
/// register parser only ever sees this.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Load from an in-memory buffer, sniffing the format from magic bytes:
    /// ZIP (xlsx/ods) and OLE2 (legacy xls) go through the workbook reader,
    /// everything else is treated as delimited text.
    pub fn from_bytes(bytes: &[u8]) -> Result<Table, ParseError> {
        if is_workbook(bytes) {
            Table::from_workbook_bytes(bytes)
        } else {
            Table::from_csv_bytes(bytes)
        }
    }

    /// First worksheet of an xlsx/xlsm/xlsb/xls/ods buffer.
    pub fn from_workbook_bytes(bytes: &[u8]) -> Result<Table, ParseError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ParseError::UnreadableFile(e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ParseError::EmptySheet)?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ParseError::UnreadableFile(e.to_string()))?;

        // Preserve the sheet offset so blank leading rows survive; the
        // parser scans, it does not assume positions, but relative layout
        // must stay intact.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<Cell>> = Vec::new();

        for (row_idx, row) in range.rows().enumerate() {
            let target_row = start_row as usize + row_idx;
            if target_row >= MAX_ROWS {
                break;
            }
            while rows.len() <= target_row {
                rows.push(Vec::new());
            }
            let out = &mut rows[target_row];
            for (col_idx, data) in row.iter().enumerate() {
                let target_col = start_col as usize + col_idx;
                if target_col >= MAX_COLS {
                    break;
                }
                while out.len() <= target_col {
                    out.push(Cell::Empty);
                }
                out[target_col] = convert_cell(data);
            }
        }

        let table = Table { rows };
        if table.is_blank() {
            return Err(ParseError::EmptySheet);
        }
        Ok(table)
    }

    /// Delimited text with sniffed delimiter. Cells load as text; numeric
    /// and date coercion happens per field downstream, same as for
    /// workbooks.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Table, ParseError> {
        let content = decode_text(bytes);
        let delimiter = sniff_delimiter(&content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ParseError::UnreadableFile(e.to_string()))?;
            if rows.len() >= MAX_ROWS {
                break;
            }
            let row: Vec<Cell> = record
                .iter()
                .take(MAX_COLS)
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        let table = Table { rows };
        if table.is_blank() {
            return Err(ParseError::EmptySheet);
        }
        Ok(table)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (row, col), `Empty` when out of range. Rows are ragged.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|r| r.iter().all(|c| c.is_empty()))
    }
}

fn is_workbook(bytes: &[u8]) -> bool {
    // ZIP container (xlsx/xlsm/ods) or OLE2 compound file (xls).
    bytes.starts_with(b"PK\x03\x04")
        || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "true" } else { "false" }.to_string()),
        Data::Error(_) => Cell::Empty,
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(d) => Cell::Date(d),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => {
            let date_part = s.get(..10).unwrap_or(s.as_str());
            match parse_date(date_part) {
                Some(d) => Cell::Date(d),
                None => Cell::Text(s.clone()),
            }
        }
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Decode CSV bytes as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs; keeps æ/ø/å intact).
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines. For each candidate (tab, semicolon, comma, pipe), count
/// fields per line; the delimiter producing the most consistent field count
/// (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Lines agreeing with line 1, weighted by field count so wider
        // splits win ties.
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}
