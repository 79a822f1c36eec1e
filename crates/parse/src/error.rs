use std::fmt;

#[derive(Debug)]
pub enum ParseError {
    /// The byte buffer could not be read as a workbook or CSV.
    UnreadableFile(String),
    /// The sheet holds no non-empty cells at all.
    EmptySheet,
    /// No row qualified as the column header. Carries the first-column
    /// values that were scanned, so the operator can see what the file
    /// actually contains.
    NoHeaderRow { scanned: Vec<String> },
    /// Header found but every data row was empty or a footer.
    NoShareholderRows,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableFile(msg) => write!(f, "unreadable file: {msg}"),
            Self::EmptySheet => write!(f, "sheet contains no data"),
            Self::NoHeaderRow { scanned } => {
                write!(
                    f,
                    "no header row found (need a name column plus at least one other known column); first-column values scanned: {}",
                    scanned
                        .iter()
                        .map(|s| format!("'{s}'"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Self::NoShareholderRows => write!(f, "no shareholder rows found below the header"),
        }
    }
}

impl std::error::Error for ParseError {}
