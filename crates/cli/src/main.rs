// captable CLI - shareholder register import and reconciliation
// Human summaries go to stderr; stdout carries JSON when --json is set,
// so output can be piped without scraping.

mod config;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use captable_parse::{ParseError, Vocabulary};
use captable_recon::ImportDiff;
use captable_store::{Connection, StoreError};

use config::{Config, ConfigError};
use exit_codes::{EXIT_DATABASE, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "captable")]
#[command(about = "Shareholder register import, diffing and history")]
#[command(version)]
struct Cli {
    /// Database file (default: <user data dir>/captable/captable.db)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<String>,

    /// TOML config file (database path, vocabulary extensions)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a register file and diff it against the stored state
    #[command(after_help = "\
Examples:
  captable preview register.xlsx
  captable preview register.csv --json | jq .diff.summary")]
    Preview {
        /// Register file (xlsx, xls, ods or CSV)
        file: PathBuf,

        /// JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,
    },

    /// Commit a register file to the database
    #[command(after_help = "\
Examples:
  captable import register.xlsx
  captable import register.csv --db ./holdings.db --json")]
    Import {
        /// Register file (xlsx, xls, ods or CSV)
        file: PathBuf,

        /// JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,
    },

    /// Parse a register file and print the result; no database involved
    #[command(after_help = "\
Examples:
  captable parse register.xlsx
  captable parse register.csv --json | jq .shareholders")]
    Parse {
        /// Register file (xlsx, xls, ods or CSV)
        file: PathBuf,

        /// JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,
    },

    /// List import history for a company
    #[command(after_help = "\
Examples:
  captable batches 910000001
  captable batches 910000001 --json")]
    Batches {
        /// Company registration number
        org_number: String,

        /// JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders help/version on stdout and usage errors on stderr
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {message}");
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(CliError::from)?,
        None => Config::default(),
    };
    let vocab = config.vocabulary();

    match cli.command {
        Commands::Preview { file, json } => {
            let conn = open_db(resolve_db_path(cli.db.as_deref(), &config)?)?;
            cmd_preview(&conn, &vocab, &file, json)
        }
        Commands::Import { file, json } => {
            let mut conn = open_db(resolve_db_path(cli.db.as_deref(), &config)?)?;
            cmd_import(&mut conn, &vocab, &file, json)
        }
        Commands::Parse { file, json } => cmd_parse(&vocab, &file, json),
        Commands::Batches { org_number, json } => {
            let conn = open_db(resolve_db_path(cli.db.as_deref(), &config)?)?;
            cmd_batches(&conn, &org_number, json)
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_preview(
    conn: &Connection,
    vocab: &Vocabulary,
    file: &Path,
    json: bool,
) -> Result<(), CliError> {
    let bytes = read_file(file)?;
    let preview = captable_store::preview_import(conn, vocab, &bytes)?;
    if json {
        println!("{}", to_json(&preview)?);
    } else {
        print_diff(&preview.diff);
    }
    Ok(())
}

fn cmd_import(
    conn: &mut Connection,
    vocab: &Vocabulary,
    file: &Path,
    json: bool,
) -> Result<(), CliError> {
    let bytes = read_file(file)?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let result = captable_store::import_file(conn, vocab, &bytes, &filename)?;

    if json {
        println!("{}", to_json(&result)?);
    } else {
        eprintln!("Imported {} ({})", result.company_name, result.company_org_number);
        eprintln!(
            "  {} shareholder(s), {} holding(s), batch {}",
            result.shareholders_imported, result.holdings_created, result.batch_id
        );
        if !result.conflicts.is_empty() {
            eprintln!("  {} conflict(s) for review:", result.conflicts.len());
            for c in &result.conflicts {
                eprintln!("    {:<18} {:<30} {}", c.kind.to_string(), c.shareholder_name, c.detail);
            }
        }
    }
    // Conflicts are review data; a committed import exits 0.
    Ok(())
}

fn cmd_parse(vocab: &Vocabulary, file: &Path, json: bool) -> Result<(), CliError> {
    let bytes = read_file(file)?;
    let parsed = captable_parse::parse_bytes(&bytes, vocab)?;
    if json {
        println!("{}", to_json(&parsed)?);
    } else {
        match &parsed.org_number {
            Some(org) => eprintln!("{} ({org})", parsed.name),
            None => eprintln!("{} (no registration number)", parsed.name),
        }
        eprintln!(
            "  {} share class(es), {} shareholder(s)",
            parsed.share_classes.len(),
            parsed.shareholders.len()
        );
        for sh in &parsed.shareholders {
            eprintln!("  {:<40} {:>12}", sh.name, sh.effective_shares());
        }
    }
    Ok(())
}

fn cmd_batches(conn: &Connection, org_number: &str, json: bool) -> Result<(), CliError> {
    let batches = captable_store::list_batches(conn, org_number)?;
    if json {
        println!("{}", to_json(&batches)?);
    } else if batches.is_empty() {
        eprintln!("No imports recorded for {org_number}.");
    } else {
        for b in &batches {
            eprintln!(
                "{}  {:<28} {:>4} record(s)  {:>2} conflict(s)  {}",
                b.imported_at, b.filename, b.records_imported, b.conflicts_found, b.id
            );
        }
    }
    Ok(())
}

fn print_diff(diff: &ImportDiff) {
    match &diff.company_org_number {
        Some(org) => eprintln!("{} ({org})", diff.company_name),
        None => eprintln!("{}", diff.company_name),
    }
    if diff.is_first_import {
        eprintln!("First import of this company: every row below is new.");
    }

    for c in &diff.share_class_changes {
        if c.kind != captable_recon::ClassChangeKind::Unchanged {
            eprintln!("  class {:<9} {}", c.kind.to_string(), c.name);
        }
    }
    for c in &diff.changes {
        if c.kind != captable_recon::ChangeKind::Unchanged {
            eprintln!(
                "  {:<13} {:<36} {:>10} -> {}",
                c.kind.to_string(),
                c.name,
                c.total_shares_before,
                c.total_shares_after
            );
        }
    }

    let s = &diff.summary;
    eprintln!(
        "Summary: {} new, {} exited, {} increased, {} decreased, {} class-changed, {} unchanged",
        s.new, s.exited, s.increased, s.decreased, s.class_changed, s.unchanged
    );
    if s.classes_added + s.classes_removed + s.classes_changed > 0 {
        eprintln!(
            "Classes: {} added, {} removed, {} changed",
            s.classes_added, s.classes_removed, s.classes_changed
        );
    }
}

// ---------------------------------------------------------------------------
// Plumbing
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        let code = match &e {
            StoreError::Parse(_)
            | StoreError::MissingOrgNumber { .. }
            | StoreError::CompanyNotFound { .. } => EXIT_PARSE,
            StoreError::Database(_) | StoreError::Snapshot(_) => EXIT_DATABASE,
        };
        let hint = match &e {
            StoreError::MissingOrgNumber { .. } => {
                Some("the sheet needs a 'COMPANY NAME (ORG NUMBER)' cell above the table".into())
            }
            _ => None,
        };
        CliError { code, message: e.to_string(), hint }
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError { code: EXIT_PARSE, message: e.to_string(), hint: None }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Read(message) => CliError { code: EXIT_IO, message, hint: None },
            ConfigError::Parse(message) => CliError { code: EXIT_PARSE, message, hint: None },
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot serialize output: {e}"),
        hint: None,
    })
}

fn resolve_db_path(flag: Option<&str>, config: &Config) -> Result<PathBuf, CliError> {
    if let Some(p) = flag {
        return Ok(expand_path(p));
    }
    if let Some(p) = config.database.path.as_deref() {
        return Ok(expand_path(p));
    }
    dirs::data_dir()
        .map(|d| d.join("captable").join("captable.db"))
        .ok_or_else(|| CliError {
            code: EXIT_IO,
            message: "cannot determine the user data directory".into(),
            hint: Some("pass --db PATH or set [database].path in the config".into()),
        })
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).into_owned())
}

fn open_db(path: PathBuf) -> Result<Connection, CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| CliError {
                code: EXIT_IO,
                message: format!("cannot create {}: {e}", parent.display()),
                hint: None,
            })?;
        }
    }
    Ok(captable_store::open(&path)?)
}
