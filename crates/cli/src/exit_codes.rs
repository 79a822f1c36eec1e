//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 2    | Usage error (bad arguments, unknown subcommand)  |
//! | 3    | Parse or validation failure                      |
//! | 4    | Database failure                                 |
//! | 5    | I/O failure                                      |
//!
//! Conflicts found during a committed import are data, not failure: the
//! import still exits 0 and the conflicts ride along in the output.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// The file could not be parsed as a register, or failed validation
/// (for example: no company registration number, unknown company).
pub const EXIT_PARSE: u8 = 3;

/// SQLite failure; the import transaction rolled back.
pub const EXIT_DATABASE: u8 = 4;

/// Filesystem failure reading the input or creating the database path.
pub const EXIT_IO: u8 = 5;
