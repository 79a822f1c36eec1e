//! `captable-parse`: shareholder-register file parsing.
//!
//! Pure parsing crate: receives file bytes, returns a language-independent
//! company snapshot. No storage or CLI dependencies.

pub mod cell;
pub mod error;
pub mod model;
pub mod normalize;
pub mod register;
pub mod table;
pub mod vocab;

pub use cell::Cell;
pub use error::ParseError;
pub use model::{ClassHolding, ParsedCompany, ParsedShareClass, ParsedShareholder};
pub use normalize::EntityType;
pub use register::parse_register;
pub use table::Table;
pub use vocab::Vocabulary;

/// Parse raw file bytes (xlsx, xls or CSV) into a [`ParsedCompany`].
pub fn parse_bytes(bytes: &[u8], vocab: &Vocabulary) -> Result<ParsedCompany, ParseError> {
    let table = Table::from_bytes(bytes)?;
    parse_register(&table, vocab)
}
