//! Parsing of the solver's polar listing.
//!
//! The solver answers a `PLIS` command with a free-text header, a column
//! header line, a dashed divider and one whitespace-delimited row per
//! converged operating point. This module turns the captured lines into a
//! [`PolarResult`]:
//!
//! - [`PolarParser`] locates the divider, the header and the rows
//! - [`FieldRule`] describes one named scalar in the free-text header
//! - [`PolarResult`] holds metadata, column labels and the numeric table

pub mod fields;
pub mod parser;
pub mod result;

pub use fields::{default_rules, extract_fields, FieldRule};
pub use parser::{parse_polar, PolarParser, DEFAULT_FOOTER_LINES};
pub use result::PolarResult;
