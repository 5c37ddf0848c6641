//! Conversion of the captured `PLIS` listing into a [`PolarResult`].

use regex::Regex;

use super::fields::{default_rules, extract_fields, FieldRule};
use super::result::PolarResult;
use crate::{Error, Result};

/// Lines after the last data row: a blank line and the sentinel echo.
pub const DEFAULT_FOOTER_LINES: usize = 2;

/// Parser for the solver's polar listing.
///
/// The listing looks like this (metadata, header, divider, rows, footer):
///
/// ```text
///  xtrf =   1.000 (top)        1.000 (bottom)
///  Mach =   0.000     Re =     2.000 e 6     Ncrit =   9.000
///
///   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
///  ------ -------- --------- --------- -------- -------- --------
///   0.000   0.2446   0.00683   0.00200  -0.0558   0.5488   0.6452
/// ```
#[derive(Debug, Clone)]
pub struct PolarParser {
    rules: Vec<FieldRule>,
    footer_lines: usize,
    divider: Regex,
}

impl PolarParser {
    /// Create a parser with a custom field table and footer length.
    pub fn new(rules: Vec<FieldRule>, footer_lines: usize) -> Self {
        Self {
            rules,
            footer_lines,
            divider: divider_pattern(),
        }
    }

    /// Parse the raw lines captured between the first command and the sentinel.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<PolarResult> {
        let lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();

        let divider = lines
            .iter()
            .rposition(|line| self.divider.is_match(line))
            .ok_or_else(|| Error::parse("no data divider", None))?;

        if divider == 0 {
            return Err(Error::parse(
                "no column header above data divider",
                Some(lines[divider]),
            ));
        }
        let header = lines[divider - 1];
        let columns: Vec<String> = split_fields(header).map(str::to_string).collect();
        if columns.is_empty() {
            return Err(Error::parse("empty column header", Some(header)));
        }

        // Two info lines, then a blank separator, then the header.
        let info = &lines[divider.saturating_sub(4)..divider.saturating_sub(2)];
        let metadata = extract_fields(&self.rules, info)?;

        let end = lines
            .len()
            .saturating_sub(self.footer_lines)
            .max(divider + 1);
        let table = lines[divider + 1..end]
            .iter()
            .map(|line| parse_row(line, columns.len()))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            columns = columns.len(),
            rows = table.len(),
            fields = metadata.len(),
            "parsed polar listing"
        );

        Ok(PolarResult {
            metadata,
            columns,
            table,
        })
    }
}

impl Default for PolarParser {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_FOOTER_LINES)
    }
}

/// Parse a listing with the default field table and footer length.
pub fn parse_polar<S: AsRef<str>>(lines: &[S]) -> Result<PolarResult> {
    PolarParser::default().parse(lines)
}

fn divider_pattern() -> Regex {
    Regex::new(r"^\s*---").expect("divider pattern is valid")
}

/// Split on whitespace runs and drop the leading row-label field.
///
/// The solver indents every header and data line, so the label slot is
/// empty and the first visible token is the first real column.
fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    let line = line.trim_end();
    let skip = usize::from(!line.starts_with(char::is_whitespace));
    line.split_whitespace().skip(skip)
}

fn parse_row(line: &str, width: usize) -> Result<Vec<f64>> {
    let tokens: Vec<&str> = split_fields(line).collect();
    if tokens.len() != width {
        return Err(Error::parse(
            format!("row has {} values, expected {}", tokens.len(), width),
            Some(line),
        ));
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|e| Error::parse(format!("bad value {token:?}: {e}"), Some(line)))
        })
        .collect()
}
