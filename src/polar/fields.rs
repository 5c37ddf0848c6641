//! Table-driven extraction of scalar metadata from the polar header.
//!
//! The solver prints a free-text block above the column header, e.g.
//!
//! ```text
//!  xtrf =   1.000 (top)        1.000 (bottom)
//!  Mach =   0.600     Re =     2.000 e 6     Ncrit =   9.000
//! ```
//!
//! The block is joined and stripped of all whitespace before matching, so
//! the rules below see `xtrf=1.000(top)1.000(bottom)Mach=0.600Re=2.000e6...`.
//! The exact labels drift between solver versions, which is why the rules are
//! plain data carried by [`SolverConfig`](crate::config::SolverConfig).

use std::collections::BTreeMap;

use regex::Regex;

use crate::{Error, Result};

/// One named scalar field and how to find it.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    label: String,
    pattern: Regex,
    required: bool,
}

impl FieldRule {
    /// Create an optional rule.
    ///
    /// `label` is the literal text whose presence means the field was printed;
    /// `pattern` must have one capture group holding the number.
    pub fn new(name: impl Into<String>, label: impl Into<String>, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            Error::InvalidConfig(format!("invalid field pattern {pattern:?}: {e}"))
        })?;
        if pattern.captures_len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "field pattern {:?} needs a capture group",
                pattern.as_str()
            )));
        }
        Ok(Self {
            name: name.into(),
            label: label.into(),
            pattern,
            required: false,
        })
    }

    /// Mark the field as required: its absence becomes a parse error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Field name used as the metadata key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Apply this rule to a whitespace-free metadata block.
    ///
    /// Returns `Ok(None)` when the label is absent and the field is optional.
    fn extract(&self, block: &str) -> Result<Option<f64>> {
        if !block.contains(self.label.as_str()) {
            if self.required {
                return Err(Error::parse(
                    format!("required field {} not found", self.name),
                    Some(block),
                ));
            }
            return Ok(None);
        }

        let raw = self
            .pattern
            .captures(block)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                Error::parse(
                    format!("field {} is present but has no numeric value", self.name),
                    Some(block),
                )
            })?;

        raw.parse::<f64>().map(Some).map_err(|e| {
            Error::parse(
                format!("field {} value {raw:?} is not a number: {e}", self.name),
                Some(block),
            )
        })
    }
}

/// Rules matching the XFOIL 6.9x `PLIS` header.
pub fn default_rules() -> Vec<FieldRule> {
    const NUM: &str = r"(\d+\.\d+)";
    let table = [
        ("xtrf_top", "xtrf=", format!("xtrf={NUM}")),
        ("xtrf_bottom", "(bottom)", format!(r"\(top\){NUM}\(bottom\)")),
        ("Mach", "Mach=", format!("Mach={NUM}")),
        ("Ncrit", "Ncrit=", format!("Ncrit={NUM}")),
        ("Re", "Re=", r"Re=(\d+\.\d+e\d+)".to_string()),
    ];

    table
        .iter()
        .filter_map(|(name, label, pattern)| FieldRule::new(*name, *label, pattern).ok())
        .collect()
}

/// Run every rule once over the metadata lines.
pub fn extract_fields(rules: &[FieldRule], lines: &[&str]) -> Result<BTreeMap<String, f64>> {
    let block: String = lines
        .iter()
        .flat_map(|line| line.chars())
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut metadata = BTreeMap::new();
    for rule in rules {
        if let Some(value) = rule.extract(&block)? {
            metadata.insert(rule.name.clone(), value);
        }
    }
    Ok(metadata)
}
