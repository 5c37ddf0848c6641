//! Structured polar returned by a query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aerodynamic coefficients for one or more operating points.
///
/// Every row in `table` has exactly `columns.len()` values. An empty table
/// means the solver converged on no operating point; a listing that could not
/// be recognized is reported as [`Error::Parse`](crate::Error::Parse) instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarResult {
    /// Named scalar fields from the listing header (`Re`, `Mach`, `Ncrit`, ...).
    pub metadata: BTreeMap<String, f64>,
    /// Column labels, e.g. `alpha`, `CL`, `CD`.
    pub columns: Vec<String>,
    /// Rows of values aligned to `columns`.
    pub table: Vec<Vec<f64>>,
}

impl PolarResult {
    /// Number of converged operating points.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no operating point converged.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Position of a column by label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of a column, in row order.
    ///
    /// Returns `None` for an unknown column or when a row is too short.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.column_index(name)?;
        self.table.iter().map(|row| row.get(index).copied()).collect()
    }

    /// Value of a column in the first row.
    ///
    /// This is the usual score lookup for single-point queries, e.g.
    /// `polar.first("CD")`. Returns `None` when nothing converged or the
    /// column does not exist.
    pub fn first(&self, name: &str) -> Option<f64> {
        let index = self.column_index(name)?;
        self.table.first().and_then(|row| row.get(index).copied())
    }

    /// A named metadata field.
    pub fn meta(&self, name: &str) -> Option<f64> {
        self.metadata.get(name).copied()
    }

    /// Iterate rows as `(column, value)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = Vec<(&str, f64)>> + '_ {
        self.table.iter().map(move |row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter().copied())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PolarResult {
        PolarResult {
            metadata: BTreeMap::from([("Re".to_string(), 2.0e6)]),
            columns: vec!["alpha".into(), "CL".into(), "CD".into()],
            table: vec![vec![0.0, 0.2446, 0.00683], vec![1.0, 0.3551, 0.00702]],
        }
    }

    #[test]
    fn column_lookup() {
        let polar = sample();
        assert_eq!(polar.len(), 2);
        assert_eq!(polar.column_index("CD"), Some(2));
        assert_eq!(polar.column("alpha"), Some(vec![0.0, 1.0]));
        assert_eq!(polar.column("CM"), None);
    }

    #[test]
    fn first_value() {
        let polar = sample();
        assert_eq!(polar.first("CD"), Some(0.00683));
        assert_eq!(polar.first("Top_Xtr"), None);
    }

    #[test]
    fn empty_polar_has_no_score() {
        let polar = PolarResult {
            columns: vec!["alpha".into(), "CD".into()],
            ..Default::default()
        };
        assert!(polar.is_empty());
        assert_eq!(polar.first("CD"), None);
        assert_eq!(polar.column("CD"), Some(vec![]));
    }

    #[test]
    fn short_rows_from_json_do_not_panic() {
        let polar: PolarResult = serde_json::from_str(
            r#"{"metadata":{},"columns":["alpha","CD"],"table":[[0.0]]}"#,
        )
        .unwrap();
        assert_eq!(polar.first("CD"), None);
        assert_eq!(polar.column("CD"), None);
        assert_eq!(polar.first("alpha"), Some(0.0));
        assert_eq!(polar.column("alpha"), Some(vec![0.0]));
    }

    #[test]
    fn metadata_lookup() {
        let polar = sample();
        assert_eq!(polar.meta("Re"), Some(2.0e6));
        assert_eq!(polar.meta("Mach"), None);
    }

    #[test]
    fn rows_pair_labels() {
        let polar = sample();
        let rows: Vec<_> = polar.rows().collect();
        assert_eq!(rows[1], vec![("alpha", 1.0), ("CL", 0.3551), ("CD", 0.00702)]);
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["columns"][1], "CL");
        assert_eq!(json["table"][0][2], 0.00683);
        assert_eq!(json["metadata"]["Re"], 2.0e6);
    }
}
