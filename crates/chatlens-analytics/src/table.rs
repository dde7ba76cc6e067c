//! The tabular output of an aggregation.

use chatlens_core::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row of cells, positionally matching the table's columns.
pub type Row = Vec<u64>;

/// Ordered (label, row) pairs under a shared column schema. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Row>,
}

/// Wire form of a table, checked by [`Table::assemble`] on the way in.
#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Row>,
}

impl TryFrom<RawTable> for Table {
    type Error = AnalyticsError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::assemble(raw.index, raw.rows, raw.columns)
    }
}

impl Table {
    /// Combine row labels and rows, in the same order, under `columns`.
    pub fn assemble(index: Vec<String>, rows: Vec<Row>, columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(AnalyticsError::DuplicateColumn(column.clone()));
            }
        }

        if index.len() != rows.len() {
            return Err(AnalyticsError::Shape(format!(
                "{} row labels for {} rows",
                index.len(),
                rows.len()
            )));
        }

        if let Some((label, row)) = index
            .iter()
            .zip(&rows)
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(AnalyticsError::Shape(format!(
                "row '{}' has {} cells, expected {}",
                label,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Build from parts already known to be consistent.
    pub(crate) fn from_parts(columns: Vec<String>, index: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert_eq!(index.len(), rows.len());
        Self {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels, in row order.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row with the given label.
    pub fn row(&self, label: &str) -> Option<&[u64]> {
        self.index
            .iter()
            .position(|l| l == label)
            .map(|i| self.rows[i].as_slice())
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<u64>> {
        let col = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[col]).collect())
    }

    pub fn cell(&self, label: &str, column: &str) -> Option<u64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.row(label).map(|r| r[col])
    }

    /// Sum of one column.
    pub fn column_total(&self, name: &str) -> Option<u64> {
        self.column(name).map(|cells| cells.iter().sum())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assemble_keeps_order() {
        let table = Table::assemble(
            cols(&["March 2021", "January 2021"]),
            vec![vec![1, 2], vec![3, 4]],
            cols(&["Qty_char_net", "Qty_messages"]),
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.index()[0], "March 2021");
        assert_eq!(table.row("January 2021"), Some(&[3, 4][..]));
        assert_eq!(table.column("Qty_messages"), Some(vec![2, 4]));
        assert_eq!(table.cell("March 2021", "Qty_char_net"), Some(1));
        assert_eq!(table.column_total("Qty_char_net"), Some(4));
        assert_eq!(table.cell("March 2021", "Qty_char_emoji"), None);
        let labels: Vec<&str> = table.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["March 2021", "January 2021"]);
    }

    #[test]
    fn test_assemble_rejects_duplicate_columns() {
        let err = Table::assemble(
            cols(&["a"]),
            vec![vec![1, 1]],
            cols(&["Qty_messages", "Qty_messages"]),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::DuplicateColumn(_)));
    }

    #[test]
    fn test_assemble_rejects_shape_mismatch() {
        let short_row = Table::assemble(cols(&["a", "b"]), vec![vec![1], vec![]], cols(&["x"]));
        assert!(matches!(short_row, Err(AnalyticsError::Shape(_))));

        let missing_row = Table::assemble(cols(&["a", "b"]), vec![vec![1]], cols(&["x"]));
        assert!(matches!(missing_row, Err(AnalyticsError::Shape(_))));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::assemble(Vec::new(), Vec::new(), cols(&["Qty_messages"])).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column("Qty_messages"), Some(vec![]));
    }

    #[test]
    fn test_serializes_for_rendering() {
        let table = Table::assemble(cols(&["Monday"]), vec![vec![7]], cols(&["Qty_messages"])).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["columns"][0], "Qty_messages");
        assert_eq!(json["index"][0], "Monday");
        assert_eq!(json["rows"][0][0], 7);

        let back: Table = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let ragged = serde_json::from_str::<Table>(
            r#"{"columns":["a","b"],"index":["x"],"rows":[[1]]}"#,
        );
        assert!(ragged.is_err());

        let duplicated = serde_json::from_str::<Table>(
            r#"{"columns":["a","a"],"index":["x"],"rows":[[1,2]]}"#,
        );
        assert!(duplicated.is_err());
    }
}
