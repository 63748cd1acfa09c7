//! Table models shared by the loader, the reshaper and the exporters.
//!
//! - [`CellValue`] - Tagged cell content (integer, float, text, missing)
//! - [`WideTable`] - One row per entity, one column per measured category
//! - [`LongTable`] - One row per (entity, category) pair
//! - [`LongSchema`] - Column names of a long table

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReshapeError, ReshapeResult};

// =============================================================================
// Cell Values
// =============================================================================

/// Content of one table cell.
///
/// Serialized untagged, so JSON output carries plain numbers, strings
/// and `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
}

/// Spellings read as a missing cell.
const MISSING_MARKERS: [&str; 5] = ["", "na", "n/a", "nan", "null"];

impl CellValue {
    /// Infer a typed value from raw text.
    ///
    /// Surrounding whitespace is ignored. Missing markers win over
    /// numbers, so `"NaN"` is `Missing` and not a float.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
            return CellValue::Missing;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => CellValue::Float(f),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            // Keep a whole float distinguishable from an integer
            CellValue::Float(x) if x.fract() == 0.0 => write!(f, "{:.1}", x),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => Ok(()),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

// =============================================================================
// Wide Table
// =============================================================================

/// A row-oriented table in wide format.
///
/// Every row holds exactly one cell per column. The identifier columns
/// are a subset of the columns; all others are measurement columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideTable {
    columns: Vec<String>,
    identifiers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl WideTable {
    /// Build a table without identifier columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> ReshapeResult<Self> {
        if let Some(dup) = first_duplicate(&columns) {
            return Err(ReshapeError::DuplicateColumn(dup.to_string()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ReshapeError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            columns,
            identifiers: Vec::new(),
            rows,
        })
    }

    /// Designate identifier columns. Every name must be a column.
    pub fn with_identifiers<S: AsRef<str>>(mut self, identifiers: &[S]) -> ReshapeResult<Self> {
        let mut ids = Vec::with_capacity(identifiers.len());
        for name in identifiers {
            let name = name.as_ref();
            if self.column_index(name).is_none() {
                return Err(ReshapeError::MissingIdentifier(name.to_string()));
            }
            if !ids.iter().any(|id| id == name) {
                ids.push(name.to_string());
            }
        }
        self.identifiers = ids;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifiers.iter().any(|id| id == name)
    }

    /// Indices of the columns that are not identifiers, in column order.
    pub fn measurement_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.is_identifier(name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Keep only the given columns, in the given order.
    ///
    /// Callers validate the indices beforehand.
    pub(crate) fn project(&self, indices: &[usize]) -> Self {
        let columns: Vec<String> = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let identifiers = self
            .identifiers
            .iter()
            .filter(|id| columns.contains(id))
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Self {
            columns,
            identifiers,
            rows,
        }
    }
}

// =============================================================================
// Long Table
// =============================================================================

/// Column names of a long table: identifiers, then label, then value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongSchema {
    pub identifiers: Vec<String>,
    pub label: String,
    pub value: String,
}

impl LongSchema {
    pub fn new(identifiers: Vec<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            identifiers,
            label: label.into(),
            value: value.into(),
        }
    }

    /// All column names in output order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.identifiers.clone();
        names.push(self.label.clone());
        names.push(self.value.clone());
        names
    }
}

impl fmt::Display for LongSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_names().join(", "))
    }
}

/// One long-format row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub identifiers: Vec<CellValue>,
    pub label: String,
    pub value: CellValue,
}

impl LongRow {
    pub fn new(identifiers: Vec<CellValue>, label: impl Into<String>, value: CellValue) -> Self {
        Self {
            identifiers,
            label: label.into(),
            value,
        }
    }
}

/// A table in long (tidy) format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongTable {
    schema: LongSchema,
    rows: Vec<LongRow>,
}

/// Output of a union: same shape as any long table.
pub type CombinedLongTable = LongTable;

impl LongTable {
    /// An empty table with the given schema.
    pub fn empty(schema: LongSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Build from rows, checking each row against the identifier arity.
    pub fn from_rows(schema: LongSchema, rows: Vec<LongRow>) -> ReshapeResult<Self> {
        let expected = schema.identifiers.len();
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.identifiers.len() != expected)
        {
            return Err(ReshapeError::RaggedRow {
                row: i,
                expected: expected + 2,
                found: row.identifiers.len() + 2,
            });
        }
        Ok(Self { schema, rows })
    }

    pub(crate) fn from_parts_unchecked(schema: LongSchema, rows: Vec<LongRow>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &LongSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn into_rows(self) -> Vec<LongRow> {
        self.rows
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(name))
        .map(|(_, name)| name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_infer_cell_values() {
        assert_eq!(CellValue::infer("42"), CellValue::Integer(42));
        assert_eq!(CellValue::infer(" -7 "), CellValue::Integer(-7));
        assert_eq!(CellValue::infer("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::infer("wk1"), CellValue::Text("wk1".into()));
        assert_eq!(CellValue::infer(""), CellValue::Missing);
        assert_eq!(CellValue::infer("NaN"), CellValue::Missing);
        assert_eq!(CellValue::infer("NA"), CellValue::Missing);
        assert_eq!(CellValue::infer("inf"), CellValue::Text("inf".into()));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Integer(3).to_string(), "3");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Float(2.0).to_string(), "2.0");
        assert_eq!(CellValue::Float(-40.0).to_string(), "-40.0");
        assert_eq!(CellValue::infer(&CellValue::Float(2.0).to_string()), CellValue::Float(2.0));
        assert_eq!(CellValue::Text("Kenya".into()).to_string(), "Kenya");
        assert_eq!(CellValue::Missing.to_string(), "");
    }

    #[test]
    fn test_cell_json_is_untagged() {
        let cells = vec![
            CellValue::Integer(1),
            CellValue::Float(0.5),
            CellValue::Text("x".into()),
            CellValue::Missing,
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[1,0.5,"x",null]"#);
    }

    #[test]
    fn test_wide_table_rejects_ragged_rows() {
        let result = WideTable::new(
            cols(&["day", "A"]),
            vec![vec![CellValue::Integer(1)]],
        );
        assert_eq!(
            result.unwrap_err(),
            ReshapeError::RaggedRow { row: 0, expected: 2, found: 1 }
        );
    }

    #[test]
    fn test_wide_table_rejects_duplicate_columns() {
        let result = WideTable::new(cols(&["day", "A", "A"]), vec![]);
        assert_eq!(result.unwrap_err(), ReshapeError::DuplicateColumn("A".into()));
    }

    #[test]
    fn test_identifiers_must_exist() {
        let table = WideTable::new(cols(&["day", "A"]), vec![]).unwrap();
        let err = table.with_identifiers(&["week"]).unwrap_err();
        assert_eq!(err, ReshapeError::MissingIdentifier("week".into()));
    }

    #[test]
    fn test_measurement_indices_skip_identifiers() {
        let table = WideTable::new(cols(&["A", "day", "B"]), vec![])
            .unwrap()
            .with_identifiers(&["day"])
            .unwrap();
        assert_eq!(table.measurement_indices(), vec![0, 2]);
    }

    #[test]
    fn test_long_table_checks_arity() {
        let schema = LongSchema::new(cols(&["day"]), "label", "value");
        let rows = vec![LongRow::new(vec![], "A", CellValue::Integer(1))];
        assert!(LongTable::from_rows(schema, rows).is_err());
    }
}
