//! Unpivot (melt) a wide table into long format.
//!
//! ```text
//! day | A  | B            day | label | value
//! ----+----+----    →     ----+-------+------
//!   1 | 10 | 20             1 | A     | 10
//!                           1 | B     | 20
//! ```
//!
//! Output rows are grouped by source row, then follow source column
//! order within the row.

use crate::error::{ReshapeError, ReshapeResult};
use crate::models::{LongRow, LongSchema, LongTable, WideTable};

/// Unpivot every non-identifier column of `table`.
///
/// Produces `rows × measurement columns` rows with columns
/// `(identifier_names…, label_name, value_name)`.
///
/// # Example
/// ```
/// use tidyshape::models::{CellValue, WideTable};
/// use tidyshape::transform::unpivot;
///
/// let table = WideTable::new(
///     vec!["day".into(), "A".into(), "B".into()],
///     vec![vec![CellValue::Integer(1), CellValue::Integer(10), CellValue::Integer(20)]],
/// ).unwrap();
///
/// let long = unpivot(&table, &["day"], "label", "value").unwrap();
/// assert_eq!(long.len(), 2);
/// assert_eq!(long.rows()[1].label, "B");
/// ```
pub fn unpivot<S: AsRef<str>>(
    table: &WideTable,
    identifier_names: &[S],
    label_name: &str,
    value_name: &str,
) -> ReshapeResult<LongTable> {
    let id_indices = identifier_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            table
                .column_index(name)
                .ok_or_else(|| ReshapeError::MissingIdentifier(name.to_string()))
        })
        .collect::<ReshapeResult<Vec<usize>>>()?;

    let identifiers: Vec<String> = identifier_names
        .iter()
        .map(|name| name.as_ref().to_string())
        .collect();
    check_output_names(&identifiers, label_name, value_name)?;

    let measurements: Vec<(usize, &str)> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| !id_indices.contains(i))
        .map(|(i, name)| (i, name.as_str()))
        .collect();

    let mut rows = Vec::with_capacity(table.row_count() * measurements.len());
    for source in table.rows() {
        let ids: Vec<_> = id_indices.iter().map(|&i| source[i].clone()).collect();
        for &(col, label) in &measurements {
            rows.push(LongRow::new(ids.clone(), label, source[col].clone()));
        }
    }

    let schema = LongSchema::new(identifiers, label_name, value_name);
    Ok(LongTable::from_parts_unchecked(schema, rows))
}

/// Unpivot using the identifiers designated on the table itself.
pub fn unpivot_designated(
    table: &WideTable,
    label_name: &str,
    value_name: &str,
) -> ReshapeResult<LongTable> {
    unpivot(table, table.identifiers(), label_name, value_name)
}

fn check_output_names(identifiers: &[String], label: &str, value: &str) -> ReshapeResult<()> {
    for (i, id) in identifiers.iter().enumerate() {
        if identifiers[..i].contains(id) {
            return Err(ReshapeError::DuplicateColumn(id.clone()));
        }
    }
    for name in [label, value] {
        if identifiers.iter().any(|id| id == name) {
            return Err(ReshapeError::DuplicateColumn(name.to_string()));
        }
    }
    if label == value {
        return Err(ReshapeError::DuplicateColumn(label.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> WideTable {
        WideTable::new(columns.iter().map(|s| s.to_string()).collect(), rows).unwrap()
    }

    fn int(i: i64) -> CellValue {
        CellValue::Integer(i)
    }

    #[test]
    fn test_single_row_example() {
        let wide = table(&["day", "A", "B"], vec![vec![int(1), int(10), int(20)]]);
        let long = unpivot(&wide, &["day"], "label", "value").unwrap();

        assert_eq!(
            long.rows(),
            [
                LongRow::new(vec![int(1)], "A", int(10)),
                LongRow::new(vec![int(1)], "B", int(20)),
            ]
        );
        assert_eq!(long.schema().column_names(), ["day", "label", "value"]);
    }

    #[test]
    fn test_row_count_is_rows_times_measurements() {
        let wide = table(
            &["year", "artist", "wk1", "wk2", "wk3"],
            vec![
                vec![int(2000), "2 Pac".into(), int(87), int(82), int(72)],
                vec![int(2000), "2Ge+her".into(), int(91), int(87), int(92)],
            ],
        );
        let long = unpivot(&wide, &["year", "artist"], "week", "rank").unwrap();

        assert_eq!(long.len(), 2 * 3);
        assert_eq!(long.rows()[3].identifiers, vec![int(2000), "2Ge+her".into()]);
        assert_eq!(long.rows()[3].label, "wk1");
    }

    #[test]
    fn test_row_major_order_follows_source_columns() {
        let wide = table(
            &["B", "day", "A"],
            vec![vec![int(1), int(7), int(2)], vec![int(3), int(8), int(4)]],
        );
        let long = unpivot(&wide, &["day"], "label", "value").unwrap();
        let labels: Vec<&str> = long.rows().iter().map(|r| r.label.as_str()).collect();

        assert_eq!(labels, ["B", "A", "B", "A"]);
        assert_eq!(long.rows()[2].identifiers, vec![int(8)]);
    }

    #[test]
    fn test_no_measurement_columns() {
        let wide = table(&["day"], vec![vec![int(1)], vec![int(2)]]);
        let long = unpivot(&wide, &["day"], "label", "value").unwrap();
        assert!(long.is_empty());
    }

    #[test]
    fn test_missing_values_are_kept() {
        let wide = table(&["day", "A"], vec![vec![int(1), CellValue::Missing]]);
        let long = unpivot(&wide, &["day"], "label", "value").unwrap();
        assert_eq!(long.rows()[0].value, CellValue::Missing);
    }

    #[test]
    fn test_missing_identifier() {
        let wide = table(&["day", "A"], vec![]);
        let err = unpivot(&wide, &["Day"], "label", "value").unwrap_err();
        assert_eq!(err, ReshapeError::MissingIdentifier("Day".into()));
    }

    #[test]
    fn test_output_name_collisions() {
        let wide = table(&["day", "A"], vec![]);
        assert_eq!(
            unpivot(&wide, &["day"], "day", "value").unwrap_err(),
            ReshapeError::DuplicateColumn("day".into())
        );
        assert_eq!(
            unpivot(&wide, &["day"], "x", "x").unwrap_err(),
            ReshapeError::DuplicateColumn("x".into())
        );
    }

    #[test]
    fn test_unpivot_designated() {
        let wide = table(&["day", "A"], vec![vec![int(1), int(2)]])
            .with_identifiers(&["day"])
            .unwrap();
        let long = unpivot_designated(&wide, "label", "value").unwrap();
        assert_eq!(long.schema().identifiers, ["day"]);
        assert_eq!(long.len(), 1);
    }
}
