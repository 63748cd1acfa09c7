//! Split a wide table into column groups.
//!
//! ```text
//! days | m_1 | m_2 | f_1 | f_2          days | m_1 | m_2      days | f_1 | f_2
//! -----+-----+-----+-----+-----   →    -----+-----+-----  +  -----+-----+-----
//!    1 |   3 |   4 |   2 |   5             1 |   3 |   4          1 |   2 |   5
//! ```

use serde::Serialize;

use crate::error::{ReshapeError, ReshapeResult};
use crate::models::WideTable;

/// Resolved column indices of one group, identifiers included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSelection {
    pub name: String,
    pub indices: Vec<usize>,
}

impl GroupSelection {
    pub fn new(name: impl Into<String>, indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            indices,
        }
    }
}

/// Split `table` into one table per selection.
///
/// Each selection must keep every identifier column of the table, stay
/// in range, not repeat a column, and not share a measurement column
/// with another selection. Row order is preserved.
pub fn split(table: &WideTable, selections: &[GroupSelection]) -> ReshapeResult<Vec<WideTable>> {
    validate_selections(table, selections)?;

    Ok(selections
        .iter()
        .map(|selection| table.project(&selection.indices))
        .collect())
}

fn validate_selections(table: &WideTable, selections: &[GroupSelection]) -> ReshapeResult<()> {
    let width = table.column_count();
    let mut claimed: Vec<Option<&str>> = vec![None; width];

    for selection in selections {
        let group = selection.name.as_str();
        let mut seen = vec![false; width];

        for &idx in &selection.indices {
            if idx >= width {
                return Err(ReshapeError::invalid_selection(
                    group,
                    format!("column index {} out of range ({} columns)", idx, width),
                ));
            }
            if seen[idx] {
                return Err(ReshapeError::invalid_selection(
                    group,
                    format!("column '{}' selected twice", table.columns()[idx]),
                ));
            }
            seen[idx] = true;
        }

        for id in table.identifiers() {
            let kept = table.column_index(id).is_some_and(|i| seen[i]);
            if !kept {
                return Err(ReshapeError::invalid_selection(
                    group,
                    format!("identifier column '{}' is not selected", id),
                ));
            }
        }

        for &idx in &selection.indices {
            let name = &table.columns()[idx];
            if table.is_identifier(name) {
                continue;
            }
            match claimed[idx] {
                Some(other) => {
                    return Err(ReshapeError::invalid_selection(
                        group,
                        format!("column '{}' already belongs to group '{}'", name, other),
                    ));
                }
                None => claimed[idx] = Some(group),
            }
        }
    }

    Ok(())
}
