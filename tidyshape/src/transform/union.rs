//! Row-wise union of long tables sharing one schema.

use crate::error::{ReshapeError, ReshapeResult};
use crate::models::{CombinedLongTable, LongTable};

/// Concatenate `tables` in order.
///
/// Rows keep their order inside each table and the tables keep their
/// input order. No sorting, deduplication or coercion happens. Every
/// table must have the schema of the first one.
pub fn union<I>(tables: I) -> ReshapeResult<CombinedLongTable>
where
    I: IntoIterator<Item = LongTable>,
{
    let mut tables = tables.into_iter();
    let first = tables.next().ok_or(ReshapeError::EmptyUnion)?;
    let schema = first.schema().clone();
    let mut rows = first.into_rows();

    for table in tables {
        if table.schema() != &schema {
            return Err(ReshapeError::SchemaMismatch {
                expected: schema.to_string(),
                found: table.schema().to_string(),
            });
        }
        rows.extend(table.into_rows());
    }

    Ok(LongTable::from_parts_unchecked(schema, rows))
}
