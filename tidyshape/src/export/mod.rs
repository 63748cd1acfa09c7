//! Write long tables out as CSV or JSON.

use serde_json::{Map, Value};
use std::io::{self, Write};

use crate::models::{CellValue, LongTable};

/// Output format for reshaped tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Write `table` as CSV with a header row.
///
/// The delimiter must be a single-byte (ASCII) character.
pub fn write_csv<W: Write>(table: &LongTable, writer: W, delimiter: char) -> Result<(), csv::Error> {
    if !delimiter.is_ascii() {
        return Err(csv::Error::from(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("delimiter '{}' is not a single-byte character", delimiter),
        )));
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(writer);

    wtr.write_record(table.schema().column_names())?;
    for row in table.rows() {
        let mut record: Vec<String> = row.identifiers.iter().map(CellValue::to_string).collect();
        record.push(row.label.clone());
        record.push(row.value.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render `table` as CSV text.
pub fn to_csv_string(table: &LongTable) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf, ',')?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Convert `table` into an array of JSON objects keyed by column name.
pub fn to_json_records(table: &LongTable) -> Vec<Value> {
    let schema = table.schema();
    table
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for (name, cell) in schema.identifiers.iter().zip(&row.identifiers) {
                obj.insert(name.clone(), cell_to_json(cell));
            }
            obj.insert(schema.label.clone(), Value::String(row.label.clone()));
            obj.insert(schema.value.clone(), cell_to_json(&row.value));
            Value::Object(obj)
        })
        .collect()
}

/// Pretty-printed JSON array of records.
pub fn to_json(table: &LongTable) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json_records(table))
}

fn cell_to_json(cell: &CellValue) -> Value {
    serde_json::to_value(cell).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LongRow, LongSchema};

    fn sample() -> LongTable {
        let schema = LongSchema::new(vec!["Day".into()], "status_country", "count");
        LongTable::from_rows(
            schema,
            vec![
                LongRow::new(vec!["2020-03-13".into()], "cases_Kenya", CellValue::Integer(1)),
                LongRow::new(vec!["2020-03-13".into()], "cases_Rwanda, East", CellValue::Missing),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_output() {
        let csv = to_csv_string(&sample()).unwrap();
        assert_eq!(
            csv,
            "Day,status_country,count\n2020-03-13,cases_Kenya,1\n2020-03-13,\"cases_Rwanda, East\",\n"
        );
    }

    #[test]
    fn test_csv_with_tab_delimiter() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf, '\t').unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Day\tstatus_country\tcount\n"));
    }

    #[test]
    fn test_csv_rejects_multibyte_delimiter() {
        let mut buf = Vec::new();
        let err = write_csv(&sample(), &mut buf, '¦').unwrap_err();
        assert!(err.to_string().contains("single-byte"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_csv_keeps_whole_floats_distinct() {
        let schema = LongSchema::new(vec!["day".into()], "variable", "value");
        let table = LongTable::from_rows(
            schema,
            vec![LongRow::new(vec![CellValue::Integer(1)], "A", CellValue::Float(2.0))],
        )
        .unwrap();
        assert_eq!(to_csv_string(&table).unwrap(), "day,variable,value\n1,A,2.0\n");
    }

    #[test]
    fn test_json_records() {
        let records = to_json_records(&sample());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Day"], "2020-03-13");
        assert_eq!(records[0]["status_country"], "cases_Kenya");
        assert_eq!(records[0]["count"], 1);
        assert!(records[1]["count"].is_null());
    }
}
