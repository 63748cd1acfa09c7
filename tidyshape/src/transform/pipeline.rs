//! High-level pipeline: load → resolve groups → split → unpivot → union.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tidyshape::transform::pipeline::{reshape_csv, ReshapeOptions};
//! use tidyshape::transform::recipe::covid_east_africa_recipe;
//!
//! let output = reshape_csv(
//!     Path::new("covid_eastafr.csv"),
//!     &covid_east_africa_recipe(),
//!     &ReshapeOptions::default(),
//! )?;
//! println!("{} tidy rows", output.table.len());
//! # Ok::<(), tidyshape::error::PipelineError>(())
//! ```

use serde::Serialize;
use std::path::Path;

use super::recipe::ReshapeRecipe;
use super::split::split;
use super::union::union;
use super::unpivot::unpivot;
use crate::config::Settings;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{LongTable, WideTable};
use crate::parser::{parse_bytes, ParseResult};

/// Options for the reshape pipeline
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReshapeOptions {
    /// Force a delimiter instead of detecting it
    pub delimiter: Option<char>,
}

impl From<&Settings> for ReshapeOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            delimiter: settings.delimiter,
        }
    }
}

/// Result of a complete reshape
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Combined long table
    pub table: LongTable,

    /// Per-group statistics, in union order
    pub groups: Vec<GroupSummary>,

    /// Source metadata
    pub csv_info: CsvInfo,
}

/// Statistics for one melted group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    /// Measurement columns in the group
    pub columns: usize,
    /// Long rows produced
    pub rows: usize,
}

/// Source file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Reshape a CSV file.
pub fn reshape_csv(
    path: &Path,
    recipe: &ReshapeRecipe,
    options: &ReshapeOptions,
) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading {}...", path.display()));
    let bytes = std::fs::read(path).map_err(crate::error::LoadError::from)?;
    reshape_bytes(&bytes, recipe, options)
}

/// Reshape raw CSV bytes.
pub fn reshape_bytes(
    bytes: &[u8],
    recipe: &ReshapeRecipe,
    options: &ReshapeOptions,
) -> PipelineResult<PipelineOutput> {
    let parsed = parse_bytes(bytes, options.delimiter)?;
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Delimiter: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!(
        "Read {} rows × {} columns",
        parsed.table.row_count(),
        parsed.headers.len()
    ));
    reshape_parsed(parsed, recipe)
}

/// Reshape an already loaded table.
pub fn reshape_table(
    table: WideTable,
    recipe: &ReshapeRecipe,
    options: &ReshapeOptions,
) -> PipelineResult<PipelineOutput> {
    let parsed = ParseResult {
        headers: table.columns().to_vec(),
        table,
        encoding: "utf-8".to_string(),
        delimiter: options.delimiter.unwrap_or(','),
    };
    reshape_parsed(parsed, recipe)
}

fn reshape_parsed(
    parsed: ParseResult,
    recipe: &ReshapeRecipe,
) -> PipelineResult<PipelineOutput> {
    let csv_info = CsvInfo {
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        headers: parsed.headers,
        row_count: parsed.table.row_count(),
    };

    let table = recipe.designate(parsed.table)?;
    let selections = recipe.resolve(&table)?;

    log_info(format!(
        "🔀 Splitting into {} group(s), identifiers: {}",
        selections.len(),
        recipe.identifiers.join(", ")
    ));
    let parts = split(&table, &selections)?;

    let mut groups = Vec::with_capacity(parts.len());
    let mut melted = Vec::with_capacity(parts.len());
    for (selection, part) in selections.iter().zip(&parts) {
        let long = unpivot(part, recipe.identifiers.as_slice(), &recipe.label, &recipe.value)?;
        let columns = part.column_count() - recipe.identifiers.len();
        log_info_indent(
            format!("{}: {} columns → {} rows", selection.name, columns, long.len()),
            1,
        );
        if columns == 0 {
            log_warning(format!("Group '{}' selects no measurement column", selection.name));
        }
        groups.push(GroupSummary {
            name: selection.name.clone(),
            columns,
            rows: long.len(),
        });
        melted.push(long);
    }

    let dropped = unused_columns(&table, &groups);
    if dropped > 0 {
        log_warning(format!("{} measurement column(s) belong to no group", dropped));
    }

    let combined = union(melted)?;
    log_success(format!(
        "{} tidy rows ({})",
        combined.len(),
        combined.schema()
    ));
    let missing = combined.rows().iter().filter(|r| r.value.is_missing()).count();
    if missing > 0 {
        log_info(format!("{} rows carry a missing value", missing));
    }

    Ok(PipelineOutput {
        table: combined,
        groups,
        csv_info,
    })
}

fn unused_columns(table: &WideTable, groups: &[GroupSummary]) -> usize {
    let measured = table.measurement_indices().len();
    let grouped: usize = groups.iter().map(|g| g.columns).sum();
    measured.saturating_sub(grouped)
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, ReshapeError};
    use crate::models::CellValue;
    use crate::transform::recipe::{covid_east_africa_recipe, ColumnGroup};
    use std::collections::HashMap;
    use std::io::Write;

    fn tb_csv() -> String {
        let mut header = vec!["days".to_string()];
        header.extend((1..=20).map(|i| format!("male_{i}")));
        header.extend((1..=20).map(|i| format!("female_{i}")));
        let row = |day: i64| {
            let mut cells = vec![day.to_string()];
            cells.extend((1..=40).map(|v| (v * day).to_string()));
            cells.join(",")
        };
        format!("{}\n{}\n{}\n", header.join(","), row(1), row(2))
    }

    #[test]
    fn test_default_options() {
        let opts = ReshapeOptions::default();
        assert_eq!(opts.delimiter, None);
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            delimiter: Some(';'),
            ..Settings::default()
        };
        assert_eq!(ReshapeOptions::from(&settings).delimiter, Some(';'));
    }

    #[test]
    fn test_bindura_preset_puts_female_rows_first() {
        let recipe = crate::transform::recipe::bindura_tb_recipe();
        let output = reshape_bytes(tb_csv().as_bytes(), &recipe, &ReshapeOptions::default()).unwrap();

        assert_eq!(output.table.len(), 2 * 40);
        assert_eq!(output.groups[0].name, "female");
        assert_eq!(output.groups[0].rows, 40);
        assert_eq!(output.table.rows()[0].label, "female_1");
        assert_eq!(output.table.rows()[0].value, CellValue::Integer(21));
        assert_eq!(output.table.rows()[40].label, "male_1");
        assert_eq!(
            output.table.schema().column_names(),
            ["days", "sex_label", "Fatigue Level"]
        );
    }

    #[test]
    fn test_split_then_union_matches_direct_unpivot() {
        let parsed = parse_bytes(tb_csv().as_bytes(), None).unwrap();
        let direct = unpivot(&parsed.table, &["days"], "sex_label", "level").unwrap();

        let recipe = ReshapeRecipe::new(vec!["days".into()])
            .with_label("sex_label")
            .with_value("level")
            .with_group(ColumnGroup::range("male", 1, 21))
            .with_group(ColumnGroup::range("female", 21, 41));
        let grouped = reshape_table(parsed.table, &recipe, &ReshapeOptions::default()).unwrap();

        let count = |table: &LongTable| {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for row in table.rows() {
                let key = format!("{:?}|{}|{:?}", row.identifiers, row.label, row.value);
                *counts.entry(key).or_default() += 1;
            }
            counts
        };
        assert_eq!(grouped.table.len(), direct.len());
        assert_eq!(count(&grouped.table), count(&direct));
    }

    #[test]
    fn test_covid_preset_from_file() {
        let countries = ["Burundi", "Kenya", "Rwanda", "Tanzania", "Uganda", "Sudan",
            "Somalia", "Ethiopia", "Eritrea", "Djibouti", "Comoros", "Seychelles", "Mauritius"];
        let mut header = vec!["Day".to_string()];
        header.extend(countries.iter().map(|c| format!("cases_{c}")));
        header.extend(countries.iter().map(|c| format!("deaths_{c}")));
        let values: Vec<String> = (0..26).map(|v| v.to_string()).collect();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header.join(",")).unwrap();
        writeln!(file, "2020-03-13,{}", values.join(",")).unwrap();

        let output = reshape_csv(file.path(), &covid_east_africa_recipe(), &ReshapeOptions::default())
            .unwrap();

        assert_eq!(output.csv_info.row_count, 1);
        assert_eq!(output.table.len(), 26);
        assert_eq!(output.table.rows()[13].label, "deaths_Burundi");
        assert_eq!(output.table.rows()[13].identifiers, vec![CellValue::Text("2020-03-13".into())]);
        assert_eq!(output.groups.iter().map(|g| g.columns).collect::<Vec<_>>(), vec![13, 13]);
    }

    #[test]
    fn test_header_only_input_gives_empty_table() {
        let recipe = ReshapeRecipe::new(vec!["day".into()]);
        let output = reshape_bytes(b"day,A,B\n", &recipe, &ReshapeOptions::default()).unwrap();

        assert_eq!(output.csv_info.row_count, 0);
        assert!(output.table.is_empty());
        assert_eq!(output.table.schema().column_names(), ["day", "variable", "value"]);
        assert_eq!(output.groups[0].columns, 2);
        assert_eq!(output.groups[0].rows, 0);
    }

    #[test]
    fn test_header_only_input_with_groups() {
        let output = reshape_bytes(
            b"days,m,f\n",
            &ReshapeRecipe::new(vec!["days".into()])
                .with_group(ColumnGroup::range("female", 2, 3))
                .with_group(ColumnGroup::range("male", 1, 2)),
            &ReshapeOptions::default(),
        )
        .unwrap();
        assert!(output.table.is_empty());
        assert_eq!(output.groups.len(), 2);
    }

    #[test]
    fn test_range_past_last_column_is_invalid_selection() {
        let recipe = ReshapeRecipe::new(vec!["day".into()])
            .with_group(ColumnGroup::range("g", 1, 5));
        let err = reshape_bytes(b"day,A,B\n1,2,3", &recipe, &ReshapeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Reshape(ReshapeError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_huge_range_is_invalid_selection() {
        let recipe = ReshapeRecipe::new(vec!["day".into()])
            .with_group(ColumnGroup::range("g", 1, usize::MAX));
        let err = reshape_bytes(b"day,A,B\n1,2,3", &recipe, &ReshapeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Reshape(ReshapeError::InvalidSelection { ref group, .. }) if group == "g"
        ));
    }

    #[test]
    fn test_missing_identifier_surfaces() {
        let recipe = ReshapeRecipe::new(vec!["Day".into()]);
        let err = reshape_bytes(b"day,A\n1,2", &recipe, &ReshapeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Missing identifier column: Day"));
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "TAB");
        assert_eq!(format_delimiter(';'), ";");
    }
}
