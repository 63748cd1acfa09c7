//! Reshape recipes.
//!
//! A recipe names the identifier columns, the label/value output names
//! and the column groups to melt separately. Recipes are plain JSON:
//!
//! ```json
//! {
//!   "identifiers": ["Day"],
//!   "label": "status_country",
//!   "value": "count",
//!   "groups": [
//!     { "name": "cases",  "columns": [{ "type": "range", "start": 1,  "end": 14 }] },
//!     { "name": "deaths", "columns": [{ "type": "pattern", "pattern": "^deaths_" }] }
//!   ]
//! }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::split::GroupSelection;
use crate::error::{RecipeError, RecipeResult, ReshapeError};
use crate::models::WideTable;

/// Group name used when a recipe declares no groups.
pub const ALL_COLUMNS_GROUP: &str = "all";

/// A complete reshape description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshapeRecipe {
    /// Version of the recipe format
    #[serde(default = "default_version")]
    pub version: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Identifier columns kept on every long row
    pub identifiers: Vec<String>,

    /// Name of the generated label column
    #[serde(default = "default_label")]
    pub label: String,

    /// Name of the generated value column
    #[serde(default = "default_value")]
    pub value: String,

    /// Column groups, melted separately then combined in this order.
    /// Empty means every non-identifier column in one group.
    #[serde(default)]
    pub groups: Vec<ColumnGroup>,
}

/// A named slice of measurement columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub name: String,
    pub columns: Vec<ColumnSelector>,
}

/// How a group picks its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnSelector {
    /// Exact column name
    Name { name: String },

    /// Column position (0-based)
    Index { index: usize },

    /// Half-open range of column positions
    Range { start: usize, end: usize },

    /// Regex matched against column names
    Pattern { pattern: String },
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_label() -> String {
    "variable".to_string()
}

fn default_value() -> String {
    "value".to_string()
}

impl ReshapeRecipe {
    /// A recipe melting every non-identifier column.
    pub fn new(identifiers: Vec<String>) -> Self {
        Self {
            version: default_version(),
            description: String::new(),
            identifiers,
            label: default_label(),
            value: default_value(),
            groups: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_group(mut self, group: ColumnGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Parse a recipe from JSON string
    pub fn from_json(json: &str) -> RecipeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> RecipeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Designate the recipe's identifier columns on `table`.
    pub fn designate(&self, table: WideTable) -> RecipeResult<WideTable> {
        Ok(table.with_identifiers(self.identifiers.as_slice())?)
    }

    /// Resolve the groups into column indices of `table`.
    ///
    /// Each selection lists the identifier columns first, then the
    /// group's columns in selector order. Identifier columns caught by a
    /// range or pattern are skipped, as are repeats inside one group.
    /// Positional selectors past the last column are an
    /// [`ReshapeError::InvalidSelection`].
    pub fn resolve(&self, table: &WideTable) -> RecipeResult<Vec<GroupSelection>> {
        let id_indices = self
            .identifiers
            .iter()
            .map(|id| {
                table
                    .column_index(id)
                    .ok_or_else(|| ReshapeError::MissingIdentifier(id.clone()))
            })
            .collect::<Result<Vec<usize>, ReshapeError>>()?;

        if self.groups.is_empty() {
            let mut indices = id_indices.clone();
            indices.extend(
                (0..table.column_count()).filter(|i| !id_indices.contains(i)),
            );
            return Ok(vec![GroupSelection::new(ALL_COLUMNS_GROUP, indices)]);
        }

        self.groups
            .iter()
            .map(|group| {
                let mut indices = id_indices.clone();
                let mut seen = vec![false; table.column_count()];
                for &idx in &id_indices {
                    seen[idx] = true;
                }
                for idx in group.candidate_indices(table)? {
                    if !seen[idx] {
                        seen[idx] = true;
                        indices.push(idx);
                    }
                }
                Ok(GroupSelection::new(group.name.clone(), indices))
            })
            .collect()
    }

    /// Column names the recipe refers to explicitly.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.identifiers.iter().map(String::as_str).collect();
        for group in &self.groups {
            for selector in &group.columns {
                if let ColumnSelector::Name { name } = selector {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Referenced names absent from `headers`.
    pub fn missing_headers(&self, headers: &[String]) -> Vec<String> {
        self.referenced_names()
            .into_iter()
            .filter(|name| !headers.iter().any(|h| h == name))
            .map(String::from)
            .collect()
    }

    /// Share of referenced names present in `headers`, ignoring case.
    pub fn compatibility(&self, headers: &[String]) -> f64 {
        let names = self.referenced_names();
        if names.is_empty() {
            return 0.0;
        }
        let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let matched = names
            .iter()
            .filter(|name| lower.contains(&name.to_lowercase()))
            .count();
        matched as f64 / names.len() as f64
    }
}

impl ColumnGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_selector(mut self, selector: ColumnSelector) -> Self {
        self.columns.push(selector);
        self
    }

    pub fn range(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self::new(name).with_selector(ColumnSelector::Range { start, end })
    }

    /// Indices picked by the selectors, in selector order.
    fn candidate_indices(&self, table: &WideTable) -> RecipeResult<Vec<usize>> {
        let mut indices = Vec::new();
        for selector in &self.columns {
            match selector {
                ColumnSelector::Name { name } => {
                    let idx = table.column_index(name).ok_or_else(|| {
                        RecipeError::UnknownColumn {
                            group: self.name.clone(),
                            column: name.clone(),
                        }
                    })?;
                    indices.push(idx);
                }
                ColumnSelector::Index { index } => {
                    self.check_index(*index, table)?;
                    indices.push(*index);
                }
                ColumnSelector::Range { start, end } => {
                    if start < end {
                        self.check_index(*end - 1, table)?;
                        indices.extend(*start..*end);
                    }
                }
                ColumnSelector::Pattern { pattern } => {
                    let re = Regex::new(pattern).map_err(|e| RecipeError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                    indices.extend(
                        table
                            .columns()
                            .iter()
                            .enumerate()
                            .filter(|(_, name)| re.is_match(name))
                            .map(|(i, _)| i),
                    );
                }
            }
        }

        Ok(indices)
    }

    fn check_index(&self, index: usize, table: &WideTable) -> RecipeResult<()> {
        let width = table.column_count();
        if index >= width {
            return Err(ReshapeError::invalid_selection(
                self.name.clone(),
                format!("column index {} out of range ({} columns)", index, width),
            )
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Names of the built-in recipes, in lookup order.
pub const PRESET_NAMES: [&str; 3] = ["billboard", "bindura-tb", "covid-east-africa"];

/// Billboard Top 100 for 2000: one column per chart week.
pub fn billboard_recipe() -> ReshapeRecipe {
    ReshapeRecipe::new(
        ["year", "artist", "track", "time", "date.entered"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .with_label("week")
    .with_value("rank")
    .with_description("Billboard 2000 chart: weekly ranks to one row per track and week")
}

/// Bindura TB patients: 20 male then 20 female fatigue columns per day.
///
/// Female rows come first in the combined output.
pub fn bindura_tb_recipe() -> ReshapeRecipe {
    ReshapeRecipe::new(vec!["days".to_string()])
        .with_label("sex_label")
        .with_value("Fatigue Level")
        .with_description("Bindura TB patients: fatigue level per day and sex label")
        .with_group(ColumnGroup::range("female", 21, 41))
        .with_group(ColumnGroup::range("male", 1, 21))
}

/// East-Africa COVID: 13 case columns then 13 death columns per day.
pub fn covid_east_africa_recipe() -> ReshapeRecipe {
    ReshapeRecipe::new(vec!["Day".to_string()])
        .with_label("status_country")
        .with_value("count")
        .with_description("East-Africa COVID: cases and deaths per day and country")
        .with_group(ColumnGroup::range("cases", 1, 14))
        .with_group(ColumnGroup::range("deaths", 14, 27))
}

/// Look up a built-in recipe by name.
pub fn preset(name: &str) -> RecipeResult<ReshapeRecipe> {
    match name {
        "billboard" => Ok(billboard_recipe()),
        "bindura-tb" => Ok(bindura_tb_recipe()),
        "covid-east-africa" => Ok(covid_east_africa_recipe()),
        other => Err(RecipeError::UnknownPreset(other.to_string())),
    }
}

/// Pick the built-in recipe best matching `headers`.
///
/// Only presets whose identifier columns are all present qualify. Ties
/// go to the preset with more identifier columns.
pub fn find_preset(headers: &[String]) -> Option<(&'static str, ReshapeRecipe)> {
    PRESET_NAMES
        .iter()
        .filter_map(|&name| preset(name).ok().map(|recipe| (name, recipe)))
        .filter(|(_, recipe)| recipe.missing_headers(headers).is_empty())
        .max_by(|(_, a), (_, b)| {
            a.compatibility(headers)
                .partial_cmp(&b.compatibility(headers))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.identifiers.len().cmp(&b.identifiers.len()))
        })
}
