//! Reshaping module.
//!
//! - Split: wide table into column groups
//! - Unpivot: wide table into long format
//! - Union: long tables into one
//! - Recipe: named column groups and presets
//! - Pipeline: load and run a recipe end to end

pub mod pipeline;
pub mod recipe;
pub mod split;
pub mod union;
pub mod unpivot;

pub use pipeline::{
    reshape_bytes, reshape_csv, reshape_table, CsvInfo, GroupSummary, PipelineOutput,
    ReshapeOptions,
};
pub use recipe::{find_preset, preset, ColumnGroup, ColumnSelector, ReshapeRecipe, PRESET_NAMES};
pub use split::{split, GroupSelection};
pub use union::union;
pub use unpivot::{unpivot, unpivot_designated};
