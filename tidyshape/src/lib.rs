//! # Tidyshape - wide-to-long reshaping for tidy data
//!
//! Tidyshape loads a wide CSV table, splits its measurement columns into
//! named groups, unpivots (melts) each group and unions the results into
//! one long table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Parser    │────▶│  split → unpivot →   │────▶│ Long table  │
//! │ (any enc.)  │     │ (auto-enc)  │     │  union (per recipe)  │     │ (CSV/JSON)  │
//! └─────────────┘     └─────────────┘     └──────────────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tidyshape::{csv_to_table, unpivot};
//!
//! let table = csv_to_table("day,A,B\n1,10,20", ',').unwrap();
//! let long = unpivot(&table, &["day"], "label", "value").unwrap();
//! assert_eq!(long.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Cell values, wide and long tables
//! - [`parser`] - CSV loading with auto-detection
//! - [`transform`] - split / unpivot / union, recipes and pipeline
//! - [`export`] - CSV and JSON writers
//! - [`samples`] - Static text corpora
//! - [`logs`] - Progress logging
//! - [`config`] - Environment settings

// Core modules
pub mod error;
pub mod models;

// Ambient
pub mod config;
pub mod logs;

// Loading
pub mod parser;

// Reshaping
pub mod transform;

// Output
pub mod export;

// Text corpora
pub mod samples;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{LoadError, PipelineError, RecipeError, ReshapeError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CellValue, CombinedLongTable, LongRow, LongSchema, LongTable, WideTable};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    csv_to_table, decode_content, detect_delimiter, detect_encoding, parse_bytes,
    parse_bytes_auto, parse_csv, parse_csv_file, parse_csv_file_auto, ParseResult,
};

// =============================================================================
// Re-exports - Reshaping
// =============================================================================

pub use transform::{
    find_preset, preset, reshape_bytes, reshape_csv, reshape_table, split, union, unpivot,
    ColumnGroup, ColumnSelector, CsvInfo, GroupSelection, GroupSummary, PipelineOutput,
    ReshapeOptions, ReshapeRecipe,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use export::{to_csv_string, to_json, write_csv, OutputFormat};
pub use samples::Sample;
