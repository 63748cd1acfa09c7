//! Error types for the tidyshape reshaping pipeline.
//!
//! One error enum per layer:
//!
//! - [`LoadError`] - reading and decoding delimited text
//! - [`ReshapeError`] - split / unpivot / union misuse
//! - [`RecipeError`] - reshape recipe parsing and resolution
//! - [`PipelineError`] - top-level orchestration
//!
//! Conversions are provided via `From`, so `?` works across layers.

use thiserror::Error;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while loading a delimited text file into a wide table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Malformed record.
    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Nothing to read.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Header row present but without any column.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// The loaded header row is not a valid table.
    #[error("Invalid table: {0}")]
    Table(#[from] ReshapeError),
}

impl LoadError {
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        LoadError::Malformed {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// Reshape Errors
// =============================================================================

/// Validation failures raised by the reshaping operations.
///
/// None of these are recoverable inside the reshaper; the caller has to
/// fix the inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReshapeError {
    /// A column selection is out of range, repeats a column, overlaps
    /// another selection, or drops an identifier column.
    #[error("Invalid selection '{group}': {message}")]
    InvalidSelection { group: String, message: String },

    /// An identifier name is not a column of the table.
    #[error("Missing identifier column: {0}")]
    MissingIdentifier(String),

    /// Long tables with different schemas cannot be combined.
    #[error("Schema mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    /// Two columns would share the same name.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A row does not have one cell per column.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Union called without any table.
    #[error("Nothing to combine: union needs at least one table")]
    EmptyUnion,
}

impl ReshapeError {
    pub fn invalid_selection(group: impl Into<String>, message: impl Into<String>) -> Self {
        ReshapeError::InvalidSelection {
            group: group.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Recipe Errors
// =============================================================================

/// Errors while reading or resolving a reshape recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// JSON (de)serialization error.
    #[error("Recipe JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pattern selector does not compile.
    #[error("Invalid column pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A selector names a column the table does not have.
    #[error("Unknown column '{column}' in group '{group}'")]
    UnknownColumn { group: String, column: String },

    /// No preset with that name.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Resolution produced an invalid selection.
    #[error(transparent)]
    Reshape(#[from] ReshapeError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors returned by [`crate::transform::pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Reshaping error.
    #[error("Reshape error: {0}")]
    Reshape(#[from] ReshapeError),

    /// Recipe error. Reshape failures found while resolving a recipe
    /// surface as [`PipelineError::Reshape`] instead.
    #[error("Recipe error: {0}")]
    Recipe(RecipeError),

    /// IO error outside of loading (recipe files, output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RecipeError> for PipelineError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Reshape(inner) => PipelineError::Reshape(inner),
            other => PipelineError::Recipe(other),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for reshaping operations.
pub type ReshapeResult<T> = Result<T, ReshapeError>;

/// Result type for recipe operations.
pub type RecipeResult<T> = Result<T, RecipeError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
