use thiserror::Error;

/// Convenience result type for relation operations.
pub type RelationResult<T> = Result<T, RelationError>;

/// Error type returned by relation operations.
///
/// All variants are non-fatal usage errors: each names the operation that
/// failed and the offending column or value, so callers can correct the call.
/// A failing [`crate::pipeline::Pipeline`] stage wraps the underlying error in
/// [`RelationError::Stage`] so multi-step pipelines always identify where they
/// stopped.
#[derive(Debug, Error)]
pub enum RelationError {
    /// A referenced column name is absent from the relation's schema.
    #[error("{operation}: column '{column}' not found")]
    InvalidColumn {
        operation: &'static str,
        column: String,
    },

    /// Rows or columns do not conform to the declared schema
    /// (wrong row arity, duplicate column names, incompatible column types, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A column selector resolved to zero columns where at least one is required.
    #[error("{operation}: column selection resolved to zero columns")]
    EmptySelection { operation: &'static str },

    /// A generated or requested column name collides with a retained column.
    #[error("{operation}: column name '{column}' collides with an existing column")]
    NameCollision {
        operation: &'static str,
        column: String,
    },

    /// `spread` found more than one row for the same key within one group,
    /// making the wide cell ambiguous.
    #[error("spread: duplicate key '{key}' in column '{column}' for group [{group}]")]
    DuplicateKey {
        column: String,
        key: String,
        group: String,
    },

    /// `separate` split a value into the wrong number of pieces.
    #[error(
        "separate: splitting '{value}' in column '{column}' produced {actual} pieces, expected {expected}"
    )]
    SplitArityMismatch {
        column: String,
        value: String,
        expected: usize,
        actual: usize,
    },

    /// A regular-expression column selector carried an invalid pattern.
    #[error("invalid column pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A pipeline stage failed; `source` carries the stage's own error.
    #[error("pipeline stage '{stage}' (#{index}) failed: {source}")]
    Stage {
        stage: String,
        index: usize,
        #[source]
        source: Box<RelationError>,
    },
}
