use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort pipeline construction.
///
/// All three variants are fatal to loading: no partial record collection is
/// ever returned. Empty query results are not errors; the query layer
/// models those as `None` (see [`crate::query`]).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source table is absent or unreadable.
    #[error("source table not found: {path}")]
    MissingSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source table exists but its contents cannot be parsed into records
    /// (missing columns, non-date date values, count invariant violations).
    #[error("malformed source table: {detail}")]
    MalformedSource { detail: String },

    /// An integer category code falls outside its closed domain. Indicates
    /// a mismatch between the data and the lookup tables; never mapped to a
    /// default label.
    #[error("unknown {field} code {code}")]
    UnknownCategoryCode { field: &'static str, code: i64 },
}
