//! Error handling for seatkit.
//!
//! A single `ChartError` enum covers the fail-fast cases of the editor
//! core. Advisory validation results and "pattern not applicable"
//! outcomes are deliberately *not* errors: they are normal values (counts,
//! `None`) per the editor's error taxonomy.

use thiserror::Error;

/// Domain error for the seating chart core.
///
/// Variants map to caller precondition violations or malformed persisted
/// data; neither is retried.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A row operation requiring at least one chair was called on an
    /// empty row.
    #[error("Row '{label}' has no chairs")]
    EmptyRow {
        /// Label of the offending row ("unset" when unlabeled).
        label: String,
    },

    /// A serialized object carried a shape-type tag the deserializer does
    /// not know.
    #[error("Unknown shape type tag '{tag}' in chart document")]
    UnknownShapeType {
        /// The unrecognized tag.
        tag: String,
    },

    /// An angle/length operation was invoked on a zero-length ray.
    #[error("Degenerate zero-length ray")]
    DegenerateRay,

    /// A persisted object references a category id that is not present in
    /// the document's category lists.
    #[error("Unknown category id {id}")]
    UnknownCategory {
        /// The dangling category id.
        id: u32,
    },

    /// Document (de)serialization failure.
    #[error("Chart document error: {reason}")]
    Document {
        /// What went wrong.
        reason: String,
    },

    /// Underlying JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    /// Creates a document error from a message.
    pub fn document(reason: impl Into<String>) -> Self {
        ChartError::Document {
            reason: reason.into(),
        }
    }
}

/// Result type using `ChartError`.
pub type Result<T> = std::result::Result<T, ChartError>;
