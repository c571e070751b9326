//! # **Error Module** - Custom *Minfacet* Error Type
//!
//! Defines the unified error type for Minfacet.
//!
//! ## Covers
//! - Store construction problems (duplicate identifiers, column data
//!   extending past the row range).
//! - Ingestion configuration naming fields that were never declared.
//! - Fatal deserialization rejections - malformed metadata never
//!   half-constructs a store.
//! - CSV tokenization failures.
//! - Implements `Display` for readable output and `Error` for integration
//!   with standard Rust error handling.
//!
//! Programming errors (out-of-order builder feeds, misuse of sealed
//! builders) are asserted at the call site rather than surfaced here.

use std::error::Error;
use std::fmt;

/// Catch all error type for `Minfacet`
#[derive(Debug)]
pub enum MinfacetError {
    DuplicateField {
        identifier: String,
    },
    UnknownField {
        identifier: String,
    },
    RowRange {
        identifier: String,
        row: usize,
        size: usize,
    },
    Metadata {
        message: String,
    },
    Csv {
        line: usize,
        message: String,
    },
    Json(serde_json::Error),
}

impl fmt::Display for MinfacetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinfacetError::DuplicateField { identifier } => {
                write!(f, "Duplicate field identifier '{}'.", identifier)
            }
            MinfacetError::UnknownField { identifier } => {
                write!(f, "Unknown field identifier '{}'.", identifier)
            }
            MinfacetError::RowRange { identifier, row, size } => {
                write!(
                    f,
                    "Field '{}' references row {} outside the store range [0, {}).",
                    identifier, row, size
                )
            }
            MinfacetError::Metadata { message } => {
                write!(f, "Malformed store metadata: {}.", message)
            }
            MinfacetError::Csv { line, message } => {
                write!(f, "CSV error at line {}: {}.", line, message)
            }
            MinfacetError::Json(err) => {
                write!(f, "JSON error: {}", err)
            }
        }
    }
}

impl Error for MinfacetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MinfacetError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MinfacetError {
    fn from(err: serde_json::Error) -> Self {
        MinfacetError::Json(err)
    }
}
