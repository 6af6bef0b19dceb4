//! Error types with rich diagnostics using miette
//!
//! Document and configuration errors are fatal and carry source spans where
//! one exists. Part errors never leave the pipeline: they are collected into
//! the [`ProcessReport`](crate::ProcessReport) next to the dropped primitive.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Document Errors
// ============================================================================

/// Errors that stop a document from being read or written
#[derive(Error, Diagnostic, Debug)]
pub enum DocumentError {
    #[error("malformed XML: {message}")]
    #[diagnostic(code(elmt_scaler::document::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("document has no root element")]
    #[diagnostic(
        code(elmt_scaler::document::empty),
        help("an element file starts with <definition>, a directory file with <qet-directory>")
    )]
    Empty {
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("unsupported root tag <{tag}>")]
    #[diagnostic(
        code(elmt_scaler::document::unsupported_root),
        help("expected <definition> or <qet-directory>")
    )]
    UnsupportedRoot { tag: String },

    #[error("failed to write XML: {0}")]
    #[diagnostic(code(elmt_scaler::document::write))]
    Write(#[from] quick_xml::Error),
}

impl DocumentError {
    /// Build a syntax error pointing at a byte offset of the source
    pub fn syntax(name: &str, source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        DocumentError::Syntax {
            message: message.into(),
            src: NamedSource::new(name, source.to_string()),
            span: (offset, 0).into(),
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Invalid transform parameters, reported before any document is touched
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("'{value}' is not a number")]
    #[diagnostic(
        code(elmt_scaler::config::not_a_number),
        help("use digits with an optional '.' or ',' separator, e.g. 1.5 or 1,5")
    )]
    NotANumber { value: String },

    #[error("{axis} scale factor {value} is below the minimum of 0.01")]
    #[diagnostic(code(elmt_scaler::config::scale_too_small))]
    ScaleTooSmall { axis: char, value: f64 },

    #[error("{value} decimals requested, at most {max} are supported")]
    #[diagnostic(code(elmt_scaler::config::too_many_decimals))]
    TooManyDecimals { value: usize, max: usize },
}

// ============================================================================
// Part Errors
// ============================================================================

/// Why a primitive was dropped from the output
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PartError {
    #[error("needs at least 2 points, found {found}")]
    #[diagnostic(code(elmt_scaler::part::too_few_points))]
    TooFewPoints { found: usize },

    #[error("point {found} breaks the index sequence, expected point {expected}")]
    #[diagnostic(code(elmt_scaler::part::index_gap))]
    IndexGap { expected: usize, found: usize },

    #[error("point {index} has no {axis} coordinate")]
    #[diagnostic(code(elmt_scaler::part::missing_coordinate))]
    MissingCoordinate { index: usize, axis: char },

    #[error("point {index} has a non-finite coordinate")]
    #[diagnostic(code(elmt_scaler::part::non_finite))]
    NonFinite { index: usize },

    #[error("line is {length} long, shorter than the minimum of {min}")]
    #[diagnostic(code(elmt_scaler::part::degenerate_line))]
    DegenerateLine { length: f64, min: f64 },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any error the library can return to a caller
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
