use thiserror::Error;

/// Errors raised while ingesting a bucket table or preparing hover output.
///
/// Hover-time conditions (missing neighbor bounds, empty columns, lookup misses)
/// are not errors; they degrade to absent values instead.
#[derive(Debug, Error)]
pub enum HoverError {
    #[error("required bucket column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("bucket columns have mismatched lengths (xMin={x_min}, yMin={y_min}, count={count})")]
    LengthMismatch {
        x_min: usize,
        y_min: usize,
        count: usize,
    },

    #[error("invalid bucket layout at row {row}: {reason}")]
    InvalidLayout { row: usize, reason: String },

    #[error("bucket metadata is incomplete: {0}")]
    IncompleteMetadata(&'static str),

    #[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("invalid time zone '{0}'")]
    InvalidTimeZone(String),

    #[error("unsupported table file '{0}'")]
    UnsupportedFile(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type HoverResult<T> = std::result::Result<T, HoverError>;
