/// Error types for the box preview engine.
use std::fmt;

/// One of the three editable box dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Width,
    Height,
    Depth,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Width => "width",
            Field::Height => "height",
            Field::Depth => "depth",
        };
        f.write_str(name)
    }
}

/// Rejection reasons for a dimension edit.
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum DimensionError {
    /// The value is zero or negative.
    #[error("{field} must be greater than 0 mm (got {value})")]
    NonPositive { field: Field, value: f64 },

    /// The value is NaN or infinite.
    #[error("{field} must be a finite number (got {value})")]
    NonFinite { field: Field, value: f64 },
}

impl DimensionError {
    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            DimensionError::NonPositive { field, .. } | DimensionError::NonFinite { field, .. } => {
                *field
            }
        }
    }
}

/// Errors raised while loading a [`PreviewConfig`](crate::PreviewConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid box dimensions in config: {0}")]
    Invalid(#[from] DimensionError),
}
