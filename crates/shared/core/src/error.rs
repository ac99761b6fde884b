use thiserror::Error;

/// Malformed or unexpected payload from an exchange source.
///
/// Raised by normalization. The stream path logs and skips the offending
/// frame; the REST path propagates it as a fetch failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Non-numeric value for {field}: {value:?}")]
    Number { field: &'static str, value: String },

    #[error("Invalid epoch-millis timestamp for {field}: {value}")]
    Timestamp { field: &'static str, value: i64 },

    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}
