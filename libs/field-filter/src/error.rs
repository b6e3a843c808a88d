use thiserror::Error;

/// Errors raised at the host boundary of the filter.
///
/// Filtering an [`Event`](crate::Event) never fails; these cover decoding
/// events and loading configuration.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Event must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid environment variable {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::InvalidJson(err.to_string())
    }
}
