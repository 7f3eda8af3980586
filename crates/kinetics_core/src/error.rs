use thiserror::Error;

/// Errors raised at the edges of the core: request decoding and configuration.
///
/// Data-quality problems in a stream are never errors; they surface as
/// `DataStatus::InsufficientData` on the affected result.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// True when the caller can fix the input and retry.
    pub fn is_input_error(&self) -> bool {
        match self {
            AnalysisError::InvalidRequest(_) => true,
            AnalysisError::UnsupportedSchema { .. } => true,
            AnalysisError::InvalidConfig(_) => true,
            AnalysisError::Json(err) => err.is_data() || err.is_syntax() || err.is_eof(),
            AnalysisError::Yaml(_) => true,
            AnalysisError::Io(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
