use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is missing")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parsing failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Credential error: {message}")]
    CredentialError { message: String },
}

impl HarnessError {
    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarnessError::ApiError(_) => {
                "Check network connectivity and that the base URL points at a reachable host"
            }
            HarnessError::IoError(_) => "Check that the file exists and is readable",
            HarnessError::SerializationError(_) => "Check that the request body is valid JSON",
            HarnessError::ConfigError { .. }
            | HarnessError::MissingConfigError { .. }
            | HarnessError::InvalidConfigValueError { .. }
            | HarnessError::ConfigValidationError { .. } => {
                "Review the suite configuration file and command line arguments"
            }
            HarnessError::CredentialError { .. } => {
                "Export the authorization token in the configured environment variable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
