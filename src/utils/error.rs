use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[source] Arc<reqwest::Error>),

    #[error("API responded with an error: {message}")]
    ApiRequestError { message: String },

    #[error("API returned an unreadable body: {message}")]
    InvalidResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Malformed response envelope: {reason}")]
    MalformedEnvelope { reason: String },

    #[error("Keyword record transform failed: {reason}")]
    TransformFailure { reason: String },
}

impl From<reqwest::Error> for EtlError {
    fn from(e: reqwest::Error) -> Self {
        EtlError::ApiError(Arc::new(e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::MalformedEnvelope { .. } | EtlError::TransformFailure { .. } => {
                ErrorSeverity::Low
            }
            EtlError::ApiError(_) | EtlError::ApiRequestError { .. } => ErrorSeverity::Medium,
            EtlError::InvalidResponse { .. } | EtlError::SerializationError(_) => {
                ErrorSeverity::High
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the API base URL, then retry",
            EtlError::ApiRequestError { .. } => {
                "Verify the DataForSEO credentials and that the account has access to the endpoint"
            }
            EtlError::IoError(_) => "Check that the output path exists and is writable",
            EtlError::InvalidResponse { .. } => {
                "The API base URL may point at something other than the DataForSEO API"
            }
            EtlError::SerializationError(_) => "Records could not be encoded as JSON",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration value named in the error and run again"
            }
            EtlError::MalformedEnvelope { .. } | EtlError::TransformFailure { .. } => {
                "No action needed; affected records were replaced with defaults"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
