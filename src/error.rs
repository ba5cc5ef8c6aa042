use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::chain::FetchError;

/// Main error type for the BlockTracker application
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Error severity levels for logging and monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical errors that require immediate attention
    Critical,
    /// High priority errors that affect functionality
    High,
    /// Medium priority errors that may affect results
    Medium,
    /// Low priority errors that are mostly informational
    Low,
}

impl TrackerError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrackerError::Config(_) => ErrorSeverity::Critical,

            TrackerError::Fetch(fetch) => fetch_severity(fetch),
            TrackerError::Analysis(AnalysisError::Fetch(fetch)) => fetch_severity(fetch),

            TrackerError::Analysis(AnalysisError::UnsupportedCurrency(_)) => ErrorSeverity::Low,
            TrackerError::Analysis(AnalysisError::NoTransactions) => ErrorSeverity::Low,

            TrackerError::Io(_) => ErrorSeverity::Medium,
        }
    }

    /// Check if the error is transient enough that repeating the request
    /// could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            TrackerError::Fetch(fetch) => fetch_recoverable(fetch),
            TrackerError::Analysis(AnalysisError::Fetch(fetch)) => fetch_recoverable(fetch),

            TrackerError::Config(_) => false,
            TrackerError::Analysis(_) => false,
            TrackerError::Io(_) => false,
        }
    }
}

fn fetch_severity(error: &FetchError) -> ErrorSeverity {
    match error {
        FetchError::Http(_) => ErrorSeverity::High,
        FetchError::Status { status } if *status >= 500 => ErrorSeverity::High,
        FetchError::Status { .. } => ErrorSeverity::Medium,
        FetchError::Json(_) => ErrorSeverity::Medium,
        FetchError::InvalidResponse(_) => ErrorSeverity::Medium,
    }
}

fn fetch_recoverable(error: &FetchError) -> bool {
    match error {
        FetchError::Http(_) => true,
        FetchError::Status { status } => *status >= 500,
        FetchError::Json(_) | FetchError::InvalidResponse(_) => false,
    }
}
