use thiserror::Error;

/// Main error type for the CreditWatch system
#[derive(Error, Debug)]
pub enum CwError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Data-related errors raised at the data-source and export boundary
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data source not found: {0}")]
    SourceNotFound(String),

    #[error("Duplicate company code in positions table: {company}")]
    DuplicateCompany { company: String },

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid data format: {message}")]
    InvalidFormat { message: String },

    #[error("Data loading failed: {message}")]
    LoadingFailed { message: String },

    #[error("Export failed for {company}: {message}")]
    ExportFailed { company: String, message: String },
}

/// Result type alias for CreditWatch operations
pub type CwResult<T> = Result<T, CwError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::CwError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::CwError::Config(format!($($arg)*))
    };
}
