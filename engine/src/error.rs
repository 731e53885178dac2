use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid reporting period: {0}")]
    PeriodError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Delete not confirmed for {0}: type DELETE to confirm")]
    DeleteNotConfirmed(String),

    #[error("Record store error: {0}")]
    StoreError(String),

    #[error("CSV export error: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    // Wraps errors from the anyhow-based loaders (settings, snapshots).
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Errors caused by what the operator typed, as opposed to the store or
    /// the filesystem failing.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EngineError::ValidationError(_)
                | EngineError::PeriodError(_)
                | EngineError::NotFound(_)
                | EngineError::DeleteNotConfirmed(_)
        )
    }
}
