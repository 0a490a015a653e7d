use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    /// A structural contradiction in the inputs or config the engine cannot
    /// proceed with. Recoverable by re-validating upstream.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// An internal arithmetic invariant was violated. Treated as a defect.
    #[error("Computation error: {reason}")]
    Computation { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model '{model_id}' not found")]
    ModelNotFound { model_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VerifyError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }

    pub fn computation(reason: impl Into<String>) -> Self {
        Self::Computation { reason: reason.into() }
    }
}

pub type VerifyResult<T> = Result<T, VerifyError>;
