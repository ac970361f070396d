// marina_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarinaError {
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("No rentable items could be resolved for this selection")]
    NoItemsResolved,

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Sign-in is required to {action}")]
    Unauthenticated { action: String },

    #[error("Session '{session_id}' is already booked")]
    AlreadyBooked { session_id: String },

    #[error("Ordered query on '{collection}' needs an index for field '{field}'")]
    IndexUnavailable { collection: String, field: String },

    #[error("Backend unavailable. Source: {source}")]
    Backend {
        #[source]
        source: AnyhowError,
    },

    #[error("Internal marina error: {0}")]
    Internal(String),
}

impl MarinaError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        MarinaError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        MarinaError::Validation {
            message: message.into(),
        }
    }

    /// True for failures the caller may retry verbatim (storage/network
    /// outages). Validation and auth failures need user correction first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MarinaError::Backend { .. })
    }
}

// This is the key conversion marina provides for external errors raised by
// store backends. An anyhow::Error that already wraps a MarinaError is
// unwrapped rather than double-wrapped.
impl From<AnyhowError> for MarinaError {
    fn from(err: AnyhowError) -> Self {
        match err.downcast::<MarinaError>() {
            Ok(marina_err) => marina_err,
            Err(other) => MarinaError::Backend { source: other },
        }
    }
}

pub type MarinaResult<T, E = MarinaError> = std::result::Result<T, E>;
