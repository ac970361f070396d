// marina_project/app/src/errors.rs

use marina::MarinaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Required: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Booking Core Error: {source}")]
  Core {
    #[from] // Allows conversion from marina::MarinaError
    source: MarinaError,
  },

  #[error("Internal Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in flows that use `?` on functions returning anyhow::Result
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl AppError {
  /// The single user-facing message a screen shows for this failure.
  ///
  /// Partial failures never reach this point (they are absorbed and logged
  /// inside the core); whatever arrives here aborted a whole operation and
  /// surfaces exactly once. Backend failures invite a manual retry; nothing
  /// retries automatically.
  pub fn user_message(&self) -> String {
    // Log the full error when it's turned into a user-facing message
    tracing::error!(application_error = %self, "Surfacing error to the screen");
    match self {
      AppError::Validation(m) => m.clone(),
      AppError::Auth(_) => "Please sign in to continue.".to_string(),
      AppError::NotFound(_) => "We couldn't find what you were looking for.".to_string(),
      AppError::Config(_) | AppError::Internal(_) => {
        "Something went wrong. Please try again.".to_string()
      }
      AppError::Core { source } => match source {
        MarinaError::Validation { message } => message.clone(),
        MarinaError::Unauthenticated { .. } => "Please sign in to continue.".to_string(),
        MarinaError::NotFound { .. } => {
          "We couldn't find what you were looking for.".to_string()
        }
        MarinaError::NoItemsResolved => "No items found for this session.".to_string(),
        MarinaError::AlreadyBooked { .. } => {
          "This booking has already been completed.".to_string()
        }
        MarinaError::Backend { .. } => {
          "We couldn't reach the booking service. Please try again.".to_string()
        }
        // IndexUnavailable is recovered inside the core and should never
        // surface; treat it like any other internal fault if it does.
        MarinaError::IndexUnavailable { .. } | MarinaError::Internal(_) => {
          "Something went wrong. Please try again.".to_string()
        }
      },
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
