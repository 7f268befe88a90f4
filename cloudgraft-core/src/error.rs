//! Error types for cloudgraft helpers.
//!
//! Only configuration mistakes surface as errors at this layer. Failures
//! while the provisioning engine creates the emitted resources are the
//! engine's to report and retry; they never pass through these types.

use thiserror::Error;

/// Errors raised synchronously while building resource specifications.
#[derive(Debug, Error)]
pub enum CloudgraftError {
    /// The request combined fields in a way the target format cannot
    /// express. The call site must be fixed; retrying cannot succeed.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A pending output was resolved a second time.
    #[error("Output has already been resolved")]
    OutputAlreadyResolved,
}

impl CloudgraftError {
    /// Create a configuration error from any message-like value
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result alias used across the workspace
pub type CloudgraftResult<T> = std::result::Result<T, CloudgraftError>;
