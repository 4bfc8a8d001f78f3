use thiserror::Error;

/// Errors reported by collaborator services.
///
/// HTTP adapters convert transport and payload failures into these
/// variants; the orchestration layer then folds them into a
/// [`crate::DiscoveryError`] signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request needs at least one input item.
    ///
    /// Callers should pre-filter input to avoid this condition.
    #[error("at least one input item is required")]
    EmptyInput,

    /// The service could not be reached.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The service answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },

    /// The service answered with an application-level error code.
    #[error("service returned {code}: {message}")]
    Upstream {
        /// Service status code, e.g. `"InvalidQuery"`.
        code: String,
        /// Service error message.
        message: String,
    },

    /// The payload did not have the expected shape.
    #[error("failed to parse response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
}

impl ServiceError {
    /// Whether the failure is a payload shape mismatch.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
