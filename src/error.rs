//! Error types for backend I/O and viewer configuration.
//!
//! `ApiError`'s `Display` text doubles as the overlay message drawn on the
//! canvas, so variants read as short user-facing sentences.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure talking to the lighting backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (network, CORS, aborted).
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    /// The backend answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    /// The body did not match the expected shape.
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    /// No HTTP client exists in this build (non-browser target).
    #[error("backend not available in this build")]
    Unavailable,
}

/// Invalid viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
