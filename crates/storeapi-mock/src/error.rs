//! Mock context error types.

use storeapi_core::StoreError;

/// Errors talking to the store mock server.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// HTTP request failed or the response could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mock server answered with an error status.
    #[error("mock server error: {status} - {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

impl From<MockError> for StoreError {
    /// The mock server stands for the native runtime, so all its failures are
    /// runtime failures.
    #[track_caller]
    fn from(err: MockError) -> Self {
        tracing::error!(error = %err, "Store mock server call failed");
        Self::runtime(err)
    }
}
