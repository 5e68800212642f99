//! Plugin error types.

use storeapi_core::StoreError;

use crate::channel::MethodResponse;

/// Errors that end a method call.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The call arguments do not match what the method expects.
    #[error("{0}")]
    InvalidArgument(String),

    /// The store services failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A platform API failed or does not exist here.
    #[error("{0}")]
    Platform(String),
}

impl PluginError {
    /// A failure reported by the platform as a native error code.
    #[must_use]
    pub fn native(code: i32) -> Self {
        Self::Platform(native_error_message(code))
    }

    /// The error response sent back to the GUI.
    #[must_use]
    pub fn into_response(self) -> MethodResponse {
        match &self {
            Self::InvalidArgument(_) => tracing::warn!(error = %self, "Invalid method call"),
            Self::Store(err) => {
                tracing::warn!(code = err.code().as_i32(), location = %err.location(), "{}", err.code());
            }
            Self::Platform(_) => tracing::error!(error = %self, "Platform call failed"),
        }
        MethodResponse::error(self.to_string())
    }
}

#[cfg(target_os = "windows")]
fn native_error_message(code: i32) -> String {
    windows::core::Error::from(windows::core::HRESULT(code))
        .message()
        .to_string()
}

#[cfg(not(target_os = "windows"))]
fn native_error_message(code: i32) -> String {
    format!("native error {code:#010x}")
}
