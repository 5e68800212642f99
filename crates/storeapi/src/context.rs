//! The store backend the exported functions talk to.

use storeapi_core::Result;

/// The store mock server. Selected by the `ms-store-mock` feature, and the
/// only option where the Windows Runtime is missing.
#[cfg(any(feature = "ms-store-mock", not(target_os = "windows")))]
pub type DefaultContext = storeapi_mock::MockContext;

/// The Microsoft Store.
#[cfg(all(target_os = "windows", not(feature = "ms-store-mock")))]
pub type DefaultContext = storeapi_winrt::StoreContext;

/// Creates a fresh backend for one call.
///
/// # Errors
///
/// [`ErrorCode::Runtime`](storeapi_core::ErrorCode::Runtime) if the backend
/// cannot be reached.
#[cfg(any(feature = "ms-store-mock", not(target_os = "windows")))]
pub fn default_context() -> Result<DefaultContext> {
    Ok(storeapi_mock::MockContext::from_env()?)
}

/// Creates a fresh backend for one call.
///
/// # Errors
///
/// [`ErrorCode::Runtime`](storeapi_core::ErrorCode::Runtime) if the backend
/// cannot be reached.
#[cfg(all(target_os = "windows", not(feature = "ms-store-mock")))]
pub fn default_context() -> Result<DefaultContext> {
    storeapi_winrt::StoreContext::new()
}
