//! Store context over the Windows Runtime.
//!
//! Wraps `Windows.Services.Store.StoreContext` and the local user APIs behind
//! the [`Context`](storeapi_core::Context) capability set. This code talks to
//! the real store and is only testable from an app deployed through it; the
//! crate is empty on other platforms.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

#[cfg(target_os = "windows")]
mod store_context;

#[cfg(target_os = "windows")]
pub use store_context::{StoreContext, StoreProduct};
