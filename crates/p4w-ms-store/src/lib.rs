//! Method channel glue for the GUI.
//!
//! The GUI runtime sends named calls on the `p4w_ms_store` channel. This
//! crate parses them into typed [`Method`]s, forwards them to a
//! [`PlatformApi`] and turns every outcome into a [`MethodResponse`]:
//!
//! | method | arguments | success value |
//! |--------|-----------|---------------|
//! | `purchaseSubscription` | product ID string | [`PurchaseStatus`](storeapi_core::PurchaseStatus) as an integer |
//! | `LaunchFullTrustProcess` | null or command line string | null |
//! | `getPlatformVersion` | ignored | `"<OS> <version>"` |
//!
//! Anything else is answered with [`MethodResponse::NotImplemented`].
//!
//! # Example
//!
//! ```
//! use p4w_ms_store::{MethodCall, MethodResponse, Plugin, StorePlatformApi};
//! use serde_json::Value;
//! use storeapi_core::stub::StubContext;
//!
//! # async fn example() {
//! let api = StorePlatformApi::new(|| Ok(StubContext::new()), || 0);
//! let plugin = Plugin::new(api);
//!
//! let response = plugin
//!     .handle_method_call(&MethodCall::new("surely-not-implemented", Value::Null))
//!     .await;
//! assert_eq!(response, MethodResponse::NotImplemented);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod api;
mod channel;
mod error;
mod method;
mod platform;
mod plugin;

pub use api::PlatformApi;
pub use channel::{ChannelMethod, MethodCall, MethodResponse, CHANNEL_NAME};
pub use error::PluginError;
pub use method::Method;
pub use platform::{platform_version, StorePlatformApi};
pub use plugin::Plugin;
