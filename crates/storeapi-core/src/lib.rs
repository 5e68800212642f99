//! Microsoft Store subscription services.
//!
//! This crate wraps a store backend (the [`Context`]) with the rules the
//! background agent and the GUI rely on:
//!
//! - **Errors**: every failure maps to one [`ErrorCode`], carried by
//!   [`StoreError`] together with a diagnostic detail and the raise location.
//! - **Product resolution**: [`StoreService`] finds exactly one subscription
//!   add-on per product id.
//! - **Agent operations**: [`ServerStoreService`] hashes the local user
//!   identity, generates user JWTs and reports subscription expiration dates.
//! - **GUI operations**: [`ClientStoreService`] hands out [`AvailableProduct`]s,
//!   the only way to reach the native purchase flow.
//!
//! # Example
//!
//! ```
//! use storeapi_core::stub::{StubContext, StubProduct};
//! use storeapi_core::{ServerStoreService, NOT_SUBSCRIBED};
//!
//! # async fn example() -> storeapi_core::Result<()> {
//! let context = StubContext::new().with_product(StubProduct::new("my-addon"));
//! let service = ServerStoreService::new(context);
//!
//! assert_eq!(service.current_expiration_date("my-addon").await?, NOT_SUBSCRIBED);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod error;
pub mod purchase;
pub mod service;
pub mod stub;
pub mod user;

pub use context::{Context, Product, PRODUCT_KIND};
pub use error::{ErrorCode, Result, StoreError};
pub use purchase::{PurchaseCallback, PurchaseStatus, StorePurchaseCallback, StorePurchaseStatus};
pub use service::{
    AvailableProduct, ClientStoreService, ServerStoreService, StoreService, NOT_SUBSCRIBED,
};
pub use user::{sha256_hex, UserInfo, USER_ID_HEX_LEN};
