//! C ABI exposing Microsoft Store subscription information.
//!
//! The background agent loads this library and calls:
//!
//! - `GetSubscriptionExpirationDate`: the end of the current billing period
//!   of a subscription add-on, as Unix seconds, or `i64::MIN` when the user
//!   is not subscribed.
//! - `GenerateUserJWT`: the user store ID key for a server access token, in
//!   a buffer the caller releases with `FreeUserJWT`.
//!
//! All functions return `0` on success and a negative
//! [`ErrorCode`](storeapi_core::ErrorCode) on failure. Errors and panics never
//! cross the boundary as anything else.
//!
//! The store backend is [`DefaultContext`]: the real Microsoft Store on
//! Windows, the store mock server with the `ms-store-mock` feature or on other
//! platforms.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod alloc;
mod context;
mod exports;
mod logging;
mod validate;

pub use context::{default_context, DefaultContext};
pub use exports::{
    subscription_expiration_date, user_jwt, FreeUserJWT, GenerateUserJWT,
    GetSubscriptionExpirationDate,
};
pub use validate::{MAX_PRODUCT_ID_LEN, MAX_TOKEN_LEN};
