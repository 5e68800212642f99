//! The capability set a store backend must provide.
//!
//! Three backends implement it: the real Windows Runtime store context, an
//! HTTP client talking to the store mock server, and the in-process
//! [`stub`](crate::stub) used by tests. Services take the backend by value and
//! own it exclusively.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::purchase::StorePurchaseCallback;

/// The only product kind the services care about: subscription add-ons.
pub const PRODUCT_KIND: &str = "Durable";

/// A single store product as seen by a backend.
///
/// The API is deliberately loose; the services tighten it up. In particular
/// [`Product::prompt_user_for_purchase`] is only reachable from high level
/// code through [`AvailableProduct`](crate::AvailableProduct).
pub trait Product: Send + Sync + 'static {
    /// The store identifier of this product.
    fn store_id(&self) -> &str;

    /// Whether the current user owns this product.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::Runtime`](crate::ErrorCode::Runtime) if ownership cannot
    /// be read. Never reported as "not owned".
    fn is_in_user_collection(&self) -> Result<bool>;

    /// End of the current billing period, for a subscription the user owns.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::Unsubscribed`](crate::ErrorCode::Unsubscribed) if
    /// no owned SKU carries collection data.
    fn current_expiration_date(&self) -> Result<DateTime<Utc>>;

    /// Starts the native purchase flow and returns immediately. The outcome
    /// arrives later through `callback`.
    fn prompt_user_for_purchase(&self, callback: StorePurchaseCallback);
}

/// A store backend.
#[async_trait]
pub trait Context: Send + Sync {
    /// The product descriptor this backend returns.
    type Product: Product;

    /// Handle of the window native dialogs are anchored to.
    type Window;

    /// Products matching any of `kinds` and any of `ids`. May be empty.
    async fn get_products(&self, kinds: &[String], ids: &[String]) -> Result<Vec<Self::Product>>;

    /// The user store ID key (a.k.a. the JWT) for the server access `token`,
    /// encoding `user_id` when it is not empty.
    async fn generate_user_jwt(&self, token: &str, user_id: &str) -> Result<String>;

    /// SHA-256 hashes of all locally authenticated users in this session.
    async fn all_locally_authenticated_user_hashes(&self) -> Result<Vec<String>>;

    /// Lets the backend render dialogs (purchase, authorization) on top of
    /// `window`.
    fn init_dialogs(&mut self, window: Self::Window) -> Result<()>;
}
