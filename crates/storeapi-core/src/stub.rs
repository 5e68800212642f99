//! In-process store backend for tests.
//!
//! [`StubContext`] holds a small catalog and answers queries the way the real
//! store does (exact kind and id match), so services can be exercised without
//! the Windows Runtime or the mock server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::context::{Context, Product, PRODUCT_KIND};
use crate::error::{ErrorCode, Result, StoreError};
use crate::purchase::{StorePurchaseCallback, StorePurchaseStatus};
use crate::user::sha256_hex;

/// How the stub answers JWT requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StubJwt {
    /// Returns the access token unchanged.
    #[default]
    Echo,
    /// Always returns this value.
    Fixed(String),
}

/// A product in the stub catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubProduct {
    kind: String,
    id: String,
    owned: bool,
    ownership_unreadable: bool,
    expiration: Option<DateTime<Utc>>,
    purchase_result: Option<(StorePurchaseStatus, i32)>,
}

impl StubProduct {
    /// A subscription add-on the user does not own.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: PRODUCT_KIND.to_string(),
            id: id.into(),
            owned: false,
            ownership_unreadable: false,
            expiration: None,
            purchase_result: None,
        }
    }

    /// Override the product kind.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Mark the product as owned, with its billing period ending at
    /// `expiration`.
    #[must_use]
    pub fn owned_until(mut self, expiration: DateTime<Utc>) -> Self {
        self.owned = true;
        self.expiration = Some(expiration);
        self
    }

    /// Make the ownership check fail as if the native runtime broke.
    #[must_use]
    pub fn with_unreadable_ownership(mut self) -> Self {
        self.ownership_unreadable = true;
        self
    }

    /// What the purchase flow reports. Without it the flow never completes.
    #[must_use]
    pub fn with_purchase_result(mut self, status: StorePurchaseStatus, error: i32) -> Self {
        self.purchase_result = Some((status, error));
        self
    }
}

impl Product for StubProduct {
    fn store_id(&self) -> &str {
        &self.id
    }

    fn is_in_user_collection(&self) -> Result<bool> {
        if self.ownership_unreadable {
            return Err(StoreError::runtime(format!(
                "ownership of {} cannot be read",
                self.id
            )));
        }
        Ok(self.owned)
    }

    fn current_expiration_date(&self) -> Result<DateTime<Utc>> {
        match (self.owned, self.expiration) {
            (true, Some(expiration)) => Ok(expiration),
            _ => Err(StoreError::new(
                ErrorCode::Unsubscribed,
                format!("product ID: {}", self.id),
            )),
        }
    }

    fn prompt_user_for_purchase(&self, callback: StorePurchaseCallback) {
        if let Some((status, error)) = self.purchase_result {
            callback(status, error);
        }
    }
}

/// Configurable in-process store backend.
#[derive(Debug, Clone, Default)]
pub struct StubContext {
    catalog: Vec<StubProduct>,
    jwt: StubJwt,
    user_hashes: Vec<String>,
    broken: bool,
    dialogs_window: Option<i32>,
}

impl StubContext {
    /// An empty store: no products, no users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `product` to the catalog. Adding the same id twice makes queries
    /// for it ambiguous.
    #[must_use]
    pub fn with_product(mut self, product: StubProduct) -> Self {
        self.catalog.push(product);
        self
    }

    /// Configure JWT generation.
    #[must_use]
    pub fn with_jwt(mut self, jwt: StubJwt) -> Self {
        self.jwt = jwt;
        self
    }

    /// Add a locally authenticated user by account name.
    #[must_use]
    pub fn with_user(mut self, account_name: &str) -> Self {
        self.user_hashes.push(sha256_hex(account_name));
        self
    }

    /// Add a locally authenticated user by the raw value the backend reports.
    #[must_use]
    pub fn with_user_hash(mut self, hash: impl Into<String>) -> Self {
        self.user_hashes.push(hash.into());
        self
    }

    /// Make every backend call fail as if the native runtime broke.
    #[must_use]
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// The window passed to [`Context::init_dialogs`], if any.
    #[must_use]
    pub fn dialogs_window(&self) -> Option<i32> {
        self.dialogs_window
    }

    fn check_runtime(&self) -> Result<()> {
        if self.broken {
            return Err(StoreError::runtime("stub runtime is broken"));
        }
        Ok(())
    }
}

#[async_trait]
impl Context for StubContext {
    type Product = StubProduct;
    type Window = i32;

    async fn get_products(&self, kinds: &[String], ids: &[String]) -> Result<Vec<StubProduct>> {
        self.check_runtime()?;
        Ok(self
            .catalog
            .iter()
            .filter(|p| kinds.contains(&p.kind) && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn generate_user_jwt(&self, token: &str, _user_id: &str) -> Result<String> {
        self.check_runtime()?;
        Ok(match &self.jwt {
            StubJwt::Echo => token.to_string(),
            StubJwt::Fixed(jwt) => jwt.clone(),
        })
    }

    async fn all_locally_authenticated_user_hashes(&self) -> Result<Vec<String>> {
        self.check_runtime()?;
        Ok(self.user_hashes.clone())
    }

    fn init_dialogs(&mut self, window: i32) -> Result<()> {
        self.dialogs_window = Some(window);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn query_matches_kind_and_id_exactly() {
        let ctx = StubContext::new()
            .with_product(StubProduct::new("addon"))
            .with_product(StubProduct::new("addon").with_kind("Consumable"))
            .with_product(StubProduct::new("other"));

        let found = ctx
            .get_products(&[PRODUCT_KIND.to_string()], &["addon".to_string()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].store_id(), "addon");
    }

    #[test]
    fn unowned_product_has_no_expiration() {
        let err = StubProduct::new("addon").current_expiration_date().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unsubscribed);
    }

    #[tokio::test]
    async fn broken_runtime_fails_every_call() {
        let ctx = StubContext::new().with_user("me").broken();
        let err = ctx.all_locally_authenticated_user_hashes().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Runtime);
    }
}
