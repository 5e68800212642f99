//! Operations interesting to the background agent.

use chrono::DateTime;

use super::StoreService;
use crate::context::{Context, Product};
use crate::error::{ErrorCode, Result, StoreError};
use crate::user::UserInfo;

/// Expiration reported for a product the user never subscribed to: a date too
/// far in the past to be mistaken for a real one.
pub const NOT_SUBSCRIBED: i64 = i64::MIN;

/// Adds the background-agent operations on top of [`StoreService`]. Results
/// are plain values that cross ABI boundaries well.
#[derive(Debug)]
pub struct ServerStoreService<C> {
    store: StoreService<C>,
}

impl<C: Context> ServerStoreService<C> {
    /// Take ownership of `context`.
    #[must_use]
    pub const fn new(context: C) -> Self {
        Self {
            store: StoreService::new(context),
        }
    }

    /// The underlying product resolution service.
    pub fn store(&self) -> &StoreService<C> {
        &self.store
    }

    /// The hashed identity of the one locally authenticated user.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::NoLocalUser`] or [`ErrorCode::TooManyLocalUsers`] unless
    /// exactly one user is found, [`ErrorCode::InvalidUserInfo`] if the
    /// backend reports something that is not a hash.
    pub async fn current_user_info(&self) -> Result<UserInfo> {
        let mut hashes = self
            .store
            .context()
            .all_locally_authenticated_user_hashes()
            .await?;

        match hashes.len() {
            0 => Err(StoreError::new(
                ErrorCode::NoLocalUser,
                "no locally authenticated user could be found",
            )),
            1 => UserInfo::from_hash(hashes.swap_remove(0)),
            count => {
                tracing::warn!(count, "Too many locally authenticated users");
                Err(StoreError::new(
                    ErrorCode::TooManyLocalUsers,
                    format!("expected one but found {count} locally authenticated users"),
                ))
            }
        }
    }

    /// Generates the user store ID key (a.k.a. the JWT) for the server access
    /// `token` and the `user` whose id must be encoded in it.
    ///
    /// The token is passed through untouched; its shape is validated at the
    /// ABI boundary.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::NoLocalUser`] if `user` is empty, [`ErrorCode::EmptyJwt`]
    /// if the backend produced nothing.
    pub async fn generate_user_jwt(&self, token: &str, user: &UserInfo) -> Result<String> {
        if user.is_empty() {
            return Err(StoreError::new(
                ErrorCode::NoLocalUser,
                "user info has no id to encode in the JWT",
            ));
        }

        let jwt = self
            .store
            .context()
            .generate_user_jwt(token, user.id())
            .await?;
        if jwt.is_empty() {
            return Err(StoreError::from_code(ErrorCode::EmptyJwt));
        }

        tracing::debug!(jwt_len = jwt.len(), "Generated user JWT");
        Ok(jwt)
    }

    /// Seconds since the Unix epoch until the end of the current billing
    /// period, or [`NOT_SUBSCRIBED`] if the user doesn't own `product_id`.
    ///
    /// Not being subscribed is a steady state, not an error.
    ///
    /// # Errors
    ///
    /// Whatever resolving the product or reading its expiration fails with.
    pub async fn current_expiration_date(&self, product_id: &str) -> Result<i64> {
        let product = self.store.subscription_product(product_id).await?;
        if !product.is_in_user_collection()? {
            tracing::debug!(product_id, "User not subscribed");
            return Ok(NOT_SUBSCRIBED);
        }

        let expiration = product.current_expiration_date()?;
        // Whole seconds, truncated towards zero.
        Ok(expiration
            .signed_duration_since(DateTime::UNIX_EPOCH)
            .num_seconds())
    }
}
