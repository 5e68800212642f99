//! Single-product resolution shared by the server and client services.

use crate::context::{Context, PRODUCT_KIND};
use crate::error::{ErrorCode, Result, StoreError};

/// A service abstracting the store context, capable of resolving the one
/// subscription product matching an id. Extended by
/// [`ServerStoreService`](super::ServerStoreService) and
/// [`ClientStoreService`](super::ClientStoreService).
#[derive(Debug)]
pub struct StoreService<C> {
    context: C,
}

impl<C: Context> StoreService<C> {
    /// Take ownership of `context`.
    #[must_use]
    pub const fn new(context: C) -> Self {
        Self { context }
    }

    /// The underlying store context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Returns the subscription add-on matching `id`.
    ///
    /// Exactly one product must match. Nothing is cached: every call queries
    /// the backend.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::InvalidProductId`] if `id` is empty.
    /// - [`ErrorCode::NoProductsFound`] / [`ErrorCode::TooManyProductsFound`]
    ///   if the query doesn't return exactly one product.
    /// - Whatever the backend fails with.
    pub async fn subscription_product(&self, id: &str) -> Result<C::Product> {
        if id.is_empty() {
            return Err(StoreError::new(
                ErrorCode::InvalidProductId,
                "product id cannot be empty",
            ));
        }

        let kinds = [PRODUCT_KIND.to_string()];
        let ids = [id.to_string()];
        let mut products = self.context.get_products(&kinds, &ids).await?;

        match products.len() {
            0 => {
                tracing::warn!(product_id = %id, "No products found");
                Err(StoreError::new(ErrorCode::NoProductsFound, format!("id={id}")))
            }
            1 => Ok(products.swap_remove(0)),
            count => {
                tracing::warn!(product_id = %id, count, "Too many products found");
                Err(StoreError::new(
                    ErrorCode::TooManyProductsFound,
                    format!("Expected one but found {count} products for id {id}"),
                ))
            }
        }
    }
}
