//! Operations interesting to GUI clients.

use chrono::Utc;
use tokio::sync::oneshot;

use super::StoreService;
use crate::context::{Context, Product};
use crate::error::{ErrorCode, Result, StoreError};
use crate::purchase::{PurchaseStatus, StorePurchaseStatus};

/// Adds the GUI operations on top of [`StoreService`].
#[derive(Debug)]
pub struct ClientStoreService<C> {
    store: StoreService<C>,
}

impl<C: Context> ClientStoreService<C> {
    /// Initializes the service with the top level `window` so the purchase
    /// dialog provided by the runtime can be rendered when needed.
    ///
    /// Prefer a window that lives as long as the app, so the handle is never
    /// reused.
    ///
    /// # Errors
    ///
    /// Whatever the backend fails with while initializing its dialogs.
    pub fn new(mut context: C, window: C::Window) -> Result<Self> {
        context.init_dialogs(window)?;
        Ok(Self {
            store: StoreService::new(context),
        })
    }

    /// The underlying product resolution service.
    pub fn store(&self) -> &StoreService<C> {
        &self.store
    }

    /// Returns the subscription product `product_id` if the user can purchase
    /// it.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::InvalidProductId`] if the user owns the product and its
    /// subscription has not expired yet, plus whatever resolving the product
    /// fails with.
    pub async fn fetch_available_product(
        &self,
        product_id: &str,
    ) -> Result<AvailableProduct<C::Product>> {
        let product = self.store.subscription_product(product_id).await?;
        if product.is_in_user_collection()? && product.current_expiration_date()? > Utc::now() {
            return Err(StoreError::new(
                ErrorCode::InvalidProductId,
                format!("product {product_id} is already an active subscription"),
            ));
        }

        Ok(AvailableProduct { product })
    }
}

/// A product the user can purchase.
///
/// Only [`ClientStoreService::fetch_available_product`] creates these, so the
/// purchase flow cannot be started on a product that was not checked first.
#[derive(Debug)]
pub struct AvailableProduct<P> {
    product: P,
}

impl<P: Product> AvailableProduct<P> {
    /// The store identifier of this product.
    pub fn store_id(&self) -> &str {
        self.product.store_id()
    }

    /// Requests the runtime to display the purchase flow. Returns early; the
    /// translated status and the native error code arrive through `callback`.
    ///
    /// Native dialogs require this to be called from the UI thread.
    pub fn prompt_user_for_purchase<F>(&self, callback: F)
    where
        F: FnOnce(PurchaseStatus, i32) + Send + 'static,
    {
        tracing::debug!(product_id = %self.product.store_id(), "Prompting user for purchase");
        self.product
            .prompt_user_for_purchase(Box::new(move |status: StorePurchaseStatus, error| {
                callback(PurchaseStatus::from(status), error);
            }));
    }

    /// Awaits the purchase flow started by
    /// [`prompt_user_for_purchase`](Self::prompt_user_for_purchase).
    ///
    /// # Errors
    ///
    /// [`ErrorCode::Runtime`] if the backend drops the callback without
    /// calling it.
    pub async fn purchase(&self) -> Result<(PurchaseStatus, i32)> {
        let (tx, rx) = oneshot::channel();
        self.prompt_user_for_purchase(move |status, error| {
            // The receiver only goes away if the caller stopped waiting.
            let _ = tx.send((status, error));
        });

        rx.await.map_err(|_| {
            StoreError::new(
                ErrorCode::Runtime,
                "purchase flow finished without reporting a result",
            )
        })
    }
}
