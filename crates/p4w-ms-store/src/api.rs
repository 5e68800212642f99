//! The native capabilities the methods forward to.

use async_trait::async_trait;
use storeapi_core::PurchaseStatus;

use crate::error::PluginError;

/// Calls straight into the platform. Argument checks happen before these are
/// reached.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Launches the full trust process associated with this application.
    async fn launch_full_trust_process(&self) -> Result<(), PluginError>;

    /// Launches the full trust process passing it the command line `args`.
    async fn launch_full_trust_process_with_args(&self, args: &str) -> Result<(), PluginError>;

    /// `"<OS> <version>"`.
    fn platform_version(&self) -> String;

    /// Runs the purchase flow for the subscription `product_id` and reports
    /// its outcome with the native error code.
    async fn purchase_subscription(
        &self,
        product_id: &str,
    ) -> Result<(PurchaseStatus, i32), PluginError>;
}
