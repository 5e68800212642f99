//! The production [`PlatformApi`].

use async_trait::async_trait;
use storeapi_core::{ClientStoreService, Context, PurchaseStatus, Result};

use crate::api::PlatformApi;
use crate::error::PluginError;

type ContextFactory<C> = Box<dyn Fn() -> Result<C> + Send + Sync>;
type WindowProvider<W> = Box<dyn Fn() -> W + Send + Sync>;

/// Forwards to the store services and the OS.
///
/// Every purchase gets a fresh backend from the context factory, anchored to
/// the window the provider returns at that moment.
pub struct StorePlatformApi<C: Context> {
    make_context: ContextFactory<C>,
    window: WindowProvider<C::Window>,
}

impl<C: Context> StorePlatformApi<C> {
    /// Create the API from a backend factory and a top level window provider.
    pub fn new<F, W>(make_context: F, window: W) -> Self
    where
        F: Fn() -> Result<C> + Send + Sync + 'static,
        W: Fn() -> C::Window + Send + Sync + 'static,
    {
        Self {
            make_context: Box::new(make_context),
            window: Box::new(window),
        }
    }
}

impl StorePlatformApi<storeapi::DefaultContext> {
    /// Create the API over the default store backend.
    pub fn with_default_context<W>(window: W) -> Self
    where
        W: Fn() -> <storeapi::DefaultContext as Context>::Window + Send + Sync + 'static,
    {
        Self::new(storeapi::default_context, window)
    }
}

impl<C: Context> std::fmt::Debug for StorePlatformApi<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorePlatformApi").finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: Context + 'static> PlatformApi for StorePlatformApi<C> {
    async fn launch_full_trust_process(&self) -> std::result::Result<(), PluginError> {
        launcher::launch(None)
    }

    async fn launch_full_trust_process_with_args(
        &self,
        args: &str,
    ) -> std::result::Result<(), PluginError> {
        launcher::launch(Some(args))
    }

    fn platform_version(&self) -> String {
        platform_version()
    }

    async fn purchase_subscription(
        &self,
        product_id: &str,
    ) -> std::result::Result<(PurchaseStatus, i32), PluginError> {
        let service = ClientStoreService::new((self.make_context)()?, (self.window)())?;
        let product = service.fetch_available_product(product_id).await?;
        Ok(product.purchase().await?)
    }
}

/// `"<OS> <version>"` for the running system.
#[must_use]
pub fn platform_version() -> String {
    #[cfg(target_os = "linux")]
    {
        let version = std::fs::read_to_string("/proc/sys/kernel/version")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        format!("Linux {version}")
    }

    #[cfg(target_os = "windows")]
    {
        "Windows 10+".to_string()
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        format!("{} unknown", std::env::consts::OS)
    }
}

#[cfg(target_os = "windows")]
mod launcher {
    use windows::core::HSTRING;
    use windows::ApplicationModel::{FullTrustLaunchResult, FullTrustProcessLauncher};

    use crate::error::PluginError;

    fn platform_error(err: &windows::core::Error) -> PluginError {
        PluginError::Platform(err.message().to_string())
    }

    pub(super) fn launch(args: Option<&str>) -> Result<(), PluginError> {
        let Some(args) = args else {
            return FullTrustProcessLauncher::LaunchFullTrustProcessForCurrentAppAsync()
                .and_then(|op| op.get())
                .map_err(|e| platform_error(&e));
        };

        let launch = FullTrustProcessLauncher::LaunchFullTrustProcessForCurrentAppWithArgumentsAsync(
            &HSTRING::from(args),
        )
        .and_then(|op| op.get())
        .map_err(|e| platform_error(&e))?;

        if launch.LaunchResult().map_err(|e| platform_error(&e))? == FullTrustLaunchResult::Success {
            return Ok(());
        }

        let hr = launch.ExtendedError().map_err(|e| platform_error(&e))?;
        Err(PluginError::native(hr.0))
    }
}

#[cfg(not(target_os = "windows"))]
mod launcher {
    use crate::error::PluginError;

    pub(super) fn launch(_args: Option<&str>) -> Result<(), PluginError> {
        Err(PluginError::Platform(
            "full trust processes can only be launched on Windows".to_string(),
        ))
    }
}
