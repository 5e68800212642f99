//! Diagnostics for the host process.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,storeapi=info";

static INIT: Once = Once::new();

/// Installs a stderr subscriber on first use. `RUST_LOG` overrides the
/// default filter. A subscriber already installed by the host wins.
pub fn init() {
    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| DEFAULT_FILTER.into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!("storeapi logging initialized");
        }
    });
}
