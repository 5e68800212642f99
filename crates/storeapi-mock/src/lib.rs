//! Store context talking to the Microsoft Store mock server.
//!
//! The mock server emulates the store runtime over REST so the agent and the
//! GUI can be exercised end to end without a store deployment.
//! DO NOT USE IN PRODUCTION.
//!
//! # Example
//!
//! ```no_run
//! use storeapi_core::ServerStoreService;
//! use storeapi_mock::{MockConfig, MockContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = MockContext::new(&MockConfig::new().with_endpoint("127.0.0.1:56567"))?;
//! let service = ServerStoreService::new(context);
//!
//! let expiration = service.current_expiration_date("A_NICE_ID").await?;
//! println!("expires at {expiration}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod context;
mod error;

pub use config::{MockConfig, ENDPOINT_ENV, TIMEOUT_ENV};
pub use context::{MockContext, MockProduct, PURCHASE_TRANSPORT_ERROR};
pub use error::MockError;
