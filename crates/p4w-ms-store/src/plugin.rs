//! Method call dispatch.

use crate::api::PlatformApi;
use crate::channel::{MethodCall, MethodResponse};
use crate::method::Method;

/// Answers calls on the [`CHANNEL_NAME`](crate::CHANNEL_NAME) channel with
/// the given platform API.
#[derive(Debug)]
pub struct Plugin<A> {
    api: A,
}

impl<A: PlatformApi> Plugin<A> {
    /// Create a plugin forwarding to `api`.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The platform API calls are forwarded to.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Handles one method call. Every failure becomes an error response.
    pub async fn handle_method_call(&self, call: &MethodCall) -> MethodResponse {
        tracing::debug!(method = %call.method, "Method call received");

        match Method::parse(call) {
            Ok(method) => method.call(&self.api).await,
            Err(err) => err.into_response(),
        }
    }
}
