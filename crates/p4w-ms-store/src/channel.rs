//! Method channel vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the channel, also reported as the code of every error response.
pub const CHANNEL_NAME: &str = "p4w_ms_store";

/// A call received from the GUI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    /// Name of the method.
    pub method: String,

    /// Arguments, `null` when absent.
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    /// Create a call.
    #[must_use]
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// The answer sent back to the GUI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum MethodResponse {
    /// The method succeeded, with an optional result.
    Success(Value),

    /// The method failed.
    Error {
        /// Always [`CHANNEL_NAME`].
        code: String,
        /// Human readable message.
        message: String,
    },

    /// The plugin does not know this method.
    NotImplemented,
}

impl MethodResponse {
    /// An error response on this channel.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            code: CHANNEL_NAME.to_string(),
            message: message.into(),
        }
    }
}

/// The methods this plugin answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMethod {
    /// `LaunchFullTrustProcess`
    Launch,
    /// `purchaseSubscription`
    PurchaseSubscription,
    /// `getPlatformVersion`
    PlatformVersion,
    /// Anything else.
    NotImplemented,
}

const METHODS: [(&str, ChannelMethod); 3] = [
    ("LaunchFullTrustProcess", ChannelMethod::Launch),
    ("purchaseSubscription", ChannelMethod::PurchaseSubscription),
    ("getPlatformVersion", ChannelMethod::PlatformVersion),
];

impl ChannelMethod {
    /// Looks up a method by its channel name. Unknown names are
    /// [`ChannelMethod::NotImplemented`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        METHODS
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(Self::NotImplemented, |(_, m)| *m)
    }

    /// The channel name of this method, empty for
    /// [`ChannelMethod::NotImplemented`].
    #[must_use]
    pub fn name(self) -> &'static str {
        METHODS
            .iter()
            .find(|(_, m)| *m == self)
            .map_or("", |(n, _)| n)
    }
}
