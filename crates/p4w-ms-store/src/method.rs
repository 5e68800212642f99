//! Type safe method calls.
//!
//! Each variant of [`Method`] carries the arguments of one channel method,
//! checked when the call is parsed. Running a method never looks at the raw
//! call again.

use serde_json::Value;

use crate::api::PlatformApi;
use crate::channel::{ChannelMethod, MethodCall, MethodResponse};
use crate::error::PluginError;

/// A parsed method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Launch the full trust process, with command line arguments if any.
    LaunchFullTrustProcess {
        /// `None` for no arguments.
        arguments: Option<String>,
    },

    /// Purchase a subscription.
    PurchaseSubscription {
        /// The store ID of the subscription add-on.
        product_id: String,
    },

    /// Report the platform name and version.
    PlatformVersion,

    /// Not handled by this plugin.
    NotImplemented,
}

impl Method {
    /// Checks the arguments of `call` against what its method expects.
    ///
    /// # Errors
    ///
    /// [`PluginError::InvalidArgument`] on argument mismatch.
    pub fn parse(call: &MethodCall) -> Result<Self, PluginError> {
        match ChannelMethod::from_name(&call.method) {
            ChannelMethod::Launch => Ok(Self::LaunchFullTrustProcess {
                arguments: launch_arguments(&call.arguments)?,
            }),
            ChannelMethod::PurchaseSubscription => match &call.arguments {
                Value::String(id) => Ok(Self::PurchaseSubscription {
                    product_id: id.clone(),
                }),
                _ => Err(PluginError::InvalidArgument(
                    "A <productId> string argument was expected".to_string(),
                )),
            },
            ChannelMethod::PlatformVersion => Ok(Self::PlatformVersion),
            ChannelMethod::NotImplemented => Ok(Self::NotImplemented),
        }
    }

    /// Runs the method against `api`.
    pub async fn call<A: PlatformApi + ?Sized>(&self, api: &A) -> MethodResponse {
        let outcome = match self {
            Self::LaunchFullTrustProcess { arguments: None } => api
                .launch_full_trust_process()
                .await
                .map(|()| Value::Null),
            Self::LaunchFullTrustProcess {
                arguments: Some(args),
            } => api
                .launch_full_trust_process_with_args(args)
                .await
                .map(|()| Value::Null),
            Self::PurchaseSubscription { product_id } => {
                api.purchase_subscription(product_id)
                    .await
                    .and_then(|(status, error)| {
                        if error < 0 {
                            return Err(PluginError::native(error));
                        }
                        tracing::info!(%product_id, %status, "Purchase flow finished");
                        Ok(Value::from(status.as_i8()))
                    })
            }
            Self::PlatformVersion => Ok(Value::String(api.platform_version())),
            Self::NotImplemented => return MethodResponse::NotImplemented,
        };

        match outcome {
            Ok(value) => MethodResponse::Success(value),
            Err(err) => err.into_response(),
        }
    }
}

/// Null or a string. An empty string means no arguments.
fn launch_arguments(arguments: &Value) -> Result<Option<String>, PluginError> {
    match arguments {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(PluginError::InvalidArgument(
            "LaunchFullTrustProcess requires null or string arguments".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(method: ChannelMethod, arguments: Value) -> Result<Method, PluginError> {
        Method::parse(&MethodCall::new(method.name(), arguments))
    }

    #[test]
    fn test_launch_without_arguments() {
        assert_eq!(
            parse(ChannelMethod::Launch, Value::Null).unwrap(),
            Method::LaunchFullTrustProcess { arguments: None }
        );
        assert_eq!(
            parse(ChannelMethod::Launch, json!("")).unwrap(),
            Method::LaunchFullTrustProcess { arguments: None }
        );
    }

    #[test]
    fn test_launch_with_arguments() {
        assert_eq!(
            parse(ChannelMethod::Launch, json!("--with=args --and more_args")).unwrap(),
            Method::LaunchFullTrustProcess {
                arguments: Some("--with=args --and more_args".to_string())
            }
        );
    }

    #[test]
    fn test_launch_wrong_arguments() {
        let err = parse(ChannelMethod::Launch, json!(42)).unwrap_err();
        assert!(matches!(err, PluginError::InvalidArgument(_)));
    }

    #[test]
    fn test_purchase_requires_a_string() {
        for arguments in [Value::Null, json!(7), json!(["A_NICE_ID"])] {
            let err = parse(ChannelMethod::PurchaseSubscription, arguments).unwrap_err();
            assert_eq!(err.to_string(), "A <productId> string argument was expected");
        }
    }

    #[test]
    fn test_unknown_method_ignores_arguments() {
        let method = Method::parse(&MethodCall::new("surely-not-implemented", json!(42)));
        assert_eq!(method.unwrap(), Method::NotImplemented);
    }
}
