//! Purchase results shared with the calling application.

use std::fmt;

/// Result of a purchase flow, as agreed with the Dart `PurchaseStatus` enum.
///
/// This is a narrowed projection of the vendor status so that new vendor
/// members never leak to the UI. Keep the values in sync with the UI side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum PurchaseStatus {
    /// The purchase completed.
    Succeeded = 0,
    /// The user already owns the product.
    AlreadyPurchased = 1,
    /// The user dismissed the flow or the purchase did not complete.
    UserGaveUp = 2,
    /// The network failed during the purchase.
    NetworkError = 3,
    /// The store server failed during the purchase.
    ServerError = 4,
    /// Anything the store reported that we don't know about.
    Unknown = 5,
}

impl PurchaseStatus {
    /// The integer value reported to the UI.
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Succeeded => "succeeded",
            Self::AlreadyPurchased => "already purchased",
            Self::UserGaveUp => "user gave up",
            Self::NetworkError => "network error",
            Self::ServerError => "server error",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The vendor purchase status (`Windows.Services.Store.StorePurchaseStatus`).
///
/// The vendor may add members at any time, those land in [`Self::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorePurchaseStatus {
    /// `Succeeded`.
    Succeeded,
    /// `AlreadyPurchased`.
    AlreadyPurchased,
    /// `NotPurchased`.
    NotPurchased,
    /// `NetworkError`.
    NetworkError,
    /// `ServerError`.
    ServerError,
    /// A value this layer does not know.
    Other(i32),
}

impl StorePurchaseStatus {
    /// Parse the textual status reported by the store mock server.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Succeeded" => Self::Succeeded,
            "AlreadyPurchased" => Self::AlreadyPurchased,
            "NotPurchased" => Self::NotPurchased,
            "NetworkError" => Self::NetworkError,
            "ServerError" => Self::ServerError,
            _ => Self::Other(-1),
        }
    }
}

impl From<i32> for StorePurchaseStatus {
    fn from(raw: i32) -> Self {
        match raw {
            0 => Self::Succeeded,
            1 => Self::AlreadyPurchased,
            2 => Self::NotPurchased,
            3 => Self::NetworkError,
            4 => Self::ServerError,
            other => Self::Other(other),
        }
    }
}

impl From<StorePurchaseStatus> for PurchaseStatus {
    fn from(status: StorePurchaseStatus) -> Self {
        match status {
            StorePurchaseStatus::Succeeded => Self::Succeeded,
            StorePurchaseStatus::AlreadyPurchased => Self::AlreadyPurchased,
            StorePurchaseStatus::NotPurchased => Self::UserGaveUp,
            StorePurchaseStatus::NetworkError => Self::NetworkError,
            StorePurchaseStatus::ServerError => Self::ServerError,
            StorePurchaseStatus::Other(raw) => {
                tracing::warn!(raw, "Unrecognized store purchase status");
                Self::Unknown
            }
        }
    }
}

/// Receives the outcome of a purchase flow: the status and the native error
/// code (0 when there was none).
pub type PurchaseCallback = Box<dyn FnOnce(PurchaseStatus, i32) + Send + 'static>;

/// What a store context hands back when its purchase flow completes.
pub type StorePurchaseCallback = Box<dyn FnOnce(StorePurchaseStatus, i32) + Send + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vendor_statuses_translate() {
        assert_eq!(PurchaseStatus::from(StorePurchaseStatus::from(0)), PurchaseStatus::Succeeded);
        assert_eq!(
            PurchaseStatus::from(StorePurchaseStatus::from(1)),
            PurchaseStatus::AlreadyPurchased
        );
        assert_eq!(PurchaseStatus::from(StorePurchaseStatus::from(2)), PurchaseStatus::UserGaveUp);
        assert_eq!(PurchaseStatus::from(StorePurchaseStatus::from(3)), PurchaseStatus::NetworkError);
        assert_eq!(PurchaseStatus::from(StorePurchaseStatus::from(4)), PurchaseStatus::ServerError);
    }

    #[test]
    fn future_vendor_statuses_are_unknown() {
        for raw in [5, 42, -1, i32::MAX] {
            assert_eq!(
                PurchaseStatus::from(StorePurchaseStatus::from(raw)),
                PurchaseStatus::Unknown
            );
        }
        assert_eq!(
            PurchaseStatus::from(StorePurchaseStatus::from_name("SomethingNew")),
            PurchaseStatus::Unknown
        );
    }

    #[test]
    fn mock_server_names_parse() {
        assert_eq!(StorePurchaseStatus::from_name("NotPurchased"), StorePurchaseStatus::NotPurchased);
        assert_eq!(StorePurchaseStatus::from_name("ServerError"), StorePurchaseStatus::ServerError);
    }

    #[test]
    fn ui_values_are_stable() {
        assert_eq!(PurchaseStatus::Succeeded.as_i8(), 0);
        assert_eq!(PurchaseStatus::Unknown.as_i8(), 5);
    }
}
