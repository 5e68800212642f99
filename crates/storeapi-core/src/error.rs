//! Error taxonomy for the store services.
//!
//! Every failure in the commerce query path resolves to exactly one
//! [`ErrorCode`] before it crosses a process or language boundary. The numeric
//! values are part of the ABI contract and must stay in sync with the callers
//! on the other side (the Go agent and the Dart UI).

use std::panic::Location;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Closed set of error conditions reported by the store services.
///
/// All values are strictly negative except [`ErrorCode::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[repr(i32)]
pub enum ErrorCode {
    // Domain errors.
    /// The current user is not subscribed to the product.
    #[error("Current user not subscribed to this product.")]
    Unsubscribed = -128,
    /// The product query returned nothing.
    #[error("Query found no products.")]
    NoProductsFound = -127,
    /// The product query returned more than one product.
    #[error("Query found too many products.")]
    TooManyProductsFound = -126,
    /// The user info does not hold a valid hashed identifier.
    #[error("Invalid user info. Maybe not a real user session.")]
    InvalidUserInfo = -125,
    /// No locally authenticated user was found.
    #[error("No locally authenticated user could be found.")]
    NoLocalUser = -124,
    /// More than one locally authenticated user was found.
    #[error("Too many locally authenticated users.")]
    TooManyLocalUsers = -123,
    /// The backend generated an empty JWT.
    #[error("Empty user JWT was generated.")]
    EmptyJwt = -122,
    /// The product cannot be offered for purchase.
    #[error("Invalid product ID.")]
    InvalidProductId = -121,

    // ABI boundary errors.
    /// The caller-freeable buffer could not be allocated.
    #[error("Allocation failure.")]
    AllocationFailure = -10,
    /// An input string pointer was null.
    #[error("Input pointer cannot be null.")]
    NullInputPtr = -9,
    /// An input string exceeds the maximum length.
    #[error("Length too large.")]
    TooBigLength = -8,
    /// An input string is empty.
    #[error("Length cannot be zero.")]
    ZeroLength = -7,
    /// An output parameter pointer was null.
    #[error("Output parameter cannot be null.")]
    NullOutputPtr = -6,
    /// An input string length is negative.
    #[error("Length cannot be negative.")]
    NegativeLength = -5,

    // Runtime errors.
    /// The native runtime (or the mock server standing for it) failed.
    #[error("Error at the native runtime.")]
    Runtime = -2,
    /// Anything else.
    #[error("Unknown.")]
    Unknown = -1,

    /// Not an error.
    #[error("")]
    None = 0,
}

impl ErrorCode {
    /// The integer value that crosses the ABI.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether this is the single success value.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::None)
    }
}

/// A business-logic failure: the code, a free-text detail and the place it
/// was raised.
///
/// The detail is for diagnostics only. Callers must only rely on the code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[ERROR]: {code} {detail}\n{location}")]
pub struct StoreError {
    code: ErrorCode,
    detail: String,
    location: &'static Location<'static>,
}

impl StoreError {
    /// Create an error with a diagnostic detail, recording the caller location.
    #[must_use]
    #[track_caller]
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
            location: Location::caller(),
        }
    }

    /// Create an error carrying only a code.
    #[must_use]
    #[track_caller]
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, String::new())
    }

    /// Wrap a native runtime failure.
    #[must_use]
    #[track_caller]
    pub fn runtime(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::Runtime, err.to_string())
    }

    /// The contractual error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The diagnostic detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Where the error was raised.
    #[must_use]
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl From<ErrorCode> for StoreError {
    #[track_caller]
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_none_is_success() {
        let all = [
            ErrorCode::Unsubscribed,
            ErrorCode::NoProductsFound,
            ErrorCode::TooManyProductsFound,
            ErrorCode::InvalidUserInfo,
            ErrorCode::NoLocalUser,
            ErrorCode::TooManyLocalUsers,
            ErrorCode::EmptyJwt,
            ErrorCode::InvalidProductId,
            ErrorCode::AllocationFailure,
            ErrorCode::NullInputPtr,
            ErrorCode::TooBigLength,
            ErrorCode::ZeroLength,
            ErrorCode::NullOutputPtr,
            ErrorCode::NegativeLength,
            ErrorCode::Runtime,
            ErrorCode::Unknown,
        ];

        for code in all {
            assert!(!code.is_success(), "{code:?}");
            assert!(code.as_i32() < 0, "{code:?}");
        }
        assert!(ErrorCode::None.is_success());
        assert_eq!(ErrorCode::None.as_i32(), 0);
    }

    #[test]
    fn domain_codes_are_contiguous_from_minus_128() {
        assert_eq!(ErrorCode::Unsubscribed.as_i32(), -128);
        assert_eq!(ErrorCode::NoProductsFound.as_i32(), -127);
        assert_eq!(ErrorCode::EmptyJwt.as_i32(), -122);
        assert_eq!(ErrorCode::InvalidProductId.as_i32(), -121);
    }

    #[test]
    fn error_records_location_and_detail() {
        let err = StoreError::new(ErrorCode::NoProductsFound, "id=my-addon");
        assert_eq!(err.code(), ErrorCode::NoProductsFound);
        assert_eq!(err.detail(), "id=my-addon");
        assert!(err.location().file().ends_with("error.rs"));

        let text = err.to_string();
        assert!(text.contains("Query found no products."));
        assert!(text.contains("id=my-addon"));
    }

    #[test]
    fn runtime_wraps_foreign_errors() {
        let err = StoreError::runtime("connection refused");
        assert_eq!(err.code(), ErrorCode::Runtime);
        assert_eq!(err.detail(), "connection refused");
    }
}
