//! Pseudonymous identity of the local user.

use sha2::{Digest, Sha256};

use crate::error::{ErrorCode, Result, StoreError};

/// Length of a hex-encoded SHA-256 digest.
pub const USER_ID_HEX_LEN: usize = 64;

/// The user information correlated with the contract server.
///
/// The id is either empty (no identifier could be obtained) or exactly
/// [`USER_ID_HEX_LEN`] hex characters. It is computed per call and never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    id: String,
}

impl UserInfo {
    /// Derive the user info from a human-readable account name.
    ///
    /// An empty name yields an empty id.
    #[must_use]
    pub fn from_account_name(name: &str) -> Self {
        if name.is_empty() {
            return Self::default();
        }
        Self {
            id: sha256_hex(name),
        }
    }

    /// Wrap an already hashed identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidUserInfo`] if `hash` is neither empty nor a
    /// 64 character hex string.
    pub fn from_hash(hash: impl Into<String>) -> Result<Self> {
        let id = hash.into();
        if id.is_empty() || is_hex_digest(&id) {
            return Ok(Self { id });
        }
        Err(StoreError::new(
            ErrorCode::InvalidUserInfo,
            format!("expected {USER_ID_HEX_LEN} hex characters, got {}", id.len()),
        ))
    }

    /// The hashed identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether no identifier could be obtained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Hex-encoded SHA-256 of the UTF-8 bytes of `input`.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

fn is_hex_digest(s: &str) -> bool {
    s.len() == USER_ID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}
