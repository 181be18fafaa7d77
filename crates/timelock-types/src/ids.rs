//! Identifiers used throughout the timelock ledger.
//!
//! Accounts are opaque 20-byte addresses. Reservations use UUIDv7 so that
//! ids sort by creation time.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Opaque identifier of a balance holder.
///
/// Displayed and serialized as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Deterministic account derived from a human-readable label.
    ///
    /// The same label always yields the same account, which keeps fixtures
    /// and config files readable (`AccountId::from_label("treasury")`).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"timelock:account:v1:");
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// First four bytes as hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.as_bytes()[..4])
    }
}

/// Random account for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl AccountId {
    #[must_use]
    pub fn random() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Failure to parse an [`AccountId`] from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAccountIdError {
    #[error("account id must be 40 hex characters, got {0}")]
    BadLength(usize),
    #[error("account id is not valid hex: {0}")]
    BadHex(String),
}

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(ParseAccountIdError::BadLength(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| ParseAccountIdError::BadHex(e.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ReservationId
// ---------------------------------------------------------------------------

/// Unique identifier for an escrow reservation. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReservationId(pub Uuid);

impl ReservationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rsv:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
