//! Error types for the timelock ledger.
//!
//! All errors use the `TL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 2xx: Balance and allowance errors
//! - 3xx: Escrow / claim errors
//! - 8xx: Invariant audit failures
//! - 9xx: Configuration / I/O errors
//!
//! [`LedgerError`] is the closed set of reasons a ledger operation can be
//! rejected. Every rejection leaves ledger, vault and registry untouched.

use thiserror::Error;

use crate::{AccountId, Amount};

/// Why a ledger operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // =================================================================
    // Balance / Allowance Errors (2xx)
    // =================================================================
    /// The paying account's ledger balance is below the requested amount.
    #[error("TL_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Sender and recipient of a transfer are the same account.
    #[error("TL_ERR_201: Cannot transfer to the same account {account}")]
    SelfTransfer { account: AccountId },

    /// An owner tried to approve itself as spender.
    #[error("TL_ERR_210: Cannot approve the same account {account}")]
    SelfApproval { account: AccountId },

    /// The spender's allowance does not cover the requested amount.
    #[error("TL_ERR_211: Allowance too low: need {needed}, approved {approved}")]
    AllowanceTooLow { needed: Amount, approved: Amount },

    // =================================================================
    // Escrow Errors (3xx)
    // =================================================================
    /// None of the beneficiary's reservations has reached its unlock time.
    #[error("TL_ERR_300: Lock not expired for {beneficiary}: {pending} reservation(s) still locked")]
    LockNotExpired { beneficiary: AccountId, pending: usize },
}

impl LedgerError {
    /// Stable machine-readable code, e.g. `"TL_ERR_200"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "TL_ERR_200",
            Self::SelfTransfer { .. } => "TL_ERR_201",
            Self::SelfApproval { .. } => "TL_ERR_210",
            Self::AllowanceTooLow { .. } => "TL_ERR_211",
            Self::LockNotExpired { .. } => "TL_ERR_300",
        }
    }
}

/// Crate-wide `Result` alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Conservation audit failures. Any of these is a critical defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// `Σ balances + vault` drifted away from the fixed total supply.
    #[error(
        "TL_ERR_800: Supply invariant violation: balances {balances} + vault {vault} != total supply {total_supply}"
    )]
    SupplyMismatch {
        total_supply: Amount,
        balances: Amount,
        vault: Amount,
    },

    /// The vault no longer equals the sum of outstanding reservations.
    #[error("TL_ERR_801: Vault invariant violation: vault {vault} != reserved {reserved}")]
    VaultMismatch { vault: Amount, reserved: Amount },
}

/// Ledger construction / configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration is structurally valid but semantically wrong.
    #[error("TL_ERR_900: Configuration error: {0}")]
    Invalid(String),

    /// Serialization / deserialization error.
    #[error("TL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error reading a config file.
    #[error("TL_ERR_902: I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
