//! Ledger construction parameters.
//!
//! A ledger is created from a [`LedgerConfig`]: who owns the initial mint,
//! how much is minted, and an optional [`Denomination`]. The denomination
//! is opaque to ledger mechanics; it only matters to presentation.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, ConfigError, constants};

/// Name, symbol and decimal scale of the token. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denomination {
    /// Human-readable token name (e.g., "MyToken").
    #[serde(default)]
    pub name: Option<String>,
    /// Ticker symbol (e.g., "MYT").
    #[serde(default)]
    pub symbol: Option<String>,
    /// Decimal places between raw units and display units.
    #[serde(default)]
    pub decimals: Option<u8>,
}

impl Denomination {
    /// Decimals in effect, falling back to [`constants::DEFAULT_DECIMALS`].
    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals.unwrap_or(constants::DEFAULT_DECIMALS)
    }

    /// Convert a raw amount into display units (`amount / 10^decimals`).
    ///
    /// Returns `None` when the amount does not fit a [`Decimal`] mantissa.
    #[must_use]
    pub fn to_display(&self, amount: Amount) -> Option<Decimal> {
        let raw = i128::try_from(amount).ok()?;
        Decimal::try_from_i128_with_scale(raw, u32::from(self.decimals())).ok()
    }
}

/// Everything needed to create a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Receives the entire initial supply and is reported by `owner()`.
    pub owner: AccountId,
    /// Fixed total supply, in raw units.
    pub initial_supply: Amount,
    /// Optional presentation metadata.
    #[serde(default)]
    pub denomination: Denomination,
}

impl LedgerConfig {
    /// `(name, symbol, decimals, supply)`.
    #[must_use]
    pub fn new(
        owner: AccountId,
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply: Amount,
    ) -> Self {
        Self {
            owner,
            initial_supply,
            denomination: Denomination {
                name: Some(name.into()),
                symbol: Some(symbol.into()),
                decimals: Some(decimals),
            },
        }
    }

    /// `(name, symbol, supply)` with the default decimals.
    #[must_use]
    pub fn named(
        owner: AccountId,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: Amount,
    ) -> Self {
        Self {
            owner,
            initial_supply,
            denomination: Denomination {
                name: Some(name.into()),
                symbol: Some(symbol.into()),
                decimals: None,
            },
        }
    }

    /// Supply only, no denomination metadata.
    #[must_use]
    pub fn supply_only(owner: AccountId, initial_supply: Amount) -> Self {
        Self {
            owner,
            initial_supply,
            denomination: Denomination::default(),
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject configurations that a ledger cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let denom = &self.denomination;
        if let Some(decimals) = denom.decimals {
            if decimals > constants::MAX_DECIMALS {
                return Err(ConfigError::Invalid(format!(
                    "decimals {decimals} exceeds maximum {}",
                    constants::MAX_DECIMALS
                )));
            }
        }
        if denom.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid("token name is empty".into()));
        }
        if denom.symbol.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("token symbol is empty".into()));
        }
        Ok(())
    }
}
