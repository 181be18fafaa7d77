//! Balance ledger: the conservation root.
//!
//! Maps each account to its spendable balance. All mutations are atomic:
//! either the full operation succeeds or every balance is unchanged.

use std::collections::HashMap;

use timelock_types::{AccountId, Amount, LedgerError, Result};

/// Per-account spendable balances.
///
/// Funds held in escrow are *not* counted here; they live in the
/// [`Vault`](crate::Vault) until claimed.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<AccountId, Amount>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Create a ledger holding the entire `supply` in `owner`'s account.
    #[must_use]
    pub fn with_genesis(owner: AccountId, supply: Amount) -> Self {
        let mut ledger = Self::new();
        ledger.credit(owner, supply);
        ledger
    }

    /// Balance of `account` (zero if never seen).
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Check that `account` can pay `amount` without touching state.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the balance is below `amount`.
    pub fn ensure_covers(&self, account: &AccountId, amount: Amount) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Remove `amount` from `account`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the balance is below `amount`.
    pub fn debit(&mut self, account: &AccountId, amount: Amount) -> Result<()> {
        self.ensure_covers(account, amount)?;
        if let Some(balance) = self.balances.get_mut(account) {
            *balance -= amount;
            if *balance == 0 {
                self.balances.remove(account);
            }
        }
        Ok(())
    }

    /// Add `amount` to `account`.
    pub fn credit(&mut self, account: AccountId, amount: Amount) {
        if amount == 0 {
            return;
        }
        *self.balances.entry(account).or_default() += amount;
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// - `SelfTransfer` if `from == to`, whatever the balance
    /// - `InsufficientBalance` if `from` cannot cover `amount`
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        if from == to {
            return Err(LedgerError::SelfTransfer { account: *from });
        }
        self.ensure_covers(from, amount)?;
        self.debit(from, amount)?;
        self.credit(*to, amount);
        Ok(())
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.balances.values().sum()
    }

    /// Accounts with a non-zero balance.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &Amount)> {
        self.balances.iter()
    }

    /// Number of accounts with a non-zero balance.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
