//! The escrow vault.
//!
//! A single pseudo-balance owned by the system. It is not an account and
//! cannot be reached by an ordinary transfer; only the reservation
//! registry deposits into it and only a claim releases from it.

use timelock_types::Amount;

/// Custody of all funds committed to outstanding reservations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vault {
    balance: Amount,
}

impl Vault {
    #[must_use]
    pub fn new() -> Self {
        Self { balance: 0 }
    }

    /// Funds currently held.
    #[must_use]
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Take custody of `amount`.
    pub fn deposit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    /// Give up custody of `amount`.
    ///
    /// Callers only release what the registry says is held, so `amount`
    /// never exceeds the balance while the vault and registry agree.
    pub fn release(&mut self, amount: Amount) {
        debug_assert!(
            amount <= self.balance,
            "vault release {amount} exceeds custody {}",
            self.balance
        );
        self.balance -= amount;
    }
}
