//! Supply conservation invariant checker.
//!
//! Mathematical invariants enforced at every committed boundary:
//! ```text
//! Σ(balances) + vault == total_supply
//! vault == Σ(outstanding reservations)
//! ```
//!
//! `total_supply` is fixed when the ledger is created. If either identity
//! ever breaks, value has been created or destroyed and the ledger is no
//! longer trustworthy.

use timelock_ledger::{Ledger, ReservationRegistry, Vault};
use timelock_types::{Amount, AuditError};

/// Validates conservation against the fixed total supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyConservation {
    total_supply: Amount,
}

impl SupplyConservation {
    #[must_use]
    pub fn new(total_supply: Amount) -> Self {
        Self { total_supply }
    }

    /// The fixed supply every check is measured against.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Verify both conservation identities.
    ///
    /// # Errors
    /// - [`AuditError::SupplyMismatch`] if balances plus vault differ from the supply
    /// - [`AuditError::VaultMismatch`] if the vault differs from the reserved total
    pub fn verify(
        &self,
        ledger: &Ledger,
        vault: &Vault,
        registry: &ReservationRegistry,
    ) -> Result<(), AuditError> {
        let balances = ledger.total();
        let locked = vault.balance();
        if balances.checked_add(locked) != Some(self.total_supply) {
            let err = AuditError::SupplyMismatch {
                total_supply: self.total_supply,
                balances,
                vault: locked,
            };
            tracing::error!(error = %err, "conservation check failed");
            return Err(err);
        }

        let reserved = registry.total_reserved();
        if reserved != locked {
            let err = AuditError::VaultMismatch {
                vault: locked,
                reserved,
            };
            tracing::error!(error = %err, "conservation check failed");
            return Err(err);
        }
        Ok(())
    }
}
