//! Claim engine: converts eligible reservations into spendable balance.
//!
//! A claim releases **every** reservation of the caller whose unlock time
//! has passed, in one atomic step:
//! 1. Read "now" from the injected clock
//! 2. Pull the eligible reservations out of the registry
//! 3. Release their total from the vault
//! 4. Credit the beneficiary's ledger balance
//!
//! If nothing is eligible the call fails with `LockNotExpired` and no
//! state is touched. Reservations still locked stay for a later claim.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use timelock_ledger::{Ledger, ReservationRegistry, Vault};
use timelock_types::{AccountId, Amount, ClaimReceipt, Clock, LedgerError, Result};

/// Resolves payable reservations against an injected clock.
#[derive(Debug, Clone)]
pub struct ClaimEngine {
    clock: Arc<dyn Clock>,
}

impl ClaimEngine {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current reading of the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Release all of `beneficiary`'s eligible reservations.
    ///
    /// # Errors
    /// Returns `LockNotExpired` if no reservation of `beneficiary` has
    /// reached its unlock time. Nothing changes in that case.
    pub fn claim(
        &self,
        ledger: &mut Ledger,
        vault: &mut Vault,
        registry: &mut ReservationRegistry,
        beneficiary: AccountId,
    ) -> Result<ClaimReceipt> {
        let now = self.now();
        let released = registry.take_eligible(&beneficiary, now);
        if released.is_empty() {
            let pending = registry.pending_count(&beneficiary, now);
            tracing::warn!(
                beneficiary = %beneficiary,
                pending,
                "claim rejected: nothing unlocked"
            );
            return Err(LedgerError::LockNotExpired {
                beneficiary,
                pending,
            });
        }

        let payout: Amount = released.iter().map(|r| r.amount).sum();
        vault.release(payout);
        ledger.credit(beneficiary, payout);

        tracing::info!(
            beneficiary = %beneficiary,
            payout = %payout,
            released = released.len(),
            remaining = registry.reservations_of(&beneficiary).len(),
            "reservations claimed"
        );

        Ok(ClaimReceipt {
            beneficiary,
            payout,
            released: released.into_iter().map(|r| r.id).collect(),
            claimed_at: now,
        })
    }

    /// What a claim by `beneficiary` would pay right now.
    #[must_use]
    pub fn releasable(&self, registry: &ReservationRegistry, beneficiary: &AccountId) -> Amount {
        registry.releasable(beneficiary, self.now())
    }
}
