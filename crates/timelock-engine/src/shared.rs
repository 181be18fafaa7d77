//! Serialized access to a [`TokenLedger`] shared across threads.
//!
//! All state lives behind one global `RwLock`. Every mutating call holds
//! the write lock for its whole duration, so no two mutations interleave
//! and conservation holds at every point another thread can observe.
//! Queries take the read lock and see the last committed state.

use std::sync::Arc;

use parking_lot::RwLock;
use timelock_types::{
    AccountId, Amount, AuditError, ClaimReceipt, Clock, ConfigError, LedgerConfig, Reservation,
    ReservationId, ReservationState, Result,
};

use crate::{snapshot::LedgerSnapshot, token::TokenLedger};

/// Cloneable handle to one shared ledger.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<TokenLedger>>,
}

impl SharedLedger {
    #[must_use]
    pub fn new(token: TokenLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    /// Create the underlying ledger and wrap it.
    pub fn create(
        config: LedgerConfig,
        clock: impl Clock + 'static,
    ) -> std::result::Result<Self, ConfigError> {
        TokenLedger::create(config, clock).map(Self::new)
    }

    // =================================================================
    // Mutations (write lock)
    // =================================================================

    pub fn transfer(&self, caller: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        self.inner.write().transfer(caller, to, amount)
    }

    pub fn approve(&self, caller: AccountId, spender: AccountId, amount: Amount) -> Result<()> {
        self.inner.write().approve(caller, spender, amount)
    }

    pub fn transfer_from(
        &self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.inner.write().transfer_from(caller, from, to, amount)
    }

    pub fn reserve(
        &self,
        caller: AccountId,
        beneficiary: AccountId,
        amount: Amount,
        lock_secs: u64,
    ) -> Result<ReservationId> {
        self.inner
            .write()
            .reserve(caller, beneficiary, amount, lock_secs)
    }

    pub fn claim(&self, caller: AccountId) -> Result<ClaimReceipt> {
        self.inner.write().claim(caller)
    }

    // =================================================================
    // Queries (read lock)
    // =================================================================

    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.inner.read().owner()
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.inner.read().total_supply()
    }

    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.inner.read().balance_of(account)
    }

    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.inner.read().allowance(owner, spender)
    }

    #[must_use]
    pub fn claimable(&self, account: &AccountId) -> Amount {
        self.inner.read().claimable(account)
    }

    #[must_use]
    pub fn releasable(&self, account: &AccountId) -> Amount {
        self.inner.read().releasable(account)
    }

    #[must_use]
    pub fn locked_supply(&self) -> Amount {
        self.inner.read().locked_supply()
    }

    #[must_use]
    pub fn reservations_of(&self, account: &AccountId) -> Vec<(Reservation, ReservationState)> {
        self.inner.read().reservations_of(account)
    }

    /// Consistent copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(&*self.inner.read())
    }

    pub fn audit(&self) -> std::result::Result<(), AuditError> {
        self.inner.read().audit()
    }

    /// Run `f` against the committed state under one read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> R {
        f(&*self.inner.read())
    }
}
