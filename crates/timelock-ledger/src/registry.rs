//! Reservation registry: per-beneficiary escrow commitments.
//!
//! `reserve` atomically debits the payer, credits the [`Vault`] and records
//! a [`Reservation`] under the beneficiary. A beneficiary may hold any
//! number of reservations at once, each with its own unlock time. The
//! registry makes no ordering promise between them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use timelock_types::{AccountId, Amount, Reservation, ReservationId, Result, unlock_time_after};

use crate::{ledger::Ledger, vault::Vault};

/// Outstanding reservations, keyed by beneficiary.
#[derive(Debug, Clone, Default)]
pub struct ReservationRegistry {
    by_beneficiary: HashMap<AccountId, Vec<Reservation>>,
}

impl ReservationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_beneficiary: HashMap::new(),
        }
    }

    /// Atomically move `amount` from `payer`'s balance into the vault and
    /// record a reservation for `beneficiary` unlocking `lock_secs` after `now`.
    ///
    /// Only the payer's ordinary ledger balance counts toward the check;
    /// reservations the payer holds as beneficiary are irrelevant.
    /// `payer == beneficiary` is allowed and simply self-locks funds.
    ///
    /// If the debit fails, no reservation is recorded and the vault is
    /// unchanged.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the payer can't cover `amount`.
    #[allow(clippy::too_many_arguments)]
    pub fn reserve(
        &mut self,
        ledger: &mut Ledger,
        vault: &mut Vault,
        payer: AccountId,
        beneficiary: AccountId,
        amount: Amount,
        now: DateTime<Utc>,
        lock_secs: u64,
    ) -> Result<ReservationId> {
        // Debit first: if this fails, nothing changes
        ledger.debit(&payer, amount)?;
        vault.deposit(amount);

        let reservation = Reservation {
            id: ReservationId::new(),
            payer,
            beneficiary,
            amount,
            created_at: now,
            unlock_time: unlock_time_after(now, lock_secs),
        };
        let id = reservation.id;

        tracing::info!(
            reservation = %id,
            payer = %payer,
            beneficiary = %beneficiary,
            amount = %amount,
            unlock_time = %reservation.unlock_time,
            "reservation created"
        );

        self.by_beneficiary
            .entry(beneficiary)
            .or_default()
            .push(reservation);
        Ok(id)
    }

    /// Remove and return every reservation for `beneficiary` that is
    /// eligible at `now`. Still-locked reservations stay in place.
    ///
    /// Returns an empty vector (and changes nothing) if none are eligible.
    pub fn take_eligible(&mut self, beneficiary: &AccountId, now: DateTime<Utc>) -> Vec<Reservation> {
        let Some(held) = self.by_beneficiary.get_mut(beneficiary) else {
            return Vec::new();
        };
        let (eligible, pending): (Vec<_>, Vec<_>) =
            held.drain(..).partition(|r| r.is_eligible_at(now));
        if pending.is_empty() {
            self.by_beneficiary.remove(beneficiary);
        } else {
            *held = pending;
        }
        eligible
    }

    /// Total entitlement of `beneficiary`, locked or not.
    #[must_use]
    pub fn claimable(&self, beneficiary: &AccountId) -> Amount {
        self.reservations_of(beneficiary)
            .iter()
            .map(|r| r.amount)
            .sum()
    }

    /// What a claim by `beneficiary` at `now` would pay out.
    #[must_use]
    pub fn releasable(&self, beneficiary: &AccountId, now: DateTime<Utc>) -> Amount {
        self.reservations_of(beneficiary)
            .iter()
            .filter(|r| r.is_eligible_at(now))
            .map(|r| r.amount)
            .sum()
    }

    /// Number of `beneficiary`'s reservations still locked at `now`.
    #[must_use]
    pub fn pending_count(&self, beneficiary: &AccountId, now: DateTime<Utc>) -> usize {
        self.reservations_of(beneficiary)
            .iter()
            .filter(|r| !r.is_eligible_at(now))
            .count()
    }

    /// Outstanding reservations for `beneficiary`, in no particular order.
    #[must_use]
    pub fn reservations_of(&self, beneficiary: &AccountId) -> &[Reservation] {
        self.by_beneficiary
            .get(beneficiary)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every outstanding reservation.
    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.by_beneficiary.values().flatten()
    }

    /// Sum of every outstanding reservation. Equals the vault balance.
    #[must_use]
    pub fn total_reserved(&self) -> Amount {
        self.iter().map(|r| r.amount).sum()
    }

    /// Number of outstanding reservations across all beneficiaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_beneficiary.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_beneficiary.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timelock_types::{LedgerError, constants::SECONDS_PER_DAY};

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn setup(supply: Amount) -> (ReservationRegistry, Ledger, Vault, AccountId) {
        let payer = AccountId::random();
        (
            ReservationRegistry::new(),
            Ledger::with_genesis(payer, supply),
            Vault::new(),
            payer,
        )
    }

    #[test]
    fn reserve_debits_payer_and_credits_vault() {
        let (mut reg, mut ledger, mut vault, payer) = setup(1_000);
        let ben = AccountId::random();

        let id = reg
            .reserve(&mut ledger, &mut vault, payer, ben, 100, t(0), SECONDS_PER_DAY)
            .unwrap();

        assert_eq!(ledger.balance_of(&payer), 900);
        assert_eq!(vault.balance(), 100);
        assert_eq!(reg.claimable(&ben), 100);
        let held = reg.reservations_of(&ben);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id, id);
        assert_eq!(held[0].payer, payer);
        assert_eq!(held[0].unlock_time, t(86_400));
    }

    #[test]
    fn reserve_insufficient_changes_nothing() {
        let (mut reg, mut ledger, mut vault, payer) = setup(50);
        let ben = AccountId::random();

        let err = reg
            .reserve(&mut ledger, &mut vault, payer, ben, 51, t(0), 10)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

        assert_eq!(ledger.balance_of(&payer), 50);
        assert_eq!(vault.balance(), 0);
        assert!(reg.is_empty());
    }

    #[test]
    fn held_reservations_do_not_fund_new_ones() {
        let (mut reg, mut ledger, mut vault, payer) = setup(100);
        let ben = AccountId::random();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 100, t(0), 10)
            .unwrap();

        // ben is owed 100 but has no ledger balance of their own
        let err = reg
            .reserve(&mut ledger, &mut vault, ben, payer, 1, t(0), 10)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { available: 0, .. }));
    }

    #[test]
    fn self_reservation_allowed() {
        let (mut reg, mut ledger, mut vault, payer) = setup(100);
        reg.reserve(&mut ledger, &mut vault, payer, payer, 30, t(0), 10)
            .unwrap();
        assert_eq!(ledger.balance_of(&payer), 70);
        assert_eq!(reg.claimable(&payer), 30);
    }

    #[test]
    fn claimable_counts_locked_and_unlocked() {
        let (mut reg, mut ledger, mut vault, payer) = setup(1_000);
        let ben = AccountId::random();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 100, t(0), 10)
            .unwrap();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 200, t(0), 1_000)
            .unwrap();

        assert_eq!(reg.claimable(&ben), 300);
        assert_eq!(reg.releasable(&ben, t(5)), 0);
        assert_eq!(reg.releasable(&ben, t(10)), 100);
        assert_eq!(reg.releasable(&ben, t(1_000)), 300);
        assert_eq!(reg.pending_count(&ben, t(10)), 1);
    }

    #[test]
    fn take_eligible_leaves_locked_ones() {
        let (mut reg, mut ledger, mut vault, payer) = setup(1_000);
        let ben = AccountId::random();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 100, t(0), 10)
            .unwrap();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 50, t(0), 20)
            .unwrap();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 200, t(0), 1_000)
            .unwrap();

        let taken = reg.take_eligible(&ben, t(20));
        assert_eq!(taken.iter().map(|r| r.amount).sum::<Amount>(), 150);
        assert_eq!(reg.claimable(&ben), 200);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn take_eligible_none_is_noop() {
        let (mut reg, mut ledger, mut vault, payer) = setup(1_000);
        let ben = AccountId::random();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 100, t(0), 10)
            .unwrap();

        assert!(reg.take_eligible(&ben, t(9)).is_empty());
        assert_eq!(reg.claimable(&ben), 100);
        assert!(reg.take_eligible(&AccountId::random(), t(9)).is_empty());
    }

    #[test]
    fn take_all_prunes_beneficiary() {
        let (mut reg, mut ledger, mut vault, payer) = setup(1_000);
        let ben = AccountId::random();
        reg.reserve(&mut ledger, &mut vault, payer, ben, 100, t(0), 0)
            .unwrap();
        assert_eq!(reg.take_eligible(&ben, t(0)).len(), 1);
        assert!(reg.is_empty());
        assert!(reg.reservations_of(&ben).is_empty());
    }

    #[test]
    fn total_reserved_tracks_vault() {
        let (mut reg, mut ledger, mut vault, payer) = setup(1_000);
        for amount in [10, 20, 30] {
            reg.reserve(
                &mut ledger,
                &mut vault,
                payer,
                AccountId::random(),
                amount,
                t(0),
                5,
            )
            .unwrap();
        }
        assert_eq!(reg.total_reserved(), 60);
        assert_eq!(reg.total_reserved(), vault.balance());
        assert_eq!(ledger.total() + vault.balance(), 1_000);
    }
}
