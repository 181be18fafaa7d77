//! The token ledger: one owned object holding all ledger state.
//!
//! [`TokenLedger`] composes the balance ledger, allowance table, vault,
//! reservation registry and claim engine, and exposes only the defined
//! operations. Every entry point takes the acting account explicitly as
//! `caller`. Every operation either applies in full or fails with a
//! [`LedgerError`] leaving all state exactly as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use timelock_ledger::{AllowanceTable, Ledger, ReservationRegistry, Vault};
use timelock_types::{
    AccountId, Amount, AuditError, ClaimReceipt, Clock, ConfigError, Denomination, LedgerConfig,
    Reservation, ReservationId, ReservationState, Result, constants,
};

use crate::{claim::ClaimEngine, conservation::SupplyConservation};

/// Conservation-invariant token ledger with time-locked escrow.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    owner: AccountId,
    denomination: Denomination,
    ledger: Ledger,
    allowances: AllowanceTable,
    vault: Vault,
    registry: ReservationRegistry,
    claims: ClaimEngine,
    supply: SupplyConservation,
}

impl TokenLedger {
    /// Create a ledger, minting the whole supply to `config.owner`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn create(
        config: LedgerConfig,
        clock: impl Clock + 'static,
    ) -> std::result::Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(clock))
    }

    /// Like [`TokenLedger::create`], sharing an existing clock handle.
    pub fn with_clock(
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let LedgerConfig {
            owner,
            initial_supply,
            denomination,
        } = config;

        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            owner = %owner,
            supply = %initial_supply,
            name = denomination.name.as_deref().unwrap_or("-"),
            symbol = denomination.symbol.as_deref().unwrap_or("-"),
            "ledger created"
        );

        Ok(Self {
            owner,
            denomination,
            ledger: Ledger::with_genesis(owner, initial_supply),
            allowances: AllowanceTable::new(),
            vault: Vault::new(),
            registry: ReservationRegistry::new(),
            claims: ClaimEngine::new(clock),
            supply: SupplyConservation::new(initial_supply),
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    /// The account that received the initial mint.
    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    #[must_use]
    pub fn denomination(&self) -> &Denomination {
        &self.denomination
    }

    /// Fixed at creation; never changes.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.supply.total_supply()
    }

    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.ledger.balance_of(account)
    }

    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances.allowance(owner, spender)
    }

    /// Sum of all of `account`'s reservations, whether unlocked or not.
    #[must_use]
    pub fn claimable(&self, account: &AccountId) -> Amount {
        self.registry.claimable(account)
    }

    /// Same as [`TokenLedger::claimable`].
    #[must_use]
    pub fn locked_supply_of(&self, account: &AccountId) -> Amount {
        self.claimable(account)
    }

    /// What `claim` by `account` would pay out right now.
    #[must_use]
    pub fn releasable(&self, account: &AccountId) -> Amount {
        self.claims.releasable(&self.registry, account)
    }

    /// Total held in escrow across all beneficiaries.
    #[must_use]
    pub fn locked_supply(&self) -> Amount {
        self.vault.balance()
    }

    /// `account`'s outstanding reservations with their state at the
    /// current clock reading, oldest first.
    #[must_use]
    pub fn reservations_of(&self, account: &AccountId) -> Vec<(Reservation, ReservationState)> {
        let now = self.now();
        let mut held: Vec<_> = self
            .registry
            .reservations_of(account)
            .iter()
            .map(|r| (r.clone(), r.state_at(now)))
            .collect();
        held.sort_by_key(|(r, _)| r.id);
        held
    }

    /// Current reading of the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.claims.now()
    }

    /// Check both conservation identities.
    pub fn audit(&self) -> std::result::Result<(), AuditError> {
        self.supply.verify(&self.ledger, &self.vault, &self.registry)
    }

    pub(crate) fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) fn allowances(&self) -> &AllowanceTable {
        &self.allowances
    }

    pub(crate) fn registry(&self) -> &ReservationRegistry {
        &self.registry
    }

    // =================================================================
    // Mutations
    // =================================================================

    /// Move `amount` from `caller` to `to`.
    ///
    /// # Errors
    /// - `SelfTransfer` if `caller == to`
    /// - `InsufficientBalance` if `caller` can't cover `amount`
    pub fn transfer(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        self.ledger.transfer(&caller, &to, amount)?;
        tracing::debug!(from = %caller, to = %to, amount = %amount, "transfer");
        self.debug_check_conserved();
        Ok(())
    }

    /// Set `spender`'s allowance over `caller`'s funds to `amount`.
    ///
    /// # Errors
    /// Returns `SelfApproval` if `caller == spender`.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: Amount) -> Result<()> {
        self.allowances.approve(caller, spender, amount)?;
        tracing::debug!(owner = %caller, spender = %spender, amount = %amount, "approve");
        Ok(())
    }

    /// Move `amount` from `from` to `to` on `caller`'s allowance.
    ///
    /// # Errors
    /// - `AllowanceTooLow` if `allowance(from, caller) < amount`
    /// - `SelfTransfer` if `from == to`
    /// - `InsufficientBalance` if `from` can't cover `amount`
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        // Validate the allowance before touching balances
        self.allowances.ensure_covers(&from, &caller, amount)?;
        self.ledger.transfer(&from, &to, amount)?;
        self.allowances.consume(&from, &caller, amount)?;
        tracing::debug!(
            spender = %caller,
            from = %from,
            to = %to,
            amount = %amount,
            "transfer_from"
        );
        self.debug_check_conserved();
        Ok(())
    }

    /// Lock `amount` of `caller`'s balance in escrow for `beneficiary`,
    /// claimable `lock_secs` seconds from now.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `caller` can't cover `amount`.
    pub fn reserve(
        &mut self,
        caller: AccountId,
        beneficiary: AccountId,
        amount: Amount,
        lock_secs: u64,
    ) -> Result<ReservationId> {
        let now = self.now();
        let id = self.registry.reserve(
            &mut self.ledger,
            &mut self.vault,
            caller,
            beneficiary,
            amount,
            now,
            lock_secs,
        )?;
        self.debug_check_conserved();
        Ok(id)
    }

    /// Release every reservation of `caller` that has unlocked.
    ///
    /// # Errors
    /// Returns `LockNotExpired` if none has unlocked yet.
    pub fn claim(&mut self, caller: AccountId) -> Result<ClaimReceipt> {
        let receipt =
            self.claims
                .claim(&mut self.ledger, &mut self.vault, &mut self.registry, caller)?;
        self.debug_check_conserved();
        Ok(receipt)
    }

    #[cfg(debug_assertions)]
    fn debug_check_conserved(&self) {
        if let Err(err) = self.audit() {
            panic!("{err}");
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline]
    fn debug_check_conserved(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use timelock_types::{LedgerError, ManualClock};

    fn setup() -> (TokenLedger, ManualClock, AccountId) {
        let owner = AccountId::random();
        let clock = ManualClock::at_unix(1_700_000_000);
        let token = TokenLedger::create(
            LedgerConfig::named(owner, "MyToken", "MYT", 10_000_000),
            clock.clone(),
        )
        .unwrap();
        (token, clock, owner)
    }

    #[test]
    fn create_mints_to_owner() {
        let (token, _, owner) = setup();
        assert_eq!(token.owner(), owner);
        assert_eq!(token.balance_of(&owner), 10_000_000);
        assert_eq!(token.total_supply(), 10_000_000);
        assert_eq!(token.locked_supply(), 0);
        assert_eq!(token.denomination().symbol.as_deref(), Some("MYT"));
    }

    #[test]
    fn create_rejects_invalid_config() {
        let mut config = LedgerConfig::supply_only(AccountId::random(), 1);
        config.denomination.decimals = Some(99);
        assert!(TokenLedger::create(config, ManualClock::default()).is_err());
    }

    #[test]
    fn transfer_from_checks_allowance_first() {
        let (mut token, _, owner) = setup();
        let spender = AccountId::random();
        let broke = AccountId::random();
        token.approve(broke, spender, 5).unwrap();

        // Both allowance and balance are short: allowance wins
        let err = token.transfer_from(spender, broke, spender, 6).unwrap_err();
        assert!(matches!(err, LedgerError::AllowanceTooLow { .. }));

        // Allowance fine, balance short
        let err = token.transfer_from(spender, broke, spender, 5).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(token.allowance(&broke, &spender), 5);
        assert_eq!(token.balance_of(&owner), 10_000_000);
    }

    #[test]
    fn transfer_from_to_self_rejected_without_consuming() {
        let (mut token, _, owner) = setup();
        let spender = AccountId::random();
        token.approve(owner, spender, 100).unwrap();
        let err = token.transfer_from(spender, owner, owner, 10).unwrap_err();
        assert!(matches!(err, LedgerError::SelfTransfer { .. }));
        assert_eq!(token.allowance(&owner, &spender), 100);
    }

    #[test]
    fn spender_may_send_to_third_party() {
        let (mut token, _, owner) = setup();
        let spender = AccountId::random();
        let payee = AccountId::random();
        token.approve(owner, spender, 100).unwrap();
        token.transfer_from(spender, owner, payee, 60).unwrap();
        assert_eq!(token.balance_of(&payee), 60);
        assert_eq!(token.balance_of(&spender), 0);
        assert_eq!(token.allowance(&owner, &spender), 40);
    }

    #[test]
    fn reservations_of_reports_state() {
        let (mut token, clock, owner) = setup();
        let ben = AccountId::random();
        let early = token.reserve(owner, ben, 10, 60).unwrap();
        let late = token.reserve(owner, ben, 20, 3_600).unwrap();
        clock.advance_secs(120);

        let held = token.reservations_of(&ben);
        assert_eq!(held.len(), 2);
        assert_eq!(held[0].0.id, early);
        assert_eq!(held[0].1, ReservationState::Eligible);
        assert_eq!(held[1].0.id, late);
        assert_eq!(held[1].1, ReservationState::Pending);
        assert_eq!(token.releasable(&ben), 10);
        assert_eq!(token.locked_supply_of(&ben), 30);
    }

    #[test]
    fn audit_passes_after_mixed_operations() {
        let (mut token, clock, owner) = setup();
        let a = AccountId::random();
        let b = AccountId::random();
        token.transfer(owner, a, 1_000).unwrap();
        token.reserve(a, b, 400, 10).unwrap();
        token.approve(a, b, 100).unwrap();
        token.transfer_from(b, a, b, 100).unwrap();
        clock.advance_secs(10);
        token.claim(b).unwrap();
        assert!(token.audit().is_ok());
        assert_eq!(token.balance_of(&a), 500);
        assert_eq!(token.balance_of(&b), 500);
    }
}
