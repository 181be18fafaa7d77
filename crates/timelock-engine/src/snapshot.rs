//! Point-in-time copy of all ledger state.
//!
//! Snapshots are plain data: serializable, comparable, detached from the
//! live ledger. Presentation and persistence collaborators work from these.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timelock_types::{AccountId, Amount, Denomination, Reservation};

use crate::token::TokenLedger;

/// One `(owner, spender)` grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: Amount,
}

/// Consistent view of a [`TokenLedger`] at `taken_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owner: AccountId,
    pub denomination: Denomination,
    pub total_supply: Amount,
    pub locked_supply: Amount,
    pub taken_at: DateTime<Utc>,
    /// Non-zero balances.
    pub balances: BTreeMap<AccountId, Amount>,
    /// Non-zero allowances, sorted by `(owner, spender)`.
    pub allowances: Vec<AllowanceEntry>,
    /// Outstanding reservations, sorted by id.
    pub reservations: Vec<Reservation>,
}

impl LedgerSnapshot {
    /// Copy everything out of `token`.
    #[must_use]
    pub fn capture(token: &TokenLedger) -> Self {
        let balances = token
            .ledger()
            .accounts()
            .map(|(account, amount)| (*account, *amount))
            .collect();

        let mut allowances: Vec<_> = token
            .allowances()
            .entries()
            .map(|((owner, spender), amount)| AllowanceEntry {
                owner: *owner,
                spender: *spender,
                amount: *amount,
            })
            .collect();
        allowances.sort_by_key(|e| (e.owner, e.spender));

        let mut reservations: Vec<_> = token.registry().iter().cloned().collect();
        reservations.sort_by_key(|r| r.id);

        Self {
            owner: token.owner(),
            denomination: token.denomination().clone(),
            total_supply: token.total_supply(),
            locked_supply: token.locked_supply(),
            taken_at: token.now(),
            balances,
            allowances,
            reservations,
        }
    }

    /// Balance recorded for `account`.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// `Σ balances + locked == total_supply` as recorded in this snapshot.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        let balances: Amount = self.balances.values().sum();
        let reserved: Amount = self.reservations.iter().map(|r| r.amount).sum();
        balances.checked_add(self.locked_supply) == Some(self.total_supply)
            && reserved == self.locked_supply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timelock_types::{LedgerConfig, ManualClock};

    fn populated() -> (TokenLedger, AccountId, AccountId) {
        let owner = AccountId::from_label("owner");
        let alice = AccountId::from_label("alice");
        let mut token = TokenLedger::create(
            LedgerConfig::new(owner, "MyToken", "MYT", 2, 10_000),
            ManualClock::at_unix(0),
        )
        .unwrap();
        token.transfer(owner, alice, 500).unwrap();
        token.approve(alice, owner, 50).unwrap();
        token.reserve(owner, alice, 300, 60).unwrap();
        (token, owner, alice)
    }

    #[test]
    fn capture_reflects_state() {
        let (token, owner, alice) = populated();
        let snap = LedgerSnapshot::capture(&token);
        assert_eq!(snap.balance_of(&owner), 9_200);
        assert_eq!(snap.balance_of(&alice), 500);
        assert_eq!(snap.locked_supply, 300);
        assert_eq!(snap.allowances.len(), 1);
        assert_eq!(snap.allowances[0].amount, 50);
        assert_eq!(snap.reservations.len(), 1);
        assert!(snap.is_conserved());
    }

    #[test]
    fn snapshot_is_detached() {
        let (mut token, owner, alice) = populated();
        let snap = LedgerSnapshot::capture(&token);
        token.transfer(alice, owner, 500).unwrap();
        assert_eq!(snap.balance_of(&alice), 500);
        assert_eq!(token.balance_of(&alice), 0);
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let (token, _, _) = populated();
        let snap = LedgerSnapshot::capture(&token);
        let json = serde_json::to_string(&snap).unwrap();
        let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }
}
