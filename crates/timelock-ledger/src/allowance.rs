//! Delegated-spend authorizations.
//!
//! An owner grants a spender a cap with `approve`; `transfer_from`
//! consumes it. Approvals overwrite, they never accumulate.

use std::collections::HashMap;

use timelock_types::{AccountId, Amount, LedgerError, Result};

/// `(owner, spender) → remaining cap`.
#[derive(Debug, Clone, Default)]
pub struct AllowanceTable {
    allowances: HashMap<(AccountId, AccountId), Amount>,
}

impl AllowanceTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowances: HashMap::new(),
        }
    }

    /// Set `spender`'s cap over `owner`'s funds to exactly `amount`.
    ///
    /// # Errors
    /// Returns `SelfApproval` if `owner == spender`.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Amount) -> Result<()> {
        if owner == spender {
            return Err(LedgerError::SelfApproval { account: owner });
        }
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        Ok(())
    }

    /// Remaining cap (zero if never approved).
    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Check that `spender` may move `amount` of `owner`'s funds.
    ///
    /// # Errors
    /// Returns `AllowanceTooLow` if the cap is below `amount`.
    pub fn ensure_covers(&self, owner: &AccountId, spender: &AccountId, amount: Amount) -> Result<()> {
        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(LedgerError::AllowanceTooLow {
                needed: amount,
                approved,
            });
        }
        Ok(())
    }

    /// Decrease the cap by exactly `amount`.
    ///
    /// # Errors
    /// Returns `AllowanceTooLow` if the cap is below `amount`; the cap is
    /// left unchanged.
    pub fn consume(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount) -> Result<()> {
        self.ensure_covers(owner, spender, amount)?;
        let key = (*owner, *spender);
        if let Some(remaining) = self.allowances.get_mut(&key) {
            *remaining -= amount;
            if *remaining == 0 {
                self.allowances.remove(&key);
            }
        }
        Ok(())
    }

    /// All non-zero grants.
    pub fn entries(&self) -> impl Iterator<Item = (&(AccountId, AccountId), &Amount)> {
        self.allowances.iter()
    }

    /// Number of non-zero grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_sets_allowance() {
        let mut table = AllowanceTable::new();
        let owner = AccountId::random();
        let spender = AccountId::random();
        table.approve(owner, spender, 10).unwrap();
        assert_eq!(table.allowance(&owner, &spender), 10);
        // Direction matters
        assert_eq!(table.allowance(&spender, &owner), 0);
    }

    #[test]
    fn approve_overwrites() {
        let mut table = AllowanceTable::new();
        let owner = AccountId::random();
        let spender = AccountId::random();
        table.approve(owner, spender, 100).unwrap();
        table.approve(owner, spender, 30).unwrap();
        assert_eq!(table.allowance(&owner, &spender), 30);
        table.approve(owner, spender, 0).unwrap();
        assert_eq!(table.allowance(&owner, &spender), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn self_approval_rejected() {
        let mut table = AllowanceTable::new();
        let owner = AccountId::random();
        let err = table.approve(owner, owner, 10).unwrap_err();
        assert!(matches!(err, LedgerError::SelfApproval { .. }));
        assert_eq!(table.allowance(&owner, &owner), 0);
    }

    #[test]
    fn consume_decreases_exactly() {
        let mut table = AllowanceTable::new();
        let owner = AccountId::random();
        let spender = AccountId::random();
        table.approve(owner, spender, 50).unwrap();
        table.consume(&owner, &spender, 40).unwrap();
        assert_eq!(table.allowance(&owner, &spender), 10);
        table.consume(&owner, &spender, 10).unwrap();
        assert_eq!(table.allowance(&owner, &spender), 0);
    }

    #[test]
    fn consume_beyond_cap_fails_and_preserves() {
        let mut table = AllowanceTable::new();
        let owner = AccountId::random();
        let spender = AccountId::random();
        table.approve(owner, spender, 5).unwrap();
        let err = table.consume(&owner, &spender, 6).unwrap_err();
        assert_eq!(
            err,
            LedgerError::AllowanceTooLow {
                needed: 6,
                approved: 5
            }
        );
        assert_eq!(table.allowance(&owner, &spender), 5);
    }
}
