//! # timelock-ledger
//!
//! **Accounting plane**: spendable balances, delegated-spend allowances,
//! the escrow vault, and the registry of time-locked reservations.
//!
//! ## Architecture
//!
//! 1. **Ledger**: spendable balance per account (the conservation root)
//! 2. **AllowanceTable**: `(owner, spender)` caps consumed by delegated transfers
//! 3. **Vault**: single pseudo-balance holding all escrowed funds
//! 4. **ReservationRegistry**: per-beneficiary reservations backed by the vault
//!
//! ## Escrow Flow
//!
//! ```text
//! reserve: Ledger.debit(payer) → Vault.deposit() → Registry.push(beneficiary)
//! claim:   Registry.take_eligible(beneficiary) → Vault.release() → Ledger.credit(beneficiary)
//! ```
//!
//! At every boundary `Σ Ledger + Vault == total supply` and
//! `Vault == Σ Registry`.

pub mod allowance;
pub mod ledger;
pub mod registry;
pub mod vault;

pub use allowance::AllowanceTable;
pub use ledger::Ledger;
pub use registry::ReservationRegistry;
pub use vault::Vault;
