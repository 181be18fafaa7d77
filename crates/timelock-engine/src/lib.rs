//! # timelock-engine
//!
//! **Execution plane**: the claim engine, the [`TokenLedger`] facade that
//! owns all state, conservation auditing, and the serialized
//! [`SharedLedger`] handle.
//!
//! ## Architecture
//!
//! 1. **ClaimEngine**: releases every unlocked reservation of a beneficiary at once
//! 2. **TokenLedger**: one owned object exposing the ledger operations
//! 3. **SupplyConservation**: `Σ balances + vault == total supply`, `vault == Σ reservations`
//! 4. **SharedLedger**: single write lock serializing every mutation
//! 5. **LedgerSnapshot**: detached, serializable copy of committed state
//!
//! ## Reservation Lifecycle
//!
//! ```text
//! reserve() ──▶ PENDING ──(clock passes unlock_time)──▶ ELIGIBLE ──claim()──▶ RELEASED
//! ```
//!
//! "Now" always comes from the injected [`Clock`](timelock_types::Clock).

pub mod claim;
pub mod conservation;
pub mod shared;
pub mod snapshot;
pub mod token;

pub use claim::ClaimEngine;
pub use conservation::SupplyConservation;
pub use shared::SharedLedger;
pub use snapshot::{AllowanceEntry, LedgerSnapshot};
pub use token::TokenLedger;
