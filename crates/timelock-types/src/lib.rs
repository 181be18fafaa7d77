//! # timelock-types
//!
//! Shared types, errors, and configuration for the **timelock** ledger.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`ReservationId`]
//! - **Amounts**: [`Amount`] (raw units of the smallest denomination)
//! - **Escrow model**: [`Reservation`], [`ReservationState`], [`ClaimReceipt`]
//! - **Time**: the [`Clock`] capability with [`SystemClock`] and [`ManualClock`]
//! - **Configuration**: [`LedgerConfig`], [`Denomination`]
//! - **Errors**: [`LedgerError`], [`AuditError`], [`ConfigError`] with `TL_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod reservation;

// Re-export all primary types at crate root for ergonomic imports:
//   use timelock_types::{AccountId, Reservation, LedgerError, ...};

pub use clock::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use reservation::*;

// Constants are accessed via `timelock_types::constants::FOO`
// (not re-exported to avoid name collisions).

/// Raw token amount in the smallest denomination unit.
///
/// The ledger never sees fractional values; [`Denomination`] only affects
/// how an amount is presented.
pub type Amount = u128;
