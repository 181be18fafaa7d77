//! # Reservation: a time-locked escrow commitment
//!
//! A `Reservation` is created when a payer moves funds from their ledger
//! balance into the vault on behalf of a beneficiary. The funds become
//! claimable by the beneficiary once `unlock_time` has passed.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  time passes  ┌──────────┐  claim()  ┌──────────┐
//!   │ PENDING ├──────────────▶│ ELIGIBLE ├──────────▶│ RELEASED │
//!   └─────────┘               └──────────┘           └──────────┘
//! ```
//!
//! PENDING → ELIGIBLE is a pure function of the clock. ELIGIBLE → RELEASED
//! happens only through the beneficiary's own claim, which removes the
//! reservation from the registry. There is no cancellation path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, ReservationId};

/// Where a reservation sits in its lifecycle.
///
/// Transitions are **monotonic** (never go backwards):
/// - `Pending → Eligible` (unlock time reached)
/// - `Eligible → Released` (beneficiary claimed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationState {
    /// Still locked: `unlock_time > now`.
    Pending,
    /// Unlocked but not yet claimed.
    Eligible,
    /// Paid out to the beneficiary and removed from the registry.
    Released,
}

impl ReservationState {
    /// Can a reservation move from this state to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Eligible) | (Self::Eligible, Self::Released)
        )
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Eligible => write!(f, "ELIGIBLE"),
            Self::Released => write!(f, "RELEASED"),
        }
    }
}

/// Funds held in the vault for `beneficiary` until `unlock_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Globally unique reservation identifier.
    pub id: ReservationId,
    /// Account whose ledger balance funded this reservation.
    pub payer: AccountId,
    /// Account entitled to claim it.
    pub beneficiary: AccountId,
    /// Amount held in the vault.
    pub amount: Amount,
    /// When the reservation was created.
    pub created_at: DateTime<Utc>,
    /// Earliest instant at which the beneficiary may claim.
    pub unlock_time: DateTime<Utc>,
}

impl Reservation {
    /// Returns `true` once `now` has reached the unlock time.
    #[must_use]
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        self.unlock_time <= now
    }

    /// Lifecycle state as seen at `now`. Reservations still in the
    /// registry are never `Released`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> ReservationState {
        if self.is_eligible_at(now) {
            ReservationState::Eligible
        } else {
            ReservationState::Pending
        }
    }
}

/// Outcome of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Who claimed.
    pub beneficiary: AccountId,
    /// Total moved from the vault into the beneficiary's balance.
    pub payout: Amount,
    /// Reservations released by this claim.
    pub released: Vec<ReservationId>,
    /// Clock reading used for the eligibility check.
    pub claimed_at: DateTime<Utc>,
}
