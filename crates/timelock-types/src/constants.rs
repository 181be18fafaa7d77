//! System-wide constants for the timelock ledger.

/// Decimals assumed when a denomination does not state its own.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Largest decimal scale a denomination may declare (the display
/// conversion cannot represent more).
pub const MAX_DECIMALS: u8 = 28;

/// Seconds in one day, the usual unit for lock durations.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Crate version, reported when a ledger is created.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name used in log events.
pub const ENGINE_NAME: &str = "Timelock";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_package() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION.split('.').count(), 3);
        assert_eq!(ENGINE_NAME, "Timelock");
    }

    #[test]
    fn default_decimals_within_limit() {
        assert!(DEFAULT_DECIMALS <= MAX_DECIMALS);
    }
}
