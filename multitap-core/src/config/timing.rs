//! Scan and commit timing
//!
//! The tick period is programmed into the board's periodic timer; the core
//! only counts ticks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use multitap_hal::MATRIX_COLS;

use super::ConfigError;

/// Column settle time before sampling the rows
pub const DEFAULT_SETTLE_NS: u32 = 1_000;

/// Polling tick period
pub const DEFAULT_TICK_PERIOD_MS: u16 = 10;

/// Idle ticks before a pending character is committed (1 s at 10 ms)
pub const DEFAULT_IDLE_COMMIT_TICKS: u16 = 100;

/// A full scan's settle time may use at most 1/N of a tick
const SETTLE_BUDGET_DIVISOR: u64 = 10;

/// Timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Busy-wait per column, in interrupt context
    pub settle_ns: u32,
    /// Periodic timer period
    pub tick_period_ms: u16,
    /// Ticks without a press before committing
    pub idle_commit_ticks: u16,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TimingConfig {
    pub const DEFAULT: TimingConfig = TimingConfig {
        settle_ns: DEFAULT_SETTLE_NS,
        tick_period_ms: DEFAULT_TICK_PERIOD_MS,
        idle_commit_ticks: DEFAULT_IDLE_COMMIT_TICKS,
    };

    /// Idle time before commit, in milliseconds
    pub const fn idle_commit_ms(&self) -> u32 {
        self.tick_period_ms as u32 * self.idle_commit_ticks as u32
    }

    /// Check the values are usable
    ///
    /// The settle delay runs inside the tick interrupt, so a whole scan's
    /// worth of it must stay well below one tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.idle_commit_ticks == 0 {
            return Err(ConfigError::ZeroIdleThreshold);
        }

        let scan_settle_ns = u64::from(self.settle_ns) * MATRIX_COLS as u64;
        let tick_ns = u64::from(self.tick_period_ms) * 1_000_000;
        if scan_settle_ns * SETTLE_BUDGET_DIVISOR > tick_ns {
            return Err(ConfigError::SettleTooLong);
        }

        Ok(())
    }

    /// Encode as postcard into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Decode from postcard and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let timing: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        timing.validate()?;
        Ok(timing)
    }
}
