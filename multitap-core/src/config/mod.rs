//! Configuration types
//!
//! Keypad layout, special-key bindings and timing. The whole set is checked
//! once at startup by [`KeypadConfig::validate`]; after that the core treats
//! it as immutable.

pub mod layout;
pub mod timing;

pub use layout::*;
pub use timing::*;

use crate::keypad::KeyId;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Key lies outside the 4x4 matrix
    KeyOutOfRange(KeyId),
    /// Two special functions are bound to the same key
    DuplicateBinding(KeyId),
    /// A special key also has layout candidates
    BindingShadowsCandidates(KeyId),
    /// Candidate is not printable ASCII
    NonPrintableCandidate(KeyId),
    /// Key has more than [`MAX_CANDIDATES`] candidates
    TooManyCandidates(KeyId),
    /// Same candidate appears twice on one key
    DuplicateCandidate(KeyId),
    /// Tick period of zero
    ZeroTickPeriod,
    /// Idle commit threshold of zero ticks
    ZeroIdleThreshold,
    /// Settle delay too long for the tick period
    SettleTooLong,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// Complete keypad configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadConfig {
    /// Candidate characters per key
    pub layout: Layout,
    /// Editing functions bound to keys
    pub specials: SpecialBindings,
    /// Scan and commit timing
    pub timing: TimingConfig,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeypadConfig {
    /// Phone-style layout with editing keys in the rightmost column
    pub const fn standard() -> Self {
        Self {
            layout: Layout::STANDARD,
            specials: SpecialBindings::STANDARD,
            timing: TimingConfig::DEFAULT,
        }
    }

    /// Check the layout, the bindings against the layout, and the timing
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.specials.validate(&self.layout)?;
        self.timing.validate()
    }
}
