//! Multi-tap cycling state
//!
//! While a roundabout is pending, repeated presses of its key step through
//! that key's candidates. The composer holds `Option<Roundabout>`: `None`
//! is the inactive state, so an active cycle always has a key.

use crate::keypad::KeyId;

/// Pending multi-tap cycle on one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Roundabout {
    key: KeyId,
    position: usize,
}

impl Roundabout {
    /// Start cycling on `key` at its first candidate
    pub const fn start(key: KeyId) -> Self {
        Self { key, position: 0 }
    }

    pub const fn key(&self) -> KeyId {
        self.key
    }

    /// Index of the candidate currently shown
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Step to the next candidate, wrapping after the last one
    ///
    /// Returns the new position. A zero `count` leaves the position at 0.
    pub fn advance(&mut self, count: usize) -> usize {
        self.position = match count {
            0 => 0,
            n => (self.position + 1) % n,
        };
        self.position
    }
}
