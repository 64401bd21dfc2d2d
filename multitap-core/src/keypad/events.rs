//! Decoded keypad events

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use multitap_hal::{MATRIX_COLS, MATRIX_ROWS};

/// Position of a key in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyId {
    pub row: u8,
    pub col: u8,
}

impl KeyId {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if the key lies inside the 4x4 matrix
    pub const fn in_matrix(&self) -> bool {
        (self.row as usize) < MATRIX_ROWS && (self.col as usize) < MATRIX_COLS
    }
}

/// Events produced by the debounce controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// A single key went down
    KeyDown(KeyId),
    /// Two or more keys were closed in the same scan
    Ambiguous,
    /// No key activity for the configured idle period
    Commit,
}

/// Consumer of [`KeyEvent`]s
pub trait KeySink {
    fn key_event(&mut self, event: KeyEvent);
}

/// Queue events for later dispatch; events beyond capacity are dropped
impl<const N: usize> KeySink for heapless::Vec<KeyEvent, N> {
    fn key_event(&mut self, event: KeyEvent) {
        if self.push(event).is_err() {
            warn!("key event queue full, dropping {}", event);
        }
    }
}
