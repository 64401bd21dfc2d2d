//! Board-agnostic core logic for the multi-tap keypad firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Matrix scanning and debounce state machine
//! - Multi-tap ("roundabout") text composition
//! - Cursor-addressable edit buffer
//! - Keypad layout and timing configuration
//! - Shared-state container tying interrupt handlers to the display

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod compose;
pub mod config;
pub mod device;
pub mod keypad;

#[cfg(test)]
pub(crate) mod testing;

pub use compose::{EditBuffer, TextComposer};
pub use config::{ConfigError, KeypadConfig};
pub use device::TextEntry;
pub use keypad::{DebounceController, KeyEvent, KeyId};
