//! Multitap Hardware Abstraction Layer
//!
//! This crate defines the capability set the keypad core needs from the
//! board. Chip-specific code implements these traits; the core never touches
//! registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  multitap-core (debounce, composer)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  multitap-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board glue (GPIO, EXTI, timer)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`matrix::KeyMatrix`] - Column drive / row sense of a 4x4 keypad
//! - [`irq::RowEdgeInterrupt`] - Wake-up edge sensing on the row lines
//! - [`irq::PeriodicTimer`] - Polling tick source
//! - [`ScanAdapter`] - Everything above bundled for the debounce controller

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod irq;
pub mod matrix;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, Level, OutputPin};
pub use irq::{PeriodicTimer, RowEdgeInterrupt};
pub use matrix::{KeyMatrix, PinMatrix, MATRIX_COLS, MATRIX_ROWS, ROW_MASK};

/// Full hardware capability set used by the keypad debounce logic
///
/// A board provides one value implementing all three traits; the core
/// depends on nothing else.
pub trait ScanAdapter: KeyMatrix + RowEdgeInterrupt + PeriodicTimer {}

// Blanket implementation for types that implement all three traits
impl<T: KeyMatrix + RowEdgeInterrupt + PeriodicTimer> ScanAdapter for T {}
