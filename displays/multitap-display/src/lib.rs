//! Display abstraction and dirty-cell synchronizer for the multi-tap keypad
//!
//! This crate provides:
//! - `GlyphDriver` trait for character displays (HD44780-style LCDs etc.)
//! - `Glyph` cell content with a plain/tentative style
//! - `SyncedGrid`, an in-memory character grid that remembers what was last
//!   written to the hardware and flushes only the cells that changed
//!
//! # Architecture
//!
//! Interrupt-side code edits the grid freely: appends, backspaces and
//! arbitrary repositioning never touch the bus. A foreground loop calls
//! [`SyncedGrid::sync`] to push the difference to the display, one
//! reposition + write per changed cell.

#![no_std]

mod fmt;

pub mod backend;
pub mod grid;

// Re-export key types
pub use backend::{DisplayError, Glyph, GlyphDriver, GlyphStyle};
pub use grid::{sync_cells, CellSource, SyncedGrid, DISPLAY_COLS, DISPLAY_ROWS};
