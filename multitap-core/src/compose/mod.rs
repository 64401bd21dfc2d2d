//! Multi-tap text composition
//!
//! [`TextComposer`] consumes decoded key events, keeps the text in an
//! [`EditBuffer`] and mirrors every change into the display grid.

pub mod buffer;
pub mod composer;
pub mod roundabout;

pub use buffer::{EditBuffer, BUFFER_CAPACITY};
pub use composer::{ComposerSink, TextComposer, CURSOR_GLYPH};
pub use roundabout::Roundabout;
