//! Keypad input pipeline
//!
//! A row edge wakes the [`DebounceController`], which polls the matrix with
//! the [`Scanner`] until the key is released and turns each physical press
//! into a single [`KeyEvent`].

pub mod debounce;
pub mod events;
pub mod scanner;

pub use debounce::{DebounceController, Phase};
pub use events::{KeyEvent, KeyId, KeySink};
pub use scanner::{ScanResult, Scanner};
