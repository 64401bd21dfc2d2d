//! Single-pass matrix scan
//!
//! Drives each column low in turn, lets the lines settle, samples the rows
//! and restores the column. One pass yields one [`ScanResult`].

use embedded_hal::delay::DelayNs;
use multitap_hal::{KeyMatrix, Level, MATRIX_COLS, MATRIX_ROWS};

use super::events::KeyId;

/// Outcome of one scan pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanResult {
    /// At least one switch is closed
    pub any_pressed: bool,
    /// More than one switch is closed
    pub ambiguous: bool,
    /// Row of the first closure (lowest row, then lowest column)
    ///
    /// Meaningless when `ambiguous` is set.
    pub row: u8,
    /// Column of the first closure
    pub col: u8,
}

impl ScanResult {
    /// Nothing pressed
    pub const NONE: ScanResult = ScanResult {
        any_pressed: false,
        ambiguous: false,
        row: 0,
        col: 0,
    };

    /// The single pressed key, if exactly one is closed
    pub fn key(&self) -> Option<KeyId> {
        (self.any_pressed && !self.ambiguous).then(|| KeyId::new(self.row, self.col))
    }

    fn record(&mut self, row: u8, col: u8) {
        if !self.any_pressed {
            self.any_pressed = true;
            self.row = row;
            self.col = col;
            return;
        }

        self.ambiguous = true;
        if (row, col) < (self.row, self.col) {
            self.row = row;
            self.col = col;
        }
    }
}

/// Column-by-column matrix scanner
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    /// Busy-wait between driving a column and sampling the rows
    settle_ns: u32,
}

impl Scanner {
    pub const fn new(settle_ns: u32) -> Self {
        Self { settle_ns }
    }

    pub const fn settle_ns(&self) -> u32 {
        self.settle_ns
    }

    /// Run one scan pass
    ///
    /// Every column is back at idle-high when this returns.
    pub fn scan<M: KeyMatrix, D: DelayNs>(&self, matrix: &mut M, delay: &mut D) -> ScanResult {
        let mut result = ScanResult::NONE;

        matrix.idle_columns();
        for col in 0..MATRIX_COLS {
            matrix.set_column_level(col, Level::Low);
            delay.delay_ns(self.settle_ns);
            let levels = matrix.read_row_levels();
            matrix.set_column_level(col, Level::High);

            for row in 0..MATRIX_ROWS {
                // Rows are pulled up; a closed switch reads low
                if levels & (1 << row) == 0 {
                    result.record(row as u8, col as u8);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockKeypad, NoDelay};

    fn scan(keypad: &mut MockKeypad) -> ScanResult {
        Scanner::new(500).scan(keypad, &mut NoDelay::default())
    }

    #[test]
    fn test_no_closure() {
        let mut keypad = MockKeypad::new();
        let result = scan(&mut keypad);
        assert_eq!(result, ScanResult::NONE);
        assert_eq!(result.key(), None);
    }

    #[test]
    fn test_single_closure() {
        let mut keypad = MockKeypad::new();
        keypad.press(2, 1);
        let result = scan(&mut keypad);
        assert!(result.any_pressed);
        assert!(!result.ambiguous);
        assert_eq!(result.key(), Some(KeyId::new(2, 1)));
    }

    #[test]
    fn test_two_closures_are_ambiguous() {
        let mut keypad = MockKeypad::new();
        keypad.press(3, 0);
        keypad.press(1, 2);
        let result = scan(&mut keypad);
        assert!(result.any_pressed);
        assert!(result.ambiguous);
        assert_eq!(result.key(), None);
        // Lowest row wins even though its column is scanned later
        assert_eq!((result.row, result.col), (1, 2));
    }

    #[test]
    fn test_same_column_closures_are_ambiguous() {
        let mut keypad = MockKeypad::new();
        keypad.press(0, 3);
        keypad.press(2, 3);
        let result = scan(&mut keypad);
        assert!(result.ambiguous);
        assert_eq!((result.row, result.col), (0, 3));
    }

    #[test]
    fn test_columns_idle_high_after_scan() {
        let mut keypad = MockKeypad::new();
        keypad.arm_columns();
        keypad.press(0, 0);
        scan(&mut keypad);
        assert!(keypad.all_columns(Level::High));
        assert_eq!(keypad.row_reads, MATRIX_COLS as u32);
    }

    #[test]
    fn test_settle_delay_per_column() {
        let mut keypad = MockKeypad::new();
        let mut delay = NoDelay::default();
        Scanner::new(250).scan(&mut keypad, &mut delay);
        assert_eq!(delay.total_ns, 250 * MATRIX_COLS as u64);
    }
}
