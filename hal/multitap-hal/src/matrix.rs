//! Key matrix abstraction
//!
//! A 4x4 keypad is wired as four column outputs and four row inputs with
//! pull-ups. Driving one column low pulls down every row whose switch on
//! that column is closed.

use crate::gpio::{InputPin, Level, OutputPin};

/// Number of row lines
pub const MATRIX_ROWS: usize = 4;

/// Number of column lines
pub const MATRIX_COLS: usize = 4;

/// Mask covering every row bit returned by [`KeyMatrix::read_row_levels`]
pub const ROW_MASK: u8 = (1 << MATRIX_ROWS) - 1;

/// Column drive and row sense of a keypad matrix
pub trait KeyMatrix {
    /// Drive a single column line. Out-of-range columns are ignored.
    fn set_column_level(&mut self, col: usize, level: Level);

    /// Sample all row lines at once
    ///
    /// Bit `r` is set when row `r` reads high. Rows are active-low, so a
    /// closed switch on the driven column shows up as a cleared bit.
    fn read_row_levels(&mut self) -> u8;

    /// Drive every column to the same level
    fn set_all_columns(&mut self, level: Level) {
        for col in 0..MATRIX_COLS {
            self.set_column_level(col, level);
        }
    }

    /// Return every column to idle-high, the resting state between scans
    fn idle_columns(&mut self) {
        self.set_all_columns(Level::High);
    }

    /// Pull every column low so any closed switch pulls its row down
    ///
    /// This is the state the row-edge interrupt waits in.
    fn arm_columns(&mut self) {
        self.set_all_columns(Level::Low);
    }
}

/// [`KeyMatrix`] built from individual GPIO pins
pub struct PinMatrix<C, R> {
    cols: [C; MATRIX_COLS],
    rows: [R; MATRIX_ROWS],
}

impl<C: OutputPin, R: InputPin> PinMatrix<C, R> {
    /// Take ownership of the column outputs and row inputs
    ///
    /// Columns are driven high immediately so the matrix starts idle.
    pub fn new(cols: [C; MATRIX_COLS], rows: [R; MATRIX_ROWS]) -> Self {
        let mut matrix = Self { cols, rows };
        matrix.idle_columns();
        matrix
    }

    /// Release the pins
    pub fn free(self) -> ([C; MATRIX_COLS], [R; MATRIX_ROWS]) {
        (self.cols, self.rows)
    }
}

impl<C: OutputPin, R: InputPin> KeyMatrix for PinMatrix<C, R> {
    fn set_column_level(&mut self, col: usize, level: Level) {
        if let Some(pin) = self.cols.get_mut(col) {
            pin.set_level(level);
        }
    }

    fn read_row_levels(&mut self) -> u8 {
        self.rows
            .iter()
            .enumerate()
            .fold(0u8, |mask, (row, pin)| {
                if pin.is_high() {
                    mask | (1 << row)
                } else {
                    mask
                }
            })
    }
}
