//! Dirty-cell character grid
//!
//! Keeps the desired screen content next to a mirror of what the hardware
//! was last sent. A cell is dirty exactly when the two differ, so a flush
//! touches only changed cells and an unchanged grid costs nothing.

use crate::backend::{DisplayError, Glyph, GlyphDriver};

/// Number of character rows on the reference display
pub const DISPLAY_ROWS: usize = 5;

/// Number of character columns on the reference display
pub const DISPLAY_COLS: usize = 9;

/// Character grid with a write head and per-cell dirty tracking
///
/// Edits never talk to the hardware. [`SyncedGrid::sync`] (or the
/// cell-wise [`pending`](SyncedGrid::pending) /
/// [`mark_flushed`](SyncedGrid::mark_flushed) pair) pushes the difference.
#[derive(Clone)]
pub struct SyncedGrid<const ROWS: usize = DISPLAY_ROWS, const COLS: usize = DISPLAY_COLS> {
    /// What the screen should show
    desired: [[Glyph; COLS]; ROWS],
    /// What the hardware was last sent
    flushed: [[Glyph; COLS]; ROWS],
    /// `desired != flushed`, per cell
    dirty: [[bool; COLS]; ROWS],
    /// Write head row; may run past the last row
    head_row: usize,
    /// Write head column, always `< COLS`
    head_col: usize,
}

impl<const ROWS: usize, const COLS: usize> Default for SyncedGrid<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize> SyncedGrid<ROWS, COLS> {
    /// Total number of cells
    pub const CELLS: usize = ROWS * COLS;

    /// Create a blank grid
    ///
    /// The hardware is assumed to have been cleared during its own
    /// initialization, so the grid starts clean. Call
    /// [`invalidate`](Self::invalidate) if that does not hold.
    pub const fn new() -> Self {
        Self {
            desired: [[Glyph::BLANK; COLS]; ROWS],
            flushed: [[Glyph::BLANK; COLS]; ROWS],
            dirty: [[false; COLS]; ROWS],
            head_row: 0,
            head_col: 0,
        }
    }

    /// Blank every cell and move the head home
    pub fn clear(&mut self) {
        for row in 0..ROWS {
            for col in 0..COLS {
                self.set_cell(row, col, Glyph::BLANK);
            }
        }
        self.head_row = 0;
        self.head_col = 0;
    }

    /// Write at the head and advance it, wrapping into the next row
    ///
    /// Writes past the last row are dropped but still advance the head, so
    /// a following [`backspace`](Self::backspace) stays in step.
    pub fn put(&mut self, glyph: Glyph) {
        if self.head_row < ROWS && self.head_col < COLS {
            self.set_cell(self.head_row, self.head_col, glyph);
        }

        if self.head_col + 1 < COLS {
            self.head_col += 1;
        } else {
            self.head_row = self.head_row.saturating_add(1);
            self.head_col = 0;
        }
    }

    /// Step the head back one cell and blank it
    ///
    /// Unwraps to the last column of the previous row. At the home position
    /// the head stays put and the home cell is blanked.
    pub fn backspace(&mut self) {
        if self.head_col > 0 {
            self.head_col -= 1;
        } else if self.head_row > 0 {
            self.head_row -= 1;
            self.head_col = COLS.saturating_sub(1);
        }

        if self.head_row < ROWS && self.head_col < COLS {
            self.set_cell(self.head_row, self.head_col, Glyph::BLANK);
        }
    }

    /// Reposition the head
    ///
    /// Columns past the row end are folded into following rows, so `goto`
    /// accepts the same coordinates `put` would have reached.
    pub fn goto(&mut self, row: usize, col: usize) {
        if COLS == 0 {
            return;
        }
        self.head_row = row.saturating_add(col / COLS);
        self.head_col = col % COLS;
    }

    /// Current head position as (row, col)
    pub fn head(&self) -> (usize, usize) {
        (self.head_row, self.head_col)
    }

    /// Desired glyph at a cell, if it exists
    pub fn glyph_at(&self, row: usize, col: usize) -> Option<Glyph> {
        self.desired.get(row)?.get(col).copied()
    }

    /// Check if the hardware already shows the desired content
    pub fn is_clean(&self) -> bool {
        self.dirty.iter().flatten().all(|d| !d)
    }

    /// Number of cells waiting to be flushed
    pub fn dirty_count(&self) -> usize {
        self.dirty.iter().flatten().filter(|d| **d).count()
    }

    /// Forget what the hardware shows and mark every cell for rewrite
    pub fn invalidate(&mut self) {
        for row in self.dirty.iter_mut() {
            row.fill(true);
        }
    }

    /// Dirty cell at a linear index, as (row, col, glyph)
    ///
    /// Returns `None` for clean or out-of-range indices.
    pub fn pending(&self, index: usize) -> Option<(usize, usize, Glyph)> {
        if COLS == 0 {
            return None;
        }
        let (row, col) = (index / COLS, index % COLS);
        if row >= ROWS || !self.dirty[row][col] {
            return None;
        }
        Some((row, col, self.desired[row][col]))
    }

    /// Record that `glyph` reached the hardware at (row, col)
    ///
    /// The cell stays dirty if it was edited again after `glyph` was read
    /// from [`pending`](Self::pending).
    pub fn mark_flushed(&mut self, row: usize, col: usize, glyph: Glyph) {
        if row < ROWS && col < COLS {
            self.flushed[row][col] = glyph;
            self.dirty[row][col] = self.desired[row][col] != glyph;
        }
    }

    /// Flush every dirty cell to the display
    ///
    /// Returns the number of glyphs written. On a driver error the failing
    /// cell stays dirty and the error is returned; cells already written
    /// remain clean, so the next call resumes where this one stopped.
    pub fn sync<D: GlyphDriver>(&mut self, driver: &mut D) -> Result<usize, DisplayError> {
        sync_cells(self, driver)
    }

    fn set_cell(&mut self, row: usize, col: usize, glyph: Glyph) {
        self.desired[row][col] = glyph;
        self.dirty[row][col] = self.flushed[row][col] != glyph;
    }
}

/// Cell-wise view of a grid for [`sync_cells`]
///
/// Lets a grid kept behind a lock be flushed one cell at a time, so the
/// lock is never held across a hardware transaction.
pub trait CellSource {
    /// Number of addressable cells
    fn cell_count(&self) -> usize;

    /// Dirty cell at a linear index, as (row, col, glyph)
    fn pending(&mut self, index: usize) -> Option<(usize, usize, Glyph)>;

    /// Record that `glyph` reached the hardware at (row, col)
    fn mark_flushed(&mut self, row: usize, col: usize, glyph: Glyph);
}

impl<const ROWS: usize, const COLS: usize> CellSource for SyncedGrid<ROWS, COLS> {
    fn cell_count(&self) -> usize {
        Self::CELLS
    }

    fn pending(&mut self, index: usize) -> Option<(usize, usize, Glyph)> {
        SyncedGrid::pending(self, index)
    }

    fn mark_flushed(&mut self, row: usize, col: usize, glyph: Glyph) {
        SyncedGrid::mark_flushed(self, row, col, glyph);
    }
}

/// Write every dirty cell of `source` to `driver`
///
/// Returns the number of glyphs written and stops at the first driver
/// error, leaving that cell dirty.
pub fn sync_cells<S, D>(source: &mut S, driver: &mut D) -> Result<usize, DisplayError>
where
    S: CellSource + ?Sized,
    D: GlyphDriver,
{
    let mut written = 0;
    for index in 0..source.cell_count() {
        if let Some((row, col, glyph)) = source.pending(index) {
            flush_cell(driver, row, col, glyph)?;
            source.mark_flushed(row, col, glyph);
            written += 1;
        }
    }
    if written > 0 {
        trace!("display sync wrote {} cells", written);
    }
    Ok(written)
}

/// Issue the reposition + write pair for one cell
fn flush_cell<D: GlyphDriver>(
    driver: &mut D,
    row: usize,
    col: usize,
    glyph: Glyph,
) -> Result<(), DisplayError> {
    let (Ok(row_u8), Ok(col_u8)) = (u8::try_from(row), u8::try_from(col)) else {
        return Err(DisplayError::InvalidCoordinates);
    };
    driver.reposition(row_u8, col_u8).and_then(|()| driver.write_glyph(glyph)).map_err(|e| {
        warn!("display write failed at ({}, {})", row, col);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    /// Records every transaction; optionally fails after a budget of writes
    #[derive(Default)]
    struct RecordingDriver {
        ops: Vec<(u8, u8, Glyph), 64>,
        pos: (u8, u8),
        fail_after: Option<usize>,
    }

    impl GlyphDriver for RecordingDriver {
        fn reposition(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
            self.pos = (row, col);
            Ok(())
        }

        fn write_glyph(&mut self, glyph: Glyph) -> Result<(), DisplayError> {
            if self.fail_after == Some(self.ops.len()) {
                return Err(DisplayError::Communication);
            }
            self.ops
                .push((self.pos.0, self.pos.1, glyph))
                .map_err(|_| DisplayError::Communication)
        }
    }

    type Grid = SyncedGrid<2, 3>;

    #[test]
    fn test_new_grid_is_clean() {
        let mut grid = Grid::new();
        let mut driver = RecordingDriver::default();
        assert!(grid.is_clean());
        assert_eq!(grid.sync(&mut driver), Ok(0));
        assert!(driver.ops.is_empty());
    }

    #[test]
    fn test_put_wraps_into_next_row() {
        let mut grid = Grid::new();
        for &c in b"abcd" {
            grid.put(Glyph::plain(c));
        }
        assert_eq!(grid.glyph_at(0, 2), Some(Glyph::plain(b'c')));
        assert_eq!(grid.glyph_at(1, 0), Some(Glyph::plain(b'd')));
        assert_eq!(grid.head(), (1, 1));
    }

    #[test]
    fn test_put_past_last_row_dropped_but_head_advances() {
        let mut grid = Grid::new();
        for _ in 0..Grid::CELLS {
            grid.put(Glyph::plain(b'x'));
        }
        assert_eq!(grid.head(), (2, 0));

        grid.put(Glyph::plain(b'y'));
        assert_eq!(grid.head(), (2, 1));
        assert_eq!(grid.dirty_count(), Grid::CELLS);

        // Backing up over the dropped write does not touch visible cells
        grid.backspace();
        assert_eq!(grid.head(), (2, 0));
        assert_eq!(grid.glyph_at(1, 2), Some(Glyph::plain(b'x')));

        grid.backspace();
        assert_eq!(grid.head(), (1, 2));
        assert_eq!(grid.glyph_at(1, 2), Some(Glyph::BLANK));
    }

    #[test]
    fn test_backspace_unwraps_to_previous_row() {
        let mut grid = Grid::new();
        for &c in b"abcd" {
            grid.put(Glyph::plain(c));
        }
        grid.backspace();
        grid.backspace();
        assert_eq!(grid.head(), (0, 2));
        assert_eq!(grid.glyph_at(0, 2), Some(Glyph::BLANK));
        assert_eq!(grid.glyph_at(1, 0), Some(Glyph::BLANK));
    }

    #[test]
    fn test_backspace_at_home_stays_home() {
        let mut grid = Grid::new();
        grid.put(Glyph::plain(b'a'));
        grid.goto(0, 0);
        grid.backspace();
        assert_eq!(grid.head(), (0, 0));
        assert_eq!(grid.glyph_at(0, 0), Some(Glyph::BLANK));
    }

    #[test]
    fn test_goto_folds_overlong_column() {
        let mut grid = Grid::new();
        grid.goto(0, 4);
        assert_eq!(grid.head(), (1, 1));
        grid.put(Glyph::plain(b'z'));
        assert_eq!(grid.glyph_at(1, 1), Some(Glyph::plain(b'z')));
    }

    #[test]
    fn test_clear_then_puts_flush_exactly_once() {
        let mut grid = Grid::new();
        let mut driver = RecordingDriver::default();

        grid.clear();
        for &c in b"hey" {
            grid.put(Glyph::plain(c));
        }
        assert_eq!(grid.sync(&mut driver), Ok(3));
        assert_eq!(driver.ops.len(), 3);
        assert_eq!(driver.ops[0], (0, 0, Glyph::plain(b'h')));
        assert_eq!(driver.ops[2], (0, 2, Glyph::plain(b'y')));

        assert_eq!(grid.sync(&mut driver), Ok(0));
        assert_eq!(driver.ops.len(), 3);
    }

    #[test]
    fn test_rewrite_with_flushed_value_is_clean() {
        let mut grid = Grid::new();
        let mut driver = RecordingDriver::default();
        grid.put(Glyph::plain(b'a'));
        grid.sync(&mut driver).unwrap();

        grid.goto(0, 0);
        grid.put(Glyph::tentative(b'a'));
        assert_eq!(grid.dirty_count(), 1);

        grid.goto(0, 0);
        grid.put(Glyph::plain(b'a'));
        assert!(grid.is_clean());
    }

    #[test]
    fn test_failed_write_stays_dirty_and_resumes() {
        let mut grid = Grid::new();
        let mut driver = RecordingDriver {
            fail_after: Some(1),
            ..Default::default()
        };
        for &c in b"abc" {
            grid.put(Glyph::plain(c));
        }

        assert_eq!(grid.sync(&mut driver), Err(DisplayError::Communication));
        assert_eq!(grid.dirty_count(), 2);

        driver.fail_after = None;
        assert_eq!(grid.sync(&mut driver), Ok(2));
        assert!(grid.is_clean());
    }

    #[test]
    fn test_mark_flushed_keeps_newer_edit_dirty() {
        let mut grid = Grid::new();
        grid.put(Glyph::plain(b'a'));
        let (row, col, glyph) = grid.pending(0).unwrap();

        // Edited again before the write was acknowledged
        grid.goto(0, 0);
        grid.put(Glyph::plain(b'b'));

        grid.mark_flushed(row, col, glyph);
        assert_eq!(grid.pending(0), Some((0, 0, Glyph::plain(b'b'))));
    }

    #[test]
    fn test_invalidate_marks_all_cells() {
        let mut grid = Grid::new();
        let mut driver = RecordingDriver::default();
        grid.invalidate();
        assert_eq!(grid.sync(&mut driver), Ok(Grid::CELLS));
        assert!(driver.ops.iter().all(|(_, _, g)| *g == Glyph::BLANK));
    }
}
