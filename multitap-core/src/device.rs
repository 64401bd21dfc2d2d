//! Shared-state container for interrupt-driven text entry
//!
//! The row-edge handler, the tick handler and the foreground display loop
//! all touch the same debounce, composition and grid state. [`TextEntry`]
//! keeps that state behind one blocking mutex, so the handlers stay
//! mutually exclusive whatever their hardware priorities are.
//!
//! `sync` takes the lock once per dirty cell and talks to the display with
//! the lock released. An edit that lands between reading a cell and marking
//! it flushed leaves the cell dirty, and the next `sync` rewrites it.
//!
//! ```text
//!   row-edge IRQ ──► on_row_edge ─┐
//!                                 ├──► Mutex<Session> ◄── sync ◄── main loop
//!   timer IRQ ─────► on_tick ─────┘
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use multitap_display::{
    sync_cells, CellSource, DisplayError, Glyph, GlyphDriver, SyncedGrid, DISPLAY_COLS,
    DISPLAY_ROWS,
};
use multitap_hal::ScanAdapter;

use crate::compose::{TextComposer, BUFFER_CAPACITY};
use crate::config::{ConfigError, KeypadConfig};
use crate::keypad::DebounceController;

/// Everything the interrupt handlers mutate
pub struct Session<H, D, const N: usize, const R: usize, const C: usize> {
    debounce: DebounceController<H, D>,
    composer: TextComposer<N>,
    grid: SyncedGrid<R, C>,
}

impl<H, D, const N: usize, const R: usize, const C: usize> Session<H, D, N, R, C> {
    pub fn debounce(&self) -> &DebounceController<H, D> {
        &self.debounce
    }

    pub fn debounce_mut(&mut self) -> &mut DebounceController<H, D> {
        &mut self.debounce
    }

    pub fn composer(&self) -> &TextComposer<N> {
        &self.composer
    }

    pub fn grid(&self) -> &SyncedGrid<R, C> {
        &self.grid
    }
}

/// Keypad text entry device
///
/// `M` selects the lock: `CriticalSectionRawMutex` when the handlers run
/// in interrupt context, `NoopRawMutex` for single-threaded dispatch.
pub struct TextEntry<
    M: RawMutex,
    H,
    D,
    const N: usize = BUFFER_CAPACITY,
    const R: usize = DISPLAY_ROWS,
    const C: usize = DISPLAY_COLS,
> {
    state: Mutex<M, RefCell<Session<H, D, N, R, C>>>,
}

impl<M, H, D, const N: usize, const R: usize, const C: usize> TextEntry<M, H, D, N, R, C>
where
    M: RawMutex,
    H: ScanAdapter,
    D: DelayNs,
{
    /// Validate the configuration, arm the keypad and draw the cursor
    ///
    /// The grid assumes a blank display; the first [`sync`](Self::sync)
    /// paints the cursor placeholder.
    pub fn new(config: &KeypadConfig, hw: H, delay: D) -> Result<Self, ConfigError> {
        config.validate()?;

        let debounce = DebounceController::new(hw, delay, &config.timing);
        let mut composer = TextComposer::new(config);
        let mut grid = SyncedGrid::new();
        composer.reset(&mut grid);
        info!(
            "text entry ready, {} ms commit timeout",
            config.timing.idle_commit_ms()
        );

        Ok(Self {
            state: Mutex::new(RefCell::new(Session {
                debounce,
                composer,
                grid,
            })),
        })
    }

    /// Row-edge interrupt entry point
    pub fn on_row_edge(&self) {
        self.state
            .lock(|cell| cell.borrow_mut().debounce.on_row_edge());
    }

    /// Periodic timer interrupt entry point
    pub fn on_tick(&self) {
        self.state.lock(|cell| {
            let mut session = cell.borrow_mut();
            let Session {
                debounce,
                composer,
                grid,
            } = &mut *session;
            debounce.on_tick(&mut composer.sink(grid));
        });
    }

    /// Flush dirty cells to the display
    ///
    /// Returns the number of glyphs written. Stops at the first driver
    /// error; the failed cell stays dirty.
    pub fn sync<G: GlyphDriver>(&self, driver: &mut G) -> Result<usize, DisplayError> {
        sync_cells(&mut LockedGrid { state: &self.state }, driver)
    }

    /// Run `f` with exclusive access to the session
    pub fn with_session<T>(&self, f: impl FnOnce(&mut Session<H, D, N, R, C>) -> T) -> T {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Session grid seen one cell at a time, taking the lock per access
struct LockedGrid<'a, M: RawMutex, H, D, const N: usize, const R: usize, const C: usize> {
    state: &'a Mutex<M, RefCell<Session<H, D, N, R, C>>>,
}

impl<M: RawMutex, H, D, const N: usize, const R: usize, const C: usize> CellSource
    for LockedGrid<'_, M, H, D, N, R, C>
{
    fn cell_count(&self) -> usize {
        SyncedGrid::<R, C>::CELLS
    }

    fn pending(&mut self, index: usize) -> Option<(usize, usize, Glyph)> {
        self.state.lock(|cell| cell.borrow().grid.pending(index))
    }

    fn mark_flushed(&mut self, row: usize, col: usize, glyph: Glyph) {
        self.state
            .lock(|cell| cell.borrow_mut().grid.mark_flushed(row, col, glyph));
    }
}
