//! Interrupt and timer sources driving the keypad
//!
//! The keypad sleeps on a row edge and, once woken, polls on a periodic
//! tick. Both sources are controlled through these traits so the debounce
//! logic can switch between them.

/// Falling-edge interrupt on the keypad row lines
pub trait RowEdgeInterrupt {
    /// Unmask the row-edge interrupt
    fn enable_row_edge(&mut self);

    /// Mask the row-edge interrupt
    fn disable_row_edge(&mut self);

    /// Clear any latched row-edge flags
    ///
    /// Must be called before re-enabling, otherwise an edge latched during
    /// polling fires immediately.
    fn clear_row_edge_flags(&mut self);
}

/// Periodic polling timer
pub trait PeriodicTimer {
    /// Start generating ticks
    fn start_timer(&mut self);

    /// Stop generating ticks
    fn stop_timer(&mut self);

    /// Restart the current period from zero
    fn reset_timer(&mut self);
}
