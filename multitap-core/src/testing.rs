//! Hardware doubles shared by the unit tests

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use multitap_display::{DisplayError, Glyph, GlyphDriver};
use multitap_hal::{
    KeyMatrix, Level, PeriodicTimer, RowEdgeInterrupt, MATRIX_COLS, MATRIX_ROWS,
};

/// Interrupt and timer calls, in the order the mock saw them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HwOp {
    EnableEdge,
    DisableEdge,
    ClearEdgeFlags,
    StartTimer,
    StopTimer,
    ResetTimer,
}

/// Simulated 4x4 keypad with edge interrupt and polling timer
#[derive(Debug)]
pub(crate) struct MockKeypad {
    pub closed: [[bool; MATRIX_COLS]; MATRIX_ROWS],
    pub columns: [Level; MATRIX_COLS],
    pub edge_enabled: bool,
    /// Most recent calls; older ones fall off once full
    pub ops: Vec<HwOp, 16>,
    pub timer_running: bool,
    pub timer_resets: u32,
    pub row_reads: u32,
}

impl MockKeypad {
    pub fn new() -> Self {
        Self {
            closed: [[false; MATRIX_COLS]; MATRIX_ROWS],
            columns: [Level::High; MATRIX_COLS],
            edge_enabled: false,
            ops: Vec::new(),
            timer_running: false,
            timer_resets: 0,
            row_reads: 0,
        }
    }

    pub fn press(&mut self, row: usize, col: usize) {
        self.closed[row][col] = true;
    }

    pub fn release_all(&mut self) {
        self.closed = [[false; MATRIX_COLS]; MATRIX_ROWS];
    }

    pub fn all_columns(&self, level: Level) -> bool {
        self.columns.iter().all(|c| *c == level)
    }

    fn log(&mut self, op: HwOp) {
        if self.ops.is_full() {
            self.ops.remove(0);
        }
        let _ = self.ops.push(op);
    }
}

impl KeyMatrix for MockKeypad {
    fn set_column_level(&mut self, col: usize, level: Level) {
        if let Some(slot) = self.columns.get_mut(col) {
            *slot = level;
        }
    }

    fn read_row_levels(&mut self) -> u8 {
        self.row_reads += 1;
        let mut mask = 0;
        for row in 0..MATRIX_ROWS {
            let pulled = (0..MATRIX_COLS)
                .any(|col| self.closed[row][col] && self.columns[col] == Level::Low);
            if !pulled {
                mask |= 1 << row;
            }
        }
        mask
    }
}

impl RowEdgeInterrupt for MockKeypad {
    fn enable_row_edge(&mut self) {
        self.log(HwOp::EnableEdge);
        self.edge_enabled = true;
    }

    fn disable_row_edge(&mut self) {
        self.log(HwOp::DisableEdge);
        self.edge_enabled = false;
    }

    fn clear_row_edge_flags(&mut self) {
        self.log(HwOp::ClearEdgeFlags);
    }
}

impl PeriodicTimer for MockKeypad {
    fn start_timer(&mut self) {
        self.log(HwOp::StartTimer);
        self.timer_running = true;
    }

    fn stop_timer(&mut self) {
        self.log(HwOp::StopTimer);
        self.timer_running = false;
    }

    fn reset_timer(&mut self) {
        self.log(HwOp::ResetTimer);
        self.timer_resets += 1;
    }
}

/// Busy-wait stand-in that only accumulates the requested time
#[derive(Debug, Default)]
pub(crate) struct NoDelay {
    pub total_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Display that records every glyph write with its position
#[derive(Debug, Default)]
pub(crate) struct RecordingDriver {
    pub writes: Vec<(u8, u8, Glyph), 128>,
    pos: (u8, u8),
}

impl GlyphDriver for RecordingDriver {
    fn reposition(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        self.pos = (row, col);
        Ok(())
    }

    fn write_glyph(&mut self, glyph: Glyph) -> Result<(), DisplayError> {
        self.writes
            .push((self.pos.0, self.pos.1, glyph))
            .map_err(|_| DisplayError::Communication)
    }
}
