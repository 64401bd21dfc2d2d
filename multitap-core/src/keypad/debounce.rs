//! Debounce state machine
//!
//! The controller sleeps with every column pulled low and the row-edge
//! interrupt armed. The first edge switches it to polling on the periodic
//! tick; each tick runs a full matrix scan. Contact bounce after the wake
//! edge falls between ticks, so a physical press is reported exactly once,
//! on the first tick that sees it closed. The first tick that sees the
//! matrix open re-arms the edge interrupt.
//!
//! The first release starts an idle countdown on the same tick. A later
//! press restarts a running countdown from zero. When it expires, a
//! [`KeyEvent::Commit`] is emitted and the countdown stops; once the keypad
//! is armed with no countdown running, the timer is stopped. The next edge
//! restarts it.

use embedded_hal::delay::DelayNs;
use multitap_hal::ScanAdapter;

use super::events::{KeyEvent, KeyId, KeySink};
use super::scanner::Scanner;
use crate::config::TimingConfig;

/// Which interrupt source is driving the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Row-edge interrupt enabled, no scanning
    Armed,
    /// Row-edge interrupt disabled, scanning on every tick
    Polling,
}

/// Turns raw scans into one event per physical key press
pub struct DebounceController<H, D> {
    hw: H,
    delay: D,
    scanner: Scanner,
    /// Ticks without a press before [`KeyEvent::Commit`]
    idle_commit_ticks: u16,
    phase: Phase,
    /// The key currently held has already been reported
    press_recorded: bool,
    /// Idle countdown, `None` when not running
    idle_ticks: Option<u16>,
}

impl<H: ScanAdapter, D: DelayNs> DebounceController<H, D> {
    /// Take ownership of the keypad hardware and arm it for the first press
    pub fn new(hw: H, delay: D, timing: &TimingConfig) -> Self {
        let mut controller = Self {
            hw,
            delay,
            scanner: Scanner::new(timing.settle_ns),
            idle_commit_ticks: timing.idle_commit_ticks,
            phase: Phase::Armed,
            press_recorded: false,
            idle_ticks: None,
        };
        controller.arm();
        controller.hw.stop_timer();
        controller
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if the held key has already been reported
    pub fn press_recorded(&self) -> bool {
        self.press_recorded
    }

    /// Ticks counted by the idle countdown, if running
    pub fn idle_ticks(&self) -> Option<u16> {
        self.idle_ticks
    }

    /// Access the underlying hardware
    pub fn hw(&self) -> &H {
        &self.hw
    }

    /// Mutable access to the underlying hardware
    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Release the hardware
    pub fn free(self) -> (H, D) {
        (self.hw, self.delay)
    }

    /// Row-edge interrupt handler
    ///
    /// Switches from edge sensing to polling. Edges seen while already
    /// polling are ignored.
    pub fn on_row_edge(&mut self) {
        if self.phase == Phase::Polling {
            trace!("row edge while polling ignored");
            return;
        }

        self.hw.disable_row_edge();
        self.hw.clear_row_edge_flags();
        self.hw.idle_columns();
        self.hw.reset_timer();
        self.hw.start_timer();

        self.press_recorded = false;
        self.phase = Phase::Polling;
        debug!("keypad woke, polling");
    }

    /// Periodic timer handler
    ///
    /// Emits at most one [`KeyEvent::Commit`] followed by at most one key
    /// event.
    pub fn on_tick<S: KeySink>(&mut self, sink: &mut S) {
        self.advance_idle(sink);

        match self.phase {
            Phase::Polling => self.poll(sink),
            Phase::Armed => {
                if self.idle_ticks.is_none() {
                    self.hw.stop_timer();
                }
            }
        }
    }

    fn advance_idle<S: KeySink>(&mut self, sink: &mut S) {
        let Some(ticks) = self.idle_ticks else {
            return;
        };

        let ticks = ticks.saturating_add(1);
        if ticks >= self.idle_commit_ticks {
            debug!("idle for {} ticks, committing", ticks);
            self.idle_ticks = None;
            sink.key_event(KeyEvent::Commit);
        } else {
            self.idle_ticks = Some(ticks);
        }
    }

    fn poll<S: KeySink>(&mut self, sink: &mut S) {
        let scan = self.scanner.scan(&mut self.hw, &mut self.delay);

        if !scan.any_pressed {
            self.press_recorded = false;
            if self.idle_ticks.is_none() {
                self.idle_ticks = Some(0);
            }
            self.arm();
            debug!("keypad released, armed");
            return;
        }

        // Swallow repeats while the same press is held
        if self.press_recorded {
            return;
        }

        self.press_recorded = true;
        // Restart a running countdown from this press
        if self.idle_ticks.is_some() {
            self.idle_ticks = Some(0);
        }

        if scan.ambiguous {
            warn!("ambiguous key press dropped");
            sink.key_event(KeyEvent::Ambiguous);
        } else {
            sink.key_event(KeyEvent::KeyDown(KeyId::new(scan.row, scan.col)));
        }
    }

    fn arm(&mut self) {
        self.hw.arm_columns();
        self.hw.clear_row_edge_flags();
        self.hw.enable_row_edge();
        self.phase = Phase::Armed;
    }
}
