//! Multi-tap composition engine
//!
//! Key presses either edit the buffer directly (special keys, single
//! candidate keys) or start a roundabout: the first candidate is inserted
//! as a tentative glyph that further presses of the same key replace in
//! place. Pressing any other character key, or an idle commit, makes the
//! tentative glyph permanent.
//!
//! The display shows the buffer with the cursor glyph inserted at the
//! cursor index, so display index `d` maps to buffer index `d` before the
//! cursor and `d - 1` after it. Every edit re-renders only the display
//! indices it shifted.

use multitap_display::{Glyph, SyncedGrid};

use super::buffer::{EditBuffer, BUFFER_CAPACITY};
use super::roundabout::Roundabout;
use crate::config::{KeypadConfig, Layout, SpecialBindings, SpecialKey};
use crate::keypad::{KeyEvent, KeyId, KeySink};

/// Glyph drawn at the cursor position
pub const CURSOR_GLYPH: Glyph = Glyph::plain(b'_');

/// Turns key events into buffer edits and display updates
pub struct TextComposer<const N: usize = BUFFER_CAPACITY> {
    layout: Layout,
    specials: SpecialBindings,
    buffer: EditBuffer<N>,
    /// Pending cycle; its tentative glyph sits just before the cursor
    roundabout: Option<Roundabout>,
}

impl<const N: usize> TextComposer<N> {
    /// Create an empty composer
    ///
    /// Call [`reset`](Self::reset) once to draw the initial cursor.
    pub fn new(config: &KeypadConfig) -> Self {
        Self {
            layout: config.layout,
            specials: config.specials,
            buffer: EditBuffer::new(),
            roundabout: None,
        }
    }

    pub fn buffer(&self) -> &EditBuffer<N> {
        &self.buffer
    }

    /// Committed and tentative text
    pub fn text(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn roundabout(&self) -> Option<Roundabout> {
        self.roundabout
    }

    /// The glyph still open to replacement, if any
    pub fn tentative(&self) -> Option<u8> {
        self.tentative_index().and_then(|i| self.buffer.get(i))
    }

    /// Empty the buffer and show only the cursor
    pub fn reset<const R: usize, const C: usize>(&mut self, grid: &mut SyncedGrid<R, C>) {
        self.buffer.clear();
        self.roundabout = None;
        grid.clear();
        grid.put(CURSOR_GLYPH);
    }

    /// Apply one key event
    pub fn handle<const R: usize, const C: usize>(
        &mut self,
        event: KeyEvent,
        grid: &mut SyncedGrid<R, C>,
    ) {
        match event {
            KeyEvent::KeyDown(key) => self.key_down(key, grid),
            KeyEvent::Commit => self.commit(grid),
            KeyEvent::Ambiguous => {}
        }
    }

    /// Borrow this composer and a grid as a [`KeySink`]
    pub fn sink<'a, const R: usize, const C: usize>(
        &'a mut self,
        grid: &'a mut SyncedGrid<R, C>,
    ) -> ComposerSink<'a, N, R, C> {
        ComposerSink {
            composer: self,
            grid,
        }
    }

    fn key_down<const R: usize, const C: usize>(&mut self, key: KeyId, grid: &mut SyncedGrid<R, C>) {
        match self.specials.action(key) {
            Some(action) => {
                // Abandoned, not finalized: the special key's own redraw
                // covers whatever is left of the tentative glyph
                let abandoned = self.roundabout.take().is_some();
                self.apply_special(action, abandoned, grid);
            }
            None => self.press_character(key, grid),
        }
    }

    fn apply_special<const R: usize, const C: usize>(
        &mut self,
        action: SpecialKey,
        abandoned: bool,
        grid: &mut SyncedGrid<R, C>,
    ) {
        match action {
            SpecialKey::Clear => self.reset(grid),
            SpecialKey::Backspace => self.backspace(grid),
            SpecialKey::MoveLeft => self.move_cursor(-1, abandoned, grid),
            SpecialKey::MoveRight => self.move_cursor(1, abandoned, grid),
        }
    }

    fn backspace<const R: usize, const C: usize>(&mut self, grid: &mut SyncedGrid<R, C>) {
        let cursor = self.buffer.cursor();
        let old_len = self.buffer.len();
        if self.buffer.delete_before(cursor).is_none() {
            return;
        }

        // The display shrinks by one: blank its old last cell, then redraw
        // from the deletion point
        grid.goto(0, old_len + 1);
        grid.backspace();
        self.render_span(grid, cursor - 1, self.buffer.len());
    }

    fn move_cursor<const R: usize, const C: usize>(
        &mut self,
        delta: isize,
        abandoned: bool,
        grid: &mut SyncedGrid<R, C>,
    ) {
        let old = self.buffer.cursor();
        self.buffer.move_cursor(delta);
        let new = self.buffer.cursor();
        if old == new && !abandoned {
            return;
        }

        let mut from = old.min(new);
        if abandoned {
            // Drop the tentative style of the glyph before the old cursor
            from = from.min(old.saturating_sub(1));
        }
        self.render_span(grid, from, old.max(new));
    }

    fn press_character<const R: usize, const C: usize>(
        &mut self,
        key: KeyId,
        grid: &mut SyncedGrid<R, C>,
    ) {
        let candidates = self.layout.candidates(key);
        let Some(&first) = candidates.first() else {
            trace!("key ({}, {}) has no characters", key.row, key.col);
            return;
        };

        if let Some(roundabout) = self.roundabout.as_mut().filter(|r| r.key() == key) {
            let position = roundabout.advance(candidates.len());
            self.cycle(candidates[position], grid);
            return;
        }

        self.finalize(grid);

        let cursor = self.buffer.cursor();
        if !self.buffer.insert_at(cursor, first) {
            warn!("buffer full, dropping input");
            return;
        }
        if candidates.len() > 1 {
            self.roundabout = Some(Roundabout::start(key));
        }
        self.render_span(grid, cursor, self.buffer.len());
    }

    /// Swap the tentative glyph for the next candidate
    fn cycle<const R: usize, const C: usize>(&mut self, ch: u8, grid: &mut SyncedGrid<R, C>) {
        let Some(index) = self.tentative_index() else {
            return;
        };
        self.buffer.replace(index, ch);
        grid.goto(0, index + 1);
        grid.backspace();
        grid.put(Glyph::tentative(ch));
    }

    fn commit<const R: usize, const C: usize>(&mut self, grid: &mut SyncedGrid<R, C>) {
        if self.roundabout.is_some() {
            debug!("committing tentative glyph");
            self.finalize(grid);
        }
    }

    /// Make the tentative glyph permanent where it stands
    fn finalize<const R: usize, const C: usize>(&mut self, grid: &mut SyncedGrid<R, C>) {
        let Some(index) = self.tentative_index() else {
            return;
        };
        self.roundabout = None;
        self.render_span(grid, index, index);
    }

    fn tentative_index(&self) -> Option<usize> {
        self.roundabout
            .and_then(|_| self.buffer.cursor().checked_sub(1))
    }

    /// Glyph shown at a display index
    fn display_glyph(&self, index: usize) -> Glyph {
        let cursor = self.buffer.cursor();
        let buffer_index = if index < cursor {
            index
        } else if index == cursor {
            return CURSOR_GLYPH;
        } else {
            index - 1
        };

        match self.buffer.get(buffer_index) {
            Some(ch) if self.tentative_index() == Some(buffer_index) => Glyph::tentative(ch),
            Some(ch) => Glyph::plain(ch),
            None => Glyph::BLANK,
        }
    }

    /// Redraw display indices `from..=to`
    fn render_span<const R: usize, const C: usize>(
        &self,
        grid: &mut SyncedGrid<R, C>,
        from: usize,
        to: usize,
    ) {
        grid.goto(0, from);
        for index in from..=to {
            grid.put(self.display_glyph(index));
        }
    }
}

/// A composer paired with the grid it draws on
pub struct ComposerSink<'a, const N: usize, const R: usize, const C: usize> {
    composer: &'a mut TextComposer<N>,
    grid: &'a mut SyncedGrid<R, C>,
}

impl<const N: usize, const R: usize, const C: usize> KeySink for ComposerSink<'_, N, R, C> {
    fn key_event(&mut self, event: KeyEvent) {
        self.composer.handle(event, self.grid);
    }
}
