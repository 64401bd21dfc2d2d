//! Cursor-addressable text buffer
//!
//! Fixed storage of `N` slots. One slot is reserved for the cursor glyph
//! shown on the display, so at most `N - 1` characters are stored.

use multitap_display::{DISPLAY_COLS, DISPLAY_ROWS};

/// Buffer capacity matching the reference display: text plus cursor fill it
pub const BUFFER_CAPACITY: usize = DISPLAY_ROWS * DISPLAY_COLS;

/// Filler written into unused storage
const EMPTY_SLOT: u8 = b' ';

/// Bounded character buffer with a cursor in `0..=len`
#[derive(Debug, Clone)]
pub struct EditBuffer<const N: usize = BUFFER_CAPACITY> {
    storage: [u8; N],
    len: usize,
    cursor: usize,
}

impl<const N: usize> Default for EditBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EditBuffer<N> {
    pub const fn new() -> Self {
        Self {
            storage: [EMPTY_SLOT; N],
            len: 0,
            cursor: 0,
        }
    }

    /// Stored characters
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Character at `index`, if stored
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total slots, including the one reserved for the cursor
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Check if no further character fits
    pub fn is_full(&self) -> bool {
        self.len + 1 >= N
    }

    /// Insert `ch` at `pos`, shifting the tail right
    ///
    /// The cursor moves with the text when the insertion is at or before
    /// it. Returns `false` without changing anything if the buffer is full
    /// or `pos` is past the end.
    pub fn insert_at(&mut self, pos: usize, ch: u8) -> bool {
        if self.is_full() || pos > self.len {
            return false;
        }

        self.storage.copy_within(pos..self.len, pos + 1);
        self.storage[pos] = ch;
        self.len += 1;
        if pos <= self.cursor {
            self.cursor += 1;
        }
        true
    }

    /// Remove the character before `pos`, shifting the tail left
    ///
    /// Returns the removed character, or `None` at the start of the buffer
    /// or when `pos` is past the end.
    pub fn delete_before(&mut self, pos: usize) -> Option<u8> {
        if pos == 0 || pos > self.len {
            return None;
        }

        let removed = self.storage[pos - 1];
        self.storage.copy_within(pos..self.len, pos - 1);
        self.len -= 1;
        self.storage[self.len] = EMPTY_SLOT;
        if pos <= self.cursor {
            self.cursor -= 1;
        }
        Some(removed)
    }

    /// Overwrite the character at `index`
    pub fn replace(&mut self, index: usize, ch: u8) -> bool {
        match self.storage[..self.len].get_mut(index) {
            Some(slot) => {
                *slot = ch;
                true
            }
            None => false,
        }
    }

    /// Shift the cursor, clamped to `0..=len`
    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = self.cursor.saturating_add_signed(delta).min(self.len);
    }

    /// Empty the buffer and wipe every slot
    pub fn clear(&mut self) {
        self.storage.fill(EMPTY_SLOT);
        self.len = 0;
        self.cursor = 0;
    }
}
