//! Keypad layout and special-key bindings

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use multitap_hal::{MATRIX_COLS, MATRIX_ROWS};

use super::ConfigError;
use crate::keypad::KeyId;

/// Maximum candidates bound to one key
pub const MAX_CANDIDATES: usize = 8;

/// Candidate characters for every key, in cycling order
///
/// An empty entry means the key produces no character. A single candidate
/// is inserted directly; more than one starts a multi-tap cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    keys: [[&'static str; MATRIX_COLS]; MATRIX_ROWS],
}

impl Layout {
    /// Classic phone layout; the last column is left for editing keys
    pub const STANDARD: Layout = Layout {
        keys: [
            ["1", "abc2", "def3", ""],
            ["ghi4", "jkl5", "mno6", ""],
            ["prs7", "tuv8", "wxy9", ""],
            ["*", " 0", "#", ""],
        ],
    };

    /// Build a layout, rejecting entries the display cannot show
    pub fn new(keys: [[&'static str; MATRIX_COLS]; MATRIX_ROWS]) -> Result<Self, ConfigError> {
        let layout = Self { keys };
        layout.validate()?;
        Ok(layout)
    }

    /// Check every entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (row, entries) in self.keys.iter().enumerate() {
            for (col, entry) in entries.iter().enumerate() {
                validate_entry(KeyId::new(row as u8, col as u8), entry.as_bytes())?;
            }
        }
        Ok(())
    }

    /// Candidates for a key; empty for unbound or out-of-range keys
    pub fn candidates(&self, key: KeyId) -> &'static [u8] {
        self.keys
            .get(key.row as usize)
            .and_then(|row| row.get(key.col as usize))
            .map(|entry| entry.as_bytes())
            .unwrap_or_default()
    }
}

fn validate_entry(key: KeyId, candidates: &[u8]) -> Result<(), ConfigError> {
    if candidates.len() > MAX_CANDIDATES {
        return Err(ConfigError::TooManyCandidates(key));
    }
    for (i, c) in candidates.iter().enumerate() {
        if !(b' '..=b'~').contains(c) {
            return Err(ConfigError::NonPrintableCandidate(key));
        }
        if candidates[..i].contains(c) {
            return Err(ConfigError::DuplicateCandidate(key));
        }
    }
    Ok(())
}

/// Editing functions available on dedicated keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpecialKey {
    /// Empty the buffer
    Clear,
    /// Delete the character before the cursor
    Backspace,
    /// Move the cursor one position left
    MoveLeft,
    /// Move the cursor one position right
    MoveRight,
}

/// Keys bound to the editing functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpecialBindings {
    pub clear: KeyId,
    pub backspace: KeyId,
    pub move_left: KeyId,
    pub move_right: KeyId,
}

impl Default for SpecialBindings {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl SpecialBindings {
    /// Rightmost column, top to bottom: left, backspace, clear, right
    pub const STANDARD: SpecialBindings = SpecialBindings {
        move_left: KeyId::new(0, 3),
        backspace: KeyId::new(1, 3),
        clear: KeyId::new(2, 3),
        move_right: KeyId::new(3, 3),
    };

    /// Function bound to a key, if any
    pub fn action(&self, key: KeyId) -> Option<SpecialKey> {
        self.entries()
            .into_iter()
            .find_map(|(bound, action)| (bound == key).then_some(action))
    }

    /// Check the bindings are in range, distinct and free of candidates
    pub fn validate(&self, layout: &Layout) -> Result<(), ConfigError> {
        let entries = self.entries();
        for (i, (key, _)) in entries.iter().enumerate() {
            if !key.in_matrix() {
                return Err(ConfigError::KeyOutOfRange(*key));
            }
            if entries[..i].iter().any(|(other, _)| other == key) {
                return Err(ConfigError::DuplicateBinding(*key));
            }
            if !layout.candidates(*key).is_empty() {
                return Err(ConfigError::BindingShadowsCandidates(*key));
            }
        }
        Ok(())
    }

    fn entries(&self) -> [(KeyId, SpecialKey); 4] {
        [
            (self.clear, SpecialKey::Clear),
            (self.backspace, SpecialKey::Backspace),
            (self.move_left, SpecialKey::MoveLeft),
            (self.move_right, SpecialKey::MoveRight),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [[&str; MATRIX_COLS]; MATRIX_ROWS] = [[""; MATRIX_COLS]; MATRIX_ROWS];

    #[test]
    fn test_standard_layout_valid() {
        assert_eq!(Layout::STANDARD.validate(), Ok(()));
        assert_eq!(Layout::STANDARD.candidates(KeyId::new(0, 1)), b"abc2");
        assert_eq!(Layout::STANDARD.candidates(KeyId::new(3, 1)), b" 0");
        assert!(Layout::STANDARD.candidates(KeyId::new(1, 3)).is_empty());
    }

    #[test]
    fn test_out_of_range_key_has_no_candidates() {
        assert!(Layout::STANDARD.candidates(KeyId::new(7, 0)).is_empty());
        assert!(Layout::STANDARD.candidates(KeyId::new(0, 9)).is_empty());
    }

    #[test]
    fn test_rejects_overlong_entry() {
        let mut keys = EMPTY;
        keys[1][1] = "abcdefghi";
        assert_eq!(
            Layout::new(keys),
            Err(ConfigError::TooManyCandidates(KeyId::new(1, 1)))
        );
    }

    #[test]
    fn test_rejects_non_printable() {
        let mut keys = EMPTY;
        keys[0][2] = "a\tb";
        assert_eq!(
            Layout::new(keys),
            Err(ConfigError::NonPrintableCandidate(KeyId::new(0, 2)))
        );

        keys[0][2] = "é";
        assert_eq!(
            Layout::new(keys),
            Err(ConfigError::NonPrintableCandidate(KeyId::new(0, 2)))
        );
    }

    #[test]
    fn test_rejects_duplicate_candidate() {
        let mut keys = EMPTY;
        keys[2][0] = "aba";
        assert_eq!(
            Layout::new(keys),
            Err(ConfigError::DuplicateCandidate(KeyId::new(2, 0)))
        );
    }

    #[test]
    fn test_action_lookup() {
        let specials = SpecialBindings::STANDARD;
        assert_eq!(specials.action(KeyId::new(2, 3)), Some(SpecialKey::Clear));
        assert_eq!(specials.action(KeyId::new(1, 3)), Some(SpecialKey::Backspace));
        assert_eq!(specials.action(KeyId::new(0, 3)), Some(SpecialKey::MoveLeft));
        assert_eq!(specials.action(KeyId::new(3, 3)), Some(SpecialKey::MoveRight));
        assert_eq!(specials.action(KeyId::new(0, 0)), None);
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let specials = SpecialBindings {
            move_right: KeyId::new(0, 3),
            ..SpecialBindings::STANDARD
        };
        assert_eq!(
            specials.validate(&Layout::STANDARD),
            Err(ConfigError::DuplicateBinding(KeyId::new(0, 3)))
        );
    }

    #[test]
    fn test_out_of_range_binding_rejected() {
        let specials = SpecialBindings {
            clear: KeyId::new(4, 0),
            ..SpecialBindings::STANDARD
        };
        assert_eq!(
            specials.validate(&Layout::STANDARD),
            Err(ConfigError::KeyOutOfRange(KeyId::new(4, 0)))
        );
    }
}
