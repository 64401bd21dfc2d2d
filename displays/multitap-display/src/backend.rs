//! Display backend trait
//!
//! Defines the two hardware transactions the synchronizer needs.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Cell position does not fit the driver's coordinate range
    InvalidCoordinates,
}

/// How a glyph is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlyphStyle {
    /// Committed text, the cursor and blanks
    #[default]
    Plain,
    /// A multi-tap candidate that further presses may still replace
    Tentative,
}

/// Content of a single display cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph {
    /// Character code (printable ASCII)
    pub code: u8,
    /// Rendering style
    pub style: GlyphStyle,
}

impl Glyph {
    /// Empty cell
    pub const BLANK: Glyph = Glyph::plain(b' ');

    /// Committed glyph
    pub const fn plain(code: u8) -> Self {
        Self {
            code,
            style: GlyphStyle::Plain,
        }
    }

    /// Revocable glyph
    pub const fn tentative(code: u8) -> Self {
        Self {
            code,
            style: GlyphStyle::Tentative,
        }
    }

    /// Check if this glyph is still revocable
    pub const fn is_tentative(&self) -> bool {
        matches!(self.style, GlyphStyle::Tentative)
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Character display driver
///
/// Each call is one hardware transaction. Only the synchronizer calls
/// these; application code edits a [`SyncedGrid`](crate::SyncedGrid).
pub trait GlyphDriver {
    /// Move the hardware write position
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    fn reposition(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Write one glyph at the hardware write position
    ///
    /// Implementations decide how [`GlyphStyle::Tentative`] is shown
    /// (custom character, inverted cell, blinking attribute).
    fn write_glyph(&mut self, glyph: Glyph) -> Result<(), DisplayError>;
}
