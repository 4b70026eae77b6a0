//! Layout options and configuration.

use crate::error::{Error, Result};

/// Default divisor of glyph height giving the space-detection tolerance.
pub const DEFAULT_SPACE_FRACTION: f32 = 3.0;

/// Default cap on synthesized space glyphs per gap.
pub const DEFAULT_MAX_SYNTHETIC_SPACES: usize = 50;

/// Options steering word segmentation and reading-order reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// A horizontal or vertical jump larger than `glyph height / space_fraction`
    /// between two glyphs starts a new word
    pub space_fraction: f32,

    /// Upper bound on space glyphs synthesized for one gap
    pub max_synthetic_spaces: usize,

    /// Keep bands in clustering order instead of sorting them top to bottom
    pub preserve_columns: bool,

    /// Drop words repeating the same text at the same rounded position
    pub remove_duplicates: bool,

    /// Separator placed between bands in extracted text
    pub band_separator: String,

    /// Sort pages of a document in parallel
    pub parallel: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the space-detection fraction.
    pub fn with_space_fraction(mut self, fraction: f32) -> Self {
        self.space_fraction = fraction;
        self
    }

    /// Set the synthesized space cap.
    pub fn with_max_synthetic_spaces(mut self, max: usize) -> Self {
        self.max_synthetic_spaces = max;
        self
    }

    /// Enable or disable column preservation.
    pub fn with_preserve_columns(mut self, preserve: bool) -> Self {
        self.preserve_columns = preserve;
        self
    }

    /// Sort bands strictly top to bottom.
    pub fn top_to_bottom(mut self) -> Self {
        self.preserve_columns = false;
        self
    }

    /// Enable or disable duplicate suppression.
    pub fn with_remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = remove;
        self
    }

    /// Set the band separator.
    pub fn with_band_separator(mut self, separator: impl Into<String>) -> Self {
        self.band_separator = separator.into();
        self
    }

    /// Enable or disable parallel page sorting.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check the options for values the heuristics cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.space_fraction.is_finite() || self.space_fraction <= 0.0 {
            return Err(Error::InvalidOptions(format!(
                "space_fraction must be a positive number, got {}",
                self.space_fraction
            )));
        }
        if self.max_synthetic_spaces == 0 {
            return Err(Error::InvalidOptions(
                "max_synthetic_spaces must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            space_fraction: DEFAULT_SPACE_FRACTION,
            max_synthetic_spaces: DEFAULT_MAX_SYNTHETIC_SPACES,
            preserve_columns: true,
            remove_duplicates: false,
            band_separator: "\n".to_string(),
            parallel: true,
        }
    }
}
