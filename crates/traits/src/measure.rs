//! TextMeasurer trait for abstracting glyph metrics.
//!
//! Text boxes never touch font files themselves; they hand their content to a
//! measurer and get back an extent. The word-wrap law lives here so every
//! implementation (shaped or synthetic) agrees on how lines break.

use std::fmt::Debug;
use thiserror::Error;

/// Error type for text measurement.
#[derive(Error, Debug, Clone)]
pub enum MeasureError {
    #[error("No font registered for family '{0}'")]
    FontNotFound(String),

    #[error("Font data for family '{family}' is unusable: {message}")]
    InvalidFontData { family: String, message: String },
}

/// Resolved extent of a text run: the widest committed line and the total
/// height over all lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// Font selection parameters carried by a text box.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font family name, resolved by the measurer.
    pub family: String,
    /// Pixel size; also the height of one line before spacing.
    pub size: f32,
    /// Line spacing factor applied to every wrapped line.
    pub spacing: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32, spacing: f32) -> Self {
        Self {
            family: family.into(),
            size,
            spacing,
        }
    }
}

/// A trait for measuring wrapped text against a width limit.
///
/// # Implementations
///
/// - `ShapedTextMeasurer` (parlay-layout): rustybuzz shaping over registered
///   font files
/// - [`FixedAdvanceMeasurer`]: deterministic synthetic advances, no font
///   files involved (always available)
pub trait TextMeasurer: Send + Sync + Debug {
    /// Measures `content` wrapped at `max_width`, using `font` for glyph
    /// advances and line geometry.
    ///
    /// # Errors
    ///
    /// Fails when the requested font cannot be resolved. Callers treat this
    /// as fatal; there is no meaningful fallback geometry for text.
    fn measure(&self, content: &str, max_width: f32, font: &FontSpec)
    -> Result<TextMetrics, MeasureError>;

    /// Returns a human-readable name for this measurer (for logging).
    fn name(&self) -> &'static str;
}

/// The word-wrap law shared by every measurer.
///
/// Advances accumulate onto the current line; when adding a glyph would
/// exceed `max_width`, the line is committed, the glyph starts a new line,
/// and `size * spacing` is added to the height. Height starts at one base
/// line (`size`), so the result for unwrapped text is exactly `size`. Width
/// is the widest committed line.
pub fn wrap_advances<I>(advances: I, max_width: f32, size: f32, spacing: f32) -> TextMetrics
where
    I: IntoIterator<Item = f32>,
{
    let mut widest = 0.0f32;
    let mut line = 0.0f32;
    let mut height = size;

    for advance in advances {
        if line + advance > max_width {
            widest = widest.max(line);
            line = 0.0;
            height += size * spacing;
        }
        line += advance;
    }

    TextMetrics {
        width: widest.max(line),
        height,
    }
}

/// A measurer with one fixed advance per glyph.
///
/// Every glyph advances by `advance_em * font.size`, which makes measured
/// geometry a pure function of character count. Intended for tests and
/// synthetic benchmark trees.
#[derive(Debug, Clone)]
pub struct FixedAdvanceMeasurer {
    /// Glyph advance as a fraction of the font size.
    pub advance_em: f32,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance_em: f32) -> Self {
        Self { advance_em }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(
        &self,
        content: &str,
        max_width: f32,
        font: &FontSpec,
    ) -> Result<TextMetrics, MeasureError> {
        let advance = font.size * self.advance_em;
        Ok(wrap_advances(
            content.chars().map(|_| advance),
            max_width,
            font.size,
            font.spacing,
        ))
    }

    fn name(&self) -> &'static str {
        "FixedAdvanceMeasurer"
    }
}
