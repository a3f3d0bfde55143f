//! Shaped text measurement.
//!
//! Shapes content with rustybuzz against a registered font face and feeds the
//! scaled advances through the shared word-wrap law. Kerning comes from the
//! shaper's `kern`/`liga` features rather than manual pair lookups.

use rustybuzz::{Feature, UnicodeBuffer};
use std::sync::OnceLock;
use ttf_parser::Tag;

use parlay_traits::{FontSpec, MeasureError, TextMeasurer, TextMetrics, wrap_advances};

use crate::fonts::FontLibrary;

fn shaping_features() -> &'static [Feature] {
    static FEATURES: OnceLock<Vec<Feature>> = OnceLock::new();
    FEATURES.get_or_init(|| {
        vec![
            Feature::new(Tag::from_bytes(b"liga"), 1, ..),
            Feature::new(Tag::from_bytes(b"kern"), 1, ..),
        ]
    })
}

/// A measurer backed by real glyph metrics from a [`FontLibrary`].
#[derive(Debug, Clone, Default)]
pub struct ShapedTextMeasurer {
    fonts: FontLibrary,
}

impl ShapedTextMeasurer {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }
}

impl TextMeasurer for ShapedTextMeasurer {
    fn measure(
        &self,
        content: &str,
        max_width: f32,
        font: &FontSpec,
    ) -> Result<TextMetrics, MeasureError> {
        // One bare line, no font needed.
        if content.is_empty() {
            return Ok(TextMetrics {
                width: 0.0,
                height: font.size,
            });
        }

        let data = self.fonts.resolve(&font.family)?;
        let face = data
            .as_face()
            .ok_or_else(|| MeasureError::InvalidFontData {
                family: font.family.clone(),
                message: "face data failed to parse".to_string(),
            })?;

        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return Err(MeasureError::InvalidFontData {
                family: font.family.clone(),
                message: "units per em is zero".to_string(),
            });
        }
        let scale = font.size / units_per_em;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(content);
        let shaped = rustybuzz::shape(&face, shaping_features(), buffer);

        let advances = shaped
            .glyph_positions()
            .iter()
            .map(|position| position.x_advance as f32 * scale);
        Ok(wrap_advances(advances, max_width, font.size, font.spacing))
    }

    fn name(&self) -> &'static str {
        "ShapedTextMeasurer"
    }
}
