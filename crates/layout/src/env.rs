use std::sync::Arc;

use parlay_traits::{FixedAdvanceMeasurer, ImageProbe, InMemoryImageProbe, TextMeasurer};

/// Collaborators the resolver consults during the pre phase.
///
/// Asset locations are configured on the collaborators at construction time;
/// the resolver itself never touches the filesystem or the environment.
#[derive(Debug, Clone)]
pub struct LayoutEnvironment {
    pub text: Arc<dyn TextMeasurer>,
    pub images: Arc<dyn ImageProbe>,
}

impl LayoutEnvironment {
    pub fn new(text: Arc<dyn TextMeasurer>, images: Arc<dyn ImageProbe>) -> Self {
        Self { text, images }
    }
}

impl Default for LayoutEnvironment {
    /// Deterministic environment with synthetic glyph advances and no
    /// registered images. Sufficient for trees without assets.
    fn default() -> Self {
        Self {
            text: Arc::new(FixedAdvanceMeasurer::default()),
            images: Arc::new(InMemoryImageProbe::new()),
        }
    }
}
