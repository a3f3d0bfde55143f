//! Filesystem-backed image dimension probing.

use std::path::PathBuf;

use parlay_traits::ImageProbe;

/// Reads image headers under a configured base directory. Only dimensions
/// are decoded, never pixel data.
#[derive(Debug, Clone)]
pub struct FsImageProbe {
    base: PathBuf,
}

impl FsImageProbe {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ImageProbe for FsImageProbe {
    fn probe(&self, path: &str) -> Option<(f32, f32)> {
        let full = self.base.join(path);
        match image::image_dimensions(&full) {
            Ok((width, height)) => Some((width as f32, height as f32)),
            Err(err) => {
                log::debug!("failed to read image header {}: {err}", full.display());
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "FsImageProbe"
    }
}
