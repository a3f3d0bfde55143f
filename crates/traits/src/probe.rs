//! ImageProbe trait for abstracting image-dimension lookup.
//!
//! Image boxes only need intrinsic dimensions, never pixel data. Lookup
//! failure is soft: the resolver degrades the box to zero size.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

/// A trait for resolving an image path to its intrinsic dimensions.
///
/// # Implementations
///
/// - `FsImageProbe` (parlay-layout): reads headers under a configured base
///   directory
/// - [`InMemoryImageProbe`]: pre-populated dimensions (always available)
pub trait ImageProbe: Send + Sync + Debug {
    /// Returns `(width, height)` for `path`, or `None` when the image cannot
    /// be read.
    fn probe(&self, path: &str) -> Option<(f32, f32)>;

    /// Returns a human-readable name for this probe (for logging).
    fn name(&self) -> &'static str;
}

/// An in-memory image probe.
///
/// Dimensions are stored in memory and must be pre-populated before use.
#[derive(Debug, Default)]
pub struct InMemoryImageProbe {
    sizes: RwLock<HashMap<String, (f32, f32)>>,
}

impl InMemoryImageProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the dimensions reported for `path`.
    pub fn add(&self, path: impl Into<String>, width: f32, height: f32) {
        if let Ok(mut sizes) = self.sizes.write() {
            sizes.insert(path.into(), (width, height));
        }
    }

    /// Number of registered entries. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.sizes.read().map(|s| s.len()).unwrap_or(0)
    }

    /// True when no entries are registered (or the lock is poisoned).
    pub fn is_empty(&self) -> bool {
        self.sizes.read().map(|s| s.is_empty()).unwrap_or(true)
    }
}

impl ImageProbe for InMemoryImageProbe {
    fn probe(&self, path: &str) -> Option<(f32, f32)> {
        self.sizes.read().ok()?.get(path).copied()
    }

    fn name(&self) -> &'static str {
        "InMemoryImageProbe"
    }
}
