//! Font registration and lookup.
//!
//! Backed by a fontdb database populated explicitly from directories or raw
//! bytes; nothing is discovered from the process environment. Resolved font
//! binaries are cached per family.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use parlay_traits::MeasureError;

/// A thread-safe handle to font data with rustybuzz Face creation.
pub struct FontInstance {
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

impl std::fmt::Debug for FontInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontInstance")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontInstance {
    pub fn new(data: Arc<Vec<u8>>, index: u32) -> Self {
        Self { data, index }
    }

    /// Creates a lightweight Face view over the font data. Cheap (header
    /// parsing only), so no face is cached.
    pub fn as_face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.index)
    }
}

pub type FontData = Arc<FontInstance>;

/// Family-keyed font lookup over an explicitly populated database.
#[derive(Clone, Default)]
pub struct FontLibrary {
    db: Arc<RwLock<fontdb::Database>>,
    /// Loaded binaries keyed by lowercased family name.
    cache: Arc<RwLock<HashMap<String, FontData>>>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces = self.db.read().map(|db| db.len()).unwrap_or(0);
        f.debug_struct("FontLibrary").field("faces", &faces).finish()
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every font file found under `dir` (recursively).
    pub fn load_fonts_dir(&self, dir: impl AsRef<Path>) {
        if let Ok(mut db) = self.db.write() {
            db.load_fonts_dir(dir);
        }
    }

    /// Registers an in-memory font binary.
    pub fn load_font_data(&self, data: Vec<u8>) {
        if let Ok(mut db) = self.db.write() {
            db.load_font_data(data);
        }
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.db.read().map(|db| db.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves `family` to its font binary, consulting the cache first.
    ///
    /// # Errors
    ///
    /// [`MeasureError::FontNotFound`] when no registered face matches.
    pub fn resolve(&self, family: &str) -> Result<FontData, MeasureError> {
        let key = family.to_lowercase();
        if let Ok(cache) = self.cache.read() {
            if let Some(data) = cache.get(&key) {
                return Ok(data.clone());
            }
        }

        let db = self
            .db
            .read()
            .map_err(|_| MeasureError::FontNotFound(family.to_string()))?;
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| MeasureError::FontNotFound(family.to_string()))?;

        let instance = db
            .with_face_data(id, |data, index| {
                Arc::new(FontInstance::new(Arc::new(data.to_vec()), index))
            })
            .ok_or_else(|| MeasureError::FontNotFound(family.to_string()))?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, instance.clone());
        }
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_library_reports_font_not_found() {
        let library = FontLibrary::new();
        assert!(library.is_empty());

        let err = library.resolve("Inter").unwrap_err();
        assert!(matches!(err, MeasureError::FontNotFound(family) if family == "Inter"));
    }

    #[test]
    fn test_invalid_font_data_is_not_registered() {
        let library = FontLibrary::new();
        library.load_font_data(vec![0u8; 16]);

        // fontdb rejects unparsable binaries at load time.
        assert!(library.is_empty());
        assert!(library.resolve("anything").is_err());
    }
}
