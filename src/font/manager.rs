//! Caches `(typeface, variant) -> Font` via a caller-supplied loader, and
//! composes a fallback typeface into a [`FailoverFont`] when one is
//! configured.

use std::collections::HashMap;
use std::sync::Arc;

use ecow::EcoString;
use parking_lot::RwLock;

use super::{FailoverFont, Font, FontVariant, SizedFont};
use crate::error::LoadError;
use crate::units::Sp;

/// A loader callback: `(typeface, variant) -> Font`, called lazily on first
/// request. May fail; re-entrancy is not guaranteed, so implementations
/// that hit the filesystem should do their own internal locking if needed.
pub trait FontLoader: Send + Sync {
    fn load(&self, typeface: &str, variant: FontVariant) -> Result<Arc<dyn Font>, LoadError>;
}

impl<F> FontLoader for F
where
    F: Fn(&str, FontVariant) -> Result<Arc<dyn Font>, LoadError> + Send + Sync,
{
    fn load(&self, typeface: &str, variant: FontVariant) -> Result<Arc<dyn Font>, LoadError> {
        self(typeface, variant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    typeface: EcoString,
    variant: FontVariant,
}

/// Process-wide, thread-safe `(typeface, variant) -> Font` cache. One loader
/// call per key is the typical path; a duplicate concurrent load (two
/// threads racing to fill the same key) is tolerated — whichever result
/// lands first wins, and the loader is expected to be deterministic so this
/// doesn't matter for correctness.
pub struct FontManager {
    loader: Arc<dyn FontLoader>,
    fallback_typeface: Option<EcoString>,
    cache: RwLock<HashMap<CacheKey, Arc<dyn Font>>>,
}

impl FontManager {
    pub fn new(loader: Arc<dyn FontLoader>) -> Self {
        Self { loader, fallback_typeface: None, cache: RwLock::new(HashMap::new()) }
    }

    /// Configures a fallback typeface; every [`FontManager::get_sized`] call
    /// afterwards returns a [`FailoverFont`]-backed [`SizedFont`] instead of
    /// the bare primary.
    pub fn with_fallback(mut self, typeface: impl Into<EcoString>) -> Self {
        self.fallback_typeface = Some(typeface.into());
        self
    }

    fn get_cached(&self, typeface: &str, variant: FontVariant) -> Result<Arc<dyn Font>, LoadError> {
        let key = CacheKey { typeface: typeface.into(), variant: variant.clone() };

        if let Some(font) = self.cache.read().get(&key) {
            return Ok(font.clone());
        }

        let font = self.loader.load(typeface, variant.clone())?;

        // A racing thread may have already inserted; `entry` keeps whichever
        // arrived first rather than overwriting, which is fine since the
        // loader is required to be deterministic for a given key.
        let mut cache = self.cache.write();
        let font = cache.entry(key).or_insert(font).clone();
        Ok(font)
    }

    /// Returns the font for `(typeface, variant)` at `size`, composing in
    /// the configured fallback if any.
    pub fn get_sized(
        &self,
        typeface: &str,
        variant: FontVariant,
        size_sp: Sp,
    ) -> Result<SizedFont, LoadError> {
        let primary = self.get_cached(typeface, variant.clone())?;

        let font: Arc<dyn Font> = match &self.fallback_typeface {
            Some(fallback_typeface) => {
                let fallback = self.get_cached(fallback_typeface, variant)?;
                Arc::new(FailoverFont::new(primary, fallback))
            }
            None => primary,
        };

        Ok(SizedFont::new(font, size_sp))
    }
}
