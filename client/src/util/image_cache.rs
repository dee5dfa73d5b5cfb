//! Loaded-image bookkeeping for the sponsor marquee.
//!
//! The marquee fades images in only the first time they load. Which URLs have
//! loaded is tracked here as an explicit object the component owns (or gets
//! from context) rather than module-level state. Entries are added once and
//! never evicted; the set is bounded by the sponsor list.

#[cfg(test)]
#[path = "image_cache_test.rs"]
mod image_cache_test;

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Add-once set of image URLs that have finished loading.
#[derive(Clone, Debug, Default)]
pub struct ImageCache {
    loaded: Arc<RwLock<HashSet<String>>>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url` as loaded. Returns `true` only the first time.
    pub fn mark_loaded(&self, url: &str) -> bool {
        match self.loaded.write() {
            Ok(mut set) => set.insert(url.to_owned()),
            Err(poisoned) => poisoned.into_inner().insert(url.to_owned()),
        }
    }

    #[must_use]
    pub fn is_loaded(&self, url: &str) -> bool {
        match self.loaded.read() {
            Ok(set) => set.contains(url),
            Err(poisoned) => poisoned.into_inner().contains(url),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.read().map_or_else(|p| p.into_inner().len(), |set| set.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
