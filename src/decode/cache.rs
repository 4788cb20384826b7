//! Decoded images kept between loads.
//!
//! Entries are found by linear scan, so the cache is meant to stay small.
//! Once full, inserting evicts the entry that was used least recently.

use image::DynamicImage;

/// Entries a [`DefaultLoader`](super::DefaultLoader) keeps unless told
/// otherwise.
pub const DEFAULT_CACHE_ENTRIES: usize = 32;

struct Entry {
    epoch: u64,
    source: String,
    image: DynamicImage,
}

/// A least-recently-used cache of decoded images keyed by source string.
pub struct ImageCache {
    entries: Vec<Entry>,
    epoch: u64,
    max_entries: usize,
}

impl ImageCache {
    /// A cache holding at most `max_entries` images. Zero disables caching.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Look up `source`, marking it as recently used.
    pub fn get(&mut self, source: &str) -> Option<DynamicImage> {
        self.epoch += 1;
        let epoch = self.epoch;
        let entry = self.entries.iter_mut().find(|e| e.source == source)?;
        entry.epoch = epoch;
        Some(entry.image.clone())
    }

    /// Store `image`, replacing an entry with the same source or evicting
    /// the least recently used one when full.
    pub fn insert(&mut self, source: &str, image: DynamicImage) {
        if self.max_entries == 0 {
            return;
        }
        self.epoch += 1;
        let epoch = self.epoch;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.source == source) {
            entry.epoch = epoch;
            entry.image = image;
            return;
        }

        let entry = Entry {
            epoch,
            source: source.to_string(),
            image,
        };
        if self.entries.len() < self.max_entries {
            self.entries.push(entry);
            return;
        }

        let oldest = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.epoch)
            .map(|(i, _)| i);
        if let Some(i) = oldest {
            self.entries[i] = entry;
        }
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.iter().any(|e| e.source == source)
    }
}
