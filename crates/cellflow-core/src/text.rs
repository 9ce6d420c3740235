//! Text measurement and its memoizing cache.

use crate::config::LayoutConfig;
use crate::geometry::Size;
use std::collections::HashMap;

/// Font identity for cache keys. Size is kept in hundredths of a point so the
/// key can be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    /// Family name
    pub family: String,
    size_centi: u32,
}

impl FontKey {
    /// Create a font key.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size_centi: (size.max(0.0) * 100.0).round() as u32,
        }
    }

    /// Point size.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size_centi as f32 / 100.0
    }
}

/// Measures single-line text.
pub trait TextMeasurer {
    /// Size of `text` set in `font`.
    fn measure(&self, font: &FontKey, text: &str) -> Size;
}

/// Fixed-advance measurer: each char is three fifths of the font size wide,
/// lines are six fifths high.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, font: &FontKey, text: &str) -> Size {
        let size = font.size();
        let advance = text.chars().count() as f32 * size * 3.0;
        Size::new(advance / 5.0, size * 6.0 / 5.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    size: Size,
    last_used: u64,
}

/// Bounded cache of measured text sizes.
///
/// Entries untouched for two generations are dropped by
/// [`TextMetricsCache::advance_generation`]. When full, an insert first drops
/// stale entries and then the least recently used one.
#[derive(Debug)]
pub struct TextMetricsCache {
    entries: HashMap<(FontKey, String), Entry>,
    capacity: usize,
    generation: u64,
    hits: usize,
    misses: usize,
}

impl Default for TextMetricsCache {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl TextMetricsCache {
    /// Create an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            generation: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Create an empty cache sized by `config.text_cache_capacity`.
    #[must_use]
    pub fn with_config(config: &LayoutConfig) -> Self {
        Self::new(config.text_cache_capacity)
    }

    /// Look up a cached size.
    pub fn get(&mut self, font: &FontKey, text: &str) -> Option<Size> {
        let generation = self.generation;
        if let Some(entry) = self.entries.get_mut(&(font.clone(), text.to_string())) {
            entry.last_used = generation;
            self.hits += 1;
            Some(entry.size)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Insert a measured size.
    pub fn insert(&mut self, font: FontKey, text: impl Into<String>, size: Size) {
        let key = (font, text.into());
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_one();
        }
        self.entries.insert(
            key,
            Entry {
                size,
                last_used: self.generation,
            },
        );
    }

    /// Cached size, measuring with `measurer` on a miss.
    pub fn measure(&mut self, measurer: &dyn TextMeasurer, font: &FontKey, text: &str) -> Size {
        if let Some(size) = self.get(font, text) {
            return size;
        }
        let size = measurer.measure(font, text);
        self.insert(font.clone(), text, size);
        size
    }

    /// Advance to the next generation and drop stale entries.
    pub fn advance_generation(&mut self) {
        self.generation += 1;
        let threshold = self.generation.saturating_sub(2);
        self.entries.retain(|_, e| e.last_used >= threshold);
    }

    fn evict_one(&mut self) {
        let threshold = self.generation.saturating_sub(2);
        let before = self.entries.len();
        self.entries.retain(|_, e| e.last_used >= threshold);
        if self.entries.len() < before {
            return;
        }
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());
        if let Some(k) = oldest {
            self.entries.remove(&k);
        }
    }

    /// Drop everything and reset counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Cache hits so far.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Cache misses so far.
    #[must_use]
    pub const fn misses(&self) -> usize {
        self.misses
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
