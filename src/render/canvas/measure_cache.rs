//! Text widths kept across frames.
//!
//! A grid frame measures the same strings over and over: each visible cell
//! line, every spill source left of the viewport whose overflow may reach
//! into it, and the whole column when a header edge is double-clicked. While
//! the sheet is scrolled those strings barely change between frames, so the
//! widths are kept per font in two generations. New widths go into the young
//! generation; when it fills up it becomes the old one and the previous old
//! generation is dropped. A hit in the old generation moves the entry back
//! to the young one, so whatever the current viewport keeps asking for
//! survives every rollover.

use std::collections::HashMap;

/// Widths kept in the young generation before it rolls over.
pub const TEXT_WIDTH_GENERATION: usize = 2048;

type WidthsByFont = HashMap<String, HashMap<String, f64>>;

#[derive(Debug)]
pub struct TextWidthCache {
    young: WidthsByFont,
    old: WidthsByFont,
    young_len: usize,
    generation: usize,
}

impl Default for TextWidthCache {
    fn default() -> Self {
        Self::new(TEXT_WIDTH_GENERATION)
    }
}

impl TextWidthCache {
    /// A `generation` of 0 disables caching.
    pub fn new(generation: usize) -> Self {
        Self {
            young: HashMap::new(),
            old: HashMap::new(),
            young_len: 0,
            generation,
        }
    }

    pub fn get(&mut self, font: &str, text: &str) -> Option<f64> {
        if let Some(width) = self.young.get(font).and_then(|w| w.get(text)) {
            return Some(*width);
        }
        let width = self.old.get_mut(font)?.remove(text)?;
        self.insert(font, text, width);
        Some(width)
    }

    pub fn insert(&mut self, font: &str, text: &str, width: f64) {
        if self.generation == 0 {
            return;
        }
        let widths = self.young.entry(font.to_string()).or_default();
        if widths.insert(text.to_string(), width).is_none() {
            self.young_len += 1;
        }
        if self.young_len >= self.generation {
            self.old = std::mem::take(&mut self.young);
            self.young_len = 0;
        }
    }

    /// Cached width, or measure with `measure` and remember the result.
    pub fn get_or_measure<F: FnOnce() -> f64>(&mut self, font: &str, text: &str, measure: F) -> f64 {
        if let Some(width) = self.get(font, text) {
            return width;
        }
        let width = measure();
        self.insert(font, text, width);
        width
    }

    pub fn len(&self) -> usize {
        let old: usize = self.old.values().map(HashMap::len).sum();
        self.young_len + old
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn widths_are_per_font() {
        let mut cache = TextWidthCache::new(8);
        cache.insert("13px Inter", "abc", 20.0);
        assert_eq!(cache.get("13px Inter", "abc"), Some(20.0));
        assert_eq!(cache.get("bold 13px Inter", "abc"), None);
    }

    #[test]
    fn widths_in_use_survive_rollover() {
        let mut cache = TextWidthCache::new(2);
        cache.insert("f", "a", 1.0);
        cache.insert("f", "b", 2.0);
        // Both now sit in the old generation; reading "a" keeps it young.
        assert_eq!(cache.get("f", "a"), Some(1.0));
        cache.insert("f", "c", 3.0);
        assert_eq!(cache.get("f", "a"), Some(1.0));
        assert_eq!(cache.get("f", "c"), Some(3.0));
        assert_eq!(cache.get("f", "b"), None);
    }

    #[test]
    fn unused_widths_are_dropped_after_two_rollovers() {
        let mut cache = TextWidthCache::new(2);
        for (text, width) in [("a", 0.0), ("b", 1.0), ("c", 2.0), ("d", 3.0), ("e", 4.0)] {
            cache.insert("f", text, width);
        }
        assert_eq!(cache.get("f", "a"), None);
        assert_eq!(cache.get("f", "e"), Some(4.0));
        assert!(cache.len() <= 3);
    }

    #[test]
    fn measures_once() {
        let mut cache = TextWidthCache::new(8);
        let mut calls = 0;
        for _ in 0..3 {
            let width = cache.get_or_measure("f", "hello", || {
                calls += 1;
                42.0
            });
            assert_eq!(width, 42.0);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_generation_disables_caching() {
        let mut cache = TextWidthCache::new(0);
        cache.insert("f", "a", 1.0);
        assert!(cache.is_empty());
        assert_eq!(cache.get("f", "a"), None);
    }
}
