//! Script-aware splitting of caption text into units.
//!
//! Text where whitespace runs make up more than 5% of the characters is treated
//! as word-delimited and split into words. Anything sparser (Chinese, Japanese,
//! Thai, ...) is split into extended grapheme clusters. Word counts everywhere in
//! the crate go through [`word_count`] so grouping and paragraph parsing agree.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const SPACED_RATIO: f64 = 0.05;

/// Units of one text plus the classification that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub units: Vec<String>,
    pub spaced: bool,
}

impl Segmentation {
    /// Joins a slice of units back the way the script expects.
    pub fn join(&self, units: &[String]) -> String {
        join_units(units, self.spaced)
    }
}

pub fn join_units(units: &[String], spaced: bool) -> String {
    if spaced {
        units.join(" ")
    } else {
        units.concat()
    }
}

/// `true` when the text is word-delimited.
pub fn is_spaced(text: &str) -> bool {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return false;
    }
    let runs = WHITESPACE.find_iter(trimmed).count();
    runs as f64 / len as f64 > SPACED_RATIO
}

pub fn split_units(text: &str) -> Segmentation {
    let trimmed = text.trim();
    let spaced = is_spaced(trimmed);
    Segmentation {
        units: units_with(trimmed, spaced),
        spaced,
    }
}

/// Splits with a classification decided elsewhere, e.g. from text sampled
/// before it was re-joined.
pub fn units_with(text: &str, spaced: bool) -> Vec<String> {
    if spaced {
        WHITESPACE
            .split(text)
            .filter(|unit| !unit.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        text.graphemes(true).map(str::to_string).collect()
    }
}

pub fn word_count(text: &str) -> usize {
    split_units(text).units.len()
}

/// Memoizing front for [`split_units`].
///
/// The cache is dropped wholesale once it reaches `capacity`; a capacity of zero
/// disables it. Results never depend on cache state.
#[derive(Debug, Default)]
pub struct TextSegmenter {
    cache: HashMap<String, Segmentation>,
    capacity: usize,
}

impl TextSegmenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: HashMap::new(),
            capacity,
        }
    }

    pub fn units_of(&mut self, text: &str) -> Segmentation {
        if self.capacity == 0 {
            return split_units(text);
        }
        if let Some(hit) = self.cache.get(text) {
            return hit.clone();
        }
        if self.cache.len() >= self.capacity {
            self.cache.clear();
        }
        let seg = split_units(text);
        self.cache.insert(text.to_string(), seg.clone());
        seg
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
