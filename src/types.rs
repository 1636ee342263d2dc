use serde::Serialize;

use crate::segment::word_count;

/// One timed caption line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// Position of the source element (1-based); `None` for synthetic cues.
    pub idx: Option<usize>,
    pub start: f64,
    pub end: f64,
    pub word_count: usize,
    pub text: String,
    pub translation: String,
}

impl Cue {
    pub fn new(idx: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            idx: Some(idx),
            start,
            end,
            word_count: word_count(&text),
            text,
            translation: String::new(),
        }
    }

    /// Empty zero-word cue used by bootstrap groups.
    pub fn synthetic(start: f64, end: f64) -> Self {
        Self {
            idx: None,
            start,
            end,
            word_count: 0,
            text: String::new(),
            translation: String::new(),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFlags {
    #[serde(skip_serializing_if = "is_false")]
    pub is_fake: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_leading: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_trailing: bool,
}

/// A marked batch of cues.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Position in the full group list, bootstrap groups included.
    pub index: usize,
    pub marker: char,
    pub marker_id: String,
    pub word_count: usize,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub source_cues: Vec<Cue>,
    /// Per-cue share of `word_count`, rounded to 4 places.
    pub distribution: Vec<f64>,
    pub combinations: Option<CombinationSet>,
    #[serde(flatten)]
    pub flags: GroupFlags,
}

impl Group {
    pub fn is_fake(&self) -> bool {
        self.flags.is_fake
    }

    /// Bootstrap groups and empty batches fail this.
    pub fn has_content(&self) -> bool {
        self.word_count > 0 && !self.text.is_empty()
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Lacking combinations over the 5 groups before a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationSet {
    pub window_markers: String,
    pub choose4: Vec<CombinationRecord>,
    pub choose3: Vec<CombinationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationRecord {
    pub chosen_markers: String,
    pub lacking_markers: Vec<char>,
    pub merged_labels: Vec<String>,
    pub specs: Vec<MergeSpec>,
}

/// How to rebuild a hidden group from itself plus its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSpec {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub total_word_count: usize,
    /// Units in `merged_text`; differs from `total_word_count` for unspaced scripts.
    pub total_units: usize,
    pub merged_text: String,
    pub shares: Vec<Share>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub marker_id: String,
    pub unit_ratio: f64,
    pub distribution: Vec<f64>,
    pub text: String,
    pub assignments: Vec<Assignment>,
}

/// Units of a share handed back to one source cue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub idx: usize,
    pub start: f64,
    pub end: f64,
    pub unit_count: usize,
    pub text: String,
}

/// A group rebuilt from paragraph text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphGroup {
    pub marker: char,
    pub marker_id: String,
    pub word_count: usize,
    pub text: String,
    pub previous5: Option<String>,
    pub previous4: Option<String>,
    pub previous3: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_fake: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_leading: bool,
}
