//! Groups to labeled paragraphs and back.
//!
//! Forward output looks like `(q) first group text (a) second group text`, with
//! paragraphs separated by a blank line. A paragraph's last group may be cut so
//! its tail opens the next paragraph unlabeled. Parsing replays the bootstrap
//! markers from the grouping seed, so a replayed paragraph gets the same
//! markers and ids the forward run assigned.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::{EngineConfig, ParagraphOptions};
use crate::marker::MarkerAllocator;
use crate::rng::SeededRandom;
use crate::segment::{TextSegmenter, word_count};
use crate::types::{Group, ParagraphGroup};

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([a-z])\)\s*").expect("label pattern is valid"));

#[derive(Debug)]
pub struct ParagraphCodec {
    options: ParagraphOptions,
    seed: u32,
    paragraph_seed: u32,
    fake_groups: usize,
    segmenter: TextSegmenter,
}

impl ParagraphCodec {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            options: config.paragraph,
            seed: config.seed,
            paragraph_seed: config.paragraph_seed,
            fake_groups: config.fake_groups,
            segmenter: TextSegmenter::new(config.segment_cache_capacity),
        }
    }

    pub fn to_paragraph(&mut self, groups: &[Group]) -> String {
        let real: Vec<&Group> = groups.iter().filter(|g| !g.is_fake()).collect();
        if real.is_empty() {
            return String::new();
        }

        let ParagraphOptions { min, max, split_chance } = self.options;
        let spread = (max.saturating_sub(min) + 1) as f64;
        let chance = f64::from(split_chance) / 100.0;
        let mut rng = SeededRandom::new(self.paragraph_seed);

        let mut paragraphs = Vec::new();
        let mut carry: Option<String> = None;
        let mut i = 0;
        while i < real.len() {
            let mut parts: Vec<String> = carry.take().into_iter().collect();
            let slots = ((rng.next() * spread).floor() as usize + min).max(1);

            let mut slot = 0;
            while slot < slots && i < real.len() {
                let group = real[i];
                let closes = slot == slots - 1 && i < real.len() - 1;
                i += 1;
                slot += 1;

                if closes && rng.next() < chance {
                    let seg = self.segmenter.units_of(&group.text);
                    if seg.units.len() > 2 {
                        let fraction = 0.4 + rng.next() * 0.2;
                        let cut = ((seg.units.len() as f64 * fraction).floor() as usize).max(1);
                        parts.push(format!("({}) {}", group.marker, seg.join(&seg.units[..cut])));
                        carry = Some(seg.join(&seg.units[cut..]));
                        break;
                    }
                }
                parts.push(format!("({}) {}", group.marker, group.text));
            }

            if !parts.is_empty() {
                paragraphs.push(parts.join(" "));
            }
        }

        debug!("Laid out {} groups in {} paragraphs", real.len(), paragraphs.len());
        paragraphs.join("\n\n")
    }

    /// Rebuilds group records from labeled paragraph text.
    ///
    /// Text before the first label gets the marker the grouping RNG would have
    /// drawn next; every other span takes the letter of its label.
    pub fn from_paragraph(&self, text: &str) -> Vec<ParagraphGroup> {
        let mut rng = SeededRandom::new(self.seed);
        let mut markers = MarkerAllocator::new();
        let mut history: Vec<char> = Vec::new();
        let mut records = Vec::new();

        for _ in 0..self.fake_groups {
            let marker = markers.next(&mut rng);
            records.push(ParagraphGroup {
                marker,
                marker_id: markers.mint_id(marker),
                word_count: 0,
                text: String::new(),
                previous5: None,
                previous4: None,
                previous3: None,
                is_fake: true,
                is_leading: false,
            });
            history.push(marker);
        }

        let expected_leading = markers.peek(&mut rng);
        let text = text.trim();
        let labels: Vec<_> = LABEL.captures_iter(text).collect();

        let lead_end = labels
            .first()
            .and_then(|caps| caps.get(0))
            .map_or(text.len(), |m| m.start());
        let lead = text[..lead_end].trim();
        if !lead.is_empty() {
            let record = span_record(&mut markers, &history, expected_leading, lead, true);
            records.push(record);
            history.push(expected_leading);
        }

        for (k, caps) in labels.iter().enumerate() {
            let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(marker) = letter.as_str().chars().next() else {
                continue;
            };
            let span_end = labels
                .get(k + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let span = text[whole.end()..span_end].trim();
            let is_leading = records.len() == self.fake_groups;
            let record = span_record(&mut markers, &history, marker, span, is_leading);
            records.push(record);
            history.push(marker);
        }

        debug!(
            "Parsed {} groups from paragraph text",
            records.len() - self.fake_groups
        );
        records
    }
}

fn span_record(
    markers: &mut MarkerAllocator,
    history: &[char],
    marker: char,
    text: &str,
    is_leading: bool,
) -> ParagraphGroup {
    ParagraphGroup {
        marker,
        marker_id: markers.mint_id(marker),
        word_count: word_count(text),
        text: text.to_string(),
        previous5: trailing(history, 5),
        previous4: trailing(history, 4),
        previous3: trailing(history, 3),
        is_fake: false,
        is_leading,
    }
}

/// Last `n` markers, or `None` if fewer exist.
fn trailing(history: &[char], n: usize) -> Option<String> {
    history
        .len()
        .checked_sub(n)
        .map(|from| history[from..].iter().collect())
}
