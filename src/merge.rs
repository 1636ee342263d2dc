//! Reconstruction specs for a hidden group merged with its predecessor.
//!
//! The merged text is cut in two at a point proportional to the groups'
//! original word counts, then each half is spread back over that group's
//! source cues by their word-count weights. Every non-final cue takes a rounded
//! share and the final cue takes whatever is left, so per-cue counts always sum
//! to the share size.

use crate::segment::{is_spaced, join_units, units_with};
use crate::types::{Assignment, Group, MergeSpec, Share};
use crate::utils::ratio;

pub fn build_spec(prev: &Group, lack: &Group) -> MergeSpec {
    let total_word_count = prev.word_count + lack.word_count;
    let texts: Vec<&str> = prev
        .source_cues
        .iter()
        .chain(&lack.source_cues)
        .map(|cue| cue.text.as_str())
        .collect();

    // classify on the raw cue texts; group texts already carry join spaces
    let spaced = is_spaced(&texts.concat());
    let merged_text = if spaced { texts.join(" ") } else { texts.concat() };
    let units = units_with(&merged_text, spaced);
    let total_units = units.len();

    let split_at = if total_word_count == 0 {
        0
    } else {
        let exact = total_units as f64 * prev.word_count as f64 / total_word_count as f64;
        (exact.round() as usize).min(total_units)
    };
    let (head, tail) = units.split_at(split_at);

    let shares: Vec<(char, Share)> = [(prev, head), (lack, tail)]
        .into_iter()
        .filter(|(_, part)| !part.is_empty())
        .map(|(group, part)| (group.marker, build_share(group, part, total_units, spaced)))
        .collect();

    MergeSpec {
        label: shares.iter().map(|(marker, _)| *marker).collect(),
        start: prev.start,
        end: lack.end,
        total_word_count,
        total_units,
        merged_text,
        shares: shares.into_iter().map(|(_, share)| share).collect(),
    }
}

fn build_share(group: &Group, units: &[String], total_units: usize, spaced: bool) -> Share {
    let counts = spread_units(units.len(), &cue_weights(group));

    let mut assignments = Vec::new();
    let mut offset = 0;
    for (cue, count) in group.source_cues.iter().zip(counts) {
        let slice = &units[offset..offset + count];
        offset += count;
        let Some(idx) = cue.idx else { continue };
        if slice.is_empty() {
            continue;
        }
        assignments.push(Assignment {
            idx,
            start: cue.start,
            end: cue.end,
            unit_count: count,
            text: join_units(slice, spaced),
        });
    }

    Share {
        marker_id: group.marker_id.clone(),
        unit_ratio: ratio(units.len(), total_units),
        distribution: assignments
            .iter()
            .map(|a| ratio(a.unit_count, total_units))
            .collect(),
        text: join_units(units, spaced),
        assignments,
    }
}

/// Unrounded per-cue word-count weights.
fn cue_weights(group: &Group) -> Vec<f64> {
    let total: usize = group.source_cues.iter().map(|cue| cue.word_count).sum();
    group
        .source_cues
        .iter()
        .map(|cue| {
            if total > 0 {
                cue.word_count as f64 / total as f64
            } else {
                0.0
            }
        })
        .collect()
}

/// Splits `count` units by `weights`; the last slot absorbs the remainder.
pub fn spread_units(count: usize, weights: &[f64]) -> Vec<usize> {
    let mut remaining = count;
    let last = weights.len().saturating_sub(1);
    weights
        .iter()
        .enumerate()
        .map(|(i, weight)| {
            let take = if i == last {
                remaining
            } else {
                ((count as f64 * weight).round() as usize).min(remaining)
            };
            remaining -= take;
            take
        })
        .collect()
}
