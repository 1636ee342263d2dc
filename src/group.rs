use std::collections::HashMap;

use tracing::debug;

use crate::marker::MarkerAllocator;
use crate::merge::build_spec;
use crate::rng::SeededRandom;
use crate::types::{CombinationRecord, CombinationSet, Cue, Group, GroupFlags};
use crate::utils::round4;

/// Groups looked back on when computing lacking combinations.
pub const WINDOW: usize = 5;

/// Builds marked groups one batch at a time.
///
/// Owns the marker RNG, the per-letter counters and every group built so far.
/// Two builders never share state, so transcripts can be processed side by side.
#[derive(Debug)]
pub struct GroupBuilder {
    rng: SeededRandom,
    markers: MarkerAllocator,
    groups: Vec<Group>,
    lookup: HashMap<String, usize>,
}

impl GroupBuilder {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SeededRandom::new(seed),
            markers: MarkerAllocator::new(),
            groups: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Finds a built group by its marker id, e.g. `"z-2"`.
    ///
    /// Lets library callers resolve ids from JSON or paragraph records while
    /// the builder is still live; group building itself works on positions.
    pub fn get(&self, marker_id: &str) -> Option<&Group> {
        self.lookup.get(marker_id).map(|&i| &self.groups[i])
    }

    pub fn create_group(&mut self, cues: Vec<Cue>, is_fake: bool) -> &Group {
        let marker = self.markers.next(&mut self.rng);
        let marker_id = self.markers.mint_id(marker);

        let word_count: usize = cues.iter().map(|cue| cue.word_count).sum();
        let text = cues
            .iter()
            .map(|cue| cue.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        let start = cues.first().map_or(0.0, |cue| cue.start);
        let end = cues.last().map_or(start, |cue| cue.end);
        let distribution = cues
            .iter()
            .map(|cue| {
                if word_count > 0 {
                    round4(cue.word_count as f64 / word_count as f64)
                } else {
                    0.0
                }
            })
            .collect();

        let combinations = self.compute_combinations();
        let index = self.groups.len();
        debug!(
            "Built group {} [{}] with {} words from {} cues, window {:?}",
            index,
            marker_id,
            word_count,
            cues.len(),
            combinations.as_ref().map(|c| c.window_markers.as_str())
        );

        self.lookup.insert(marker_id.clone(), index);
        self.groups.push(Group {
            index,
            marker,
            marker_id,
            word_count,
            text,
            start,
            end,
            source_cues: cues,
            distribution,
            combinations,
            flags: GroupFlags {
                is_fake,
                ..GroupFlags::default()
            },
        });
        &self.groups[index]
    }

    /// Flags the first real group as leading and the last group as trailing,
    /// then hands the groups over.
    pub fn finish(mut self) -> Vec<Group> {
        if let Some(first_real) = self.groups.iter().position(|g| !g.is_fake()) {
            self.groups[first_real].flags.is_leading = true;
            if let Some(last) = self.groups.last_mut() {
                last.flags.is_trailing = true;
            }
        }
        self.groups
    }

    /// Combinations over the `WINDOW` groups built before the current one.
    fn compute_combinations(&self) -> Option<CombinationSet> {
        let window = self.groups.get(self.groups.len().checked_sub(WINDOW)?..)?;
        Some(CombinationSet {
            window_markers: window.iter().map(|g| g.marker).collect(),
            choose4: lacking_combinations(window, 4),
            choose3: lacking_combinations(window, 3),
        })
    }
}

/// Every way of keeping `k` window groups known; the rest are lacking.
///
/// Subsets that hide the oldest group are skipped, and a lacking group only
/// yields a spec when both it and its predecessor carry text.
pub fn lacking_combinations(window: &[Group], k: usize) -> Vec<CombinationRecord> {
    if k >= window.len() || window.iter().all(|g| !g.has_content()) {
        return Vec::new();
    }

    let mut records = Vec::new();
    for chosen in index_subsets(window.len(), k) {
        let lacking: Vec<usize> = (0..window.len()).filter(|i| !chosen.contains(i)).collect();
        if lacking.first() == Some(&0) {
            continue;
        }

        let specs: Vec<_> = lacking
            .iter()
            .filter(|&&i| window[i - 1].has_content() && window[i].has_content())
            .map(|&i| build_spec(&window[i - 1], &window[i]))
            .collect();
        if specs.is_empty() {
            continue;
        }

        records.push(CombinationRecord {
            chosen_markers: chosen.iter().map(|&i| window[i].marker).collect(),
            lacking_markers: lacking.iter().map(|&i| window[i].marker).collect(),
            merged_labels: specs.iter().map(|s| s.label.clone()).collect(),
            specs,
        });
    }
    records
}

/// `k`-element subsets of `0..n` in lexicographic order.
fn index_subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, n: usize, k: usize, chosen: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if chosen.len() == k {
            out.push(chosen.clone());
            return;
        }
        for i in start..n {
            chosen.push(i);
            extend(i + 1, n, k, chosen, out);
            chosen.pop();
        }
    }

    let mut out = Vec::new();
    extend(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(i: usize) -> Cue {
        let words = ["alpha beta", "gamma delta epsilon", "zeta", "eta theta iota kappa"];
        Cue::new(i + 1, i as f64 * 2.0, i as f64 * 2.0 + 2.0, words[i % words.len()])
    }

    fn built(real_groups: usize) -> Vec<Group> {
        let mut builder = GroupBuilder::new(1);
        for i in 0..5 {
            let t = -12.5 + i as f64 * 2.5;
            builder.create_group(vec![Cue::synthetic(t, t)], true);
        }
        for g in 0..real_groups {
            let cues = (g * 5..g * 5 + 5).map(sentence).collect();
            builder.create_group(cues, false);
        }
        builder.finish()
    }

    #[test]
    fn distribution_matches_word_shares() {
        let mut builder = GroupBuilder::new(1);
        let group = builder.create_group(
            vec![Cue::new(1, 0.0, 2.0, "hello world"), Cue::new(2, 2.0, 4.0, "foo bar baz")],
            false,
        );
        assert_eq!(group.word_count, 5);
        assert_eq!(group.distribution, vec![0.4, 0.6]);
        assert_eq!(group.text, "hello world foo bar baz");
        assert_eq!((group.start, group.end), (0.0, 4.0));
        assert!(group.combinations.is_none());
    }

    #[test]
    fn markers_follow_reference_sequence() {
        let groups = built(7);
        let markers: String = groups.iter().map(|g| g.marker).collect();
        assert_eq!(markers, "qanzhpslzlmd");
        assert_eq!(groups[8].marker_id, "z-2");
        assert_eq!(groups[9].marker_id, "l-2");
    }

    #[test]
    fn adjacent_markers_differ() {
        let groups = built(40);
        for pair in groups.windows(2) {
            assert_ne!(pair[0].marker, pair[1].marker);
        }
    }

    #[test]
    fn distributions_sum_to_one() {
        for group in built(20).iter().filter(|g| g.word_count > 0) {
            let sum: f64 = group.distribution.iter().sum();
            assert!((sum - 1.0).abs() < 0.001, "{} sums to {}", group.marker_id, sum);
        }
    }

    #[test]
    fn window_needs_five_prior_groups() {
        let groups = built(3);
        assert!(groups[..5].iter().all(|g| g.combinations.is_none()));
        let set = groups[5].combinations.as_ref().expect("five fakes precede");
        assert_eq!(set.window_markers, "qanzh");
        // only fakes in the window
        assert!(set.choose4.is_empty() && set.choose3.is_empty());
    }

    #[test]
    fn oldest_window_group_is_never_lacking() {
        for group in built(12) {
            let Some(set) = group.combinations else { continue };
            let oldest = set.window_markers.chars().next();
            for record in set.choose4.iter().chain(&set.choose3) {
                assert_eq!(record.chosen_markers.chars().next(), oldest);
                assert_eq!(record.specs.len(), record.merged_labels.len());
            }
        }
    }

    #[test]
    fn full_window_yields_every_surviving_subset() {
        let groups = built(7);
        // groups[11]'s window is five real groups
        let set = groups[11].combinations.as_ref().expect("window");
        assert_eq!(set.window_markers, "slzlm");
        // subsets that hide index 0 are dropped: 5 - 1 and 10 - 4 remain
        assert_eq!(set.choose4.len(), 4);
        assert_eq!(set.choose3.len(), 6);
        assert_eq!(set.choose4[0].chosen_markers, "slzl");
        assert_eq!(set.choose4[0].lacking_markers, vec!['m']);
        assert_eq!(set.choose4[0].merged_labels, vec!["lm"]);
        assert_eq!(set.choose3[0].lacking_markers, vec!['l', 'm']);
        assert_eq!(set.choose3[0].merged_labels, vec!["zl", "lm"]);
    }

    #[test]
    fn fake_neighbours_produce_no_specs() {
        let groups = built(2);
        // window of groups[6] is four fakes and the first real group
        let set = groups[6].combinations.as_ref().expect("window");
        assert!(set.choose4.is_empty());
        assert!(set.choose3.is_empty());
    }

    #[test]
    fn boundary_flags() {
        let groups = built(3);
        assert!(groups[5].flags.is_leading);
        assert!(groups[7].flags.is_trailing);
        assert!(groups[..5].iter().all(|g| g.is_fake() && !g.flags.is_leading));
        assert_eq!(GroupBuilder::new(1).finish().len(), 0);
    }

    #[test]
    fn lookup_by_marker_id() {
        let mut builder = GroupBuilder::new(1);
        builder.create_group(vec![Cue::new(1, 0.0, 1.0, "one")], false);
        let id = builder.groups()[0].marker_id.clone();
        assert_eq!(builder.get(&id).map(|g| g.word_count), Some(1));
        assert!(builder.get("zz-9").is_none());
    }

    #[test]
    fn lookup_tells_repeated_letters_apart() {
        let mut builder = GroupBuilder::new(1);
        for i in 0..9 {
            builder.create_group(vec![sentence(i)], i < 5);
        }
        // seed 1 draws z for groups 3 and 8
        assert_eq!(builder.get("z-1").map(|g| g.index), Some(3));
        assert_eq!(builder.get("z-2").map(|g| g.index), Some(8));
        assert!(builder.get("z-3").is_none());
    }

    #[test]
    fn subsets_are_lexicographic() {
        let subsets = index_subsets(5, 4);
        assert_eq!(subsets.len(), 5);
        assert_eq!(subsets[0], vec![0, 1, 2, 3]);
        assert_eq!(subsets[4], vec![1, 2, 3, 4]);
        assert_eq!(index_subsets(5, 3).len(), 10);
    }
}
