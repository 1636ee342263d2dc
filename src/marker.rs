use std::collections::HashMap;

use crate::rng::SeededRandom;

pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Draws letters until one differs from `previous`.
pub fn draw_marker(rng: &mut SeededRandom, previous: Option<char>) -> char {
    loop {
        let pick = (rng.next() * 26.0).floor() as usize;
        let marker = char::from(ALPHABET[pick.min(25)]);
        if Some(marker) != previous {
            return marker;
        }
    }
}

/// Marker letters plus per-letter occurrence counters.
#[derive(Debug, Default, Clone)]
pub struct MarkerAllocator {
    previous: Option<char>,
    counters: HashMap<char, u32>,
}

impl MarkerAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next marker and remembers it as the predecessor.
    pub fn next(&mut self, rng: &mut SeededRandom) -> char {
        let marker = draw_marker(rng, self.previous);
        self.previous = Some(marker);
        marker
    }

    /// Draws what the next marker would be without recording it.
    pub fn peek(&self, rng: &mut SeededRandom) -> char {
        draw_marker(rng, self.previous)
    }

    /// Bumps the counter for `letter` and returns `"letter-count"`.
    pub fn mint_id(&mut self, letter: char) -> String {
        let count = self.counters.entry(letter).or_insert(0);
        *count += 1;
        format!("{}-{}", letter, count)
    }
}
