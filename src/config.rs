use std::path::Path;

use serde::Deserialize;

use crate::error::CueError;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParagraphOptions {
    /// Fewest groups per paragraph.
    pub min: usize,
    /// Most groups per paragraph.
    pub max: usize,
    /// Percent chance that a paragraph's last group is split across the break.
    pub split_chance: u32,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        Self {
            min: 3,
            max: 8,
            split_chance: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub paragraph: ParagraphOptions,
    /// Longest span, in seconds, kept in one JSON document.
    pub chunk_duration: f64,
    /// Bootstrap groups placed before the first real group.
    pub fake_groups: usize,
    /// Seed of the grouping RNG; paragraph parsing replays it.
    pub seed: u32,
    /// Seed of the separate RNG that lays out paragraphs.
    pub paragraph_seed: u32,
    /// Cues per group.
    pub batch_size: usize,
    /// Entries kept by the segmentation cache; 0 turns it off.
    pub segment_cache_capacity: usize,
}

impl EngineConfig {
    pub const DEFAULT_CHUNK_DURATION: f64 = 3600.0;
    pub const DEFAULT_FAKE_GROUPS: usize = 5;
    pub const DEFAULT_SEED: u32 = 1;
    pub const DEFAULT_PARAGRAPH_SEED: u32 = 42;
    pub const DEFAULT_BATCH_SIZE: usize = 5;

    pub fn load(path: &Path) -> Result<Self, CueError> {
        let data = std::fs::read_to_string(path).map_err(|e| CueError::io("read config", e))?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| CueError::json("parse config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CueError> {
        let p = &self.paragraph;
        if p.min == 0 {
            return Err(CueError::invalid_config("paragraph.min must be at least 1"));
        }
        if p.min > p.max {
            return Err(CueError::invalid_config(format!(
                "paragraph.min ({}) exceeds paragraph.max ({})",
                p.min, p.max
            )));
        }
        if p.split_chance > 100 {
            return Err(CueError::invalid_config(format!(
                "paragraph.split_chance must be 0-100, got {}",
                p.split_chance
            )));
        }
        if !self.chunk_duration.is_finite() || self.chunk_duration <= 0.0 {
            return Err(CueError::invalid_config(format!(
                "chunk_duration must be positive, got {}",
                self.chunk_duration
            )));
        }
        if self.batch_size == 0 {
            return Err(CueError::invalid_config("batch_size must be at least 1"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            paragraph: ParagraphOptions::default(),
            chunk_duration: Self::DEFAULT_CHUNK_DURATION,
            fake_groups: Self::DEFAULT_FAKE_GROUPS,
            seed: Self::DEFAULT_SEED,
            paragraph_seed: Self::DEFAULT_PARAGRAPH_SEED,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            segment_cache_capacity: 4096,
        }
    }
}
