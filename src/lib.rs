pub mod chunk;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod group;
pub mod marker;
pub mod merge;
pub mod paragraph;
pub mod pipeline;
pub mod rng;
pub mod segment;
pub mod subtitle;
pub mod timedtext;
pub mod types;
mod utils;

pub use config::{EngineConfig, ParagraphOptions};
pub use error::CueError;
pub use group::GroupBuilder;
pub use paragraph::ParagraphCodec;
pub use rng::SeededRandom;
pub use types::{CombinationRecord, CombinationSet, Cue, Group, MergeSpec, ParagraphGroup, Share};
