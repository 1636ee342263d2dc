use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::convert::{JsonPart, part_file_name, to_json, to_json_parts};
use crate::error::CueError;
use crate::group::GroupBuilder;
use crate::paragraph::ParagraphCodec;
use crate::subtitle::to_srt;
use crate::timedtext::{cue_span, parse_timed_text_raw};
use crate::types::{Cue, Group};
use crate::utils::round3;

/// Spacing between bootstrap group start times, in seconds.
const FAKE_SPACING: f64 = 2.5;

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub groups: Vec<Group>,
    pub first_start: f64,
    pub last_end: f64,
}

/// Bootstrap groups, then one group per batch of cues.
///
/// Yields to the runtime every 10 bootstrap groups and every 50 cues so long
/// transcripts do not hog a shared executor.
pub async fn build_groups(cues: Vec<Cue>, config: &EngineConfig) -> BuildOutput {
    let (first_start, last_end) = cue_span(&cues);
    let mut builder = GroupBuilder::new(config.seed);

    let fakes = config.fake_groups;
    for i in 0..fakes {
        let start = round3(first_start - (fakes - i) as f64 * FAKE_SPACING);
        builder.create_group(vec![Cue::synthetic(start, start)], true);
        if i % 10 == 0 {
            tokio::task::yield_now().await;
        }
    }

    let batch_size = config.batch_size.max(1);
    for (n, batch) in cues.chunks(batch_size).enumerate() {
        builder.create_group(batch.to_vec(), false);
        if (n * batch_size) % 50 == 0 {
            tokio::task::yield_now().await;
        }
    }

    let groups = builder.finish();
    info!(
        "Built {} groups ({} bootstrap) from {} cues",
        groups.len(),
        fakes,
        cues.len()
    );
    BuildOutput {
        groups,
        first_start,
        last_end,
    }
}

/// SRT straight from timed text, formatted from unrounded cue times.
pub fn srt_from_timed_text(xml: &str) -> Result<String, CueError> {
    let cues = parse_timed_text_raw(xml)?;
    Ok(to_srt(&cues))
}

pub async fn paragraph_from_cues(cues: Vec<Cue>, config: &EngineConfig) -> String {
    let built = build_groups(cues, config).await;
    ParagraphCodec::new(config).to_paragraph(&built.groups)
}

/// JSON documents for `cues`; split by chunk unless `single` is set.
pub async fn json_from_cues(
    cues: Vec<Cue>,
    config: &EngineConfig,
    base: &str,
    single: bool,
) -> Result<Vec<JsonPart>, CueError> {
    let built = build_groups(cues, config).await;
    if single {
        return Ok(vec![JsonPart {
            file_name: part_file_name(base, 1, 1),
            content: to_json(&built.groups)?,
        }]);
    }
    let parts = to_json_parts(
        &built.groups,
        built.first_start,
        built.last_end,
        config.chunk_duration,
        base,
    )?;
    debug!(
        "Span {:.3}-{:.3}s split into {} parts",
        built.first_start,
        built.last_end,
        parts.len()
    );
    Ok(parts)
}

pub fn paragraph_to_json(text: &str, config: &EngineConfig) -> Result<String, CueError> {
    let records = ParagraphCodec::new(config).from_paragraph(text);
    serde_json::to_string_pretty(&records).map_err(|e| CueError::json("render paragraph groups", e))
}
