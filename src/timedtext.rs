use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::CueError;
use crate::types::Cue;
use crate::utils::{round3, text_content};

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("element pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
});

/// Reads `<text start=".." dur="..">` elements into cues.
///
/// Empty elements are skipped but still count towards `idx`, so indices keep
/// pointing at the element's position in the document. Times are rounded to
/// milliseconds.
pub fn parse_timed_text(xml: &str) -> Result<Vec<Cue>, CueError> {
    let mut cues = parse_timed_text_raw(xml)?;
    for cue in &mut cues {
        cue.start = round3(cue.start);
        cue.end = round3(cue.end);
    }
    Ok(cues)
}

/// Same as [`parse_timed_text`] with `start` and `start + dur` left unrounded.
///
/// SRT timecodes truncate milliseconds, so they must see the raw sum.
pub fn parse_timed_text_raw(xml: &str) -> Result<Vec<Cue>, CueError> {
    let mut cues = Vec::new();
    let mut elements = 0;
    for (i, caps) in TEXT_ELEMENT.captures_iter(xml).enumerate() {
        elements += 1;
        let content = caps.get(2).map_or(String::new(), |m| text_content(m.as_str()));
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let start = attribute(attrs, "start")
            .ok_or_else(|| CueError::invalid_input(format!("text element {} has no start", i + 1)))?;
        let start = parse_seconds(&start, "start", i)?;
        let dur = match attribute(attrs, "dur") {
            Some(raw) => parse_seconds(&raw, "dur", i)?,
            None => 0.0,
        };

        cues.push(Cue::new(i + 1, start, start + dur, content));
    }

    if elements == 0 {
        warn!("No <text> elements found in timed text");
    }
    debug!("Parsed {} cues from {} elements", cues.len(), elements);
    Ok(cues)
}

/// First cue start and last cue end; `(0, 0)` without cues.
pub fn cue_span(cues: &[Cue]) -> (f64, f64) {
    let first_start = cues.first().map_or(0.0, |cue| cue.start);
    let last_end = cues.last().map_or(first_start, |cue| cue.end);
    (first_start, last_end)
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_string())
}

fn parse_seconds(raw: &str, name: &str, i: usize) -> Result<f64, CueError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CueError::invalid_input(format!(
                "text element {} has non-numeric {} \"{}\"",
                i + 1,
                name,
                raw
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="1.2" dur="2.5">hello &amp;amp; welcome</text>
<text start="3.7" dur="1"> </text>
<text start='4.7' dur='1.3333'>it&#39;s fine</text>
<text start="6"/>
<text dur="2" start="8.0005">last
line</text>
</transcript>"#;

    #[test]
    fn parses_cues_in_order() {
        let cues = parse_timed_text(SAMPLE).expect("parse");
        assert_eq!(cues.len(), 3);

        assert_eq!(cues[0].idx, Some(1));
        assert_eq!(cues[0].text, "hello &amp; welcome");
        assert_eq!((cues[0].start, cues[0].end), (1.2, 3.7));
        assert_eq!(cues[0].word_count, 3);

        assert_eq!(cues[1].idx, Some(3));
        assert_eq!(cues[1].text, "it's fine");
        assert_eq!(cues[1].end, 6.033);

        assert_eq!(cues[2].idx, Some(5));
        assert_eq!(cues[2].text, "last\nline");
        assert_eq!(cues[2].start, 8.001);
        assert_eq!(cues[2].translation, "");
    }

    #[test]
    fn span_of_cues() {
        let cues = parse_timed_text(SAMPLE).expect("parse");
        assert_eq!(cue_span(&cues), (1.2, 10.001));
        assert_eq!(cue_span(&[]), (0.0, 0.0));
    }

    #[test]
    fn empty_document_has_no_cues() {
        assert!(parse_timed_text("<transcript></transcript>").expect("parse").is_empty());
    }

    #[test]
    fn raw_times_keep_float_sum() {
        let xml = r#"<text start="0.7" dur="0.1">x</text>"#;
        let raw = parse_timed_text_raw(xml).expect("parse");
        assert_eq!(raw[0].end, 0.7 + 0.1);
        assert!(raw[0].end < 0.8);
        let rounded = parse_timed_text(xml).expect("parse");
        assert_eq!(rounded[0].end, 0.8);
    }

    #[test]
    fn bad_start_is_invalid_input() {
        let err = parse_timed_text(r#"<text start="soon" dur="1">x</text>"#).unwrap_err();
        assert!(matches!(err, CueError::InvalidInput { .. }));
    }
}
