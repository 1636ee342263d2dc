use serde_json::{Map, Value};

use crate::chunk::{compute_chunks, split_by_chunks};
use crate::error::CueError;
use crate::types::Group;

/// One JSON document ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPart {
    pub file_name: String,
    pub content: String,
}

/// `{ marker: [groups...] }`, keys in order of first appearance.
pub fn group_by_marker<'a, I>(groups: I) -> Result<Value, CueError>
where
    I: IntoIterator<Item = &'a Group>,
{
    let mut map = Map::new();
    for group in groups {
        let value = serde_json::to_value(group).map_err(|e| CueError::json("serialize group", e))?;
        let entry = map
            .entry(group.marker.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = entry {
            items.push(value);
        }
    }
    Ok(Value::Object(map))
}

pub fn to_json(groups: &[Group]) -> Result<String, CueError> {
    let doc = group_by_marker(groups)?;
    serde_json::to_string_pretty(&doc).map_err(|e| CueError::json("render groups", e))
}

/// One document per chunk of `[first_start, last_end]`.
pub fn to_json_parts(
    groups: &[Group],
    first_start: f64,
    last_end: f64,
    chunk_duration: f64,
    base: &str,
) -> Result<Vec<JsonPart>, CueError> {
    let chunks = compute_chunks(first_start, last_end, chunk_duration);
    let buckets = split_by_chunks(groups, &chunks);
    let total = buckets.len();
    buckets
        .into_iter()
        .enumerate()
        .map(|(i, bucket)| {
            let doc = group_by_marker(bucket)?;
            Ok(JsonPart {
                file_name: part_file_name(base, i + 1, total),
                content: serde_json::to_string_pretty(&doc)
                    .map_err(|e| CueError::json("render chunk", e))?,
            })
        })
        .collect()
}

pub fn part_file_name(base: &str, part: usize, total: usize) -> String {
    if total == 1 {
        format!("{}.json", base)
    } else {
        format!("{}.part{}of{}.json", base, part, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupBuilder;
    use crate::types::Cue;

    fn groups(cues: &[(f64, f64, &str)]) -> Vec<Group> {
        let mut builder = GroupBuilder::new(1);
        for _ in 0..5 {
            builder.create_group(vec![Cue::synthetic(0.0, 0.0)], true);
        }
        for (i, &(start, end, text)) in cues.iter().enumerate() {
            builder.create_group(vec![Cue::new(i + 1, start, end, text)], false);
        }
        builder.finish()
    }

    #[test]
    fn keys_follow_first_appearance() {
        let groups = groups(&[(0.0, 1.0, "one two"), (1.0, 2.0, "three")]);
        let doc = group_by_marker(&groups).expect("group");
        let keys: Vec<&str> = doc.as_object().expect("object").keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["q", "a", "n", "z", "h", "p", "s"]);
        assert_eq!(doc["p"][0]["wordCount"], 2);
        assert_eq!(doc["p"][0]["isLeading"], true);
        assert_eq!(doc["q"][0]["isFake"], true);
        assert!(doc["q"][0].get("isTrailing").is_none());
        assert_eq!(doc["s"][0]["sourceCues"][0]["text"], "three");
    }

    #[test]
    fn repeated_markers_share_a_key() {
        let many: Vec<(f64, f64, &str)> = (0..30).map(|i| (i as f64, i as f64 + 1.0, "word")).collect();
        let groups = groups(&many);
        let doc = group_by_marker(&groups).expect("group");
        let total: usize = doc
            .as_object()
            .expect("object")
            .values()
            .map(|v| v.as_array().map_or(0, Vec::len))
            .sum();
        assert_eq!(total, groups.len());
    }

    #[test]
    fn single_chunk_uses_plain_name() {
        let groups = groups(&[(0.0, 10.0, "short talk")]);
        let parts = to_json_parts(&groups, 0.0, 10.0, 3600.0, "talk").expect("parts");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].file_name, "talk.json");
        assert!(parts[0].content.contains("\"markerId\": \"p-1\""));
    }

    #[test]
    fn long_span_is_split_into_named_parts() {
        let groups = groups(&[(0.0, 10.0, "early"), (7000.0, 7200.0, "late")]);
        let parts = to_json_parts(&groups, 0.0, 7200.0, 3600.0, "talk").expect("parts");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].file_name, "talk.part1of2.json");
        assert_eq!(parts[1].file_name, "talk.part2of2.json");
        assert!(parts[0].content.contains("early"));
        assert!(parts[0].content.contains("isFake"));
        assert!(parts[1].content.contains("late"));
        assert!(!parts[1].content.contains("isFake"));
    }
}
