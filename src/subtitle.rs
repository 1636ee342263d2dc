use crate::types::Cue;

/// Renders cues as SRT blocks separated by blank lines.
///
/// Blocks are numbered by the cue's source position, so skipped empty elements
/// leave gaps in the numbering.
pub fn to_srt(cues: &[Cue]) -> String {
    cues.iter()
        .enumerate()
        .filter(|(_, cue)| !cue.text.trim().is_empty())
        .map(|(i, cue)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                cue.idx.unwrap_or(i + 1),
                format_srt_time(cue.start),
                format_srt_time(cue.end),
                cue.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `HH:MM:SS,mmm`; milliseconds are truncated, not rounded.
pub fn format_srt_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let ms = ((seconds * 1000.0).floor() as u64) % 1000;
    let h = (seconds / 3600.0).floor() as u64;
    let m = ((seconds % 3600.0) / 60.0).floor() as u64;
    let s = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reference_time() {
        assert_eq!(format_srt_time(3661.234), "01:01:01,234");
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(59.9999), "00:00:59,999");
        assert_eq!(format_srt_time(360000.5), "100:00:00,500");
    }

    #[test]
    fn renders_numbered_blocks() {
        let cues = vec![
            Cue::new(1, 1.2, 3.7, "hello there"),
            Cue::new(3, 4.0, 5.5, "general"),
        ];
        assert_eq!(
            to_srt(&cues),
            "1\n00:00:01,200 --> 00:00:03,700\nhello there\n\n\
             3\n00:00:04,000 --> 00:00:05,500\ngeneral\n"
        );
    }

    #[test]
    fn no_cues_no_output() {
        assert_eq!(to_srt(&[]), "");
    }
}
