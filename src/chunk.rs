use crate::types::Group;

pub type Chunk = (f64, f64);

/// Cuts `[start, end]` into output chunks of at most `max_len` seconds.
///
/// Exact multiples of `max_len` become equal chunks. Any other overlong span is
/// cut once at its midpoint, even if the halves are still longer than `max_len`.
pub fn compute_chunks(start: f64, end: f64, max_len: f64) -> Vec<Chunk> {
    let total = (end - start).max(0.0);
    if total <= max_len {
        return vec![(start, end)];
    }

    if total % max_len == 0.0 {
        let count = (total / max_len).floor() as usize;
        return (0..count)
            .map(|i| (start + i as f64 * max_len, start + (i + 1) as f64 * max_len))
            .collect();
    }

    let mid = start + total / 2.0;
    vec![(start, mid), (mid, end)]
}

/// Buckets groups by chunk.
///
/// Bootstrap groups always land in the first chunk. Other groups go where their
/// midpoint falls; chunks are half-open except the last, which is closed. Groups
/// outside every chunk are dropped.
pub fn split_by_chunks<'a>(groups: &'a [Group], chunks: &[Chunk]) -> Vec<Vec<&'a Group>> {
    let mut buckets: Vec<Vec<&Group>> = vec![Vec::new(); chunks.len()];
    if chunks.is_empty() {
        return buckets;
    }
    let last = chunks.len() - 1;

    for group in groups {
        if group.is_fake() {
            buckets[0].push(group);
            continue;
        }
        let mid = group.midpoint();
        let found = chunks.iter().enumerate().position(|(i, &(s, e))| {
            if i == last {
                mid >= s && mid <= e
            } else {
                mid >= s && mid < e
            }
        });
        if let Some(i) = found {
            buckets[i].push(group);
        }
    }
    buckets
}
