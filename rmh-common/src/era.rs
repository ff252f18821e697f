//! Settings-era comparison
//!
//! Persisted configuration carries a string era marker under the
//! `settings-era` key. Migration runs only when the stored era is older than
//! the current one. Comparison is a total order over dot-separated numeric
//! segments, so `"10"` is newer than `"9"` and `"1.5"` is newer than
//! `"1.4.9"` — plain lexicographic comparison would get both wrong.

/// Returns true if `candidate` is strictly newer than `reference`.
///
/// Identifiers are split on `.` and compared segment by segment as unsigned
/// integers. Missing segments count as 0 (`"1"` == `"1.0"`). A segment that
/// does not parse as a number also counts as 0, keeping the order total for
/// arbitrary input.
pub fn is_newer_version(candidate: &str, reference: &str) -> bool {
    let a = segments(candidate);
    let b = segments(reference);
    let len = a.len().max(b.len());

    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        if x != y {
            return x > y;
        }
    }

    false
}

fn segments(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|s| s.trim().parse::<u64>().unwrap_or(0))
        .collect()
}
