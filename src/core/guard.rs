//! Cheap size check run before the quadratic LCS table.

/// Newline count above which content is considered too large to diff.
pub const LARGE_FILE_LINE_THRESHOLD: usize = 10_000;

/// Whether `content` has more than [`LARGE_FILE_LINE_THRESHOLD`] newlines.
///
/// Stops scanning as soon as the threshold is crossed.
pub fn is_large_file(content: &str) -> bool {
    exceeds_line_limit(content, LARGE_FILE_LINE_THRESHOLD)
}

/// Whether `content` has more than `threshold` newline characters.
pub fn exceeds_line_limit(content: &str, threshold: usize) -> bool {
    let mut count = 0usize;
    for &b in content.as_bytes() {
        if b == b'\n' {
            count += 1;
            if count > threshold {
                return true;
            }
        }
    }
    false
}
