//! Line splitting with line-ending normalization.

/// Number of leading bytes inspected by [`looks_binary`].
const BINARY_SNIFF_LEN: usize = 8000;

/// Split raw text into logical lines.
///
/// - `\r\n` and lone `\r` are treated as `\n`.
/// - A trailing line terminator does not produce a phantom empty last line.
/// - Empty input yields no lines.
///
/// Returned slices borrow from `text` and never contain a terminator.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::with_capacity(bytes.len() / 32 + 1);
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    // Unterminated final line
    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Whether content is likely binary.
/// Uses git's heuristic: NUL byte in the first 8000 bytes.
pub fn looks_binary(text: &str) -> bool {
    let bytes = text.as_bytes();
    let check_len = bytes.len().min(BINARY_SNIFF_LEN);
    bytes[..check_len].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn single_line_no_newline() {
        assert_eq!(split_lines("hello"), vec!["hello"]);
    }

    #[test]
    fn trailing_newline_dropped() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn only_newline_is_one_empty_line() {
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn blank_lines_preserved() {
        assert_eq!(split_lines("a\n\nb\n\n"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn crlf_normalization() {
        assert_eq!(split_lines("one\r\ntwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn lone_cr_normalization() {
        assert_eq!(split_lines("one\rtwo\rthree"), vec!["one", "two", "three"]);
    }

    #[test]
    fn mixed_endings() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn multibyte_content() {
        assert_eq!(split_lines("héllo\r\nwörld"), vec!["héllo", "wörld"]);
    }

    #[test]
    fn binary_detection() {
        assert!(looks_binary("hello\0world"));
        assert!(!looks_binary("hello world\n"));
    }
}
