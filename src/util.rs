//! Shared utility functions

/// Truncate a string to at most `max_bytes` while respecting UTF-8
/// boundaries. Used when squeezing record text into one list row.
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// One-line preview: truncated to `max_bytes` with an ellipsis when cut.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.replace('\n', " ");
    let cut = truncate_utf8_safe(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{cut}…")
    } else {
        cut.to_string()
    }
}
