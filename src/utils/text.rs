//! Text processing utilities.

/// Length in UTF-16 code units, which is how browsers measure strings.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Whitespace as browsers trim it: Unicode `White_Space` without NEL, plus
/// the zero-width no-break space.
fn is_browser_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Trim leading and trailing browser whitespace.
pub fn trim_browser(text: &str) -> &str {
    text.trim_matches(is_browser_whitespace)
}

/// Estimate tokens for a character count as `ceil(chars / 3.5)`.
pub fn estimate_tokens_for_len(len: usize) -> u64 {
    // ceil(len / 3.5) == ceil(2 * len / 7)
    (2 * len as u64).div_ceil(7)
}

/// Estimate tokens for a piece of text.
pub fn estimate_tokens(text: &str) -> u64 {
    estimate_tokens_for_len(utf16_len(text))
}

/// Escape text for interpolation into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
