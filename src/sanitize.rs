//! Escaping and URL scheme checks for untrusted text.

use std::borrow::Cow;

/// Escape the HTML-significant characters `<`, `>`, `"` and `'`.
///
/// `&` is deliberately left untouched. Returns the input borrowed when there
/// is nothing to escape.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(['<', '>', '"', '\'']) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    for ch in text[first..].chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Replace a `javascript:` link target with `#`.
///
/// The href is decoded by the browser before its scheme is resolved, so
/// character references are decoded first. Leading whitespace and control
/// characters are ignored and tabs and newlines stripped, as browsers do.
/// A reference left in the scheme part (one the decoder doesn't know, or
/// one written without its `;`) also counts as `javascript:`.
pub fn safe_href(url: &str) -> Cow<'_, str> {
    const SCHEME: &str = "javascript:";

    let scheme_part = url.split([':', '/', '?', '#']).next().unwrap_or_default();
    if scheme_part.contains('&') {
        return Cow::Borrowed("#");
    }

    let decoded = html_escape::decode_html_entities(url);
    let normalized: String = decoded
        .trim_start_matches(|c: char| c.is_ascii_whitespace() || c.is_ascii_control())
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take(SCHEME.len())
        .collect();

    if normalized.eq_ignore_ascii_case(SCHEME) {
        Cow::Borrowed("#")
    } else {
        Cow::Borrowed(url)
    }
}
