//! Escaping and URL encoding helpers.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// RFC 3986 unreserved characters plus `/`, left as-is in Wikipedia titles.
const WIKIPEDIA_TITLE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Escape text content: `&` and `<`.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape for attribute values and encoded markup: `&`, `<`, `>`, `"`, `'`.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Encode a keyword as a Wikipedia article path segment.
///
/// Spaces become underscores; `/` and RFC 3986 unreserved characters pass
/// through; every other byte of the UTF-8 encoding is percent-encoded.
#[must_use]
pub fn wikipedia_title(keyword: &str) -> String {
    utf8_percent_encode(&keyword.replace(' ', "_"), WIKIPEDIA_TITLE).to_string()
}

/// Escape a value for a single-quoted JavaScript string inside an XHTML
/// `script` element.
#[must_use]
pub fn escape_script_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c > d");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_wikipedia_title_space_and_slash() {
        assert_eq!(wikipedia_title("AC/DC live"), "AC/DC_live");
    }

    #[test]
    fn test_wikipedia_title_unreserved_kept() {
        assert_eq!(wikipedia_title("a-b.c_d~e"), "a-b.c_d~e");
    }

    #[test]
    fn test_wikipedia_title_encodes_utf8_upper_hex() {
        assert_eq!(wikipedia_title("東京"), "%E6%9D%B1%E4%BA%AC");
        assert_eq!(wikipedia_title("C++ (x)"), "C%2B%2B_%28x%29");
    }

    #[test]
    fn test_escape_script_string() {
        assert_eq!(escape_script_string(r"it's a\b"), r"it\'s a\\b");
        assert_eq!(escape_script_string("<&>"), "&lt;&amp;>");
    }
}
