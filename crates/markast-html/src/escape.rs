//! HTML escaping.
//!
//! Text nodes keep entity references the author wrote (`&copy;`, `&#35;`)
//! so they reach the browser untouched; every other `&`, `<`, `>` is escaped.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap()
});

/// Escape text content, leaving entity references intact.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape_preserving_entities(text, html_escape::encode_text::<str>)
}

/// Escape a double-quoted attribute value, leaving entity references intact.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape_preserving_entities(value, html_escape::encode_double_quoted_attribute::<str>)
}

/// Escape code content. Entities are not special inside code.
pub fn escape_code(code: &str) -> Cow<'_, str> {
    html_escape::encode_text(code)
}

fn escape_preserving_entities<'a>(
    text: &'a str,
    encode: impl Fn(&str) -> Cow<'_, str>,
) -> Cow<'a, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for m in ENTITY_RE.find_iter(text) {
        out.push_str(&encode(&text[last..m.start()]));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&encode(&text[last..]));
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_text("hello"), Cow::Borrowed("hello")));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_entities_preserved() {
        assert_eq!(escape_text("&copy; 2024 & &#35; &#x1F600;"), "&copy; 2024 &amp; &#35; &#x1F600;");
        assert_eq!(escape_text("&nosemicolon"), "&amp;nosemicolon");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#"/search?q="x"&amp;y=1&z"#),
            "/search?q=&quot;x&quot;&amp;y=1&amp;z"
        );
    }

    #[test]
    fn test_escape_code_ignores_entities() {
        assert_eq!(escape_code("&copy; <b>"), "&amp;copy; &lt;b&gt;");
    }
}
