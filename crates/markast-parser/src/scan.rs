//! Shared scanners.
//!
//! Stateless predicates over raw line text, used by the tokenizer's
//! line-start recognizers, the block parser's lookahead and the link
//! reference pre-scan. None of these allocate unless they return owned data.

use markast_core::{Alignment, AutolinkKind};
use regex::Regex;
use std::sync::LazyLock;

/// Tab stop width for column computation.
pub const TAB_STOP: usize = 4;

/// Maximum digits in an ordered list marker.
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Minimum length of a setext underline.
pub const MIN_SETEXT_UNDERLINE: usize = 3;

// =============================================================================
// Regex patterns
// =============================================================================

/// GFM bare URL: http(s):// or www.
static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://[A-Za-z0-9][^\s<]*|www\.[A-Za-z0-9][^\s<]*)").unwrap()
});

/// GFM bare email address
static BARE_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._+-]+@[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)+").unwrap()
});

/// `<scheme:rest>`
static ANGLE_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[A-Za-z][A-Za-z0-9+.-]{1,31}:[^\s<>]*>").unwrap());

/// `<local@domain>`
static ANGLE_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*>",
    )
    .unwrap()
});

/// Single-line HTML constructs: open tag, closing tag, comment, processing
/// instruction, declaration, CDATA.
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?:<[A-Za-z][A-Za-z0-9-]*(?:[ \t]+[A-Za-z_:][A-Za-z0-9_.:-]*(?:[ \t]*=[ \t]*(?:[^ \t"'=<>`]+|'[^'\n]*'|"[^"\n]*"))?)*[ \t]*/?>"#,
        r"|</[A-Za-z][A-Za-z0-9-]*[ \t]*>",
        r"|<!--.*?-->",
        r"|<\?.*?\?>",
        r"|<![A-Za-z][^>\n]*>",
        r"|<!\[CDATA\[.*?\]\]>)",
    ))
    .unwrap()
});

/// Tag name at the start of an HTML line
static HTML_TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</?([A-Za-z][A-Za-z0-9-]*)").unwrap());

/// Entity references
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[xX][0-9A-Fa-f]{1,6}|#[0-9]{1,7}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap()
});

/// Single-line link reference definition
static LINK_DEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^\[((?:[^\[\]\\]|\\.){1,999})\]:[ \t]*(<[^<>\n]*>|\S+)"#,
        r#"(?:[ \t]+("(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|\((?:[^()\\]|\\.)*\)))?[ \t]*$"#,
    ))
    .unwrap()
});

/// One separator cell: `---`, `:--`, `--:`, `:-:`
static SEPARATOR_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Block-level tag names that open an HTML block (CommonMark type 6, plus type 1).
const HTML_BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption",
    "center", "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2",
    "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link",
    "main", "menu", "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param",
    "pre", "script", "search", "section", "style", "summary", "table", "tbody", "td",
    "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

// =============================================================================
// Columns and indentation
// =============================================================================

/// Column reached after writing `s` starting at `column`.
pub fn advance_column(column: usize, s: &str) -> usize {
    s.chars().fold(column, |col, c| match c {
        '\t' => col + TAB_STOP - (col % TAB_STOP),
        _ => col + 1,
    })
}

/// Visual width of a whitespace run starting at `column`.
pub fn indent_width(s: &str, column: usize) -> usize {
    advance_column(column, s) - column
}

/// Byte length of the leading space/tab run.
pub fn leading_whitespace_len(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Whether a line contains nothing but spaces and tabs.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

pub fn is_ascii_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
}

// =============================================================================
// Block markers
// =============================================================================

/// Thematic break: three or more `-`, `*` or `_`, optionally separated by
/// spaces/tabs, nothing else on the line. Returns the marker character.
pub fn thematic_break(line: &str) -> Option<char> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut marker = None;
    let mut count = 0;
    for c in line.chars() {
        match c {
            ' ' | '\t' => {}
            '-' | '*' | '_' => match marker {
                None => {
                    marker = Some(c);
                    count = 1;
                }
                Some(m) if m == c => count += 1,
                Some(_) => return None,
            },
            _ => return None,
        }
    }
    marker.filter(|_| count >= 3)
}

/// ATX heading level for a line starting with `#`.
pub fn atx_heading_level(line: &str) -> Option<u8> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line.as_bytes().get(hashes) {
        None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => Some(hashes as u8),
        Some(_) => None,
    }
}

/// Kind of list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `-`, `*`, `+`
    Bullet(char),
    /// `12.` or `12)`
    Ordered { number: u64, delimiter: char },
}

impl MarkerKind {
    /// Whether two markers may belong to the same list.
    pub fn is_compatible(&self, other: &MarkerKind) -> bool {
        match (self, other) {
            (MarkerKind::Bullet(a), MarkerKind::Bullet(b)) => a == b,
            (
                MarkerKind::Ordered { delimiter: a, .. },
                MarkerKind::Ordered { delimiter: b, .. },
            ) => a == b,
            _ => false,
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, MarkerKind::Ordered { .. })
    }
}

/// A recognized list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: MarkerKind,
    /// Byte length of the marker itself
    pub len: usize,
}

/// Parse a list marker from a token's content or the start of a line.
///
/// The marker must be followed by a space, tab, or the end of the line.
pub fn list_marker(line: &str) -> Option<ListMarker> {
    let bytes = line.as_bytes();
    let first = *bytes.first()?;
    let (kind, len) = match first {
        b'-' | b'*' | b'+' => (MarkerKind::Bullet(first as char), 1),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > MAX_LIST_MARKER_DIGITS {
                return None;
            }
            let delimiter = match bytes.get(digits) {
                Some(b'.') => '.',
                Some(b')') => ')',
                _ => return None,
            };
            let number = line[..digits].parse().ok()?;
            (MarkerKind::Ordered { number, delimiter }, digits + 1)
        }
        _ => return None,
    };
    match bytes.get(len) {
        None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => Some(ListMarker { kind, len }),
        Some(_) => None,
    }
}

/// Opening code fence: returns the fence character and run length.
///
/// Backtick fences may not have backticks in their info string.
pub fn fence_opener(line: &str) -> Option<(char, usize)> {
    let first = line.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = line.chars().take_while(|&c| c == first).count();
    if len < 3 {
        return None;
    }
    if first == '`' && line[len..].contains('`') {
        return None;
    }
    Some((first, len))
}

/// Closing fence: a run of `fence_char` at least `min_len` long followed only
/// by whitespace. `line` must already have its indentation removed.
pub fn closing_fence_len(line: &str, fence_char: char, min_len: usize) -> Option<usize> {
    let len = line.chars().take_while(|&c| c == fence_char).count();
    if len < min_len {
        return None;
    }
    let rest = &line[len * fence_char.len_utf8()..];
    if rest.trim_end_matches(['\n', '\r']).chars().all(|c| c == ' ' || c == '\t') {
        Some(len)
    } else {
        None
    }
}

/// Setext underline level: 1 for `===`, 2 for `---`.
pub fn setext_level(line: &str) -> Option<u8> {
    let trimmed = line.trim_matches([' ', '\t', '\n', '\r']);
    if trimmed.len() < MIN_SETEXT_UNDERLINE || leading_whitespace_len(line) > 3 {
        return None;
    }
    if trimmed.bytes().all(|b| b == b'=') {
        Some(1)
    } else if trimmed.bytes().all(|b| b == b'-') {
        Some(2)
    } else {
        None
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Split a raw table row on unescaped pipes, dropping the outer pipes.
pub fn split_table_row(line: &str) -> Vec<&str> {
    let line = line.trim_matches([' ', '\t', '\n', '\r']);
    let mut cells = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '|' if !escaped => {
                cells.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        escaped = false;
    }
    cells.push(&line[start..]);

    if line.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }
    if line.len() > 1 && line.ends_with('|') && !line.ends_with("\\|") {
        cells.pop();
    }
    cells
}

/// Whether a line could be a table row (has an unescaped pipe).
pub fn looks_like_table_row(line: &str) -> bool {
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '|' if !escaped => return true,
            _ => escaped = false,
        }
    }
    false
}

/// Parse a table separator row into column alignments.
pub fn table_separator(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('|') && !line.contains(':') {
        return None;
    }
    let cells = split_table_row(line);
    if cells.is_empty() {
        return None;
    }
    cells
        .into_iter()
        .map(|cell| {
            let cell = cell.trim();
            if !SEPARATOR_CELL_RE.is_match(cell) {
                return None;
            }
            Some(match (cell.starts_with(':'), cell.ends_with(':') && cell.len() > 1) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect()
}

// =============================================================================
// Inline helpers
// =============================================================================

/// Task list marker at the start of `s`: `[x]`, `[ ]`, ... followed by
/// whitespace. Returns whether the box is checked.
pub fn task_marker(s: &str) -> Option<bool> {
    let bytes = s.as_bytes();
    if bytes.len() < 4 || bytes[0] != b'[' || bytes[2] != b']' {
        return None;
    }
    if !matches!(bytes[3], b' ' | b'\t') {
        return None;
    }
    match bytes[1] {
        b' ' => Some(false),
        b'x' | b'X' | b'o' | b'O' | b'v' | b'V' => Some(true),
        _ => None,
    }
}

/// GFM strikethrough uses exactly two tildes.
pub fn is_strikethrough_delimiter(run_len: usize) -> bool {
    run_len == 2
}

/// Bare GFM autolink at the start of `s`. Returns its byte length and kind.
pub fn scan_bare_autolink(s: &str) -> Option<(usize, AutolinkKind)> {
    scan_bare_url(s).or_else(|| scan_bare_email(s))
}

/// GFM `www.` or `http(s)://` link at the start of `s`.
pub fn scan_bare_url(s: &str) -> Option<(usize, AutolinkKind)> {
    let m = BARE_URL_RE.find(s)?;
    let len = trim_autolink_tail(m.as_str());
    let url = &s[..len];
    if !url.contains('.') && !url.starts_with("http") {
        return None;
    }
    let kind = if url.starts_with("www.") {
        AutolinkKind::Www
    } else {
        AutolinkKind::BareUrl
    };
    // "http://" alone is not a link
    if len > "https://".len() || kind == AutolinkKind::Www {
        Some((len, kind))
    } else {
        None
    }
}

/// GFM bare email address at the start of `s`.
pub fn scan_bare_email(s: &str) -> Option<(usize, AutolinkKind)> {
    let m = BARE_EMAIL_RE.find(s)?;
    let email = m.as_str();
    if email.ends_with('-') || email.ends_with('_') {
        return None;
    }
    Some((email.len(), AutolinkKind::Email))
}

/// Length of the run of email local-part characters at the start of `s`.
///
/// A bare email scan from any offset inside this run reaches the same `@`
/// (or fails at the same character), so one failed scan answers for all.
pub fn email_local_part_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-'))
        .count()
}

/// Drop trailing punctuation and unbalanced closing parentheses from a bare URL.
fn trim_autolink_tail(url: &str) -> usize {
    let mut open = url.matches('(').count();
    let mut close = url.matches(')').count();
    let mut end = url.len();
    loop {
        match url[..end].chars().last() {
            Some('?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"' | ';') => end -= 1,
            Some(')') if close > open => {
                end -= 1;
                close -= 1;
            }
            _ => return end,
        }
    }
}

/// `<...>` autolink at the start of `s`. Returns its byte length and kind.
pub fn scan_angle_autolink(s: &str) -> Option<(usize, AutolinkKind)> {
    if let Some(m) = ANGLE_URI_RE.find(s) {
        return Some((m.end(), AutolinkKind::Protocol));
    }
    ANGLE_EMAIL_RE
        .find(s)
        .map(|m| (m.end(), AutolinkKind::Email))
}

/// Classify an autolink token's content.
pub fn classify_autolink(content: &str) -> (String, AutolinkKind) {
    if let Some(inner) = content.strip_prefix('<').and_then(|c| c.strip_suffix('>')) {
        let kind = if !inner.contains(':') && inner.contains('@') {
            AutolinkKind::Email
        } else {
            AutolinkKind::Protocol
        };
        return (inner.to_string(), kind);
    }
    let kind = if content.starts_with("www.") {
        AutolinkKind::Www
    } else if content.starts_with("http://") || content.starts_with("https://") {
        AutolinkKind::BareUrl
    } else {
        AutolinkKind::Email
    };
    (content.to_string(), kind)
}

/// HTML tag, comment, processing instruction or declaration at the start of `s`.
pub fn scan_html_tag(s: &str) -> Option<usize> {
    HTML_TAG_RE.find(s).map(|m| m.end())
}

/// Whether a line (indentation removed) opens an HTML block.
pub fn is_html_block_start(line: &str) -> bool {
    let line = line.trim_end_matches(['\n', '\r']);
    if !line.starts_with('<') {
        return false;
    }
    if line.starts_with("<!--") || line.starts_with("<?") || line.starts_with("<!") {
        return true;
    }
    if let Some(caps) = HTML_TAG_NAME_RE.captures(line) {
        let name = caps[1].to_ascii_lowercase();
        if HTML_BLOCK_TAGS.contains(&name.as_str()) {
            return true;
        }
    }
    // A complete tag alone on its line
    match scan_html_tag(line) {
        Some(len) => is_blank(&line[len..]),
        None => false,
    }
}

/// Entity reference at the start of `s`.
pub fn scan_entity(s: &str) -> Option<usize> {
    ENTITY_RE.find(s).map(|m| m.end())
}

/// Remove backslash escapes before ASCII punctuation.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if is_ascii_punctuation(next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Strip the delimiters from a quoted title.
fn unquote_title(title: &str) -> Option<String> {
    let mut chars = title.chars();
    let open = chars.next()?;
    let close = match open {
        '"' => '"',
        '\'' => '\'',
        '(' => ')',
        _ => return None,
    };
    if title.len() < 2 || !title.ends_with(close) {
        return None;
    }
    Some(unescape(&title[1..title.len() - 1]))
}

/// Parse the raw text between the parentheses of an inline link.
///
/// Returns the destination and optional title, or `None` when the text is
/// not a valid destination.
pub fn parse_link_destination(raw: &str) -> Option<(String, Option<String>)> {
    let raw = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if raw.is_empty() {
        return Some((String::new(), None));
    }
    let (url, rest) = if let Some(stripped) = raw.strip_prefix('<') {
        let end = stripped.find('>')?;
        let url = &stripped[..end];
        if url.contains('<') || url.contains('\n') {
            return None;
        }
        (url, &stripped[end + 1..])
    } else {
        let end = raw
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(raw.len());
        (&raw[..end], &raw[end..])
    };
    let rest = rest.trim_matches(|c: char| c.is_ascii_whitespace());
    let title = if rest.is_empty() {
        None
    } else {
        Some(unquote_title(rest)?)
    };
    Some((unescape(url), title))
}

/// A link reference definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    pub label: String,
    pub url: String,
    pub title: Option<String>,
}

/// Parse `[label]: destination "title"` (indentation already removed).
pub fn parse_link_reference_definition(line: &str) -> Option<LinkDefinition> {
    let line = line.trim_end_matches(['\n', '\r']);
    if !line.starts_with('[') {
        return None;
    }
    let caps = LINK_DEF_RE.captures(line)?;
    let label = caps.get(1)?.as_str();
    if label.trim().is_empty() {
        return None;
    }
    let dest = caps.get(2)?.as_str();
    let url = dest
        .strip_prefix('<')
        .and_then(|d| d.strip_suffix('>'))
        .unwrap_or(dest);
    let title = match caps.get(3) {
        Some(t) => Some(unquote_title(t.as_str())?),
        None => None,
    };
    Some(LinkDefinition {
        label: label.to_string(),
        url: unescape(url),
        title,
    })
}

/// Normalize a link label: collapse internal whitespace, trim, case-fold.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_space = true;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        if ch == 'ß' || ch == 'ẞ' {
            out.push_str("ss");
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}
