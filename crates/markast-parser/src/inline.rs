//! Inline parser.
//!
//! Runs over the tokens of one leaf block (paragraph, heading, table cell)
//! and produces inline nodes. Emphasis uses delimiter-run counting: an
//! opener run recurses for its content until a run of the same character
//! that can close, and the two run lengths decide between emphasis, strong
//! or both. Closer characters left over are pushed back so an enclosing
//! opener can use them.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use markast_core::{Node, NodeKind, ParseError, ParserOptions, Phase, SourceLocation};

use crate::guard::{Deadline, GuardLimits, ProgressGuard};
use crate::link_refs::LinkReferenceMap;
use crate::scan;
use crate::token::{raw_text, Token, TokenKind};

/// Where a nested inline parse stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    /// End of the current token range
    End,
    /// A `*` or `_` run able to close
    Delimiter(char),
    /// A `~~` run able to close
    Strikethrough,
}

/// Inline parser over a bounded token slice.
pub struct InlineParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    end: usize,
    refs: &'a LinkReferenceMap,
    options: &'a ParserOptions,
    deadline: Deadline,
    limits: GuardLimits,
    depth: usize,
    in_strikethrough: bool,
    /// Characters of a delimiter run already used as a closer
    consumed: HashMap<usize, usize>,
    consumed_log: Vec<(usize, Option<usize>)>,
    /// (token index, consumed count) of openers known to have no closer
    failed_openers: HashSet<(usize, usize)>,
    /// (run length, range end) -> smallest index known to have no closer
    failed_code_spans: HashMap<(usize, usize), usize>,
    bracket_pairs: HashMap<usize, usize>,
    /// The last text node must not absorb the next text
    text_sealed: Cell<bool>,
}

impl<'a> InlineParser<'a> {
    pub fn new(
        tokens: &'a [Token],
        refs: &'a LinkReferenceMap,
        options: &'a ParserOptions,
        deadline: Deadline,
    ) -> Self {
        let end = tokens
            .iter()
            .position(|t| t.kind == TokenKind::Eof)
            .unwrap_or(tokens.len());
        Self {
            tokens,
            pos: 0,
            end,
            refs,
            options,
            deadline,
            limits: GuardLimits::from_options(options),
            depth: 0,
            in_strikethrough: false,
            consumed: HashMap::new(),
            consumed_log: Vec::new(),
            failed_openers: HashSet::new(),
            failed_code_spans: HashMap::new(),
            bracket_pairs: match_brackets(&tokens[..end]),
            text_sealed: Cell::new(false),
        }
    }

    /// Parse the whole slice.
    pub fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        let (nodes, _) = self.parse_inlines(Until::End)?;
        Ok(nodes)
    }

    /// Guarded inline loop. Returns the nodes and whether `until` was hit;
    /// when it was, the cursor is left on the stopping token.
    fn parse_inlines(&mut self, until: Until) -> Result<(Vec<Node>, bool), ParseError> {
        let mut nodes = Vec::new();
        let mut guard = ProgressGuard::new(Phase::Inline, self.deadline, self.limits);

        while self.pos < self.end {
            guard.tick(self.pos)?;
            if self.at_stop(until) {
                return Ok((nodes, true));
            }
            if self.dispatch(&mut nodes)? {
                guard.produced();
            } else {
                guard.empty(self.pos)?;
            }
        }
        Ok((nodes, false))
    }

    fn dispatch(&mut self, nodes: &mut Vec<Node>) -> Result<bool, ParseError> {
        let index = self.pos;
        let tokens = self.tokens;
        let token = &tokens[index];
        match token.kind {
            TokenKind::Asterisk => self.parse_emphasis(nodes, '*')?,
            TokenKind::Underscore => self.parse_emphasis(nodes, '_')?,
            TokenKind::Tilde => self.parse_strikethrough(nodes)?,
            TokenKind::Backtick => self.parse_code_span(nodes),
            TokenKind::LeftBracket => {
                if !self.parse_link(nodes, false)? {
                    self.push_text(nodes, "[", index);
                    self.pos += 1;
                }
            }
            TokenKind::Bang if self.kind_at(index + 1) == Some(TokenKind::LeftBracket) => {
                if !self.parse_link(nodes, true)? {
                    self.push_text(nodes, "!", index);
                    self.pos += 1;
                }
            }
            TokenKind::Escape => {
                let escaped = &token.content[1..];
                self.push_text(nodes, escaped, index);
                if escaped == "&" {
                    // `\&copy;` is literal text, not an entity reference
                    self.text_sealed.set(true);
                }
                self.pos += 1;
            }
            TokenKind::HtmlTag => {
                nodes.push(self.node(NodeKind::HtmlInline(token.content.clone()), index));
                self.pos += 1;
            }
            TokenKind::Autolink => {
                let (url, kind) = scan::classify_autolink(&token.content);
                nodes.push(self.node(NodeKind::Autolink { url, kind }, index));
                self.pos += 1;
            }
            TokenKind::HardBreak => {
                self.pos += 1;
                if self.kind_at(self.pos) == Some(TokenKind::Newline) {
                    self.pos += 1;
                }
                if self.pos >= self.end {
                    // Nothing follows: not a break
                    if token.content == "\\" {
                        self.push_text(nodes, "\\", index);
                    }
                    return Ok(true);
                }
                nodes.push(self.node(NodeKind::LineBreak { hard: true }, index));
            }
            TokenKind::Newline => {
                trim_trailing_spaces(nodes);
                self.pos += 1;
                nodes.push(self.node(NodeKind::SoftBreak, index));
            }
            TokenKind::Eof => {
                self.pos = self.end;
                return Ok(false);
            }
            // Entities pass through undecoded; all remaining kinds are literal here
            _ => {
                self.push_text(nodes, &token.content, index);
                self.pos += 1;
            }
        }
        Ok(true)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        if index < self.end {
            Some(self.tokens[index].kind)
        } else {
            None
        }
    }

    fn location(&self, index: usize) -> Option<SourceLocation> {
        if self.options.track_source_locations {
            self.tokens.get(index).map(|t| t.location)
        } else {
            None
        }
    }

    fn node(&self, kind: NodeKind, index: usize) -> Node {
        Node::new(kind, self.location(index))
    }

    /// Append text, merging with a preceding text node.
    fn push_text(&self, nodes: &mut Vec<Node>, text: &str, index: usize) {
        if text.is_empty() {
            return;
        }
        if !self.text_sealed.replace(false) {
            if let Some(Node {
                kind: NodeKind::Text(existing),
                ..
            }) = nodes.last_mut()
            {
                existing.push_str(text);
                return;
            }
        }
        nodes.push(self.node(NodeKind::Text(text.to_string()), index));
    }

    /// Unused characters of a delimiter run.
    fn available(&self, index: usize) -> usize {
        let used = self.consumed.get(&index).copied().unwrap_or(0);
        self.tokens[index].content.len().saturating_sub(used)
    }

    fn consume(&mut self, index: usize, count: usize) {
        let previous = self.consumed.get(&index).copied();
        self.consumed_log.push((index, previous));
        self.consumed.insert(index, previous.unwrap_or(0) + count);
    }

    fn rollback(&mut self, checkpoint: usize) {
        while self.consumed_log.len() > checkpoint {
            if let Some((index, previous)) = self.consumed_log.pop() {
                match previous {
                    Some(count) => self.consumed.insert(index, count),
                    None => self.consumed.remove(&index),
                };
            }
        }
    }

    /// Emit what is left of a delimiter run as text.
    fn literal_run(&mut self, nodes: &mut Vec<Node>, index: usize) {
        let c = self.tokens[index].content.chars().next().unwrap_or('*');
        let text = c.to_string().repeat(self.available(index));
        self.push_text(nodes, &text, index);
        self.pos = index + 1;
    }

    fn prev_char(&self, index: usize) -> Option<char> {
        index
            .checked_sub(1)
            .and_then(|i| self.tokens[i].content.chars().next_back())
    }

    fn next_char(&self, index: usize) -> Option<char> {
        if index + 1 < self.end {
            self.tokens[index + 1].content.chars().next()
        } else {
            None
        }
    }

    fn can_open(&self, index: usize, c: char) -> bool {
        match self.next_char(index) {
            None => return false,
            Some(next) if next.is_whitespace() => return false,
            Some(_) => {}
        }
        if c == '_' && self.prev_char(index).is_some_and(char::is_alphanumeric) {
            return false;
        }
        true
    }

    fn can_close(&self, index: usize, c: char) -> bool {
        match self.prev_char(index) {
            None => return false,
            Some(prev) if prev.is_whitespace() => return false,
            Some(_) => {}
        }
        if c == '_' && self.next_char(index).is_some_and(char::is_alphanumeric) {
            return false;
        }
        true
    }

    fn at_stop(&self, until: Until) -> bool {
        let token = &self.tokens[self.pos];
        match until {
            Until::End => false,
            Until::Delimiter(c) => {
                let kind = if c == '*' {
                    TokenKind::Asterisk
                } else {
                    TokenKind::Underscore
                };
                token.kind == kind && self.available(self.pos) > 0 && self.can_close(self.pos, c)
            }
            Until::Strikethrough => {
                token.kind == TokenKind::Tilde
                    && scan::is_strikethrough_delimiter(token.content.len())
                    && self.can_close(self.pos, '~')
            }
        }
    }

    /// Parse `range` as a nested inline sequence, restoring the cursor after.
    fn parse_range(&mut self, start: usize, end: usize) -> Result<Vec<Node>, ParseError> {
        let (saved_pos, saved_end) = (self.pos, self.end);
        self.pos = start;
        self.end = end;
        self.depth += 1;
        let result = self.parse_inlines(Until::End);
        self.depth -= 1;
        self.pos = saved_pos;
        self.end = saved_end;
        result.map(|(nodes, _)| nodes)
    }

    // =========================================================================
    // Emphasis and strikethrough
    // =========================================================================

    fn parse_emphasis(&mut self, nodes: &mut Vec<Node>, c: char) -> Result<(), ParseError> {
        let index = self.pos;
        let opener = self.available(index);
        let key = (index, self.tokens[index].content.len() - opener);
        if opener == 0
            || self.depth >= self.options.max_nesting_depth
            || self.failed_openers.contains(&key)
            || !self.can_open(index, c)
        {
            self.literal_run(nodes, index);
            return Ok(());
        }

        let checkpoint = self.consumed_log.len();
        self.pos = index + 1;
        self.depth += 1;
        let result = self.parse_inlines(Until::Delimiter(c));
        self.depth -= 1;
        let (children, closed) = result?;

        if !closed {
            self.rollback(checkpoint);
            self.failed_openers.insert(key);
            self.literal_run(nodes, index);
            return Ok(());
        }

        let closer = self.pos;
        let closing = self.available(closer);
        let used = if opener >= 3 && closing >= 3 {
            3
        } else if opener >= 2 && closing >= 2 {
            2
        } else {
            1
        };
        if opener > used {
            let excess = c.to_string().repeat(opener - used);
            self.push_text(nodes, &excess, index);
        }
        self.consume(closer, used);
        if self.available(closer) == 0 {
            self.pos = closer + 1;
        }

        let location = self.location(index);
        let kind = match used {
            3 => NodeKind::Emphasis {
                children: vec![Node::new(NodeKind::Strong { children }, location)],
            },
            2 => NodeKind::Strong { children },
            _ => NodeKind::Emphasis { children },
        };
        nodes.push(Node::new(kind, location));
        Ok(())
    }

    fn parse_strikethrough(&mut self, nodes: &mut Vec<Node>) -> Result<(), ParseError> {
        let index = self.pos;
        let key = (index, 0);
        let run = self.tokens[index].content.len();
        if !self.options.enable_gfm_extensions
            || !scan::is_strikethrough_delimiter(run)
            || self.in_strikethrough
            || self.depth >= self.options.max_nesting_depth
            || self.failed_openers.contains(&key)
            || !self.can_open(index, '~')
        {
            self.push_text(nodes, &self.tokens[index].content, index);
            self.pos = index + 1;
            return Ok(());
        }

        let checkpoint = self.consumed_log.len();
        self.pos = index + 1;
        self.depth += 1;
        self.in_strikethrough = true;
        let result = self.parse_inlines(Until::Strikethrough);
        self.in_strikethrough = false;
        self.depth -= 1;
        let (children, closed) = result?;

        if !closed {
            self.rollback(checkpoint);
            self.failed_openers.insert(key);
            self.push_text(nodes, &self.tokens[index].content, index);
            self.pos = index + 1;
            return Ok(());
        }
        self.pos += 1;
        nodes.push(self.node(NodeKind::Strikethrough { children }, index));
        Ok(())
    }

    // =========================================================================
    // Code spans
    // =========================================================================

    fn parse_code_span(&mut self, nodes: &mut Vec<Node>) {
        let index = self.pos;
        let run = self.tokens[index].content.len();
        let key = (run, self.end);
        let known_unclosed = self
            .failed_code_spans
            .get(&key)
            .is_some_and(|&from| index >= from);

        if !known_unclosed {
            let closer = (index + 1..self.end).find(|&i| {
                self.tokens[i].kind == TokenKind::Backtick && self.tokens[i].content.len() == run
            });
            match closer {
                Some(closer) => {
                    let content = code_span_content(&raw_text(&self.tokens[index + 1..closer]));
                    nodes.push(self.node(NodeKind::CodeSpan(content), index));
                    self.pos = closer + 1;
                    return;
                }
                None => {
                    let from = self.failed_code_spans.entry(key).or_insert(index);
                    *from = (*from).min(index);
                }
            }
        }
        self.push_text(nodes, &self.tokens[index].content, index);
        self.pos = index + 1;
    }

    // =========================================================================
    // Links and images
    // =========================================================================

    /// Try a link (or image) at the cursor. Returns false, with nothing
    /// consumed, when the brackets do not form one.
    fn parse_link(&mut self, nodes: &mut Vec<Node>, image: bool) -> Result<bool, ParseError> {
        let start = self.pos;
        let open = if image { start + 1 } else { start };
        let Some(&close) = self.bracket_pairs.get(&open) else {
            return Ok(false);
        };
        if close >= self.end || self.depth >= self.options.max_nesting_depth {
            return Ok(false);
        }

        let label_raw = raw_text(&self.tokens[open + 1..close]);
        let Some(target) = self.resolve_link(close, &label_raw) else {
            return Ok(false);
        };

        let children = self.parse_range(open + 1, close)?;
        let kind = if image {
            NodeKind::Image {
                url: target.url,
                alt: children.iter().map(Node::plain_text).collect(),
                title: target.title,
            }
        } else {
            NodeKind::Link {
                url: target.url,
                title: target.title,
                reference: target.label.is_some(),
                label: target.label,
                children,
            }
        };
        nodes.push(self.node(kind, start));
        self.pos = target.resume;
        Ok(true)
    }

    /// Resolve what follows the closing bracket of a link label.
    fn resolve_link(&self, close: usize, label_raw: &str) -> Option<LinkTarget> {
        let after = close + 1;
        match self.kind_at(after) {
            Some(TokenKind::LeftParen) => {
                if let Some(paren) = self.matching_paren(after) {
                    let raw = raw_text(&self.tokens[after + 1..paren]);
                    if let Some((url, title)) = scan::parse_link_destination(&raw) {
                        return Some(LinkTarget {
                            url,
                            title,
                            label: None,
                            resume: paren + 1,
                        });
                    }
                }
            }
            Some(TokenKind::LeftBracket) => {
                if let Some(&second) = self.bracket_pairs.get(&after) {
                    if second < self.end {
                        let reference = raw_text(&self.tokens[after + 1..second]);
                        let label = if reference.trim().is_empty() {
                            label_raw
                        } else {
                            reference.as_str()
                        };
                        if let Some(def) = self.refs.get(label) {
                            return Some(LinkTarget {
                                url: def.url.clone(),
                                title: def.title.clone(),
                                label: Some(label.to_string()),
                                resume: second + 1,
                            });
                        }
                    }
                }
            }
            _ => {}
        }

        // Shortcut reference
        self.refs.get(label_raw).map(|def| LinkTarget {
            url: def.url.clone(),
            title: def.title.clone(),
            label: Some(label_raw.to_string()),
            resume: close + 1,
        })
    }

    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open + 1..self.end {
            match self.tokens[i].kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen if depth == 0 => return Some(i),
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
        }
        None
    }
}

struct LinkTarget {
    url: String,
    title: Option<String>,
    label: Option<String>,
    resume: usize,
}

/// Pair every `[` with its matching `]`.
fn match_brackets(tokens: &[Token]) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut stack = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftBracket => stack.push(i),
            TokenKind::RightBracket => {
                if let Some(open) = stack.pop() {
                    pairs.insert(open, i);
                }
            }
            _ => {}
        }
    }
    pairs
}

/// Line endings become spaces; one space is stripped from each side when
/// both are present and the content is not all spaces.
fn code_span_content(raw: &str) -> String {
    let content = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if content.len() > 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && !content.bytes().all(|b| b == b' ')
    {
        content[1..content.len() - 1].to_string()
    } else {
        content
    }
}

/// Trailing spaces before a soft break are not part of the text.
fn trim_trailing_spaces(nodes: &mut Vec<Node>) {
    if let Some(Node {
        kind: NodeKind::Text(text),
        ..
    }) = nodes.last_mut()
    {
        let trimmed = text.trim_end_matches([' ', '\t']).len();
        text.truncate(trimmed);
        if text.is_empty() {
            nodes.pop();
        }
    }
}

/// Parse a token slice into inline nodes.
pub fn parse_inlines(
    tokens: &[Token],
    refs: &LinkReferenceMap,
    options: &ParserOptions,
    deadline: Deadline,
) -> Result<Vec<Node>, ParseError> {
    InlineParser::new(tokens, refs, options, deadline).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use markast_core::AutolinkKind;
    use pretty_assertions::assert_eq;

    fn options() -> ParserOptions {
        ParserOptions::default().with_locations(false)
    }

    fn parse_with(input: &str, refs: &LinkReferenceMap, options: &ParserOptions) -> Vec<Node> {
        let tokens = tokenize(input);
        parse_inlines(&tokens, refs, options, Deadline::unbounded()).unwrap()
    }

    fn parse(input: &str) -> Vec<Node> {
        parse_with(input, &LinkReferenceMap::new(), &options())
    }

    fn text(s: &str) -> Node {
        Node::text(s)
    }

    fn em(children: Vec<Node>) -> Node {
        Node::bare(NodeKind::Emphasis { children })
    }

    fn strong(children: Vec<Node>) -> Node {
        Node::bare(NodeKind::Strong { children })
    }

    #[test]
    fn test_strong_and_emphasis() {
        assert_eq!(parse("**x**"), vec![strong(vec![text("x")])]);
        assert_eq!(parse("*x*"), vec![em(vec![text("x")])]);
        assert_eq!(parse("_x_"), vec![em(vec![text("x")])]);
        assert_eq!(parse("***x***"), vec![em(vec![strong(vec![text("x")])])]);
    }

    #[test]
    fn test_lone_delimiters_are_literal() {
        assert_eq!(parse("**"), vec![text("**")]);
        assert_eq!(parse("a * b *"), vec![text("a * b *")]);
        assert_eq!(parse("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn test_mixed_sentence() {
        assert_eq!(
            parse("Some *em* and **strong** text."),
            vec![
                text("Some "),
                em(vec![text("em")]),
                text(" and "),
                strong(vec![text("strong")]),
                text(" text."),
            ]
        );
    }

    #[test]
    fn test_unbalanced_runs() {
        assert_eq!(parse("**a*"), vec![text("*"), em(vec![text("a")])]);
        assert_eq!(parse("*a**"), vec![em(vec![text("a")]), text("*")]);
        assert_eq!(parse("*a**b*"), vec![em(vec![text("a")]), em(vec![text("b")])]);
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            parse("*a **b** c*"),
            vec![em(vec![
                text("a "),
                strong(vec![text("b")]),
                text(" c")
            ])]
        );
    }

    #[test]
    fn test_code_spans() {
        assert_eq!(parse("`code`"), vec![Node::bare(NodeKind::CodeSpan("code".into()))]);
        assert_eq!(
            parse("`` a ` b ``"),
            vec![Node::bare(NodeKind::CodeSpan("a ` b".into()))]
        );
        assert_eq!(
            parse("`a\nb`"),
            vec![Node::bare(NodeKind::CodeSpan("a b".into()))]
        );
        assert_eq!(parse("`unclosed"), vec![text("`unclosed")]);
        assert_eq!(
            parse("`*not em*`"),
            vec![Node::bare(NodeKind::CodeSpan("*not em*".into()))]
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(
            parse("~~gone~~"),
            vec![Node::bare(NodeKind::Strikethrough {
                children: vec![text("gone")]
            })]
        );
        assert_eq!(parse("~one~"), vec![text("~one~")]);
        let cm = ParserOptions::commonmark().with_locations(false);
        assert_eq!(
            parse_with("~~gone~~", &LinkReferenceMap::new(), &cm),
            vec![text("~~gone~~")]
        );
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(
            parse("[text](http://x.com \"T\")"),
            vec![Node::bare(NodeKind::Link {
                url: "http://x.com".into(),
                title: Some("T".into()),
                reference: false,
                label: None,
                children: vec![text("text")],
            })]
        );
    }

    #[test]
    fn test_reference_links() {
        let mut refs = LinkReferenceMap::new();
        refs.insert("foo", "/url".into(), None, SourceLocation::default());
        let opts = options();

        let link = |label: &str, children: Vec<Node>| {
            Node::bare(NodeKind::Link {
                url: "/url".into(),
                title: None,
                reference: true,
                label: Some(label.into()),
                children,
            })
        };

        assert_eq!(parse_with("[foo]", &refs, &opts), vec![link("foo", vec![text("foo")])]);
        assert_eq!(parse_with("[Foo][]", &refs, &opts), vec![link("Foo", vec![text("Foo")])]);
        assert_eq!(
            parse_with("[text][foo]", &refs, &opts),
            vec![link("foo", vec![text("text")])]
        );
        assert_eq!(parse_with("[missing]", &refs, &opts), vec![text("[missing]")]);
    }

    #[test]
    fn test_image() {
        assert_eq!(
            parse("![alt *x*](/i.png)"),
            vec![Node::bare(NodeKind::Image {
                url: "/i.png".into(),
                alt: "alt x".into(),
                title: None,
            })]
        );
        assert_eq!(parse("!not"), vec![text("!not")]);
    }

    #[test]
    fn test_escapes_and_entities() {
        assert_eq!(parse(r"\*not\*"), vec![text("*not*")]);
        assert_eq!(parse("&amp; &copy;"), vec![text("&amp; &copy;")]);
    }

    #[test]
    fn test_escaped_ampersand_stays_separate() {
        assert_eq!(parse(r"a \&copy;"), vec![text("a &"), text("copy;")]);
        assert_eq!(parse(r"\&x \*y"), vec![text("&"), text("x *y")]);
    }

    #[test]
    fn test_autolinks() {
        assert_eq!(
            parse("<https://a.b>"),
            vec![Node::bare(NodeKind::Autolink {
                url: "https://a.b".into(),
                kind: AutolinkKind::Protocol
            })]
        );
        assert_eq!(
            parse("www.x.com"),
            vec![Node::bare(NodeKind::Autolink {
                url: "www.x.com".into(),
                kind: AutolinkKind::Www
            })]
        );
    }

    #[test]
    fn test_inline_html() {
        assert_eq!(
            parse("a <span>b</span>"),
            vec![
                text("a "),
                Node::bare(NodeKind::HtmlInline("<span>".into())),
                text("b"),
                Node::bare(NodeKind::HtmlInline("</span>".into())),
            ]
        );
    }

    #[test]
    fn test_breaks() {
        assert_eq!(
            parse("a  \nb"),
            vec![text("a"), Node::bare(NodeKind::LineBreak { hard: true }), text("b")]
        );
        assert_eq!(
            parse("a\\\nb"),
            vec![text("a"), Node::bare(NodeKind::LineBreak { hard: true }), text("b")]
        );
        assert_eq!(
            parse("a \nb"),
            vec![text("a"), Node::bare(NodeKind::SoftBreak), text("b")]
        );
    }

    #[test]
    fn test_nesting_limit_makes_openers_literal() {
        let opts = ParserOptions {
            max_nesting_depth: 1,
            ..options()
        };
        assert_eq!(
            parse_with("[*a*](u)", &LinkReferenceMap::new(), &opts),
            vec![Node::bare(NodeKind::Link {
                url: "u".into(),
                title: None,
                reference: false,
                label: None,
                children: vec![text("*a*")],
            })]
        );
    }

    #[test]
    fn test_unmatched_openers_stay_linear() {
        let input = "*a ".repeat(500);
        assert_eq!(parse(&input), vec![text(&input)]);
    }

    #[test]
    fn test_locations_tracked() {
        let tokens = tokenize("a *b*");
        let opts = ParserOptions::default();
        let nodes =
            parse_inlines(&tokens, &LinkReferenceMap::new(), &opts, Deadline::unbounded()).unwrap();
        assert_eq!(nodes[1].location, Some(SourceLocation::new(0, 2, 2)));
    }
}
