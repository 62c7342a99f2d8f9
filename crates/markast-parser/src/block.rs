//! Block parser.
//!
//! Works line by line over the token stream. Leaf blocks hand their content
//! tokens to the inline parser; containers (block quotes, list items) strip
//! their prefix from each line, collect the result into a fresh token vector
//! and parse it with a nested `BlockParser`. Tokens keep their original
//! locations, so nested nodes still point into the source.

use markast_core::{
    Alignment, Fence, Node, NodeKind, ParseError, ParserOptions, Phase, SourceLocation,
};

use crate::guard::{Deadline, GuardLimits, ProgressGuard};
use crate::inline::parse_inlines;
use crate::link_refs::{is_definition_line, LinkReferenceMap};
use crate::scan::{self, MarkerKind, TAB_STOP};
use crate::stream::TokenStream;
use crate::token::{raw_text, Token, TokenKind};

/// Block-level parser over one container's lines.
pub struct BlockParser<'a> {
    stream: TokenStream,
    refs: &'a LinkReferenceMap,
    options: &'a ParserOptions,
    deadline: Deadline,
    limits: GuardLimits,
    depth: usize,
}

impl<'a> BlockParser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        refs: &'a LinkReferenceMap,
        options: &'a ParserOptions,
        deadline: Deadline,
    ) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            refs,
            options,
            deadline,
            limits: GuardLimits::from_options(options),
            depth: 0,
        }
    }

    /// Parser for a container's content, one level deeper.
    fn nested(&self, tokens: Vec<Token>) -> BlockParser<'a> {
        BlockParser {
            stream: TokenStream::new(tokens),
            refs: self.refs,
            options: self.options,
            deadline: self.deadline,
            limits: self.limits,
            depth: self.depth + 1,
        }
    }

    /// Parse the whole stream into a `Document` node.
    pub fn parse_document(mut self) -> Result<Node, ParseError> {
        let children = self.parse_blocks()?;
        let location = self
            .options
            .track_source_locations
            .then(SourceLocation::default);
        Ok(Node::new(NodeKind::Document { children }, location))
    }

    /// Guarded block loop.
    fn parse_blocks(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut blocks = Vec::new();
        let mut guard = ProgressGuard::new(Phase::Block, self.deadline, self.limits);

        while !self.stream.is_at_end() {
            let position = self.stream.position();
            guard.tick(position)?;

            let line = self.peek_line();
            if is_blank_line(line) || is_definition_line(line) {
                self.skip_line();
                continue;
            }

            match self.parse_block()? {
                Some(node) => {
                    blocks.push(node);
                    guard.produced();
                }
                None => {
                    guard.empty(position)?;
                    if self.stream.position() == position {
                        self.skip_line();
                    }
                }
            }
        }
        Ok(blocks)
    }

    /// Parse one block starting at the current line.
    fn parse_block(&mut self) -> Result<Option<Node>, ParseError> {
        let line = self.peek_line();
        let (indent, first) = line_indent(line);
        if indent >= 4 {
            return Ok(Some(self.parse_indented_code()));
        }
        let Some(kind) = line.get(first).map(|t| t.kind) else {
            return Ok(None);
        };
        let html_start = matches!(kind, TokenKind::HtmlTag | TokenKind::LessThan)
            && scan::is_html_block_start(&raw_text(&line[first..]));
        let containers_allowed = self.depth < self.options.max_nesting_depth;

        match kind {
            TokenKind::AtxHeading => self.parse_atx_heading().map(Some),
            TokenKind::BlockQuote if containers_allowed => self.parse_block_quote().map(Some),
            TokenKind::ListMarker | TokenKind::OrderedListMarker if containers_allowed => {
                self.parse_list().map(Some)
            }
            TokenKind::CodeFence => Ok(Some(self.parse_fenced_code())),
            TokenKind::ThematicBreak => Ok(Some(self.parse_thematic_break())),
            _ if html_start => Ok(Some(self.parse_html_block())),
            _ => {
                if let Some(table) = self.try_table()? {
                    return Ok(Some(table));
                }
                self.parse_paragraph()
            }
        }
    }

    // =========================================================================
    // Line access
    // =========================================================================

    fn line_end(&self) -> usize {
        let tokens = self.stream.tokens();
        let start = self.stream.position().min(tokens.len());
        tokens[start..]
            .iter()
            .position(|t| t.kind.is_line_end())
            .map(|i| start + i)
            .unwrap_or(tokens.len())
    }

    /// Tokens of the current line, newline excluded.
    fn peek_line(&self) -> &[Token] {
        let tokens = self.stream.tokens();
        let start = self.stream.position().min(tokens.len());
        &tokens[start..self.line_end()]
    }

    /// Tokens of the line after the current one.
    fn peek_next_line(&self) -> Option<&[Token]> {
        let tokens = self.stream.tokens();
        let end = self.line_end();
        if tokens.get(end)?.kind != TokenKind::Newline {
            return None;
        }
        let start = end + 1;
        let next_end = tokens[start..]
            .iter()
            .position(|t| t.kind.is_line_end())
            .map(|i| start + i)
            .unwrap_or(tokens.len());
        Some(&tokens[start..next_end])
    }

    /// Consume the current line, returning it with its newline token.
    fn take_line(&mut self) -> (Vec<Token>, Option<Token>) {
        let end = self.line_end();
        let line = self.peek_line().to_vec();
        match self.stream.tokens().get(end) {
            Some(t) if t.kind == TokenKind::Newline => {
                let newline = t.clone();
                self.stream.set_position(end + 1);
                (line, Some(newline))
            }
            _ => {
                self.stream.set_position(end);
                (line, None)
            }
        }
    }

    fn skip_line(&mut self) {
        self.take_line();
    }

    fn location(&self, token: Option<&Token>) -> Option<SourceLocation> {
        if self.options.track_source_locations {
            token.map(|t| t.location)
        } else {
            None
        }
    }

    fn eof_location(&self) -> SourceLocation {
        self.stream.current().location
    }

    fn inlines(&self, tokens: &[Token]) -> Result<Vec<Node>, ParseError> {
        parse_inlines(tokens, self.refs, self.options, self.deadline)
    }

    // =========================================================================
    // Leaf blocks
    // =========================================================================

    fn parse_indented_code(&mut self) -> Node {
        let location = self.location(self.peek_line().iter().find(|t| !t.kind.is_indent()));
        let mut lines: Vec<String> = Vec::new();
        while !self.stream.is_at_end() {
            let line = self.peek_line();
            let blank = is_blank_line(line);
            if !blank && line_indent(line).0 < 4 {
                break;
            }
            let (line, _) = self.take_line();
            lines.push(raw_text(&strip_columns(&line, 4)));
        }
        while lines.last().is_some_and(|l| scan::is_blank(l)) {
            lines.pop();
        }
        Node::new(
            NodeKind::CodeBlock {
                content: lines.join("\n"),
                language: None,
                fenced: false,
                fence: None,
            },
            location,
        )
    }

    fn parse_atx_heading(&mut self) -> Result<Node, ParseError> {
        let (line, _) = self.take_line();
        let (_, first) = line_indent(&line);
        let marker = &line[first];
        let level = marker.content.len().min(6) as u8;

        let mut content = trim_line(&line[first + 1..]);
        // Closing sequence: a `#` run that is alone or preceded by whitespace
        if let Some(last) = content.last() {
            if last.kind == TokenKind::Hash {
                let alone = content.len() == 1;
                let spaced = content.len() >= 2
                    && content[content.len() - 2].kind == TokenKind::Whitespace;
                if alone || spaced {
                    content.pop();
                    content = trim_line(&content);
                }
            }
        }

        let children = self.inlines(&content)?;
        Ok(Node::new(
            NodeKind::Heading {
                level,
                setext: false,
                children,
            },
            self.location(Some(marker)),
        ))
    }

    fn parse_thematic_break(&mut self) -> Node {
        let (line, _) = self.take_line();
        let (_, first) = line_indent(&line);
        let token = &line[first];
        let marker = token
            .content
            .chars()
            .find(|c| !c.is_whitespace())
            .unwrap_or('-');
        Node::new(
            NodeKind::ThematicBreak { marker },
            self.location(Some(token)),
        )
    }

    fn parse_fenced_code(&mut self) -> Node {
        let (line, _) = self.take_line();
        let (fence_indent, first) = line_indent(&line);
        let opener = &line[first];
        let character = opener.content.chars().next().unwrap_or('`');
        let length = opener.content.chars().count();
        let info = raw_text(&line[first + 1..]);
        let language = info
            .split_whitespace()
            .next()
            .map(scan::unescape)
            .filter(|l| !l.is_empty());

        let mut lines: Vec<String> = Vec::new();
        while !self.stream.is_at_end() {
            let (line, _) = self.take_line();
            let (indent, first) = line_indent(&line);
            let closes = indent < 4
                && line.get(first).is_some_and(|t| {
                    t.kind == TokenKind::CodeFence
                        && t.content.starts_with(character)
                        && t.content.chars().count() >= length
                })
                && is_blank_line(&line[first + 1..]);
            if closes {
                break;
            }
            lines.push(raw_text(&strip_columns(&line, fence_indent)));
        }

        Node::new(
            NodeKind::CodeBlock {
                content: lines.join("\n"),
                language,
                fenced: true,
                fence: Some(Fence { character, length }),
            },
            self.location(Some(opener)),
        )
    }

    fn parse_html_block(&mut self) -> Node {
        let location = self.location(self.peek_line().iter().find(|t| !t.kind.is_indent()));
        let mut lines = Vec::new();
        while !self.stream.is_at_end() && !is_blank_line(self.peek_line()) {
            let (line, _) = self.take_line();
            lines.push(raw_text(&line));
        }
        Node::new(NodeKind::HtmlBlock(lines.join("\n")), location)
    }

    /// Paragraph, or a setext heading when an underline follows.
    fn parse_paragraph(&mut self) -> Result<Option<Node>, ParseError> {
        let mut lines: Vec<(Vec<Token>, Option<Token>)> = Vec::new();
        let mut setext = None;

        let (first, newline) = self.take_line();
        lines.push((strip_indent(&first), newline));

        while !self.stream.is_at_end() {
            let line = self.peek_line();
            if is_blank_line(line) {
                break;
            }
            let (indent, first) = line_indent(line);
            if indent < 4 {
                if let Some(level) = scan::setext_level(&raw_text(line)) {
                    self.skip_line();
                    setext = Some(level);
                    break;
                }
                if interrupts_paragraph(&line[first..]) {
                    break;
                }
            }
            let (line, newline) = self.take_line();
            lines.push((strip_indent(&line), newline));
        }

        let content = join_lines(lines);
        let location = self.location(content.first());
        let children = self.inlines(&content)?;
        let kind = match setext {
            Some(level) => NodeKind::Heading {
                level,
                setext: true,
                children,
            },
            None if children.is_empty() => return Ok(None),
            None => NodeKind::Paragraph { children },
        };
        Ok(Some(Node::new(kind, location)))
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// GFM table: a header row immediately followed by a separator row with
    /// the same number of cells.
    fn try_table(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.options.enable_gfm_extensions {
            return Ok(None);
        }
        let header_line = self.peek_line();
        let (_, first) = line_indent(header_line);
        let header_raw = raw_text(&header_line[first..]);
        if !scan::looks_like_table_row(&header_raw) {
            return Ok(None);
        }
        let Some(separator_line) = self.peek_next_line() else {
            return Ok(None);
        };
        if line_indent(separator_line).0 >= 4 {
            return Ok(None);
        }
        let Some(alignments) = scan::table_separator(raw_text(separator_line).trim()) else {
            return Ok(None);
        };
        let header_cells = split_cells(&header_line[first..]);
        if header_cells.len() != alignments.len() {
            return Ok(None);
        }

        let location = self.location(header_line.get(first));
        let header_location = location;
        let width = header_cells.len();
        self.skip_line();
        self.skip_line();

        let mut rows = vec![self.table_row(header_cells, &alignments, true, header_location)?];
        while !self.stream.is_at_end() {
            let line = self.peek_line();
            let (indent, first) = line_indent(line);
            if is_blank_line(line) || (indent < 4 && interrupts_paragraph(&line[first..])) {
                break;
            }
            let (line, _) = self.take_line();
            let (_, first) = line_indent(&line);
            let row_location = self.location(line.get(first));
            let mut cells = split_cells(&line[first..]);
            if self.options.strict_mode {
                cells.truncate(width);
            }
            while cells.len() < width {
                cells.push(Vec::new());
            }
            rows.push(self.table_row(cells, &alignments, false, row_location)?);
        }

        Ok(Some(Node::new(
            NodeKind::Table {
                alignments,
                children: rows,
            },
            location,
        )))
    }

    fn table_row(
        &self,
        cells: Vec<Vec<Token>>,
        alignments: &[Alignment],
        header: bool,
        location: Option<SourceLocation>,
    ) -> Result<Node, ParseError> {
        let mut children = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let alignment = alignments.get(i).copied().unwrap_or(Alignment::None);
            children.push(Node::new(
                NodeKind::TableCell {
                    alignment,
                    children: self.inlines(cell)?,
                },
                self.location(cell.first()),
            ));
        }
        Ok(Node::new(NodeKind::TableRow { header, children }, location))
    }

    // =========================================================================
    // Containers
    // =========================================================================

    fn parse_block_quote(&mut self) -> Result<Node, ParseError> {
        let location = self.location(self.peek_line().iter().find(|t| !t.kind.is_indent()));
        let mut buffer = LineBuffer::default();
        let mut lazy = LazyState::default();

        while !self.stream.is_at_end() {
            let line = self.peek_line();
            let (indent, first) = line_indent(line);
            let quoted = indent < 4 && line.get(first).map(|t| t.kind) == Some(TokenKind::BlockQuote);
            if quoted {
                let (line, newline) = self.take_line();
                let stripped = strip_columns(&line[first + 1..], 1);
                lazy.observe(&stripped);
                buffer.push(stripped, newline);
            } else if lazy.accepts(line) {
                let (line, newline) = self.take_line();
                buffer.push(line, newline);
            } else {
                break;
            }
        }

        let children = self
            .nested(buffer.into_tokens(self.eof_location()))
            .parse_blocks()?;
        Ok(Node::new(NodeKind::BlockQuote { children }, location))
    }

    fn parse_list(&mut self) -> Result<Node, ParseError> {
        let line = self.peek_line();
        let (_, first) = line_indent(line);
        let location = self.location(line.get(first));
        let kind = scan::list_marker(&line[first].content)
            .map(|m| m.kind)
            .unwrap_or(MarkerKind::Bullet('-'));

        let mut items = Vec::new();
        let mut loose = false;
        let mut gap_before_next = false;
        let mut content_column = 0;

        while !self.stream.is_at_end() {
            if !items.is_empty() {
                let line = self.peek_line();
                let (indent, first) = line_indent(line);
                let Some(marker) = line.get(first) else {
                    break;
                };
                let compatible = matches!(
                    marker.kind,
                    TokenKind::ListMarker | TokenKind::OrderedListMarker
                ) && scan::list_marker(&marker.content)
                    .is_some_and(|m| m.kind.is_compatible(&kind));
                // Siblings sit left of the previous item's content column
                if !compatible || indent >= content_column || indent >= 4 {
                    break;
                }
                if gap_before_next {
                    loose = true;
                }
            }
            let item = self.parse_list_item()?;
            content_column = item.content_column;
            gap_before_next = item.trailing_blank;
            loose |= item.internal_blank;
            items.push(item.node);
        }

        let (start, delimiter, bullet) = match kind {
            MarkerKind::Ordered { number, delimiter } => (Some(number), Some(delimiter), None),
            MarkerKind::Bullet(c) => (None, None, Some(c)),
        };
        Ok(Node::new(
            NodeKind::List {
                ordered: kind.is_ordered(),
                start,
                delimiter,
                bullet,
                tight: !loose,
                children: items,
            },
            location,
        ))
    }

    fn parse_list_item(&mut self) -> Result<ListItem, ParseError> {
        let (line, newline) = self.take_line();
        let (indent, first) = line_indent(&line);
        let marker = &line[first];
        let location = self.location(Some(marker));
        let marker_end = indent + marker.content.chars().count();

        let after = &line[first + 1..];
        let (spacing, _) = line_indent(after);
        let (content_column, mut first_line) = if is_blank_line(after) {
            (marker_end + 1, Vec::new())
        } else if spacing >= 5 {
            (marker_end + 1, strip_columns(after, 1))
        } else {
            (marker_end + spacing, strip_columns(after, spacing))
        };

        let mut checked = None;
        if self.options.enable_gfm_extensions
            && first_line.first().map(|t| t.kind) == Some(TokenKind::TaskListMarker)
        {
            checked = Some(first_line[0].content.as_bytes().get(1) != Some(&b' '));
            let skip = if first_line.get(1).is_some_and(|t| t.kind.is_indent()) {
                2
            } else {
                1
            };
            first_line.drain(..skip.min(first_line.len()));
        }

        let mut buffer = LineBuffer::default();
        let mut lazy = LazyState::default();
        lazy.observe(&first_line);
        let starts_blank = first_line.is_empty();
        buffer.push(first_line, newline);

        let mut blank_run = 0;
        let mut internal_blank = false;
        while !self.stream.is_at_end() {
            let line = self.peek_line();
            if is_blank_line(line) {
                // An item may start with at most one blank line
                if starts_blank && buffer.len() == 1 && blank_run == 0 {
                    let next_indented = self
                        .peek_next_line()
                        .is_some_and(|n| !is_blank_line(n) && line_indent(n).0 >= content_column);
                    if !next_indented {
                        break;
                    }
                }
                let (line, newline) = self.take_line();
                buffer.push(strip_columns(&line, content_column), newline);
                blank_run += 1;
                lazy.observe(&[]);
                continue;
            }
            let (indent, _) = line_indent(line);
            if indent >= content_column {
                let (line, newline) = self.take_line();
                let stripped = strip_columns(&line, content_column);
                if blank_run > 0 && !lazy.in_fence {
                    internal_blank = true;
                }
                blank_run = 0;
                lazy.observe(&stripped);
                buffer.push(stripped, newline);
                continue;
            }
            if blank_run == 0 && lazy.accepts(line) {
                let (line, newline) = self.take_line();
                buffer.push(line, newline);
                continue;
            }
            break;
        }
        let trailing_blank = buffer.pop_trailing_blank() > 0;

        let children = self
            .nested(buffer.into_tokens(self.eof_location()))
            .parse_blocks()?;
        let kind = match checked {
            Some(checked) => NodeKind::TaskListItem { checked, children },
            None => NodeKind::ListItem { children },
        };
        Ok(ListItem {
            node: Node::new(kind, location),
            content_column,
            trailing_blank,
            internal_blank,
        })
    }
}

struct ListItem {
    node: Node,
    content_column: usize,
    trailing_blank: bool,
    internal_blank: bool,
}

/// Lines collected for a container, with their newline tokens.
#[derive(Default)]
struct LineBuffer {
    lines: Vec<(Vec<Token>, Option<Token>)>,
}

impl LineBuffer {
    fn push(&mut self, line: Vec<Token>, newline: Option<Token>) {
        self.lines.push((line, newline));
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    /// Drop trailing blank lines, returning how many were removed.
    fn pop_trailing_blank(&mut self) -> usize {
        let mut count = 0;
        while self.lines.len() > 1 && self.lines.last().is_some_and(|(l, _)| is_blank_line(l)) {
            self.lines.pop();
            count += 1;
        }
        count
    }

    fn into_tokens(self, eof: SourceLocation) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        for (line, newline) in self.lines {
            tokens.extend(line);
            tokens.extend(newline);
        }
        tokens.push(Token::eof(eof));
        tokens
    }
}

/// Tracks whether the last collected line leaves a paragraph open, which is
/// what allows lazy continuation lines.
#[derive(Default)]
struct LazyState {
    paragraph_open: bool,
    in_fence: bool,
}

impl LazyState {
    fn observe(&mut self, line: &[Token]) {
        let (indent, first) = line_indent(line);
        let Some(token) = line.get(first) else {
            self.paragraph_open = false;
            return;
        };
        if token.kind == TokenKind::CodeFence && indent < 4 {
            self.in_fence = !self.in_fence;
            self.paragraph_open = false;
            return;
        }
        self.paragraph_open = !self.in_fence
            && indent < 4
            && !matches!(
                token.kind,
                TokenKind::AtxHeading | TokenKind::ThematicBreak | TokenKind::HtmlTag
            );
    }

    /// Whether an unprefixed line continues the open paragraph.
    fn accepts(&self, line: &[Token]) -> bool {
        if !self.paragraph_open || is_blank_line(line) {
            return false;
        }
        let (indent, first) = line_indent(line);
        indent >= 4 || !interrupts_paragraph(&line[first..])
    }
}

// =============================================================================
// Line helpers
// =============================================================================

/// Visual width of the leading indentation and the index of the first
/// content token.
fn line_indent(line: &[Token]) -> (usize, usize) {
    let mut width = 0;
    let mut index = 0;
    while index < line.len() && line[index].kind.is_indent() {
        let token = &line[index];
        width += scan::indent_width(&token.content, token.location.column);
        index += 1;
    }
    (width, index)
}

fn is_blank_line(line: &[Token]) -> bool {
    line.iter().all(|t| t.kind.is_indent())
}

/// Remove up to `columns` columns of leading indentation. A tab that is only
/// partly consumed leaves the remainder as spaces.
fn strip_columns(line: &[Token], columns: usize) -> Vec<Token> {
    let mut out = Vec::with_capacity(line.len());
    let mut remaining = columns;
    let mut index = 0;

    while index < line.len() && remaining > 0 && line[index].kind.is_indent() {
        let token = &line[index];
        index += 1;
        let mut column = token.location.column;
        let mut consumed = 0;
        let mut leftover = 0;
        for c in token.content.chars() {
            if remaining == 0 {
                break;
            }
            let width = if c == '\t' {
                TAB_STOP - column % TAB_STOP
            } else {
                1
            };
            consumed += c.len_utf8();
            if width > remaining {
                leftover = width - remaining;
                column += remaining;
                remaining = 0;
                break;
            }
            remaining -= width;
            column += width;
        }
        let mut rest = " ".repeat(leftover);
        rest.push_str(&token.content[consumed..]);
        if !rest.is_empty() {
            let location = SourceLocation::new(
                token.location.line,
                column,
                token.location.offset + consumed,
            );
            out.push(Token::new(TokenKind::Whitespace, rest, location));
        }
    }
    out.extend_from_slice(&line[index..]);
    out
}

/// Drop all leading indentation.
fn strip_indent(line: &[Token]) -> Vec<Token> {
    let (_, first) = line_indent(line);
    line[first..].to_vec()
}

/// Remove leading and trailing whitespace tokens, including trailing
/// whitespace hard breaks.
fn trim_line(line: &[Token]) -> Vec<Token> {
    let is_space = |t: &Token| {
        t.kind.is_indent() || (t.kind == TokenKind::HardBreak && t.content.trim().is_empty())
    };
    let start = line.iter().position(|t| !is_space(t)).unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|t| !is_space(t))
        .map(|i| i + 1)
        .unwrap_or(start);
    line[start..end.max(start)].to_vec()
}

/// Join paragraph lines with their newline tokens, trimming the last line.
fn join_lines(lines: Vec<(Vec<Token>, Option<Token>)>) -> Vec<Token> {
    let count = lines.len();
    let mut tokens = Vec::new();
    for (i, (line, newline)) in lines.into_iter().enumerate() {
        if i + 1 == count {
            tokens.extend(trim_line(&line));
        } else {
            tokens.extend(line);
            tokens.extend(newline);
        }
    }
    tokens
}

/// Whether a line (indentation removed) starts a block that may interrupt a
/// paragraph.
fn interrupts_paragraph(content: &[Token]) -> bool {
    let Some(first) = content.first() else {
        return false;
    };
    match first.kind {
        TokenKind::AtxHeading
        | TokenKind::BlockQuote
        | TokenKind::ThematicBreak
        | TokenKind::CodeFence => true,
        TokenKind::ListMarker => !is_blank_line(&content[1..]),
        TokenKind::OrderedListMarker => {
            !is_blank_line(&content[1..])
                && scan::list_marker(&first.content).is_some_and(
                    |m| matches!(m.kind, MarkerKind::Ordered { number: 1, .. }),
                )
        }
        TokenKind::HtmlTag | TokenKind::LessThan => scan::is_html_block_start(&raw_text(content)),
        _ => false,
    }
}

/// Split a table row into cells on unescaped pipes, dropping the outer
/// pipes and trimming each cell.
fn split_cells(line: &[Token]) -> Vec<Vec<Token>> {
    let line = trim_line(line);
    let mut cells: Vec<Vec<Token>> = vec![Vec::new()];
    for token in &line {
        if token.kind == TokenKind::Pipe {
            cells.push(Vec::new());
        } else if let Some(cell) = cells.last_mut() {
            cell.push(token.clone());
        }
    }
    if line.first().is_some_and(|t| t.kind == TokenKind::Pipe) {
        cells.remove(0);
    }
    if line.last().is_some_and(|t| t.kind == TokenKind::Pipe) {
        cells.pop();
    }
    cells.iter().map(|cell| trim_line(cell)).collect()
}
