//! Tokenizer for markdown documents.
//!
//! This module breaks a complete document into tokens: line-start structural
//! markers first, then punctuation runs, whitespace, text and the small
//! self-delimiting constructs (escapes, entities, tags, autolinks).
//!
//! Anything the tokenizer cannot classify becomes text, and the
//! concatenated token contents always reproduce the input exactly. The only
//! failure is running past a [`Deadline`] given to
//! [`Tokenizer::tokenize_within`].

use markast_core::{AutolinkKind, ParseError, ParserOptions, Phase, SourceLocation};

use crate::guard::Deadline;
use crate::scan;
use crate::token::{Token, TokenKind};

/// Tokenizer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Inside a fenced code block: lines are literal until a closing fence.
    FencedCode {
        fence_char: char,
        fence_len: usize,
        fence_column: usize,
        /// Block quote markers to strip from each line before checking
        quote_depth: usize,
    },
}

/// Everything a speculative recognizer may change.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    pos: usize,
    line: usize,
    column: usize,
    emitted: usize,
    mode: Mode,
    list_content_column: Option<usize>,
}

/// Characters that end a plain text run.
fn is_special(c: char) -> bool {
    matches!(
        c,
        '*' | '_'
            | '#'
            | '`'
            | '~'
            | '['
            | ']'
            | '('
            | ')'
            | '!'
            | '>'
            | '|'
            | '\\'
            | '&'
            | '<'
            | '-'
            | '+'
            | ' '
            | '\t'
            | '\n'
            | '\r'
    )
}

/// Markdown tokenizer.
///
/// Single-use: construct it over one input and call [`Tokenizer::tokenize`].
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    mode: Mode,
    tokens: Vec<Token>,
    /// Content column of the most recent list item, while it may continue
    list_content_column: Option<usize>,
    /// Block quote markers seen on the current line
    line_quote_depth: usize,
    /// Recognize GFM task list markers
    pub gfm: bool,
    /// Recognize GFM bare autolinks (`www.`, `https://`, emails)
    pub bare_autolinks: bool,
    /// No bare email can start before this offset
    email_miss_until: usize,
    deadline: Deadline,
    timed_out: Option<ParseError>,
}

/// Tokens emitted between deadline checks inside one line.
const DEADLINE_STRIDE: usize = 1024;

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer with GFM enabled.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 0,
            column: 0,
            mode: Mode::Normal,
            tokens: Vec::new(),
            list_content_column: None,
            line_quote_depth: 0,
            gfm: true,
            bare_autolinks: true,
            email_miss_until: 0,
            deadline: Deadline::unbounded(),
            timed_out: None,
        }
    }

    /// Create a tokenizer configured from parser options.
    pub fn with_options(input: &'a str, options: &ParserOptions) -> Self {
        let mut tokenizer = Self::new(input);
        tokenizer.gfm = options.enable_gfm_extensions;
        tokenizer.bare_autolinks = options.enable_gfm_extensions && !options.strict_mode;
        tokenizer
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(self) -> Vec<Token> {
        self.run().0
    }

    /// Tokenize under a wall-clock budget, failing with a block-phase
    /// `Timeout` once it is spent.
    pub fn tokenize_within(mut self, deadline: Deadline) -> Result<Vec<Token>, ParseError> {
        self.deadline = deadline;
        match self.run() {
            (_, Some(err)) => Err(err),
            (tokens, None) => Ok(tokens),
        }
    }

    fn run(mut self) -> (Vec<Token>, Option<ParseError>) {
        while self.pos < self.input.len() {
            self.check_deadline();
            if self.timed_out.is_some() {
                break;
            }
            self.tokenize_line();
        }
        let eof = Token::eof(self.location());
        self.tokens.push(eof);
        (self.tokens, self.timed_out)
    }

    fn check_deadline(&mut self) {
        if let Err(err) = self.deadline.check(Phase::Block, self.tokens.len()) {
            self.timed_out = Some(err);
        }
    }

    // =========================================================================
    // Cursor primitives
    // =========================================================================

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.pos)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Remainder of the current line, newline excluded.
    fn line_rest(&self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
        &rest[..end]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn prev_char(&self) -> Option<char> {
        self.input[..self.pos].chars().next_back()
    }

    /// Emit the next `len` bytes as one token.
    fn emit(&mut self, kind: TokenKind, len: usize) {
        if len == 0 {
            return;
        }
        let content = &self.input[self.pos..self.pos + len];
        self.tokens.push(Token::new(kind, content, self.location()));
        self.pos += len;
        if kind == TokenKind::Newline {
            self.line += 1;
            self.column = 0;
            self.line_quote_depth = 0;
        } else {
            self.column = scan::advance_column(self.column, content);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            line: self.line,
            column: self.column,
            emitted: self.tokens.len(),
            mode: self.mode,
            list_content_column: self.list_content_column,
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.pos = snap.pos;
        self.line = snap.line;
        self.column = snap.column;
        self.tokens.truncate(snap.emitted);
        self.mode = snap.mode;
        self.list_content_column = snap.list_content_column;
    }

    /// Run a speculative recognizer, rolling back everything it did on rejection.
    fn attempt(&mut self, recognize: impl FnOnce(&mut Self) -> bool) -> bool {
        let snap = self.snapshot();
        if recognize(self) {
            true
        } else {
            self.restore(snap);
            false
        }
    }

    // =========================================================================
    // Lines
    // =========================================================================

    fn tokenize_line(&mut self) {
        if let Mode::FencedCode { .. } = self.mode {
            if self.fenced_line() {
                self.finish_line();
                return;
            }
        }
        self.line_start();
        self.finish_line();
    }

    /// Generic dispatch up to and including the newline.
    fn finish_line(&mut self) {
        while let Some(c) = self.peek_char() {
            if c == '\n' || c == '\r' {
                let len = if self.rest().starts_with("\r\n") { 2 } else { 1 };
                self.emit(TokenKind::Newline, len);
                return;
            }
            self.generic_token();
            if self.tokens.len() % DEADLINE_STRIDE == 0 {
                self.check_deadline();
                if self.timed_out.is_some() {
                    return;
                }
            }
        }
    }

    /// Line-start recognizers, in priority order. Re-entered after each block
    /// quote marker and list marker so nested containers are recognized too.
    fn line_start(&mut self) {
        let mut first = true;
        loop {
            let ws_len = scan::leading_whitespace_len(self.line_rest());
            let ws = &self.rest()[..ws_len];
            let indent = scan::indent_width(ws, self.column);
            let content = &self.line_rest()[ws_len..];

            if content.is_empty() {
                self.emit(TokenKind::Whitespace, ws_len);
                return;
            }

            if first {
                first = false;
                if let Some(col) = self.list_content_column {
                    if self.column + indent < col {
                        self.list_content_column = None;
                    }
                }
            }

            let base = self.column.max(self.list_content_column.unwrap_or(0));
            if self.column + indent >= base + 4 {
                self.emit(TokenKind::IndentedCode, ws_len);
                return;
            }
            self.emit(TokenKind::Whitespace, ws_len);

            if self.attempt(Self::try_atx_heading) {
                return;
            }
            if self.attempt(Self::try_block_quote) {
                continue;
            }
            if self.attempt(Self::try_list_marker) {
                continue;
            }
            if self.attempt(Self::try_thematic_break) {
                return;
            }
            self.attempt(Self::try_fence_opener);
            return;
        }
    }

    fn try_atx_heading(&mut self) -> bool {
        match scan::atx_heading_level(self.line_rest()) {
            Some(level) => {
                self.emit(TokenKind::AtxHeading, level as usize);
                true
            }
            None => false,
        }
    }

    fn try_block_quote(&mut self) -> bool {
        if self.peek_char() != Some('>') {
            return false;
        }
        self.emit(TokenKind::BlockQuote, 1);
        self.line_quote_depth += 1;
        if let Some(c @ (' ' | '\t')) = self.peek_char() {
            self.emit(TokenKind::Whitespace, c.len_utf8());
        }
        true
    }

    fn try_list_marker(&mut self) -> bool {
        let line = self.line_rest();
        let Some(marker) = scan::list_marker(line) else {
            return false;
        };
        if scan::thematic_break(line).is_some() {
            return false;
        }
        let kind = if marker.kind.is_ordered() {
            TokenKind::OrderedListMarker
        } else {
            TokenKind::ListMarker
        };
        self.emit(kind, marker.len);
        let marker_end = self.column;

        let after = self.line_rest();
        let ws_len = scan::leading_whitespace_len(after);
        let width = scan::indent_width(&after[..ws_len], marker_end);
        if ws_len == after.len() {
            // Empty item: content starts one column past the marker
            self.emit(TokenKind::Whitespace, ws_len);
            self.list_content_column = Some(marker_end + 1);
            return true;
        }
        if width >= 5 {
            // Indented code inside the item: only one column belongs to the marker
            let c = after.chars().next().map(char::len_utf8).unwrap_or(1);
            self.emit(TokenKind::Whitespace, c);
            self.list_content_column = Some(marker_end + 1);
            return true;
        }
        self.emit(TokenKind::Whitespace, ws_len);
        self.list_content_column = Some(marker_end + width);

        if self.gfm && scan::task_marker(self.line_rest()).is_some() {
            self.emit(TokenKind::TaskListMarker, 3);
        }
        true
    }

    fn try_thematic_break(&mut self) -> bool {
        let line = self.line_rest();
        if scan::thematic_break(line).is_none() {
            return false;
        }
        self.emit(TokenKind::ThematicBreak, line.len());
        true
    }

    fn try_fence_opener(&mut self) -> bool {
        let line = self.line_rest();
        let Some((fence_char, fence_len)) = scan::fence_opener(line) else {
            return false;
        };
        let fence_column = self.column;
        self.emit(TokenKind::CodeFence, fence_len);
        let info = self.line_rest();
        let ws_len = scan::leading_whitespace_len(info);
        self.emit(TokenKind::Whitespace, ws_len);
        self.emit(TokenKind::Text, info.len() - ws_len);
        self.mode = Mode::FencedCode {
            fence_char,
            fence_len,
            fence_column,
            quote_depth: self.line_quote_depth,
        };
        true
    }

    /// One line inside a fenced code block, newline excluded.
    ///
    /// Returns false (with nothing emitted) when the enclosing block quote
    /// ended, which also ends the fence.
    fn fenced_line(&mut self) -> bool {
        let Mode::FencedCode {
            fence_char,
            fence_len,
            fence_column,
            quote_depth,
        } = self.mode
        else {
            return false;
        };

        let snap = self.snapshot();
        for _ in 0..quote_depth {
            let ws_len = scan::leading_whitespace_len(self.line_rest());
            if ws_len > 3 || !self.line_rest()[ws_len..].starts_with('>') {
                self.restore(snap);
                self.mode = Mode::Normal;
                return false;
            }
            self.emit(TokenKind::Whitespace, ws_len);
            self.try_block_quote();
        }

        let line = self.line_rest();
        let ws_len = scan::leading_whitespace_len(line);
        let indent_end = scan::advance_column(self.column, &line[..ws_len]);
        if indent_end <= fence_column + 3 {
            if let Some(len) = scan::closing_fence_len(&line[ws_len..], fence_char, fence_len) {
                self.emit(TokenKind::Whitespace, ws_len);
                self.emit(TokenKind::CodeFence, len * fence_char.len_utf8());
                let trailing = self.line_rest().len();
                self.emit(TokenKind::Whitespace, trailing);
                self.mode = Mode::Normal;
                return true;
            }
        }
        self.emit(TokenKind::Whitespace, ws_len);
        self.emit(TokenKind::Text, line.len() - ws_len);
        true
    }

    // =========================================================================
    // Generic dispatch
    // =========================================================================

    /// Length of the run of `c` at the cursor, in bytes.
    fn run_len(&self, c: char) -> usize {
        self.rest().chars().take_while(|&x| x == c).count() * c.len_utf8()
    }

    fn at_word_start(&self) -> bool {
        !self.prev_char().is_some_and(char::is_alphanumeric)
    }

    /// Bare autolink at the cursor. A failed email scan marks the rest of
    /// its local-part run so later word starts inside it are not rescanned.
    fn bare_autolink(&mut self) -> Option<(usize, AutolinkKind)> {
        let rest = self.rest();
        if let Some(found) = scan::scan_bare_url(rest) {
            return Some(found);
        }
        if self.pos < self.email_miss_until {
            return None;
        }
        let found = scan::scan_bare_email(rest);
        if found.is_none() {
            self.email_miss_until = self.pos + scan::email_local_part_len(rest);
        }
        found
    }

    fn generic_token(&mut self) {
        let Some(c) = self.peek_char() else {
            return;
        };
        match c {
            ' ' | '\t' => {
                let len = scan::leading_whitespace_len(self.rest());
                let after = &self.rest()[len..];
                let spaces = self.rest()[..len].bytes().filter(|&b| b == b' ').count();
                let before_newline = after.starts_with('\n') || after.starts_with('\r');
                if before_newline && spaces >= 2 {
                    self.emit(TokenKind::HardBreak, len);
                } else {
                    self.emit(TokenKind::Whitespace, len);
                }
            }
            '\\' => match self.rest()[1..].chars().next() {
                Some('\n' | '\r') => self.emit(TokenKind::HardBreak, 1),
                Some(next) if scan::is_ascii_punctuation(next) => {
                    self.emit(TokenKind::Escape, 1 + next.len_utf8())
                }
                _ => self.emit(TokenKind::Backslash, 1),
            },
            '&' => match scan::scan_entity(self.rest()) {
                Some(len) => self.emit(TokenKind::Entity, len),
                None => self.emit(TokenKind::Ampersand, 1),
            },
            '<' => {
                if let Some((len, _)) = scan::scan_angle_autolink(self.rest()) {
                    self.emit(TokenKind::Autolink, len);
                } else if let Some(len) = scan::scan_html_tag(self.rest()) {
                    self.emit(TokenKind::HtmlTag, len);
                } else {
                    self.emit(TokenKind::LessThan, 1);
                }
            }
            '*' => self.emit(TokenKind::Asterisk, self.run_len('*')),
            '_' => self.emit(TokenKind::Underscore, self.run_len('_')),
            '`' => self.emit(TokenKind::Backtick, self.run_len('`')),
            '~' => self.emit(TokenKind::Tilde, self.run_len('~')),
            '#' => self.emit(TokenKind::Hash, self.run_len('#')),
            '[' => self.emit(TokenKind::LeftBracket, 1),
            ']' => self.emit(TokenKind::RightBracket, 1),
            '(' => self.emit(TokenKind::LeftParen, 1),
            ')' => self.emit(TokenKind::RightParen, 1),
            '!' => self.emit(TokenKind::Bang, 1),
            '>' => self.emit(TokenKind::GreaterThan, 1),
            '|' => self.emit(TokenKind::Pipe, 1),
            '-' => self.emit(TokenKind::Dash, 1),
            '+' => self.emit(TokenKind::Plus, 1),
            _ => {
                if self.bare_autolinks && self.at_word_start() {
                    if let Some((len, _)) = self.bare_autolink() {
                        self.emit(TokenKind::Autolink, len);
                        return;
                    }
                }
                let len = self
                    .rest()
                    .char_indices()
                    .find(|&(i, ch)| i > 0 && is_special(ch))
                    .map(|(i, _)| i)
                    .unwrap_or(self.rest().len());
                self.emit(TokenKind::Text, len);
            }
        }
    }
}

/// Tokenize with default (GFM) settings.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).tokenize()
}
