//! Tokens produced by the tokenizer.

use markast_core::SourceLocation;

/// Token kinds.
///
/// Line-start structural markers (`AtxHeading`, `BlockQuote`, list markers,
/// `ThematicBreak`, `IndentedCode`, `CodeFence`) are only emitted by the
/// line-start recognizers. Everything else comes from generic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain text run
    Text,
    /// Spaces and tabs
    Whitespace,
    /// `\n`, `\r\n` or `\r`
    Newline,
    /// Two or more spaces, or a backslash, directly before a newline
    HardBreak,

    /// `#` to `######` opening an ATX heading
    AtxHeading,
    /// `>` opening a block quote line
    BlockQuote,
    /// `-`, `*` or `+` opening a bullet list item
    ListMarker,
    /// `1.` or `1)` opening an ordered list item
    OrderedListMarker,
    /// A whole thematic break line, e.g. `* * *`
    ThematicBreak,
    /// Leading indentation of an indented code line
    IndentedCode,
    /// Opening or closing code fence run
    CodeFence,
    /// `[ ]`, `[x]` after a list marker
    TaskListMarker,

    /// Run of `*`
    Asterisk,
    /// Run of `_`
    Underscore,
    /// Run of `` ` ``
    Backtick,
    /// Run of `~`
    Tilde,
    /// Run of `#` outside heading markers
    Hash,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Bang,
    GreaterThan,
    Pipe,
    Backslash,
    Ampersand,
    LessThan,
    Dash,
    Plus,

    /// Backslash followed by an ASCII punctuation character
    Escape,
    /// `&name;`, `&#123;` or `&#x1F;`
    Entity,
    /// Open/close tag, comment, processing instruction or declaration
    HtmlTag,
    /// `<scheme:...>`, `<mail@host>` or a GFM bare autolink
    Autolink,

    /// End of stream sentinel, always last, empty content
    Eof,
}

impl TokenKind {
    /// Kinds that open a block when they are the first token of a line.
    pub fn is_block_start(&self) -> bool {
        matches!(
            self,
            TokenKind::AtxHeading
                | TokenKind::BlockQuote
                | TokenKind::ListMarker
                | TokenKind::OrderedListMarker
                | TokenKind::ThematicBreak
                | TokenKind::CodeFence
        )
    }

    /// Kinds that terminate a line.
    pub fn is_line_end(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof)
    }

    /// Leading-indentation kinds.
    pub fn is_indent(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::IndentedCode)
    }
}

/// A lexical unit located in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            content: content.into(),
            location,
        }
    }

    /// End of stream sentinel at `location`.
    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenKind::Eof, String::new(), location)
    }

    /// Byte length of the content.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Visual column just past this token, assuming it does not span lines.
    pub fn end_column(&self) -> usize {
        crate::scan::advance_column(self.location.column, &self.content)
    }
}

/// Reassemble source text from a token slice.
pub fn raw_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.content.as_str()).collect()
}
