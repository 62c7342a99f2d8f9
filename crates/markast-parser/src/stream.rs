//! Cursor over a token sequence.

use crate::token::{Token, TokenKind};

/// A token sequence with a movable cursor.
///
/// Reading past the end always yields the trailing `Eof` token, so callers
/// never have to bounds-check.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(t) if t.kind == TokenKind::Eof => t.clone(),
            Some(t) => Token::eof(t.location),
            None => Token::eof(Default::default()),
        };
        Self {
            tokens,
            position: 0,
            eof,
        }
    }

    /// Token under the cursor.
    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Token `offset` positions ahead of the cursor.
    pub fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.position + offset).unwrap_or(&self.eof)
    }

    /// Move past the current token and return it.
    pub fn advance(&mut self) -> &Token {
        let index = self.position;
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    /// Whether the current token is one of `kinds`.
    pub fn matches(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current().kind)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor, clamped to the end of the stream.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
