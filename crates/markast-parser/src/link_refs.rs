//! Link reference definitions.
//!
//! Definitions are collected in a pre-pass over the token stream so that
//! references may appear before the definition they use. The resulting map
//! is read-only for the rest of the parse.

use std::collections::HashMap;

use markast_core::SourceLocation;

use crate::scan;
use crate::token::{raw_text, Token, TokenKind};

/// A resolved link reference definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub url: String,
    pub title: Option<String>,
    pub location: SourceLocation,
}

/// Map from normalized label to definition. The first definition of a
/// label wins.
#[derive(Debug, Clone, Default)]
pub struct LinkReferenceMap {
    refs: HashMap<String, LinkReference>,
}

impl LinkReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every definition in a token stream.
    ///
    /// Lines inside fenced or indented code are skipped. Block quote and
    /// list item markers in front of a definition are ignored.
    pub fn scan(tokens: &[Token]) -> Self {
        let mut map = Self::new();
        let mut in_fence = false;
        for line in tokens.split(|t| t.kind == TokenKind::Newline) {
            if line.iter().any(|t| t.kind == TokenKind::CodeFence) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence || line.first().is_some_and(|t| t.kind == TokenKind::IndentedCode) {
                continue;
            }
            let start = line
                .iter()
                .position(|t| {
                    !matches!(
                        t.kind,
                        TokenKind::Whitespace
                            | TokenKind::BlockQuote
                            | TokenKind::ListMarker
                            | TokenKind::OrderedListMarker
                    )
                })
                .unwrap_or(line.len());
            let rest = &line[start..];
            if rest.first().map(|t| t.kind) != Some(TokenKind::LeftBracket) {
                continue;
            }
            if let Some(def) = scan::parse_link_reference_definition(&raw_text(rest)) {
                map.insert(&def.label, def.url, def.title, rest[0].location);
            }
        }
        log::debug!("collected {} link reference definitions", map.len());
        map
    }

    /// Add a definition unless the label is already defined.
    pub fn insert(
        &mut self,
        label: &str,
        url: String,
        title: Option<String>,
        location: SourceLocation,
    ) -> bool {
        let key = scan::normalize_label(label);
        if key.is_empty() || self.refs.contains_key(&key) {
            return false;
        }
        self.refs.insert(
            key,
            LinkReference {
                url,
                title,
                location,
            },
        );
        true
    }

    /// Look up a label, normalizing it first.
    pub fn get(&self, label: &str) -> Option<&LinkReference> {
        self.refs.get(&scan::normalize_label(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Whether a line of tokens (leading indentation allowed) is a link
/// reference definition.
pub fn is_definition_line(line: &[Token]) -> bool {
    let start = line
        .iter()
        .position(|t| !t.kind.is_indent())
        .unwrap_or(line.len());
    let indent: usize = line[..start]
        .iter()
        .map(|t| scan::indent_width(&t.content, t.location.column))
        .sum();
    let rest = &line[start..];
    indent < 4
        && rest.first().map(|t| t.kind) == Some(TokenKind::LeftBracket)
        && scan::parse_link_reference_definition(&raw_text(rest)).is_some()
}
