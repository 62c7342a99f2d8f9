//! Markast Parser
//!
//! A CommonMark + GFM markdown parser that produces a typed AST. Parsing is
//! a fixed pipeline: the tokenizer turns the document into tokens, a
//! pre-scan collects link reference definitions, the block parser builds
//! the block tree and runs the inline parser over every leaf.
//!
//! Every parser loop is bounded by a progress guard, so malformed or
//! hostile input either parses or fails with a [`ParseError`]; it never
//! hangs.
//!
//! # Example
//!
//! ```
//! use markast_parser::{parse_to_ast, ParserOptions};
//! use markast_core::NodeKind;
//!
//! let doc = parse_to_ast("# Hello\n\nSome **bold** text.", &ParserOptions::default()).unwrap();
//! assert!(matches!(doc.kind, NodeKind::Document { .. }));
//! assert_eq!(doc.children().len(), 2);
//! ```

pub mod block;
pub mod guard;
pub mod inline;
pub mod link_refs;
pub mod scan;
pub mod stream;
pub mod token;
pub mod tokenizer;

pub use block::BlockParser;
pub use guard::{Deadline, GuardLimits, ProgressGuard};
pub use inline::InlineParser;
pub use link_refs::{LinkReference, LinkReferenceMap};
pub use markast_core::{Node, NodeKind, ParseError, ParserOptions};
pub use stream::TokenStream;
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;

/// Tokenize a document with the given options.
pub fn tokenize_with(markdown: &str, options: &ParserOptions) -> Vec<Token> {
    Tokenizer::with_options(markdown, options).tokenize()
}

/// Parse a markdown document into a `Document` node.
pub fn parse_to_ast(markdown: &str, options: &ParserOptions) -> Result<Node, ParseError> {
    let deadline = Deadline::from_options(options);
    let tokens = Tokenizer::with_options(markdown, options).tokenize_within(deadline)?;
    let token_count = tokens.len();
    let refs = LinkReferenceMap::scan(&tokens);

    let document = BlockParser::new(tokens, &refs, options, deadline).parse_document()?;

    log::debug!(
        "parsed {} bytes: {} tokens, {} nodes, {} link references in {:?}",
        markdown.len(),
        token_count,
        document.node_count(),
        refs.len(),
        deadline.elapsed()
    );
    Ok(document)
}

/// Reusable parser holding a set of options.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    options: ParserOptions,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ParserOptions {
        &mut self.options
    }

    /// Parse a document.
    pub fn parse(&self, markdown: &str) -> Result<Node, ParseError> {
        parse_to_ast(markdown, &self.options)
    }

    /// Tokenize a document without parsing it.
    pub fn tokenize(&self, markdown: &str) -> Vec<Token> {
        tokenize_with(markdown, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markast_core::Phase;
    use pretty_assertions::assert_eq;

    fn parse(markdown: &str) -> Node {
        parse_to_ast(markdown, &ParserOptions::default().with_locations(false)).unwrap()
    }

    #[test]
    fn test_end_to_end_document() {
        let doc = parse("# Title\n\nSome *em* and **strong** text.");
        let expected = Node::bare(NodeKind::Document {
            children: vec![
                Node::bare(NodeKind::Heading {
                    level: 1,
                    setext: false,
                    children: vec![Node::text("Title")],
                }),
                Node::bare(NodeKind::Paragraph {
                    children: vec![
                        Node::text("Some "),
                        Node::bare(NodeKind::Emphasis {
                            children: vec![Node::text("em")],
                        }),
                        Node::text(" and "),
                        Node::bare(NodeKind::Strong {
                            children: vec![Node::text("strong")],
                        }),
                        Node::text(" text."),
                    ],
                }),
            ],
        });
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_empty_document() {
        let doc = parse("");
        assert!(doc.children().is_empty());
        let doc = parse("\n\n   \n");
        assert!(doc.children().is_empty());
    }

    #[test]
    fn test_reference_defined_after_use() {
        let doc = parse("[home]\n\n[home]: https://example.com \"Home\"");
        let para = &doc.children()[0];
        assert_eq!(
            para.children()[0].kind,
            NodeKind::Link {
                url: "https://example.com".into(),
                title: Some("Home".into()),
                reference: true,
                label: Some("home".into()),
                children: vec![Node::text("home")],
            }
        );
    }

    #[test]
    fn test_reference_defined_in_list_item() {
        let doc = parse("- [foo]: /url\n\n[foo]");
        let para = doc.children().last().unwrap();
        assert!(matches!(
            &para.children()[0].kind,
            NodeKind::Link { url, reference: true, .. } if url == "/url"
        ));
    }

    #[test]
    fn test_markdown_parser_reuse() {
        let mut parser = MarkdownParser::new();
        parser.options_mut().enable_gfm_extensions = false;
        let doc = parser.parse("~~x~~").unwrap();
        assert_eq!(doc.plain_text(), "~~x~~");
        assert!(!parser.tokenize("a").is_empty());
    }

    #[test]
    fn test_tiny_budget_times_out() {
        // Tokenizing alone outlasts a one-nanosecond budget
        let options = ParserOptions::default().with_timeout(1e-9);
        let err = parse_to_ast(&"a\n".repeat(100), &options).unwrap_err();
        assert_eq!(err.phase(), Phase::Block);
        assert!(matches!(err, ParseError::Timeout { .. }));
    }

    #[test]
    fn test_dash_separated_words_tokenize_in_linear_time() {
        let input = "a-".repeat(40_000);
        let options = ParserOptions::default().with_timeout(2.0);
        let start = std::time::Instant::now();
        match parse_to_ast(&input, &options) {
            Ok(doc) => assert_eq!(doc.children().len(), 1),
            Err(err) => assert!(matches!(err, ParseError::Timeout { .. })),
        }
        assert!(start.elapsed() < std::time::Duration::from_secs(4));
    }

    #[test]
    fn test_pathological_input_terminates() {
        let input = "*".repeat(5000) + &"[".repeat(2000) + &"a *".repeat(1000);
        let options = ParserOptions::default().with_timeout(10.0);
        match parse_to_ast(&input, &options) {
            Ok(doc) => assert_eq!(doc.children().len(), 1),
            Err(err) => assert!(matches!(err, ParseError::Timeout { .. })),
        }
    }
}
