//! Integration tests for markast.
//!
//! These tests run whole documents through the parser and the HTML renderer
//! and check the public behavior end to end.

use pretty_assertions::assert_eq;

use markast_config::Config;
use markast_core::{AutolinkKind, Error, Node, NodeKind, ParseError, Phase};
use markast_html::{render_html, HtmlConfig};
use markast_parser::{parse_to_ast, tokenize_with, MarkdownParser, ParserOptions};

/// Helper to parse a document without source locations.
fn parse(markdown: &str) -> Node {
    parse_to_ast(markdown, &ParserOptions::default().with_locations(false)).unwrap()
}

/// Helper to render a document with the default HTML options.
fn html(markdown: &str) -> String {
    render_html(&parse(markdown), &HtmlConfig::default())
}

// =============================================================================
// End-to-end documents
// =============================================================================

#[test]
fn test_mixed_document() {
    let input = "# Notes\n\
                 \n\
                 - [x] done\n\
                 - [ ] todo\n\
                 \n\
                 | a | b |\n\
                 |:--|--:|\n\
                 | 1 | 2 |\n\
                 \n\
                 ```rust\n\
                 let x = 1;\n\
                 ```\n";

    let expected = "<h1>Notes</h1>\n\
                    <ul>\n\
                    <li><input type=\"checkbox\" disabled=\"\" checked=\"\" /> done</li>\n\
                    <li><input type=\"checkbox\" disabled=\"\" /> todo</li>\n\
                    </ul>\n\
                    <table>\n\
                    <thead>\n\
                    <tr>\n\
                    <th style=\"text-align: left\">a</th>\n\
                    <th style=\"text-align: right\">b</th>\n\
                    </tr>\n\
                    </thead>\n\
                    <tbody>\n\
                    <tr>\n\
                    <td style=\"text-align: left\">1</td>\n\
                    <td style=\"text-align: right\">2</td>\n\
                    </tr>\n\
                    </tbody>\n\
                    </table>\n\
                    <pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n";

    assert_eq!(html(input), expected);
}

#[test]
fn test_block_quote_with_list() {
    assert_eq!(
        html("> quoted\n\n1. one\n2. two"),
        "<blockquote>\n<p>quoted</p>\n</blockquote>\n<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n"
    );
}

#[test]
fn test_reference_links_resolve_across_document() {
    assert_eq!(
        html("See [the docs][docs].\n\n[docs]: https://example.com/docs \"Docs\""),
        "<p>See <a href=\"https://example.com/docs\" title=\"Docs\">the docs</a>.</p>\n"
    );
}

#[test]
fn test_unresolved_reference_is_literal() {
    assert_eq!(html("[nothing]"), "<p>[nothing]</p>\n");
}

#[test]
fn test_html_escaping() {
    assert_eq!(html("a < b & c"), "<p>a &lt; b &amp; c</p>\n");
}

#[test]
fn test_autolinks() {
    let doc = parse("Mail <me@example.com>");
    let para = &doc.children()[0];
    assert_eq!(
        para.children()[1].kind,
        NodeKind::Autolink {
            url: "me@example.com".into(),
            kind: AutolinkKind::Email,
        }
    );
    assert_eq!(
        html("Mail <me@example.com>"),
        "<p>Mail <a href=\"mailto:me@example.com\">me@example.com</a></p>\n"
    );
}

#[test]
fn test_commonmark_mode_ignores_gfm() {
    let options = ParserOptions::commonmark().with_locations(false);
    let doc = parse_to_ast("~~gone~~", &options).unwrap();
    assert_eq!(
        render_html(&doc, &HtmlConfig::default()),
        "<p>~~gone~~</p>\n"
    );

    assert_eq!(html("~~gone~~"), "<p><del>gone</del></p>\n");
}

// =============================================================================
// Tokens
// =============================================================================

#[test]
fn test_tokens_reproduce_input() {
    let input = "# h\n> q\n- [x] item\n\n```js\nx\n```\n| a |\n\ttab  \nend\\\n";
    let tokens = tokenize_with(input, &ParserOptions::default());
    let joined: String = tokens.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(joined, input);
}

// =============================================================================
// Guards and errors
// =============================================================================

#[test]
fn test_timeout_surfaces_as_error() {
    let parser = MarkdownParser::with_options(ParserOptions::default().with_timeout(1e-9));
    let err = parser.parse(&"line\n".repeat(200)).unwrap_err();
    assert!(matches!(err, ParseError::Timeout { .. }));
    assert_eq!(err.phase(), Phase::Block);

    let wrapped: Error = err.into();
    assert!(wrapped.to_string().starts_with("Parse error: block parsing timed out"));
}

#[test]
fn test_deep_nesting_is_bounded() {
    let input = format!("{}deep", "> ".repeat(200));
    let options = ParserOptions {
        max_nesting_depth: 8,
        ..ParserOptions::default()
    };
    let doc = parse_to_ast(&input, &options).unwrap();
    assert!(doc.plain_text().contains("deep"));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_drives_parser_and_renderer() {
    let config = Config::default()
        .with_override(
            "[parser]\nGFM = false\n\n[html]\nSoftBreak = \"space\"\nLanguagePrefix = \"lang-\"",
        )
        .unwrap();

    let doc = parse_to_ast("a\nb\n\n```py\nx\n```", &config.parser).unwrap();
    assert_eq!(
        render_html(&doc, &config.html),
        "<p>a b</p>\n<pre><code class=\"lang-py\">x\n</code></pre>\n"
    );
}
