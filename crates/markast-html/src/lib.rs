//! Markast HTML
//!
//! This crate renders a markast document tree as HTML.
//!
//! # Features
//!
//! - **Entity-preserving escaping** - `&copy;` in the source stays `&copy;`
//! - **Tight lists** - Items render without `<p>` tags
//! - **Task lists** - Disabled checkboxes
//! - **Tables** - Column alignments as `style` attributes
//! - **Diagrams** - One code language rendered as `<pre class="mermaid">`
//!
//! # Example
//!
//! ```
//! use markast_core::{Node, NodeKind};
//! use markast_html::{render_html, HtmlConfig};
//!
//! let doc = Node::bare(NodeKind::Document {
//!     children: vec![Node::bare(NodeKind::Paragraph {
//!         children: vec![Node::text("a < b")],
//!     })],
//! });
//! assert_eq!(render_html(&doc, &HtmlConfig::default()), "<p>a &lt; b</p>\n");
//! ```

pub mod escape;
pub mod list;
pub mod table;

pub use escape::{escape_attribute, escape_code, escape_text};
pub use list::list_open_tag;
pub use markast_config::{HtmlConfig, SoftBreak};
pub use table::cell_open_tag;

use std::io::{self, Write};

use markast_core::{AutolinkKind, Node, NodeKind};

/// Render a tree to an HTML string.
pub fn render_html(node: &Node, config: &HtmlConfig) -> String {
    let mut output = Vec::new();
    let mut renderer = HtmlRenderer::new(&mut output, config.clone());
    let result = renderer.render(node);
    debug_assert!(result.is_ok(), "writing into a Vec failed: {:?}", result);
    String::from_utf8_lossy(&output).into_owned()
}

/// The href for an autolink.
pub fn autolink_href(url: &str, kind: AutolinkKind) -> String {
    match kind {
        AutolinkKind::Email if !url.to_ascii_lowercase().starts_with("mailto:") => {
            format!("mailto:{}", url)
        }
        AutolinkKind::Www => format!("http://{}", url),
        _ => url.to_string(),
    }
}

/// HTML renderer for markast documents.
pub struct HtmlRenderer<W: Write> {
    /// Output writer
    writer: W,
    /// Output options
    config: HtmlConfig,
}

impl<W: Write> HtmlRenderer<W> {
    /// Create a new renderer.
    pub fn new(writer: W, config: HtmlConfig) -> Self {
        Self { writer, config }
    }

    /// Create a renderer with default options.
    pub fn with_defaults(writer: W) -> Self {
        Self::new(writer, HtmlConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, s: &str) -> io::Result<()> {
        self.writer.write_all(s.as_bytes())
    }

    /// Render any node. Inline nodes outside a block are written as is.
    pub fn render(&mut self, node: &Node) -> io::Result<()> {
        if node.is_block() {
            self.render_block(node)?;
        } else {
            self.render_inline(node)?;
        }
        self.writer.flush()
    }

    pub(crate) fn render_block(&mut self, node: &Node) -> io::Result<()> {
        match &node.kind {
            NodeKind::Document { children } => {
                for child in children {
                    self.render_block(child)?;
                }
                Ok(())
            }

            NodeKind::Paragraph { children } => {
                self.write("<p>")?;
                self.render_inlines(children)?;
                self.write("</p>\n")
            }

            NodeKind::Heading {
                level, children, ..
            } => {
                let level = (*level).clamp(1, 6);
                self.write(&format!("<h{}>", level))?;
                self.render_inlines(children)?;
                self.write(&format!("</h{}>\n", level))
            }

            NodeKind::BlockQuote { children } => {
                self.write("<blockquote>\n")?;
                for child in children {
                    self.render_block(child)?;
                }
                self.write("</blockquote>\n")
            }

            NodeKind::CodeBlock {
                content, language, ..
            } => self.render_code_block(content, language.as_deref()),

            NodeKind::ThematicBreak { .. } => self.write("<hr />\n"),

            NodeKind::List {
                ordered,
                start,
                tight,
                children,
                ..
            } => self.render_list(*ordered, *start, *tight, children),

            // An item outside a list renders as a one-item list
            NodeKind::ListItem { .. } | NodeKind::TaskListItem { .. } => {
                self.render_list(false, None, true, std::slice::from_ref(node))
            }

            NodeKind::Table { children, .. } => self.render_table(children),

            NodeKind::TableRow { .. } => self.render_table_row(node),

            NodeKind::TableCell { children, .. } => self.render_inlines(children),

            NodeKind::HtmlBlock(html) => {
                self.write(html)?;
                if !html.ends_with('\n') {
                    self.write("\n")?;
                }
                Ok(())
            }

            _ => self.render_inline(node),
        }
    }

    fn render_code_block(&mut self, content: &str, language: Option<&str>) -> io::Result<()> {
        let body = escape_code(content).into_owned();
        let newline = if content.is_empty() || content.ends_with('\n') {
            ""
        } else {
            "\n"
        };

        match language.filter(|l| !l.is_empty()) {
            Some(lang) if self.config.is_diagram(lang) => {
                let class = escape_attribute(&self.config.diagram_language).into_owned();
                self.write(&format!("<pre class=\"{}\">{}{}</pre>\n", class, body, newline))
            }
            Some(lang) => {
                let class = escape_attribute(&format!("{}{}", self.config.language_prefix, lang))
                    .into_owned();
                self.write(&format!(
                    "<pre><code class=\"{}\">{}{}</code></pre>\n",
                    class, body, newline
                ))
            }
            None => self.write(&format!("<pre><code>{}{}</code></pre>\n", body, newline)),
        }
    }

    pub(crate) fn render_inlines(&mut self, nodes: &[Node]) -> io::Result<()> {
        for node in nodes {
            self.render_inline(node)?;
        }
        Ok(())
    }

    fn render_inline(&mut self, node: &Node) -> io::Result<()> {
        match &node.kind {
            NodeKind::Text(text) => self.write(&escape_text(text)),

            NodeKind::Emphasis { children } => self.wrap("em", children),
            NodeKind::Strong { children } => self.wrap("strong", children),
            NodeKind::Strikethrough { children } => self.wrap("del", children),

            NodeKind::Link {
                url,
                title,
                children,
                ..
            } => {
                self.write(&format!("<a href=\"{}\"", escape_attribute(url)))?;
                if let Some(title) = title {
                    self.write(&format!(" title=\"{}\"", escape_attribute(title)))?;
                }
                self.write(">")?;
                self.render_inlines(children)?;
                self.write("</a>")
            }

            NodeKind::Image { url, alt, title } => {
                self.write(&format!(
                    "<img src=\"{}\" alt=\"{}\"",
                    escape_attribute(url),
                    escape_attribute(alt)
                ))?;
                if let Some(title) = title {
                    self.write(&format!(" title=\"{}\"", escape_attribute(title)))?;
                }
                self.write(" />")
            }

            NodeKind::CodeSpan(code) => {
                self.write(&format!("<code>{}</code>", escape_code(code)))
            }

            NodeKind::HtmlInline(html) => self.write(html),

            NodeKind::LineBreak { hard: true } => self.write("<br />\n"),

            NodeKind::LineBreak { hard: false } | NodeKind::SoftBreak => {
                let soft = self.config.soft_break.as_str();
                self.write(soft)
            }

            NodeKind::Autolink { url, kind } => {
                let href = autolink_href(url, *kind);
                self.write(&format!(
                    "<a href=\"{}\">{}</a>",
                    escape_attribute(&href),
                    escape_text(url)
                ))
            }

            _ => self.render_block(node),
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Node]) -> io::Result<()> {
        self.write(&format!("<{}>", tag))?;
        self.render_inlines(children)?;
        self.write(&format!("</{}>", tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markast_core::{Alignment, Fence};
    use markast_parser::{parse_to_ast, ParserOptions};
    use pretty_assertions::assert_eq;

    fn html(markdown: &str) -> String {
        let doc = parse_to_ast(markdown, &ParserOptions::default()).unwrap();
        render_html(&doc, &HtmlConfig::default())
    }

    fn doc(children: Vec<Node>) -> Node {
        Node::bare(NodeKind::Document { children })
    }

    fn para(children: Vec<Node>) -> Node {
        Node::bare(NodeKind::Paragraph { children })
    }

    fn render(node: &Node) -> String {
        render_html(node, &HtmlConfig::default())
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            html("# Title\n\nSome *em* and **strong** text."),
            "<h1>Title</h1>\n<p>Some <em>em</em> and <strong>strong</strong> text.</p>\n"
        );
    }

    #[test]
    fn test_tight_list() {
        assert_eq!(html("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[test]
    fn test_loose_list() {
        let list = Node::bare(NodeKind::List {
            ordered: true,
            start: Some(3),
            delimiter: Some('.'),
            bullet: None,
            tight: false,
            children: vec![Node::bare(NodeKind::ListItem {
                children: vec![para(vec![Node::text("a")])],
            })],
        });
        assert_eq!(
            render(&doc(vec![list])),
            "<ol start=\"3\">\n<li>\n<p>a</p>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_nested_tight_list() {
        let inner = Node::bare(NodeKind::List {
            ordered: false,
            start: None,
            delimiter: None,
            bullet: Some('-'),
            tight: true,
            children: vec![Node::bare(NodeKind::ListItem {
                children: vec![para(vec![Node::text("b")])],
            })],
        });
        let outer = Node::bare(NodeKind::List {
            ordered: false,
            start: None,
            delimiter: None,
            bullet: Some('-'),
            tight: true,
            children: vec![Node::bare(NodeKind::ListItem {
                children: vec![para(vec![Node::text("a")]), inner],
            })],
        });
        assert_eq!(
            render(&outer),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_task_items() {
        let list = Node::bare(NodeKind::List {
            ordered: false,
            start: None,
            delimiter: None,
            bullet: Some('-'),
            tight: true,
            children: vec![
                Node::bare(NodeKind::TaskListItem {
                    checked: true,
                    children: vec![para(vec![Node::text("done")])],
                }),
                Node::bare(NodeKind::TaskListItem {
                    checked: false,
                    children: vec![],
                }),
            ],
        });
        assert_eq!(
            render(&list),
            "<ul>\n\
             <li><input type=\"checkbox\" disabled=\"\" checked=\"\" /> done</li>\n\
             <li><input type=\"checkbox\" disabled=\"\" /> </li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_table_alignment() {
        let cell = |text: &str, alignment| {
            Node::bare(NodeKind::TableCell {
                alignment,
                children: vec![Node::text(text)],
            })
        };
        let table = Node::bare(NodeKind::Table {
            alignments: vec![Alignment::Left, Alignment::None],
            children: vec![
                Node::bare(NodeKind::TableRow {
                    header: true,
                    children: vec![cell("a", Alignment::Left), cell("b", Alignment::None)],
                }),
                Node::bare(NodeKind::TableRow {
                    header: false,
                    children: vec![cell("1", Alignment::Left), cell("2", Alignment::None)],
                }),
            ],
        });
        assert_eq!(
            render(&table),
            "<table>\n<thead>\n<tr>\n<th style=\"text-align: left\">a</th>\n<th>b</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td style=\"text-align: left\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_code_blocks() {
        let code = |language: Option<&str>| {
            Node::bare(NodeKind::CodeBlock {
                content: "a < b".into(),
                language: language.map(String::from),
                fenced: true,
                fence: Some(Fence {
                    character: '`',
                    length: 3,
                }),
            })
        };
        assert_eq!(
            render(&code(Some("rust"))),
            "<pre><code class=\"language-rust\">a &lt; b\n</code></pre>\n"
        );
        assert_eq!(render(&code(None)), "<pre><code>a &lt; b\n</code></pre>\n");
        assert_eq!(
            render(&code(Some("mermaid"))),
            "<pre class=\"mermaid\">a &lt; b\n</pre>\n"
        );

        let config = HtmlConfig {
            diagram_language: String::new(),
            language_prefix: "lang-".into(),
            ..HtmlConfig::default()
        };
        assert_eq!(
            render_html(&code(Some("mermaid")), &config),
            "<pre><code class=\"lang-mermaid\">a &lt; b\n</code></pre>\n"
        );
    }

    #[test]
    fn test_links_and_images() {
        let link = Node::bare(NodeKind::Link {
            url: "/a?b=1&c=2".into(),
            title: Some("T \"q\"".into()),
            reference: false,
            label: None,
            children: vec![Node::text("x")],
        });
        assert_eq!(
            render(&link),
            "<a href=\"/a?b=1&amp;c=2\" title=\"T &quot;q&quot;\">x</a>"
        );

        let image = Node::bare(NodeKind::Image {
            url: "/i.png".into(),
            alt: "pic".into(),
            title: None,
        });
        assert_eq!(render(&image), "<img src=\"/i.png\" alt=\"pic\" />");
    }

    #[test]
    fn test_autolink_hrefs() {
        assert_eq!(
            autolink_href("me@example.com", AutolinkKind::Email),
            "mailto:me@example.com"
        );
        assert_eq!(
            autolink_href("mailto:me@example.com", AutolinkKind::Email),
            "mailto:me@example.com"
        );
        assert_eq!(
            autolink_href("www.example.com", AutolinkKind::Www),
            "http://www.example.com"
        );
        assert_eq!(
            autolink_href("https://x.io", AutolinkKind::BareUrl),
            "https://x.io"
        );
    }

    #[test]
    fn test_soft_break_modes() {
        let node = para(vec![
            Node::text("a"),
            Node::bare(NodeKind::SoftBreak),
            Node::text("b"),
            Node::bare(NodeKind::LineBreak { hard: true }),
            Node::text("c"),
        ]);
        assert_eq!(render(&node), "<p>a\nb<br />\nc</p>\n");

        let config = HtmlConfig {
            soft_break: SoftBreak::Space,
            ..HtmlConfig::default()
        };
        assert_eq!(render_html(&node, &config), "<p>a b<br />\nc</p>\n");
    }

    #[test]
    fn test_entities_and_raw_html() {
        let node = doc(vec![
            Node::bare(NodeKind::HtmlBlock("<div>\nhi\n</div>".into())),
            para(vec![
                Node::text("&copy; & "),
                Node::bare(NodeKind::HtmlInline("<b>".into())),
                Node::bare(NodeKind::CodeSpan("&copy;".into())),
            ]),
        ]);
        assert_eq!(
            render(&node),
            "<div>\nhi\n</div>\n<p>&copy; &amp; <b><code>&amp;copy;</code></p>\n"
        );
    }

    #[test]
    fn test_escaped_ampersand_is_not_an_entity() {
        assert_eq!(html(r"\&copy;"), "<p>&amp;copy;</p>\n");
        assert_eq!(html("&copy;"), "<p>&copy;</p>\n");
    }

    #[test]
    fn test_block_quote_and_rule() {
        let node = doc(vec![
            Node::bare(NodeKind::BlockQuote {
                children: vec![para(vec![Node::text("q")])],
            }),
            Node::bare(NodeKind::ThematicBreak { marker: '-' }),
        ]);
        assert_eq!(render(&node), "<blockquote>\n<p>q</p>\n</blockquote>\n<hr />\n");
    }

    #[test]
    fn test_renderer_into_inner() {
        let mut renderer = HtmlRenderer::with_defaults(Vec::new());
        renderer.render(&Node::text("x")).unwrap();
        assert_eq!(renderer.into_inner(), b"x");
    }
}
