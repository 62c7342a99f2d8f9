//! The markdown abstract syntax tree.
//!
//! Both parsers build these nodes bottom-up. A finished tree is never mutated:
//! containers own their children by value and there are no back references,
//! so any renderer can walk it with a plain recursive `match`.

use serde::{Deserialize, Serialize};

use crate::types::SourceLocation;

/// Column alignment of a GFM table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// No colon in the separator cell
    #[default]
    None,
    /// `:---`
    Left,
    /// `:---:`
    Center,
    /// `---:`
    Right,
}

impl Alignment {
    /// CSS `text-align` value, if any.
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// How an autolink was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutolinkKind {
    /// `foo@example.com` or `<foo@example.com>`
    Email,
    /// `<scheme:...>`
    Protocol,
    /// `www.example.com`
    Www,
    /// `https://example.com` without angle brackets
    BareUrl,
}

/// The literal opening fence of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fence {
    /// '`' or '~'
    pub character: char,
    /// Number of fence characters (at least 3)
    pub length: usize,
}

/// A node with an optional source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

/// Every node shape the parsers produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    // === Blocks ===
    Document {
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Heading {
        level: u8,
        setext: bool,
        children: Vec<Node>,
    },
    BlockQuote {
        children: Vec<Node>,
    },
    CodeBlock {
        content: String,
        language: Option<String>,
        fenced: bool,
        fence: Option<Fence>,
    },
    ThematicBreak {
        marker: char,
    },
    List {
        ordered: bool,
        start: Option<u64>,
        delimiter: Option<char>,
        bullet: Option<char>,
        tight: bool,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    TaskListItem {
        checked: bool,
        children: Vec<Node>,
    },
    Table {
        alignments: Vec<Alignment>,
        children: Vec<Node>,
    },
    TableRow {
        header: bool,
        children: Vec<Node>,
    },
    TableCell {
        alignment: Alignment,
        children: Vec<Node>,
    },
    HtmlBlock(String),

    // === Inlines ===
    Text(String),
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Strikethrough {
        children: Vec<Node>,
    },
    Link {
        url: String,
        title: Option<String>,
        reference: bool,
        label: Option<String>,
        children: Vec<Node>,
    },
    Image {
        url: String,
        alt: String,
        title: Option<String>,
    },
    CodeSpan(String),
    HtmlInline(String),
    LineBreak {
        hard: bool,
    },
    SoftBreak,
    Autolink {
        url: String,
        kind: AutolinkKind,
    },
}

impl Node {
    /// Create a node.
    pub fn new(kind: NodeKind, location: Option<SourceLocation>) -> Self {
        Self { kind, location }
    }

    /// Create a node without location.
    pub fn bare(kind: NodeKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Plain text node without location.
    pub fn text(value: impl Into<String>) -> Self {
        Self::bare(NodeKind::Text(value.into()))
    }

    /// Child nodes of a container, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Document { children }
            | NodeKind::Paragraph { children }
            | NodeKind::Heading { children, .. }
            | NodeKind::BlockQuote { children }
            | NodeKind::List { children, .. }
            | NodeKind::ListItem { children }
            | NodeKind::TaskListItem { children, .. }
            | NodeKind::Table { children, .. }
            | NodeKind::TableRow { children, .. }
            | NodeKind::TableCell { children, .. }
            | NodeKind::Emphasis { children }
            | NodeKind::Strong { children }
            | NodeKind::Strikethrough { children }
            | NodeKind::Link { children, .. } => children,
            NodeKind::CodeBlock { .. }
            | NodeKind::ThematicBreak { .. }
            | NodeKind::HtmlBlock(_)
            | NodeKind::Text(_)
            | NodeKind::Image { .. }
            | NodeKind::CodeSpan(_)
            | NodeKind::HtmlInline(_)
            | NodeKind::LineBreak { .. }
            | NodeKind::SoftBreak
            | NodeKind::Autolink { .. } => &[],
        }
    }

    /// Whether this node is a block-level node.
    pub fn is_block(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document { .. }
                | NodeKind::Paragraph { .. }
                | NodeKind::Heading { .. }
                | NodeKind::BlockQuote { .. }
                | NodeKind::CodeBlock { .. }
                | NodeKind::ThematicBreak { .. }
                | NodeKind::List { .. }
                | NodeKind::ListItem { .. }
                | NodeKind::TaskListItem { .. }
                | NodeKind::Table { .. }
                | NodeKind::TableRow { .. }
                | NodeKind::TableCell { .. }
                | NodeKind::HtmlBlock(_)
        )
    }

    pub fn is_inline(&self) -> bool {
        !self.is_block()
    }

    /// Concatenated plain text of this subtree.
    ///
    /// Used for image alt text and heading anchors; breaks become spaces.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(s) | NodeKind::CodeSpan(s) => out.push_str(s),
            NodeKind::Image { alt, .. } => out.push_str(alt),
            NodeKind::Autolink { url, .. } => out.push_str(url),
            NodeKind::LineBreak { .. } | NodeKind::SoftBreak => out.push(' '),
            NodeKind::CodeBlock { content, .. } => out.push_str(content),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(children: Vec<Node>) -> Node {
        Node::bare(NodeKind::Paragraph { children })
    }

    #[test]
    fn test_children_of_leaf_is_empty() {
        assert!(Node::text("x").children().is_empty());
        assert!(Node::bare(NodeKind::SoftBreak).children().is_empty());
    }

    #[test]
    fn test_plain_text_flattens() {
        let node = para(vec![
            Node::text("a "),
            Node::bare(NodeKind::Emphasis {
                children: vec![Node::text("b")],
            }),
            Node::bare(NodeKind::SoftBreak),
            Node::bare(NodeKind::CodeSpan("c".to_string())),
        ]);
        assert_eq!(node.plain_text(), "a b c");
    }

    #[test]
    fn test_is_block_is_inline() {
        assert!(para(vec![]).is_block());
        assert!(Node::text("x").is_inline());
        assert!(Node::bare(NodeKind::LineBreak { hard: true }).is_inline());
    }

    #[test]
    fn test_node_count() {
        let node = para(vec![Node::text("a"), Node::text("b")]);
        assert_eq!(node.node_count(), 3);
    }

    #[test]
    fn test_alignment_css() {
        assert_eq!(Alignment::Center.as_css(), Some("center"));
        assert_eq!(Alignment::None.as_css(), None);
    }

    #[test]
    fn test_serialize_skips_missing_location() {
        let json = serde_json::to_string(&Node::text("hi")).unwrap();
        assert_eq!(json, r#"{"kind":{"Text":"hi"}}"#);
    }
}
