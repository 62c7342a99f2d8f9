//! List rendering.
//!
//! Items of a tight list render their paragraphs without `<p>` tags. Task
//! items get a disabled checkbox in front of their first paragraph.

use std::io::{self, Write};

use markast_core::{Node, NodeKind};

use crate::HtmlRenderer;

const CHECKBOX: &str = "<input type=\"checkbox\" disabled=\"\" /> ";
const CHECKBOX_CHECKED: &str = "<input type=\"checkbox\" disabled=\"\" checked=\"\" /> ";

/// Opening tag for a list. Ordered lists only carry `start` when it isn't 1.
pub fn list_open_tag(ordered: bool, start: Option<u64>) -> String {
    match (ordered, start) {
        (false, _) => "<ul>".to_string(),
        (true, Some(n)) if n != 1 => format!("<ol start=\"{}\">", n),
        (true, _) => "<ol>".to_string(),
    }
}

impl<W: Write> HtmlRenderer<W> {
    pub(crate) fn render_list(
        &mut self,
        ordered: bool,
        start: Option<u64>,
        tight: bool,
        items: &[Node],
    ) -> io::Result<()> {
        self.write(&list_open_tag(ordered, start))?;
        self.write("\n")?;
        for item in items {
            let checkbox = match item.kind {
                NodeKind::TaskListItem { checked: true, .. } => Some(CHECKBOX_CHECKED),
                NodeKind::TaskListItem { checked: false, .. } => Some(CHECKBOX),
                _ => None,
            };
            self.render_list_item(item.children(), tight, checkbox)?;
        }
        self.write(if ordered { "</ol>\n" } else { "</ul>\n" })
    }

    fn render_list_item(
        &mut self,
        children: &[Node],
        tight: bool,
        mut checkbox: Option<&str>,
    ) -> io::Result<()> {
        self.write("<li>")?;
        if !matches!(children.first().map(|c| &c.kind), Some(NodeKind::Paragraph { .. })) {
            if let Some(checkbox) = checkbox.take() {
                self.write(checkbox)?;
            }
        }

        // Whether the output currently sits right after inline content
        let mut inline_open = true;
        for child in children {
            match &child.kind {
                NodeKind::Paragraph { children: inlines } if tight => {
                    if let Some(checkbox) = checkbox.take() {
                        self.write(checkbox)?;
                    }
                    self.render_inlines(inlines)?;
                    inline_open = true;
                }
                NodeKind::Paragraph { children: inlines } => {
                    if inline_open {
                        self.write("\n")?;
                    }
                    self.write("<p>")?;
                    if let Some(checkbox) = checkbox.take() {
                        self.write(checkbox)?;
                    }
                    self.render_inlines(inlines)?;
                    self.write("</p>\n")?;
                    inline_open = false;
                }
                _ => {
                    if inline_open {
                        self.write("\n")?;
                    }
                    self.render_block(child)?;
                    inline_open = false;
                }
            }
        }
        self.write("</li>\n")
    }
}
