//! Table rendering.
//!
//! The first row of a table is its header. Column alignments become inline
//! `style` attributes on every cell of the column.

use std::io::{self, Write};

use markast_core::{Alignment, Node, NodeKind};

use crate::HtmlRenderer;

/// Opening tag for a table cell.
pub fn cell_open_tag(header: bool, alignment: Alignment) -> String {
    let tag = if header { "th" } else { "td" };
    match alignment.as_css() {
        Some(align) => format!("<{} style=\"text-align: {}\">", tag, align),
        None => format!("<{}>", tag),
    }
}

fn is_header(row: &Node) -> bool {
    matches!(row.kind, NodeKind::TableRow { header: true, .. })
}

impl<W: Write> HtmlRenderer<W> {
    pub(crate) fn render_table(&mut self, rows: &[Node]) -> io::Result<()> {
        let split = rows.iter().take_while(|row| is_header(row)).count();
        let (head, body) = rows.split_at(split);

        self.write("<table>\n")?;
        if !head.is_empty() {
            self.write("<thead>\n")?;
            for row in head {
                self.render_table_row(row)?;
            }
            self.write("</thead>\n")?;
        }
        if !body.is_empty() {
            self.write("<tbody>\n")?;
            for row in body {
                self.render_table_row(row)?;
            }
            self.write("</tbody>\n")?;
        }
        self.write("</table>\n")
    }

    pub(crate) fn render_table_row(&mut self, row: &Node) -> io::Result<()> {
        let header = is_header(row);
        self.write("<tr>\n")?;
        for cell in row.children() {
            let alignment = match cell.kind {
                NodeKind::TableCell { alignment, .. } => alignment,
                _ => Alignment::None,
            };
            self.write(&cell_open_tag(header, alignment))?;
            self.render_inlines(cell.children())?;
            self.write(if header { "</th>\n" } else { "</td>\n" })?;
        }
        self.write("</tr>\n")
    }
}
