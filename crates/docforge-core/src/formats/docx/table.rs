// SPDX-License-Identifier: AGPL-3.0-or-later
//! Table-to-grid translation
//!
//! A table node is rendered in one pass rather than walked generically:
//! row groups are flattened into an ordered grid with header rows first,
//! and each cell's inline content is collected into a throwaway run
//! accumulator so cell runs never interact with paragraph-level flushing
//! outside the table.

use super::runs::RunBuffer;
use crate::ast::MarkupNode;

/// Shading fill for header cells
const HEADER_FILL: &str = "D9D9D9";

/// Render one table node into a single grid-table fragment
pub fn render_table(children: &[MarkupNode]) -> String {
    let mut header_rows: Vec<&MarkupNode> = Vec::new();
    let mut body_rows: Vec<&MarkupNode> = Vec::new();

    // Header groups always precede body groups in the grid, whatever their
    // source order; order within each group is preserved.
    for group in children {
        match group {
            MarkupNode::TableHead { children } => {
                header_rows.extend(children.iter().filter(|c| is_row(c)));
            }
            MarkupNode::TableBody { children } => {
                body_rows.extend(children.iter().filter(|c| is_row(c)));
            }
            MarkupNode::TableRow { .. } => body_rows.push(group),
            _ => {}
        }
    }

    let mut table = String::from(
        "<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/>\
         <w:tblBorders>\
         <w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         </w:tblBorders></w:tblPr>",
    );
    for row in header_rows {
        table.push_str(&render_row(row, true));
    }
    for row in body_rows {
        table.push_str(&render_row(row, false));
    }
    table.push_str("</w:tbl>");
    table
}

fn is_row(node: &MarkupNode) -> bool {
    matches!(node, MarkupNode::TableRow { .. })
}

fn render_row(row: &MarkupNode, header: bool) -> String {
    let mut out = String::from("<w:tr>");
    for cell in row.children() {
        if let MarkupNode::TableCell { children } = cell {
            out.push_str(&render_cell(children, header));
        }
    }
    out.push_str("</w:tr>");
    out
}

fn render_cell(content: &[MarkupNode], header: bool) -> String {
    let mut buffer = if header {
        RunBuffer::with_forced_bold()
    } else {
        RunBuffer::new()
    };
    collect_inline(content, &mut buffer);

    let mut cell = String::from("<w:tc><w:tcPr>");
    if header {
        cell.push_str(&format!(
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{HEADER_FILL}\"/>"
        ));
    }
    cell.push_str("</w:tcPr><w:p>");
    for run in buffer.take_runs() {
        cell.push_str(&run);
    }
    cell.push_str("</w:p></w:tc>");
    cell
}

/// Recursive inline walk over cell content, mirroring the top-level run
/// builder but scoped to the local accumulator.
fn collect_inline(nodes: &[MarkupNode], buffer: &mut RunBuffer) {
    for node in nodes {
        match node {
            MarkupNode::Text { content } => buffer.push_text(content),
            MarkupNode::Emphasis { children } => {
                buffer.open_italic();
                collect_inline(children, buffer);
                buffer.close_italic();
            }
            MarkupNode::Strong { children } => {
                buffer.open_bold();
                collect_inline(children, buffer);
                buffer.close_bold();
            }
            MarkupNode::InlineCode { content } => buffer.push_code(content),
            MarkupNode::SoftBreak => buffer.push_text(" "),
            // No paragraph boundary exists inside a cell, so a hard break
            // becomes an explicit break run.
            MarkupNode::LineBreak => buffer.push_raw("<w:r><w:br/></w:r>"),
            // Cells occasionally carry a wrapping paragraph; unwrap it
            MarkupNode::Paragraph { children } => collect_inline(children, buffer),
            _ => {}
        }
    }
}
