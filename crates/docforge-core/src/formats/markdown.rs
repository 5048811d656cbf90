// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown format handler using comrak (GFM-compatible)

use crate::ast::MarkupNode;
use crate::traits::{ParseConfig, Parser, Result};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

/// Markdown parser producing a markup node tree
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    fn comrak_options() -> Options<'static> {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn parse(&self, input: &str, _config: &ParseConfig) -> Result<MarkupNode> {
        let arena = Arena::new();
        let options = Self::comrak_options();
        let root = parse_document(&arena, input, &options);

        Ok(MarkupNode::Document {
            children: convert_children(root),
        })
    }
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<MarkupNode> {
    node.children().flat_map(convert_node).collect()
}

/// Convert one comrak node.
///
/// Returns a Vec because some source constructs have no counterpart in the
/// target tree and are spliced into their converted children instead
/// (links, strikethrough); unsupported nodes convert to nothing.
fn convert_node<'a>(node: &'a AstNode<'a>) -> Vec<MarkupNode> {
    let data = node.data.borrow();

    let converted = match &data.value {
        NodeValue::Paragraph => MarkupNode::Paragraph {
            children: convert_children(node),
        },

        NodeValue::Heading(heading) => MarkupNode::Heading {
            level: heading.level,
            children: convert_children(node),
        },

        NodeValue::Text(text) => MarkupNode::text(text.clone()),

        NodeValue::Emph => MarkupNode::Emphasis {
            children: convert_children(node),
        },

        NodeValue::Strong => MarkupNode::Strong {
            children: convert_children(node),
        },

        NodeValue::Code(code) => MarkupNode::InlineCode {
            content: code.literal.clone(),
        },

        NodeValue::CodeBlock(code) => MarkupNode::CodeBlock {
            language: if code.info.is_empty() {
                None
            } else {
                Some(code.info.clone())
            },
            content: code.literal.clone(),
        },

        NodeValue::List(list) => {
            let children = convert_children(node);
            if list.list_type == comrak::nodes::ListType::Ordered {
                MarkupNode::OrderedList { children }
            } else {
                MarkupNode::UnorderedList { children }
            }
        }

        NodeValue::Item(_) => MarkupNode::ListItem {
            children: convert_children(node),
        },

        NodeValue::BlockQuote => MarkupNode::BlockQuote {
            children: convert_children(node),
        },

        NodeValue::Table(_) => convert_table(node),

        NodeValue::Image(link) => MarkupNode::Image {
            source: if link.url.is_empty() {
                None
            } else {
                Some(link.url.clone())
            },
            alt: gather_text(node),
        },

        // Link targets are dropped; the link text flows through inline
        NodeValue::Link(_) => return convert_children(node),

        NodeValue::Strikethrough => return convert_children(node),

        NodeValue::SoftBreak => MarkupNode::SoftBreak,

        NodeValue::LineBreak => MarkupNode::LineBreak,

        // Rows and cells are handled by convert_table
        _ => return Vec::new(),
    };

    vec![converted]
}

/// Group a comrak table's rows into head and body row groups
fn convert_table<'a>(node: &'a AstNode<'a>) -> MarkupNode {
    let mut header_rows = Vec::new();
    let mut body_rows = Vec::new();

    for child in node.children() {
        if let NodeValue::TableRow(is_header) = child.data.borrow().value {
            let cells: Vec<MarkupNode> = child
                .children()
                .map(|cell| MarkupNode::TableCell {
                    children: convert_children(cell),
                })
                .collect();
            let row = MarkupNode::TableRow { children: cells };
            if is_header {
                header_rows.push(row);
            } else {
                body_rows.push(row);
            }
        }
    }

    let mut groups = Vec::new();
    if !header_rows.is_empty() {
        groups.push(MarkupNode::TableHead {
            children: header_rows,
        });
    }
    if !body_rows.is_empty() {
        groups.push(MarkupNode::TableBody {
            children: body_rows,
        });
    }
    MarkupNode::Table { children: groups }
}

/// Concatenated text of a subtree, used for image alt text
fn gather_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.children() {
        if let NodeValue::Text(text) = &child.data.borrow().value {
            out.push_str(text);
        } else {
            out.push_str(&gather_text(child));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<MarkupNode> {
        let parser = MarkdownParser::new();
        let doc = parser.parse(input, &ParseConfig::default()).unwrap();
        match doc {
            MarkupNode::Document { children } => children,
            other => panic!("expected document root, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_heading() {
        let blocks = parse("## Section Title");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            MarkupNode::Heading { level, children } => {
                assert_eq!(*level, 2);
                assert_eq!(children, &[MarkupNode::text("Section Title")]);
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_emphasis() {
        let blocks = parse("plain *italic **both***");
        let MarkupNode::Paragraph { children } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(children[0], MarkupNode::text("plain "));
        let MarkupNode::Emphasis { children: inner } = &children[1] else {
            panic!("expected emphasis");
        };
        assert!(inner
            .iter()
            .any(|n| matches!(n, MarkupNode::Strong { .. })));
    }

    #[test]
    fn test_parse_fenced_code_block() {
        let blocks = parse("```rust\nfn main() {}\n```");
        match &blocks[0] {
            MarkupNode::CodeBlock { language, content } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert_eq!(content, "fn main() {}\n");
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_table_groups_rows() {
        let blocks = parse("| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |");
        let MarkupNode::Table { children } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(children.len(), 2);
        let MarkupNode::TableHead { children: head } = &children[0] else {
            panic!("expected head group first");
        };
        assert_eq!(head.len(), 1);
        let MarkupNode::TableBody { children: body } = &children[1] else {
            panic!("expected body group second");
        };
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn test_parse_image_alt_and_source() {
        let blocks = parse("![a *styled* caption](pic.png)");
        let MarkupNode::Paragraph { children } = &blocks[0] else {
            panic!("expected paragraph");
        };
        match &children[0] {
            MarkupNode::Image { source, alt } => {
                assert_eq!(source.as_deref(), Some("pic.png"));
                assert_eq!(alt, "a styled caption");
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_image_with_empty_url() {
        let blocks = parse("![alone]()");
        let MarkupNode::Paragraph { children } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(
            &children[0],
            MarkupNode::Image { source: None, .. }
        ));
    }

    #[test]
    fn test_parse_nested_lists() {
        let blocks = parse("1. outer\n   1. inner\n2. next");
        let MarkupNode::OrderedList { children: items } = &blocks[0] else {
            panic!("expected ordered list");
        };
        assert_eq!(items.len(), 2);
        let MarkupNode::ListItem { children } = &items[0] else {
            panic!("expected list item");
        };
        assert!(children
            .iter()
            .any(|n| matches!(n, MarkupNode::OrderedList { .. })));
    }

    #[test]
    fn test_link_text_is_spliced_inline() {
        let blocks = parse("see [the docs](https://example.com) here");
        let MarkupNode::Paragraph { children } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(children.contains(&MarkupNode::text("the docs")));
        assert!(!children
            .iter()
            .any(|n| matches!(n, MarkupNode::Image { .. })));
    }

    #[test]
    fn test_hard_break() {
        let blocks = parse("first  \nsecond");
        let MarkupNode::Paragraph { children } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(children.contains(&MarkupNode::LineBreak));
    }
}
