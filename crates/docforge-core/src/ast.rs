// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markup node tree consumed by the converters
//!
//! The tree is produced by an external parser (see `formats::markdown`) and
//! is read-only for the duration of one conversion call. Variants the
//! converters do not recognize are skipped, so the enum is non-exhaustive
//! to leave room for forward-compatible additions.

use serde::{Deserialize, Serialize};

/// A node in the parsed lightweight-markup document tree.
///
/// Block and inline elements share one enum so the converters can run a
/// single recursive walk keyed off the variant tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum MarkupNode {
    /// Root of the document
    Document { children: Vec<MarkupNode> },

    /// Plain paragraph
    Paragraph { children: Vec<MarkupNode> },

    /// Heading; levels outside 1-6 are clamped by the renderers
    Heading { level: u8, children: Vec<MarkupNode> },

    /// Literal text span
    Text { content: String },

    /// Emphasis (italic)
    Emphasis { children: Vec<MarkupNode> },

    /// Strong emphasis (bold)
    Strong { children: Vec<MarkupNode> },

    /// Inline code span
    InlineCode { content: String },

    /// Fenced or indented code block with optional info string
    CodeBlock {
        language: Option<String>,
        content: String,
    },

    /// Bullet list
    UnorderedList { children: Vec<MarkupNode> },

    /// Numbered list
    OrderedList { children: Vec<MarkupNode> },

    /// One item of either list kind
    ListItem { children: Vec<MarkupNode> },

    /// Block quote (may nest blocks)
    BlockQuote { children: Vec<MarkupNode> },

    /// Table; children are `TableHead` / `TableBody` groups
    Table { children: Vec<MarkupNode> },

    /// Header row group of a table
    TableHead { children: Vec<MarkupNode> },

    /// Body row group of a table
    TableBody { children: Vec<MarkupNode> },

    /// One table row
    TableRow { children: Vec<MarkupNode> },

    /// One table cell; children are inline nodes
    TableCell { children: Vec<MarkupNode> },

    /// Image reference with alt text; `source` may be absent
    Image {
        source: Option<String>,
        alt: String,
    },

    /// Soft line break (renders as a space)
    SoftBreak,

    /// Hard line break
    LineBreak,
}

impl MarkupNode {
    /// Convenience constructor for a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Convenience constructor for a paragraph of inline nodes
    pub fn paragraph(children: Vec<MarkupNode>) -> Self {
        Self::Paragraph { children }
    }

    /// Child nodes of a composite variant, empty for leaves
    pub fn children(&self) -> &[MarkupNode] {
        match self {
            Self::Document { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::UnorderedList { children }
            | Self::OrderedList { children }
            | Self::ListItem { children }
            | Self::BlockQuote { children }
            | Self::Table { children }
            | Self::TableHead { children }
            | Self::TableBody { children }
            | Self::TableRow { children }
            | Self::TableCell { children } => children,
            _ => &[],
        }
    }

    /// Count words in the subtree
    pub fn word_count(&self) -> usize {
        match self {
            Self::Text { content } => content.split_whitespace().count(),
            Self::InlineCode { content } | Self::CodeBlock { content, .. } => {
                content.split_whitespace().count()
            }
            Self::Image { alt, .. } => alt.split_whitespace().count(),
            _ => self.children().iter().map(|c| c.word_count()).sum(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn simple_text_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ]{0,60}".prop_map(|s| s.trim().to_string())
    }

    fn inline_strategy() -> impl Strategy<Value = MarkupNode> {
        prop_oneof![
            simple_text_strategy().prop_map(MarkupNode::text),
            Just(MarkupNode::SoftBreak),
            Just(MarkupNode::LineBreak),
            simple_text_strategy().prop_map(|content| MarkupNode::InlineCode { content }),
        ]
    }

    fn block_strategy() -> impl Strategy<Value = MarkupNode> {
        prop_oneof![
            prop::collection::vec(inline_strategy(), 0..5).prop_map(MarkupNode::paragraph),
            (1u8..=6, prop::collection::vec(inline_strategy(), 1..4))
                .prop_map(|(level, children)| MarkupNode::Heading { level, children }),
            (proptest::option::of("[a-z]+"), simple_text_strategy())
                .prop_map(|(language, content)| MarkupNode::CodeBlock { language, content }),
        ]
    }

    proptest! {
        #[test]
        fn prop_word_count_nonzero_only_with_content(text in simple_text_strategy()) {
            let node = MarkupNode::text(text.clone());
            prop_assert_eq!(node.word_count(), text.split_whitespace().count());
        }

        #[test]
        fn prop_serde_roundtrip(children in prop::collection::vec(block_strategy(), 0..8)) {
            let doc = MarkupNode::Document { children };
            let json = serde_json::to_string(&doc).expect("serialize");
            let back: MarkupNode = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(doc, back);
        }

        #[test]
        fn prop_document_word_count_is_sum(children in prop::collection::vec(block_strategy(), 0..8)) {
            let expected: usize = children.iter().map(|c| c.word_count()).sum();
            let doc = MarkupNode::Document { children };
            prop_assert_eq!(doc.word_count(), expected);
        }
    }
}
