// SPDX-License-Identifier: AGPL-3.0-or-later
//! WordprocessingML converter
//!
//! Walks a markup node tree depth-first and emits an ordered sequence of
//! paragraph/table fragments plus the image assets referenced by them.
//! All mutable traversal state lives in a per-call [`ConvertState`], so a
//! converter can be shared and reused across calls.
//!
//! Per-node failures (diagram renderer, asset fetch) degrade into fallback
//! fragments; a conversion call always runs to completion.

pub mod image;
pub mod lists;
pub mod runs;
pub mod table;

pub use self::image::ImageAsset;
pub use self::runs::escape;

use self::image::ImageEmbedder;
use self::lists::{ItemMarker, ListStack, HANGING_INDENT};
use self::runs::{RunBuffer, MONO_FONT};
use crate::ast::MarkupNode;
use crate::media::FsAssetFetcher;
use crate::traits::{AssetFetcher, DiagramRenderer, DisabledDiagramRenderer, DocxConfig};
use tracing::warn;

/// Pixel size assumed for images whose dimensions cannot be decoded
const FALLBACK_IMAGE_SIZE: (u32, u32) = (640, 480);

/// Marker paragraph text emitted when diagram rendering fails
const DIAGRAM_FALLBACK_MARKER: &str = "[mermaid diagram]";

/// Output of one conversion call.
///
/// `fragments_xml` is spliced into the document body by the packaging
/// layer; each entry of `images` must be written as a container part with
/// its relationship and content type registered.
#[derive(Debug)]
pub struct ConversionResult {
    pub fragments_xml: String,
    pub images: Vec<ImageAsset>,
}

/// Mutable state scoped to a single `convert` call
struct ConvertState {
    runs: RunBuffer,
    lists: ListStack,
    fragments: Vec<String>,
    images: ImageEmbedder,
}

impl ConvertState {
    fn new(max_image_width_emu: u64) -> Self {
        Self {
            runs: RunBuffer::new(),
            lists: ListStack::new(),
            fragments: Vec::new(),
            images: ImageEmbedder::new(max_image_width_emu),
        }
    }

    fn flush(&mut self) {
        self.runs.flush_into(&mut self.fragments);
    }
}

/// Renders markup node trees to WordprocessingML fragments and assets
pub struct DocxConverter {
    config: DocxConfig,
    diagrams: Box<dyn DiagramRenderer>,
    assets: Box<dyn AssetFetcher>,
}

impl DocxConverter {
    /// Converter with no diagram renderer and a filesystem asset fetcher
    pub fn new() -> Self {
        Self {
            config: DocxConfig::default(),
            diagrams: Box::new(DisabledDiagramRenderer),
            assets: Box::new(FsAssetFetcher::default()),
        }
    }

    pub fn with_config(mut self, config: DocxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_diagram_renderer(mut self, renderer: Box<dyn DiagramRenderer>) -> Self {
        self.diagrams = renderer;
        self
    }

    pub fn with_asset_fetcher(mut self, fetcher: Box<dyn AssetFetcher>) -> Self {
        self.assets = fetcher;
        self
    }

    /// Convert one document tree.
    ///
    /// Fresh mutable state is created per call; relationship IDs restart
    /// at 1 and fragments are emitted in document order.
    pub fn convert(&self, root: &MarkupNode) -> ConversionResult {
        let mut state = ConvertState::new(self.config.max_image_width_emu);
        self.walk(root, &mut state);
        // A trailing paragraph without an explicit boundary still flushes
        state.flush();
        ConversionResult {
            fragments_xml: state.fragments.concat(),
            images: state.images.into_assets(),
        }
    }

    fn walk(&self, node: &MarkupNode, state: &mut ConvertState) {
        match node {
            MarkupNode::Document { children } => {
                for child in children {
                    self.walk(child, state);
                }
            }
            MarkupNode::Paragraph { children } => {
                for child in children {
                    self.walk(child, state);
                }
                state.flush();
            }
            MarkupNode::Heading { level, children } => {
                state.runs.set_style(heading_prefix(*level));
                for child in children {
                    self.walk(child, state);
                }
                state.flush();
            }
            MarkupNode::Text { content } => state.runs.push_text(content),
            MarkupNode::Emphasis { children } => {
                state.runs.open_italic();
                for child in children {
                    self.walk(child, state);
                }
                state.runs.close_italic();
            }
            MarkupNode::Strong { children } => {
                state.runs.open_bold();
                for child in children {
                    self.walk(child, state);
                }
                state.runs.close_bold();
            }
            MarkupNode::InlineCode { content } => state.runs.push_code(content),
            MarkupNode::CodeBlock { language, content } => {
                self.code_block(language.as_deref(), content, state);
            }
            MarkupNode::UnorderedList { children } => {
                state.lists.push(false);
                for child in children {
                    self.walk(child, state);
                }
                state.lists.pop();
            }
            MarkupNode::OrderedList { children } => {
                state.lists.push(true);
                for child in children {
                    self.walk(child, state);
                }
                state.lists.pop();
            }
            MarkupNode::ListItem { children } => {
                // An item outside any list context is a structural anomaly;
                // its content still renders, just unindented.
                if let Some(marker) = state.lists.enter_item() {
                    state.runs.set_style(item_prefix(&marker));
                    state.runs.push_text(&marker.text());
                }
                for child in children {
                    self.walk(child, state);
                }
                state.flush();
            }
            MarkupNode::BlockQuote { children } => {
                state.runs.set_style(quote_prefix());
                for child in children {
                    self.walk(child, state);
                }
                state.flush();
            }
            // Tables render their whole subtree in one pass
            MarkupNode::Table { children } => {
                state.flush();
                state.fragments.push(table::render_table(children));
            }
            MarkupNode::Image { source, alt } => {
                self.image_node(source.as_deref(), alt, state);
            }
            MarkupNode::SoftBreak => state.runs.push_text(" "),
            // A hard break forces a paragraph boundary in the output model
            MarkupNode::LineBreak => state.flush(),
            // Row groups outside a table, and unrecognized node types, are
            // skipped silently.
            _ => {}
        }
    }

    fn code_block(&self, language: Option<&str>, content: &str, state: &mut ConvertState) {
        state.flush();
        if is_diagram_language(language) {
            self.diagram_block(content, state);
            return;
        }
        for line in content.lines() {
            state.fragments.push(code_line_fragment(line));
        }
    }

    fn diagram_block(&self, source: &str, state: &mut ConvertState) {
        match self.diagrams.render(source, self.config.diagram_size_px) {
            Ok(bytes) => {
                let (width, height) = self.config.diagram_size_px;
                let fragment = state.images.embed(bytes, width, height, "diagram");
                state.fragments.push(fragment);
            }
            Err(err) => {
                warn!(error = %err, "diagram rendering failed, emitting source fallback");
                state.fragments.push(format!(
                    "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                    escape(DIAGRAM_FALLBACK_MARKER)
                ));
                for line in source.lines() {
                    state.fragments.push(code_line_fragment(line));
                }
            }
        }
    }

    fn image_node(&self, source: Option<&str>, alt: &str, state: &mut ConvertState) {
        let Some(src) = source.filter(|s| !s.is_empty()) else {
            state.runs.push_text(&format!("[{alt}]"));
            return;
        };
        match self.assets.fetch(src) {
            Ok(bytes) => {
                state.flush();
                let (width, height) = decode_dimensions(&bytes);
                let fragment = state.images.embed(bytes, width, height, alt);
                state.fragments.push(fragment);
            }
            Err(err) => {
                warn!(locator = src, error = %err, "image fetch failed, emitting placeholder");
                state.runs.push_text(&format!("[{alt} ({src})]"));
            }
        }
    }
}

impl Default for DocxConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// True when the code block's info string names a diagram notation
fn is_diagram_language(language: Option<&str>) -> bool {
    language.is_some_and(|l| l.trim().eq_ignore_ascii_case("mermaid"))
}

/// Pixel dimensions of an encoded image, with a fixed fallback when the
/// payload cannot be decoded.
fn decode_dimensions(bytes: &[u8]) -> (u32, u32) {
    use ::image::GenericImageView;
    match ::image::load_from_memory(bytes) {
        Ok(img) => img.dimensions(),
        Err(_) => FALLBACK_IMAGE_SIZE,
    }
}

fn heading_prefix(level: u8) -> String {
    // Out-of-range levels are clamped rather than silently remapped
    let level = level.clamp(1, 6);
    format!("<w:pPr><w:pStyle w:val=\"Heading{level}\"/></w:pPr>")
}

fn quote_prefix() -> String {
    "<w:pPr><w:pStyle w:val=\"Quote\"/><w:ind w:left=\"720\"/></w:pPr>".to_string()
}

fn item_prefix(marker: &ItemMarker) -> String {
    format!(
        "<w:pPr><w:pStyle w:val=\"ListParagraph\"/>\
         <w:ind w:left=\"{}\" w:hanging=\"{HANGING_INDENT}\"/></w:pPr>",
        marker.indent_twips,
    )
}

fn code_line_fragment(line: &str) -> String {
    format!(
        "<w:p><w:pPr><w:ind w:left=\"720\"/>\
         <w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"F2F2F2\"/></w:pPr>\
         <w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/></w:rPr>\
         <w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape(line),
        font = MONO_FONT,
    )
}
