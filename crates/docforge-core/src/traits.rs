// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types, configuration, and delegate traits at the converter boundary

use std::collections::HashMap;

/// Error type for parsing and conversion setup
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Failure reported by a diagram rendering delegate
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("No diagram renderer is configured")]
    Disabled,

    #[error("Diagram renderer failed: {0}")]
    RenderFailed(String),
}

/// Failure reported by an asset fetcher
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Remote sources are not supported: {0}")]
    RemoteNotSupported(String),

    #[error("Invalid data URI")]
    InvalidDataUri,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for parsing
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Format-specific options
    pub format_options: HashMap<String, String>,
}

/// Configuration for the WordprocessingML converter
#[derive(Debug, Clone)]
pub struct DocxConfig {
    /// Maximum inline image display width, in EMUs
    pub max_image_width_emu: u64,
    /// Raster size requested from the diagram renderer, in pixels
    pub diagram_size_px: (u32, u32),
}

impl Default for DocxConfig {
    fn default() -> Self {
        Self {
            // 6 inches at 914400 EMU per inch
            max_image_width_emu: 5_486_400,
            diagram_size_px: (960, 720),
        }
    }
}

/// Parser trait: convert source text to a markup node tree
pub trait Parser: Send + Sync {
    /// Parse a string into a document node
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<crate::ast::MarkupNode>;
}

/// Rasterizes diagram-notation source code into an image.
///
/// Invoked synchronously, one diagram at a time, in document order. A
/// failure never aborts the conversion; the walker degrades to a fallback
/// fragment instead.
pub trait DiagramRenderer: Send + Sync {
    /// Render `source` to raster bytes at the requested pixel size
    fn render(
        &self,
        source: &str,
        size_px: (u32, u32),
    ) -> std::result::Result<Vec<u8>, DiagramError>;
}

/// Resolves an image source locator to raw bytes.
///
/// Failures degrade to a bracketed text fallback in the output.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the bytes behind `locator`
    fn fetch(&self, locator: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Diagram renderer used when none is configured; always fails, which
/// routes every diagram block through the fallback path.
pub struct DisabledDiagramRenderer;

impl DiagramRenderer for DisabledDiagramRenderer {
    fn render(
        &self,
        _source: &str,
        _size_px: (u32, u32),
    ) -> std::result::Result<Vec<u8>, DiagramError> {
        Err(DiagramError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_renderer_always_fails() {
        let renderer = DisabledDiagramRenderer;
        assert!(matches!(
            renderer.render("graph TD; A-->B", (960, 720)),
            Err(DiagramError::Disabled)
        ));
    }

    #[test]
    fn test_default_docx_config() {
        let config = DocxConfig::default();
        assert_eq!(config.max_image_width_emu, 5_486_400);
        assert_eq!(config.diagram_size_px, (960, 720));
    }
}
