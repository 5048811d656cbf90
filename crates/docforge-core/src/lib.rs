// SPDX-License-Identifier: AGPL-3.0-or-later
//! Docforge Core - markup node trees rendered to WordprocessingML
//!
//! This crate provides:
//! - A markup node tree that source formats parse into
//! - A converter from that tree to WordprocessingML body fragments plus
//!   the image assets they reference
//! - Delegate traits for diagram rendering and asset fetching
//! - A Markdown parser (behind the `markdown` feature)

pub mod ast;
pub mod formats;
pub mod media;
pub mod traits;

pub use ast::MarkupNode;
pub use formats::{ConversionResult, DocxConverter, ImageAsset};
pub use media::FsAssetFetcher;
pub use traits::{
    AssetFetcher, ConversionError, DiagramError, DiagramRenderer, DocxConfig, FetchError,
    ParseConfig, Parser, Result,
};
