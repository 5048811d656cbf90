// SPDX-License-Identifier: AGPL-3.0-or-later
//! Image embedding: unit conversion, scaling, identifiers, content types
//!
//! Pixel dimensions are converted at 96 px per inch into EMUs (914400 per
//! inch, so 9525 per pixel). Widths beyond the configured maximum are
//! scaled down uniformly; images are never upscaled.

use super::runs::escape;

/// EMUs per pixel at the 96 dpi reference resolution
pub(crate) const EMU_PER_PIXEL: u64 = 9525;

/// One binary image asset for the packaging layer to bundle.
///
/// The converter only records the asset; writing the bytes into the
/// container and registering `rel_id` and `content_type` in the manifests
/// is the packager's job.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub width_emu: u64,
    pub height_emu: u64,
    pub rel_id: String,
    pub content_type: &'static str,
}

/// Assigns relationship IDs and records assets for one conversion call
#[derive(Debug)]
pub struct ImageEmbedder {
    max_width_emu: u64,
    next_seq: u32,
    assets: Vec<ImageAsset>,
}

impl ImageEmbedder {
    pub fn new(max_width_emu: u64) -> Self {
        Self {
            max_width_emu,
            next_seq: 1,
            assets: Vec::new(),
        }
    }

    /// Record one image asset and return its centered paragraph fragment.
    ///
    /// The fragment bypasses the run buffer: an image paragraph has no
    /// accumulating inline runs.
    pub fn embed(&mut self, bytes: Vec<u8>, px_width: u32, px_height: u32, alt: &str) -> String {
        let (width_emu, height_emu) = self.scaled_emu(px_width, px_height);
        let seq = self.next_seq;
        self.next_seq += 1;

        let rel_id = format!("rIdImg{seq}");
        let content_type = sniff_content_type(&bytes);
        let extension = if content_type == "image/jpeg" {
            "jpg"
        } else {
            "png"
        };
        let filename = format!("image{seq}.{extension}");

        let fragment = drawing_fragment(seq, &rel_id, &filename, alt, width_emu, height_emu);
        self.assets.push(ImageAsset {
            bytes,
            filename,
            width_emu,
            height_emu,
            rel_id,
            content_type,
        });
        fragment
    }

    /// Assets recorded so far, in first-encounter order
    pub fn into_assets(self) -> Vec<ImageAsset> {
        self.assets
    }

    fn scaled_emu(&self, px_width: u32, px_height: u32) -> (u64, u64) {
        let width = u64::from(px_width.max(1)) * EMU_PER_PIXEL;
        let height = u64::from(px_height.max(1)) * EMU_PER_PIXEL;
        if width <= self.max_width_emu {
            return (width, height);
        }
        // Uniform downscale, aspect ratio preserved to integer rounding
        let scaled_height = height * self.max_width_emu / width;
        (self.max_width_emu, scaled_height)
    }
}

/// Best-effort content-type sniff from the first payload byte.
///
/// PNG streams start with 0x89, JPEG with 0xFF; anything unrecognized is
/// treated as PNG.
pub(crate) fn sniff_content_type(bytes: &[u8]) -> &'static str {
    match bytes.first() {
        Some(0xFF) => "image/jpeg",
        _ => "image/png",
    }
}

fn drawing_fragment(
    seq: u32,
    rel_id: &str,
    filename: &str,
    alt: &str,
    width_emu: u64,
    height_emu: u64,
) -> String {
    format!(
        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r><w:drawing>\
         <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\" \
         xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\">\
         <wp:extent cx=\"{width_emu}\" cy=\"{height_emu}\"/>\
         <wp:docPr id=\"{seq}\" name=\"{filename}\" descr=\"{alt}\"/>\
         <a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
         <a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:pic xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:nvPicPr><pic:cNvPr id=\"{seq}\" name=\"{filename}\"/><pic:cNvPicPr/></pic:nvPicPr>\
         <pic:blipFill><a:blip r:embed=\"{rel_id}\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\"/>\
         <a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
         <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{width_emu}\" cy=\"{height_emu}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
         </pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>",
        alt = escape(alt),
    )
}
