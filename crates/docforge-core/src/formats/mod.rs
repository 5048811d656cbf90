// SPDX-License-Identifier: AGPL-3.0-or-later
//! Format handlers: source parsers and the WordprocessingML converter

pub mod docx;

#[cfg(feature = "markdown")]
pub mod markdown;

pub use docx::{ConversionResult, DocxConverter, ImageAsset};

#[cfg(feature = "markdown")]
pub use markdown::MarkdownParser;

#[cfg(all(test, feature = "markdown"))]
mod tests {
    use super::*;
    use crate::traits::{ParseConfig, Parser};

    #[test]
    fn test_markdown_to_wordprocessingml_end_to_end() {
        let source = "\
# Report

Intro with **bold** and `code`.

- first
- second

| Name | Value |
|------|-------|
| a    | 1     |

```mermaid
graph TD; A-->B
```
";
        let tree = MarkdownParser::new()
            .parse(source, &ParseConfig::default())
            .unwrap();
        let result = DocxConverter::new().convert(&tree);

        let xml = &result.fragments_xml;
        assert!(xml.contains("Heading1"));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains("ListParagraph"));
        assert!(xml.contains("<w:tbl>"));
        // Header cell of the table is shaded and bold
        assert!(xml.contains("w:fill=\"D9D9D9\""));
        // No renderer configured, so the diagram degrades to its source
        assert!(xml.contains("[mermaid diagram]"));
        assert!(xml.contains("graph TD; A--&gt;B"));
        assert!(result.images.is_empty());

        // Block order is preserved
        let heading = xml.find("Report").unwrap();
        let table = xml.find("<w:tbl>").unwrap();
        let diagram = xml.find("[mermaid diagram]").unwrap();
        assert!(heading < table && table < diagram);
    }
}
