// SPDX-License-Identifier: AGPL-3.0-or-later
//! Inline run accumulation and XML escaping

/// Monospace font used for inline code and code block runs
pub(crate) const MONO_FONT: &str = "Consolas";

/// Escape the five XML-sensitive characters.
///
/// Applied exactly once per literal text payload before it is embedded in
/// a run; structural markup is never passed through here.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Accumulates inline runs for the paragraph currently being built.
///
/// Holds at most one pending paragraph-style prefix, which is always
/// emitted before any run. Bold/italic are tracked as nesting depths so a
/// text segment inside `Strong` inside `Emphasis` still renders as one
/// self-contained run carrying both formats.
#[derive(Debug, Default)]
pub struct RunBuffer {
    style: Option<String>,
    runs: Vec<String>,
    bold: u32,
    italic: u32,
    forced_bold: bool,
}

impl RunBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer for table cells whose runs must all render bold
    pub fn with_forced_bold() -> Self {
        Self {
            forced_bold: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Set the pending paragraph-style prefix for the next flush
    pub fn set_style(&mut self, prefix: impl Into<String>) {
        self.style = Some(prefix.into());
    }

    pub fn open_bold(&mut self) {
        self.bold += 1;
    }

    pub fn close_bold(&mut self) {
        self.bold = self.bold.saturating_sub(1);
    }

    pub fn open_italic(&mut self) {
        self.italic += 1;
    }

    pub fn close_italic(&mut self) {
        self.italic = self.italic.saturating_sub(1);
    }

    /// Append one escaped text run carrying the active formats
    pub fn push_text(&mut self, text: &str) {
        let props = self.run_props();
        self.runs.push(format!(
            "<w:r>{}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
            props,
            escape(text)
        ));
    }

    /// Append a single fully-formed monospace run for an inline code span
    pub fn push_code(&mut self, code: &str) {
        self.runs.push(format!(
            "<w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>\
             <w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"F2F2F2\"/></w:rPr>\
             <w:t xml:space=\"preserve\">{}</w:t></w:r>",
            escape(code),
            font = MONO_FONT,
        ));
    }

    /// Append an already-formed run fragment (line break markers and such)
    pub fn push_raw(&mut self, run: impl Into<String>) {
        self.runs.push(run.into());
    }

    /// Wrap the accumulated runs into one paragraph fragment and append it.
    ///
    /// An empty buffer emits nothing; the pending style prefix is dropped
    /// with it, so empty headings and paragraphs leave no trace.
    pub fn flush_into(&mut self, out: &mut Vec<String>) {
        let style = self.style.take();
        if self.runs.is_empty() {
            return;
        }
        let mut fragment = String::from("<w:p>");
        if let Some(prefix) = style {
            fragment.push_str(&prefix);
        }
        for run in self.runs.drain(..) {
            fragment.push_str(&run);
        }
        fragment.push_str("</w:p>");
        out.push(fragment);
    }

    /// Drain the accumulated runs without paragraph wrapping (table cells)
    pub fn take_runs(&mut self) -> Vec<String> {
        self.style = None;
        std::mem::take(&mut self.runs)
    }

    fn run_props(&self) -> String {
        let bold = self.forced_bold || self.bold > 0;
        let italic = self.italic > 0;
        if !bold && !italic {
            return String::new();
        }
        let mut props = String::from("<w:rPr>");
        if bold {
            props.push_str("<w:b/>");
        }
        if italic {
            props.push_str("<w:i/>");
        }
        props.push_str("</w:rPr>");
        props
    }
}
