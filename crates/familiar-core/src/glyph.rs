//! Glyph markup (`{2}{G}{G}`) expansion.

/// One piece of formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Symbol name without braces, e.g. `G` or `2/W`.
    Glyph(String),
}

/// Text with inline glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub segments: Vec<Segment>,
}

impl RichText {
    pub fn plain_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment::Text(text)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten back to markup.
    pub fn plain(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Glyph(g) => {
                    out.push('{');
                    out.push_str(g);
                    out.push('}');
                }
            }
        }
        out
    }
}

/// Turns glyph markup into rich text. Implementations must be pure.
pub trait GlyphFormatter: Send + Sync {
    fn format_with_glyphs(&self, markup: &str) -> RichText;
}

/// Treats every `{...}` token as a glyph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceGlyphs;

impl GlyphFormatter for BraceGlyphs {
    fn format_with_glyphs(&self, markup: &str) -> RichText {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = markup;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            text.push_str(&rest[..open]);
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Glyph(rest[open + 1..open + close].to_string()));
            rest = &rest[open + close + 1..];
        }
        // Unterminated braces stay as text.
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        RichText { segments }
    }
}
