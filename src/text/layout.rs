use std::collections::BTreeMap;

use crate::foundation::error::{FoldError, FoldResult};

/// Placement of one character of a measured message.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphRecord {
    pub ch: char,
    /// Offset from the start of the line, in pixels.
    pub x: f64,
    /// Baseline offset from the top of the text block, in pixels.
    pub y: f64,
    pub advance: f64,
    pub line: usize,
}

/// Measured placement of every character of one message, whitespace included.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphLayout {
    pub glyphs: Vec<GlyphRecord>,
    pub line_count: usize,
    pub width: f64,
    pub height: f64,
}

impl GlyphLayout {
    /// The string this layout was measured from, rebuilt from its records.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    /// Whether this layout belongs to `message`. A layout measured for any other string is stale.
    pub fn matches(&self, message: &str) -> bool {
        self.glyphs.len() == message.chars().count()
            && self.glyphs.iter().map(|g| g.ch).eq(message.chars())
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Off-screen measurement pass producing a [`GlyphLayout`].
pub trait TextMeasurer {
    fn measure(&mut self, message: &str) -> FoldResult<GlyphLayout>;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Box<M> {
    fn measure(&mut self, message: &str) -> FoldResult<GlyphLayout> {
        (**self).measure(message)
    }
}

/// Monospace measurer with greedy word wrapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    pub advance: f64,
    pub line_height: f64,
    pub max_width: Option<f64>,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance: f64, line_height: f64, max_width: Option<f64>) -> FoldResult<Self> {
        if !advance.is_finite() || advance <= 0.0 {
            return Err(FoldError::validation("glyph advance must be finite and > 0"));
        }
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(FoldError::validation("line height must be finite and > 0"));
        }
        if max_width.is_some_and(|w| !w.is_finite() || w <= 0.0) {
            return Err(FoldError::validation("max width must be finite and > 0"));
        }
        Ok(Self {
            advance,
            line_height,
            max_width,
        })
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&mut self, message: &str) -> FoldResult<GlyphLayout> {
        let chars: Vec<char> = message.chars().collect();
        let mut glyphs = Vec::with_capacity(chars.len());
        let mut x = 0.0;
        let mut line = 0usize;
        let mut width = 0.0f64;
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let y = (line as f64 + 1.0) * self.line_height;
            if ch == '\n' {
                glyphs.push(GlyphRecord {
                    ch,
                    x,
                    y,
                    advance: 0.0,
                    line,
                });
                line += 1;
                x = 0.0;
                i += 1;
                continue;
            }
            if ch.is_whitespace() {
                glyphs.push(GlyphRecord {
                    ch,
                    x,
                    y,
                    advance: self.advance,
                    line,
                });
                x += self.advance;
                i += 1;
                continue;
            }

            let end = chars[i..]
                .iter()
                .position(|c| c.is_whitespace())
                .map_or(chars.len(), |p| i + p);
            let word_w = (end - i) as f64 * self.advance;
            if let Some(max) = self.max_width {
                if x > 0.0 && x + word_w > max {
                    line += 1;
                    x = 0.0;
                }
            }
            let y = (line as f64 + 1.0) * self.line_height;
            for &ch in &chars[i..end] {
                glyphs.push(GlyphRecord {
                    ch,
                    x,
                    y,
                    advance: self.advance,
                    line,
                });
                x += self.advance;
            }
            width = width.max(x);
            i = end;
        }

        let line_count = if chars.is_empty() { 0 } else { line + 1 };
        Ok(GlyphLayout {
            glyphs,
            line_count,
            width,
            height: line_count as f64 * self.line_height,
        })
    }
}

/// Shapes text with Parley using caller-provided font bytes.
pub struct ParleyMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    size_px: f32,
    max_width_px: Option<f32>,
}

impl ParleyMeasurer {
    pub fn new(font_bytes: &[u8], size_px: f32, max_width_px: Option<f32>) -> FoldResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(FoldError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| FoldError::layout("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FoldError::layout("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            size_px,
            max_width_px,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn measure(&mut self, message: &str) -> FoldResult<GlyphLayout> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, message, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));

        let mut layout: parley::Layout<()> = builder.build(message);
        layout.break_all_lines(self.max_width_px);
        layout.align(
            self.max_width_px,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        // Keyed by byte offset so records come out in logical order whatever the visual order.
        let mut by_byte = BTreeMap::<usize, GlyphRecord>::new();
        let mut width = 0.0f64;
        let mut height = 0.0f64;
        let mut line_count = 0usize;
        for (line_idx, line) in layout.lines().enumerate() {
            line_count = line_idx + 1;
            let m = line.metrics();
            let y = f64::from(m.baseline);
            width = width.max(f64::from(m.advance));
            height += f64::from(m.ascent + m.descent + m.leading);
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = f64::from(run.offset());
                for cluster in run.run().visual_clusters() {
                    let advance = f64::from(cluster.advance());
                    let range = cluster.text_range();
                    let Some(text) = message.get(range.clone()) else {
                        continue;
                    };
                    for (k, ch) in text.char_indices() {
                        by_byte.insert(
                            range.start + k,
                            GlyphRecord {
                                ch,
                                x,
                                y,
                                advance: if k == 0 { advance } else { 0.0 },
                                line: line_idx,
                            },
                        );
                    }
                    x += advance;
                }
            }
        }

        // Hard breaks and collapsed whitespace may not surface as clusters; give them zero-width
        // records after their predecessor so the layout still spells the whole message.
        let mut glyphs = Vec::with_capacity(message.chars().count());
        for (byte, ch) in message.char_indices() {
            let rec = match by_byte.get(&byte) {
                Some(rec) => *rec,
                None => {
                    let prev = glyphs.last().copied().unwrap_or(GlyphRecord {
                        ch,
                        x: 0.0,
                        y: 0.0,
                        advance: 0.0,
                        line: 0,
                    });
                    GlyphRecord {
                        ch,
                        x: prev.x + prev.advance,
                        y: prev.y,
                        advance: 0.0,
                        line: prev.line,
                    }
                }
            };
            glyphs.push(rec);
        }

        Ok(GlyphLayout {
            glyphs,
            line_count,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
