use crate::{
    foundation::{
        core::{Affine, Rgba8Premul, Size},
        error::{StaxError, StaxResult},
    },
    render::surface::{DrawImageOptions, Surface},
};

/// Font size, line spacing and colour for a run of UI text.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// Font size in pixels (before UI scale).
    pub size_px: f32,
    /// Line height multiplier.
    pub line_height: f32,
    /// Straight-alpha RGBA8 colour.
    pub color: [u8; 4],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 12.0,
            line_height: 1.0,
            color: [255, 255, 255, 255],
        }
    }
}

impl TextStyle {
    /// Copy with the font size multiplied by `scale`.
    pub fn scaled(self, scale: f64) -> Self {
        Self {
            size_px: self.size_px * scale as f32,
            ..self
        }
    }
}

/// Text measuring and drawing collaborator used by the UI.
pub trait TextShaper {
    /// Size of `text` laid out with `style`.
    fn measure(&mut self, text: &str, style: &TextStyle) -> StaxResult<Size>;

    /// Draw `text` with its top-left at the origin of `transform`.
    fn draw(
        &mut self,
        target: &mut Surface,
        text: &str,
        style: &TextStyle,
        transform: Affine,
    ) -> StaxResult<()>;
}

/// Fixed-advance shaper drawing one solid block per visible character.
///
/// Used when no font is configured; metrics are deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockShaper;

impl BlockShaper {
    const ADVANCE: f32 = 0.6;
    const GLYPH_HEIGHT: f32 = 0.7;

    fn line_height(style: &TextStyle) -> f64 {
        f64::from(style.size_px * style.line_height.max(0.0))
    }

    fn line_width(line: &str, style: &TextStyle) -> f64 {
        f64::from(style.size_px * Self::ADVANCE) * line.chars().count() as f64
    }
}

impl TextShaper for BlockShaper {
    fn measure(&mut self, text: &str, style: &TextStyle) -> StaxResult<Size> {
        validate_size(style)?;
        if text.is_empty() {
            return Ok(Size::ZERO);
        }
        let mut w = 0.0f64;
        let mut lines = 0usize;
        for line in text.lines() {
            w = w.max(Self::line_width(line, style));
            lines += 1;
        }
        Ok(Size::new(w, Self::line_height(style) * lines as f64))
    }

    fn draw(
        &mut self,
        target: &mut Surface,
        text: &str,
        style: &TextStyle,
        transform: Affine,
    ) -> StaxResult<()> {
        validate_size(style)?;
        let advance = (style.size_px * Self::ADVANCE).max(1.0);
        let glyph_w = (advance * 0.8).round().max(1.0) as u32;
        let glyph_h = (style.size_px * Self::GLYPH_HEIGHT).round().max(1.0) as u32;
        let [r, g, b, a] = style.color;
        let mut glyph = Surface::new(glyph_w, glyph_h);
        glyph.fill(Rgba8Premul::from_straight_rgba(r, g, b, a));

        let line_h = Self::line_height(style);
        for (row, line) in text.lines().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let at = kurbo::Vec2::new(f64::from(advance) * col as f64, line_h * row as f64);
                target.draw_surface(
                    &glyph,
                    &DrawImageOptions::at(transform * Affine::translate(at)),
                )?;
            }
        }
        Ok(())
    }
}

/// RGBA8 brush colour carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Parley-shaped text rasterised with `vello_cpu`, from one font's bytes.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for ParleyShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyShaper")
            .field("family_name", &self.family_name)
            .finish()
    }
}

impl ParleyShaper {
    /// Register `font_bytes` and prepare layout contexts.
    pub fn new(font_bytes: Vec<u8>) -> StaxResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| StaxError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StaxError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Family name registered from the font bytes.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(&mut self, text: &str, style: &TextStyle) -> StaxResult<parley::Layout<TextBrushRgba8>> {
        validate_size(style)?;
        let [r, g, b, a] = style.color;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r,
            g,
            b,
            a,
        }));
        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn layout_size(layout: &parley::Layout<TextBrushRgba8>, style: &TextStyle) -> Size {
        let mut w = 0.0f64;
        let mut h = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            w = w.max(f64::from(m.advance));
            h += f64::from(m.ascent + m.descent + m.leading) * f64::from(style.line_height);
        }
        Size::new(w, h)
    }
}

impl TextShaper for ParleyShaper {
    fn measure(&mut self, text: &str, style: &TextStyle) -> StaxResult<Size> {
        let layout = self.layout(text, style)?;
        Ok(Self::layout_size(&layout, style))
    }

    fn draw(
        &mut self,
        target: &mut Surface,
        text: &str,
        style: &TextStyle,
        transform: Affine,
    ) -> StaxResult<()> {
        let layout = self.layout(text, style)?;
        let size = Self::layout_size(&layout, style);
        let w: u16 = (size.width.ceil().max(1.0) as u32)
            .try_into()
            .map_err(|_| StaxError::render("text width exceeds u16"))?;
        let h: u16 = (size.height.ceil().max(1.0) as u32)
            .try_into()
            .map_err(|_| StaxError::render("text height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let rendered = Surface::from_premul_rgba8(
            u32::from(w),
            u32::from(h),
            pixmap.data_as_u8_slice().to_vec(),
        )?;
        target.draw_surface(&rendered, &DrawImageOptions::at(transform))
    }
}

fn validate_size(style: &TextStyle) -> StaxResult<()> {
    if !style.size_px.is_finite() || style.size_px <= 0.0 {
        return Err(StaxError::validation("text size_px must be finite and > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
