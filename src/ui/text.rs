use crate::{
    foundation::{
        core::{Affine, Point, Rect, Size},
        error::StaxResult,
    },
    render::text::TextStyle,
    ui::widget::{CheckKind, DrawContext, LayoutOptions, Placement, UpdateOptions, Widget},
};

/// Static or updatable text label sized by the shaper.
#[derive(Debug)]
pub struct TextWidget {
    /// Lookup key for [`crate::Node::find_mut`].
    pub id: Option<String>,
    /// Placement inside the parent.
    pub placement: Placement,
    /// Unscaled style.
    pub style: TextStyle,
    text: String,
    dirty: bool,
    rect: Rect,
}

impl TextWidget {
    /// Label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            placement: Placement::default(),
            style: TextStyle::default(),
            text: text.into(),
            dirty: true,
            rect: Rect::ZERO,
        }
    }

    /// Set the lookup key.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the placement.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; the label is re-measured on the next layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }
}

impl Widget for TextWidget {
    fn position(&self) -> Point {
        self.rect.origin()
    }

    fn size(&self) -> Size {
        self.rect.size()
    }

    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()> {
        let size = opts
            .shaper
            .measure(&self.text, &self.style.scaled(opts.scale))?;
        self.rect = self.placement.resolve(parent, size, opts.scale);
        self.dirty = false;
        Ok(())
    }

    fn update(&mut self, _opts: &UpdateOptions) {}

    fn check(&mut self, _x: f64, _y: f64, _kind: CheckKind) -> bool {
        false
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let transform = ctx.transform * Affine::translate(self.rect.origin().to_vec2());
        let style = self.style.scaled(ctx.scale);
        ctx.shaper.draw(ctx.target, &self.text, &style, transform)
    }

    fn needs_layout(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/text.rs"]
mod tests;
