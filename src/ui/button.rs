use crate::{
    assets::registry::ImageId,
    foundation::{
        core::{Affine, ColorScale, Point, Rect, Size, Vec2},
        error::StaxResult,
    },
    render::{surface::DrawImageOptions, text::TextStyle},
    ui::{
        panel::{NineTiles, Panel, PanelStyle, draw_background, resolve_tiles},
        widget::{CheckKind, DrawContext, LayoutOptions, Placement, UpdateOptions, Widget, hit},
    },
};

/// Ticks the cursor must rest on a button before its tooltip shows.
pub const TOOLTIP_DELAY_TICKS: u32 = 20;

const DISABLED_ALPHA: f32 = 0.5;
const TOOLTIP_PADDING: f64 = 3.0;

/// Clickable rectangle with an optional label, icon and tooltip.
///
/// Clicks are latched and read back with [`Button::take_clicked`].
#[derive(Debug)]
pub struct Button {
    /// Lookup key for [`crate::Node::find_mut`].
    pub id: Option<String>,
    /// Placement inside the parent.
    pub placement: Placement,
    /// Unscaled size.
    pub size: Size,
    /// Centered label.
    pub label: Option<String>,
    /// Label style (unscaled).
    pub text_style: TextStyle,
    /// Image drawn centered on the face.
    pub icon: Option<ImageId>,
    /// Text shown after hovering for [`TOOLTIP_DELAY_TICKS`].
    pub tooltip: Option<String>,
    /// Background; `None` draws no face.
    pub style: Option<PanelStyle>,
    /// Disabled buttons still claim hits but never latch clicks and draw translucent.
    pub enabled: bool,
    hovered: bool,
    hover_ticks: u32,
    clicked: bool,
    tiles: Option<NineTiles>,
    pressed_tiles: Option<NineTiles>,
    tooltip_tiles: Option<NineTiles>,
    label_size: Size,
    rect: Rect,
}

impl Button {
    /// Enabled button of `size` (unscaled) with a raised face.
    pub fn new(size: Size) -> Self {
        Self {
            id: None,
            placement: Placement::default(),
            size,
            label: None,
            text_style: TextStyle::default(),
            icon: None,
            tooltip: None,
            style: Some(PanelStyle::Button),
            enabled: true,
            hovered: false,
            hover_ticks: 0,
            clicked: false,
            tiles: None,
            pressed_tiles: None,
            tooltip_tiles: None,
            label_size: Size::ZERO,
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

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: ImageId) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set or clear the background face.
    pub fn with_style(mut self, style: Option<PanelStyle>) -> Self {
        self.style = style;
        self
    }

    /// Return whether a click landed since the last call, clearing the latch.
    pub fn take_clicked(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }

    /// Return `true` if the cursor claimed this button this frame.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Return `true` when the tooltip is due.
    pub fn tooltip_visible(&self) -> bool {
        self.tooltip.is_some() && self.hovered && self.hover_ticks >= TOOLTIP_DELAY_TICKS
    }

    fn face_scale(&self) -> ColorScale {
        if self.enabled {
            ColorScale::IDENTITY
        } else {
            ColorScale::IDENTITY.with_alpha(DISABLED_ALPHA)
        }
    }

    /// Raised faces press down while hovered.
    fn face_style(&self) -> Option<PanelStyle> {
        match self.style {
            Some(PanelStyle::Button) if self.hovered && self.enabled => {
                Some(PanelStyle::ButtonPressed)
            }
            other => other,
        }
    }

    fn draw_tooltip(&self, ctx: &mut DrawContext<'_>, text: &str) -> StaxResult<()> {
        let style = self.text_style.scaled(ctx.scale);
        let text_size = ctx.shaper.measure(text, &style)?;
        let pad = TOOLTIP_PADDING * ctx.scale;
        let rect = Rect::from_origin_size(
            Point::new(self.rect.x0, self.rect.y1 + pad),
            Size::new(text_size.width + 2.0 * pad, text_size.height + 2.0 * pad),
        );
        draw_background(
            ctx,
            self.tooltip_tiles,
            PanelStyle::Tooltip,
            rect,
            ColorScale::IDENTITY,
        )?;
        let at = Affine::translate(Vec2::new(rect.x0 + pad, rect.y0 + pad));
        let transform = ctx.transform * at;
        ctx.shaper.draw(ctx.target, text, &style, transform)
    }
}

impl Widget for Button {
    fn position(&self) -> Point {
        self.rect.origin()
    }

    fn size(&self) -> Size {
        self.rect.size()
    }

    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()> {
        let size = Size::new(self.size.width * opts.scale, self.size.height * opts.scale);
        self.rect = self.placement.resolve(parent, size, opts.scale);
        self.tiles = match self.style {
            Some(style) => resolve_tiles(opts.assets, style, Panel::DEFAULT_TILE)?,
            None => None,
        };
        self.pressed_tiles = match self.style {
            Some(PanelStyle::Button) => {
                resolve_tiles(opts.assets, PanelStyle::ButtonPressed, Panel::DEFAULT_TILE)?
            }
            _ => None,
        };
        self.tooltip_tiles = match self.tooltip {
            Some(_) => resolve_tiles(opts.assets, PanelStyle::Tooltip, Panel::DEFAULT_TILE)?,
            None => None,
        };
        self.label_size = match &self.label {
            Some(label) => opts
                .shaper
                .measure(label, &self.text_style.scaled(opts.scale))?,
            None => Size::ZERO,
        };
        Ok(())
    }

    fn update(&mut self, _opts: &UpdateOptions) {
        if self.hovered {
            self.hover_ticks = self.hover_ticks.saturating_add(1);
        } else {
            self.hover_ticks = 0;
        }
        self.hovered = false;
    }

    fn check(&mut self, x: f64, y: f64, kind: CheckKind) -> bool {
        if !hit(self.rect, x, y) {
            return false;
        }
        match kind {
            CheckKind::Hover => self.hovered = true,
            CheckKind::Click if self.enabled => self.clicked = true,
            CheckKind::Click => {}
        }
        true
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()> {
        let face = self.face_scale();
        if let Some(style) = self.face_style() {
            let tiles = if style == PanelStyle::ButtonPressed && self.style != Some(style) {
                self.pressed_tiles
            } else {
                self.tiles
            };
            draw_background(ctx, tiles, style, self.rect, face)?;
        }

        let centre = self.rect.center();
        if let Some(icon) = self.icon {
            let img = ctx.assets.image(icon)?;
            let w = f64::from(img.width()) * ctx.scale;
            let h = f64::from(img.height()) * ctx.scale;
            let at = Affine::translate(Vec2::new(centre.x - w * 0.5, centre.y - h * 0.5));
            ctx.target.draw_surface(
                img,
                &DrawImageOptions {
                    transform: ctx.transform * at * Affine::scale(ctx.scale),
                    color_scale: face,
                },
            )?;
        }

        if let Some(label) = &self.label {
            let mut style = self.text_style.scaled(ctx.scale);
            if !self.enabled {
                style.color[3] = (f32::from(style.color[3]) * DISABLED_ALPHA).round() as u8;
            }
            let at = Vec2::new(
                centre.x - self.label_size.width * 0.5,
                centre.y - self.label_size.height * 0.5,
            );
            let transform = ctx.transform * Affine::translate(at);
            ctx.shaper.draw(ctx.target, label, &style, transform)?;
        }

        if let Some(tooltip) = &self.tooltip {
            if self.tooltip_visible() {
                self.draw_tooltip(ctx, tooltip)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/button.rs"]
mod tests;
