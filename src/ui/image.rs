use crate::{
    assets::registry::ImageId,
    foundation::{
        core::{Affine, ColorScale, Point, Rect, Size},
        error::StaxResult,
    },
    render::surface::DrawImageOptions,
    ui::widget::{CheckKind, DrawContext, LayoutOptions, Placement, UpdateOptions, Widget},
};

/// Image loaded from the asset source, optionally stretched to a fixed size.
#[derive(Debug)]
pub struct ImageWidget {
    /// Lookup key for [`crate::Node::find_mut`].
    pub id: Option<String>,
    /// Placement inside the parent.
    pub placement: Placement,
    /// Asset path.
    pub path: String,
    /// Unscaled size; `None` uses the image's own size.
    pub size: Option<Size>,
    /// Tint and opacity.
    pub color_scale: ColorScale,
    image: Option<ImageId>,
    rect: Rect,
}

impl ImageWidget {
    /// Image widget for the asset at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: None,
            placement: Placement::default(),
            path: path.into(),
            size: None,
            color_scale: ColorScale::IDENTITY,
            image: None,
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

    /// Stretch to `size` (unscaled).
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Handle resolved by the last layout.
    pub fn image(&self) -> Option<ImageId> {
        self.image
    }
}

impl Widget for ImageWidget {
    fn position(&self) -> Point {
        self.rect.origin()
    }

    fn size(&self) -> Size {
        self.rect.size()
    }

    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()> {
        let id = opts.assets.load_image(&self.path)?;
        let natural = opts.assets.image(id)?.size();
        let size = self.size.unwrap_or(natural);
        let size = Size::new(size.width * opts.scale, size.height * opts.scale);
        self.rect = self.placement.resolve(parent, size, opts.scale);
        self.image = Some(id);
        Ok(())
    }

    fn update(&mut self, _opts: &UpdateOptions) {}

    fn check(&mut self, _x: f64, _y: f64, _kind: CheckKind) -> bool {
        false
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()> {
        let Some(id) = self.image else {
            return Ok(());
        };
        let img = ctx.assets.image(id)?;
        if img.width() == 0 || img.height() == 0 {
            return Ok(());
        }
        let sx = self.rect.width() / f64::from(img.width());
        let sy = self.rect.height() / f64::from(img.height());
        let transform = ctx.transform
            * Affine::translate(self.rect.origin().to_vec2())
            * Affine::scale_non_uniform(sx, sy);
        ctx.target.draw_surface(
            img,
            &DrawImageOptions {
                transform,
                color_scale: self.color_scale,
            },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/image.rs"]
mod tests;
