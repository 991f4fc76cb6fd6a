use crate::{
    assets::registry::{AssetRegistry, ImageId},
    foundation::{
        core::{Affine, ColorScale, PixelRect, Point, Rect, Rgba8Premul, Size, Vec2},
        error::{StaxError, StaxResult},
    },
    render::surface::{DrawImageOptions, Surface},
    ui::{
        nine_slice::{TileKind, nine_slice_pieces},
        widget::{
            CheckKind, DrawContext, LayoutOptions, Node, Placement, UpdateOptions, Widget, hit,
        },
    },
};

/// One of the five panel atlases shipped with the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStyle {
    /// Default window frame.
    #[default]
    Frame,
    /// Sunken area inside a frame.
    Inset,
    /// Raised button face.
    Button,
    /// Pressed button face.
    ButtonPressed,
    /// Tooltip bubble.
    Tooltip,
}

impl PanelStyle {
    /// Atlas path inside the asset source.
    pub fn atlas_path(self) -> &'static str {
        match self {
            PanelStyle::Frame => "ui/panel_frame.png",
            PanelStyle::Inset => "ui/panel_inset.png",
            PanelStyle::Button => "ui/panel_button.png",
            PanelStyle::ButtonPressed => "ui/panel_button_pressed.png",
            PanelStyle::Tooltip => "ui/panel_tooltip.png",
        }
    }

    /// Flat colour drawn when the atlas is not available.
    pub fn fallback_color(self) -> Rgba8Premul {
        match self {
            PanelStyle::Frame => Rgba8Premul::from_straight_rgba(46, 40, 52, 255),
            PanelStyle::Inset => Rgba8Premul::from_straight_rgba(24, 20, 28, 255),
            PanelStyle::Button => Rgba8Premul::from_straight_rgba(88, 76, 96, 255),
            PanelStyle::ButtonPressed => Rgba8Premul::from_straight_rgba(64, 54, 72, 255),
            PanelStyle::Tooltip => Rgba8Premul::from_straight_rgba(240, 232, 200, 230),
        }
    }
}

/// Nine-slice background: an atlas of 3x3 square tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NineTiles {
    /// Atlas image.
    pub atlas: ImageId,
    /// Tile edge in atlas pixels.
    pub tile: u32,
}

impl NineTiles {
    /// Check that `atlas` is large enough for a 3x3 grid of `tile` pixels.
    pub fn new(assets: &AssetRegistry, atlas: ImageId, tile: u32) -> StaxResult<Self> {
        let img = assets.image(atlas)?;
        let need = tile.saturating_mul(3);
        if tile == 0 || img.width() < need || img.height() < need {
            return Err(StaxError::validation(format!(
                "{}x{} atlas cannot hold 3x3 tiles of {tile}px",
                img.width(),
                img.height()
            )));
        }
        Ok(Self { atlas, tile })
    }

    /// Tile region for `kind` in the atlas.
    pub fn tile_rect(&self, kind: TileKind) -> PixelRect {
        kind.atlas_rect(self.tile)
    }

    /// Draw into `target` covering `rect` (screen pixels) at UI `scale`.
    pub fn draw(
        &self,
        assets: &AssetRegistry,
        target: &mut Surface,
        transform: Affine,
        rect: Rect,
        scale: f64,
        color_scale: ColorScale,
    ) -> StaxResult<()> {
        let atlas = assets.image(self.atlas)?;
        let scale = if scale > 0.0 { scale } else { 1.0 };
        // Pieces are computed in atlas pixels, then scaled as a whole.
        let w = (rect.width() / scale).round().max(0.0) as u32;
        let h = (rect.height() / scale).round().max(0.0) as u32;
        let base = transform * Affine::translate(rect.origin().to_vec2()) * Affine::scale(scale);
        for piece in nine_slice_pieces(w, h, self.tile) {
            let cell = self.tile_rect(piece.kind);
            let region = PixelRect::new(
                cell.x + piece.src.x,
                cell.y + piece.src.y,
                piece.src.width,
                piece.src.height,
            );
            let at = Vec2::new(f64::from(piece.dst.x), f64::from(piece.dst.y));
            target.draw_surface_region(
                atlas,
                region,
                &DrawImageOptions {
                    transform: base * Affine::translate(at),
                    color_scale,
                },
            )?;
        }
        Ok(())
    }
}

/// Paint `rect` with the style's atlas, or its flat colour when the atlas is missing.
pub(crate) fn draw_background(
    ctx: &mut DrawContext<'_>,
    tiles: Option<NineTiles>,
    style: PanelStyle,
    rect: Rect,
    color_scale: ColorScale,
) -> StaxResult<()> {
    if let Some(tiles) = tiles {
        return tiles.draw(ctx.assets, ctx.target, ctx.transform, rect, ctx.scale, color_scale);
    }
    let w = rect.width().round().max(0.0) as u32;
    let h = rect.height().round().max(0.0) as u32;
    if w == 0 || h == 0 {
        return Ok(());
    }
    let mut flat = Surface::new(w, h);
    flat.fill(style.fallback_color());
    ctx.target.draw_surface(
        &flat,
        &DrawImageOptions {
            transform: ctx.transform * Affine::translate(rect.origin().to_vec2()),
            color_scale,
        },
    )
}

/// Load (once) the atlas for `style`. A missing atlas is not an error: callers fall back to flat
/// colour.
pub(crate) fn resolve_tiles(
    assets: &mut AssetRegistry,
    style: PanelStyle,
    tile: u32,
) -> StaxResult<Option<NineTiles>> {
    match assets.load_image(style.atlas_path()) {
        Ok(id) => NineTiles::new(assets, id, tile).map(Some),
        Err(e) if e.is_not_found() => {
            tracing::debug!(atlas = style.atlas_path(), "panel atlas missing, using flat colour");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Container with a nine-slice background and child widgets.
#[derive(Debug)]
pub struct Panel {
    /// Lookup key for [`Node::find_mut`].
    pub id: Option<String>,
    /// Placement inside the parent.
    pub placement: Placement,
    /// Unscaled size.
    pub size: Size,
    /// Background atlas.
    pub style: PanelStyle,
    /// Atlas tile edge in pixels.
    pub tile: u32,
    /// Unscaled inner margin applied to children.
    pub padding: f64,
    /// Children, drawn in order and checked in order.
    pub children: Vec<Node>,
    tiles: Option<NineTiles>,
    rect: Rect,
}

impl Panel {
    /// Default tile edge of the shipped atlases.
    pub const DEFAULT_TILE: u32 = 8;

    /// Empty panel of `size` (unscaled).
    pub fn new(style: PanelStyle, size: Size) -> Self {
        Self {
            id: None,
            placement: Placement::default(),
            size,
            style,
            tile: Self::DEFAULT_TILE,
            padding: 0.0,
            children: Vec::new(),
            tiles: None,
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

    /// Set the inner margin.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Inner rectangle children are laid out in.
    pub fn content_rect(&self, scale: f64) -> Rect {
        self.rect.inset(-self.padding * scale)
    }
}

impl Widget for Panel {
    fn position(&self) -> Point {
        self.rect.origin()
    }

    fn size(&self) -> Size {
        self.rect.size()
    }

    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()> {
        let size = Size::new(self.size.width * opts.scale, self.size.height * opts.scale);
        self.rect = self.placement.resolve(parent, size, opts.scale);
        self.tiles = resolve_tiles(opts.assets, self.style, self.tile)?;
        let inner = self.content_rect(opts.scale);
        for child in &mut self.children {
            child.layout(inner, opts)?;
        }
        Ok(())
    }

    fn update(&mut self, opts: &UpdateOptions) {
        for child in &mut self.children {
            child.update(opts);
        }
    }

    fn check(&mut self, x: f64, y: f64, kind: CheckKind) -> bool {
        for child in &mut self.children {
            if child.check(x, y, kind) {
                return true;
            }
        }
        hit(self.rect, x, y)
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()> {
        draw_background(ctx, self.tiles, self.style, self.rect, ColorScale::IDENTITY)?;
        for child in &self.children {
            child.draw(ctx)?;
        }
        Ok(())
    }

    fn needs_layout(&self) -> bool {
        self.children.iter().any(|c| c.needs_layout())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/panel.rs"]
mod tests;
