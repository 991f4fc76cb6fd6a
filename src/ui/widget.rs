use crate::{
    assets::registry::AssetRegistry,
    foundation::{
        core::{Affine, Point, Rect, Size, Vec2},
        error::StaxResult,
    },
    render::{surface::Surface, text::TextShaper},
    ui::{
        button::Button, image::ImageWidget, item_list::ItemList, panel::Panel, text::TextWidget,
    },
};

/// What a [`Widget::check`] call is asking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckKind {
    /// Cursor is over the point this frame.
    Hover,
    /// Primary button was clicked at the point this frame.
    Click,
}

/// Horizontal alignment inside the parent rectangle.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlignX {
    /// Left edge.
    #[default]
    Start,
    /// Centred.
    Center,
    /// Right edge.
    End,
}

/// Vertical alignment inside the parent rectangle.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlignY {
    /// Top edge.
    #[default]
    Start,
    /// Centred.
    Center,
    /// Bottom edge.
    End,
}

/// Where a widget sits inside its parent. `offset` is in unscaled UI units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Horizontal alignment.
    #[serde(default)]
    pub align_x: AlignX,
    /// Vertical alignment.
    #[serde(default)]
    pub align_y: AlignY,
    /// Extra offset after alignment, multiplied by the UI scale.
    #[serde(default)]
    pub offset: Vec2,
}

impl Placement {
    /// Top-left aligned with an offset.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            offset: Vec2::new(x, y),
            ..Self::default()
        }
    }

    /// Centred in the parent.
    pub fn centered() -> Self {
        Self {
            align_x: AlignX::Center,
            align_y: AlignY::Center,
            offset: Vec2::ZERO,
        }
    }

    /// Rectangle of `size` (already scaled) placed inside `parent`.
    pub fn resolve(&self, parent: Rect, size: Size, scale: f64) -> Rect {
        let x = parent.x0
            + match self.align_x {
                AlignX::Start => 0.0,
                AlignX::Center => (parent.width() - size.width) * 0.5,
                AlignX::End => parent.width() - size.width,
            };
        let y = parent.y0
            + match self.align_y {
                AlignY::Start => 0.0,
                AlignY::Center => (parent.height() - size.height) * 0.5,
                AlignY::End => parent.height() - size.height,
            };
        Rect::from_origin_size(Point::new(x, y) + self.offset * scale, size)
    }
}

/// Inputs to [`Widget::layout`].
pub struct LayoutOptions<'a> {
    /// Global UI scale factor.
    pub scale: f64,
    /// Asset cache; layout may load images on first use.
    pub assets: &'a mut AssetRegistry,
    /// Text metrics.
    pub shaper: &'a mut dyn TextShaper,
}

/// Inputs to [`Widget::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateOptions {
    /// Ticks since the game started.
    pub tick: u64,
    /// Cursor position in screen pixels.
    pub cursor: Point,
}

/// Target and collaborators for [`Widget::draw`].
pub struct DrawContext<'a> {
    /// Destination surface.
    pub target: &'a mut Surface,
    /// UI to screen transform, independent of the world camera.
    pub transform: Affine,
    /// Global UI scale factor.
    pub scale: f64,
    /// Loaded assets.
    pub assets: &'a AssetRegistry,
    /// Text rasteriser.
    pub shaper: &'a mut dyn TextShaper,
}

/// Four-phase UI contract: layout, update, check, draw.
pub trait Widget {
    /// Top-left in screen pixels, as of the last layout.
    fn position(&self) -> Point;

    /// Size in screen pixels, as of the last layout.
    fn size(&self) -> Size;

    /// Screen rectangle as of the last layout.
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Recompute geometry inside `parent`.
    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()>;

    /// Per-frame bookkeeping.
    fn update(&mut self, opts: &UpdateOptions);

    /// Return `true` if this widget claims the hit at `(x, y)`.
    fn check(&mut self, x: f64, y: f64, kind: CheckKind) -> bool;

    /// Composite onto `ctx.target`.
    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()>;

    /// Return `true` when geometry is stale.
    fn needs_layout(&self) -> bool {
        false
    }
}

/// Closed set of widget variants.
#[derive(Debug)]
pub enum Node {
    /// Clickable button.
    Button(Button),
    /// Nine-slice container.
    Panel(Panel),
    /// Text label.
    Text(TextWidget),
    /// Static image.
    Image(ImageWidget),
    /// Paged list.
    ItemList(ItemList),
}

macro_rules! dispatch {
    ($self:expr, $w:ident => $body:expr) => {
        match $self {
            Node::Button($w) => $body,
            Node::Panel($w) => $body,
            Node::Text($w) => $body,
            Node::Image($w) => $body,
            Node::ItemList($w) => $body,
        }
    };
}

impl Node {
    /// Identifier given at construction, if any.
    pub fn id(&self) -> Option<&str> {
        dispatch!(self, w => w.id.as_deref())
    }

    /// Depth-first search for the node with `id`.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id() == Some(id) {
            return Some(self);
        }
        match self {
            Node::Panel(p) => p.children.iter_mut().find_map(|c| c.find_mut(id)),
            Node::ItemList(l) => l
                .items_lookup_mut()
                .iter_mut()
                .find_map(|c| c.find_mut(id)),
            _ => None,
        }
    }

    /// Button variant, if this is one.
    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Node::Button(b) => Some(b),
            _ => None,
        }
    }

    /// Item list variant, if this is one.
    pub fn as_item_list_mut(&mut self) -> Option<&mut ItemList> {
        match self {
            Node::ItemList(l) => Some(l),
            _ => None,
        }
    }

    /// Text variant, if this is one.
    pub fn as_text_mut(&mut self) -> Option<&mut TextWidget> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl Widget for Node {
    fn position(&self) -> Point {
        dispatch!(self, w => w.position())
    }

    fn size(&self) -> Size {
        dispatch!(self, w => w.size())
    }

    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()> {
        dispatch!(self, w => w.layout(parent, opts))
    }

    fn update(&mut self, opts: &UpdateOptions) {
        dispatch!(self, w => w.update(opts))
    }

    fn check(&mut self, x: f64, y: f64, kind: CheckKind) -> bool {
        dispatch!(self, w => w.check(x, y, kind))
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()> {
        dispatch!(self, w => w.draw(ctx))
    }

    fn needs_layout(&self) -> bool {
        dispatch!(self, w => w.needs_layout())
    }
}

impl From<Button> for Node {
    fn from(w: Button) -> Self {
        Node::Button(w)
    }
}

impl From<Panel> for Node {
    fn from(w: Panel) -> Self {
        Node::Panel(w)
    }
}

impl From<TextWidget> for Node {
    fn from(w: TextWidget) -> Self {
        Node::Text(w)
    }
}

impl From<ImageWidget> for Node {
    fn from(w: ImageWidget) -> Self {
        Node::Image(w)
    }
}

impl From<ItemList> for Node {
    fn from(w: ItemList) -> Self {
        Node::ItemList(w)
    }
}

/// Contains check with half-open edges so adjacent widgets never both claim a point.
pub(crate) fn hit(rect: Rect, x: f64, y: f64) -> bool {
    x >= rect.x0 && x < rect.x1 && y >= rect.y0 && y < rect.y1
}

#[cfg(test)]
#[path = "../../tests/unit/ui/widget.rs"]
mod tests;
