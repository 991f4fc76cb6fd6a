use crate::{
    foundation::{
        core::{Point, Rect, Size},
        error::StaxResult,
    },
    ui::{
        button::Button,
        widget::{
            CheckKind, DrawContext, LayoutOptions, Node, Placement, UpdateOptions, Widget, hit,
        },
    },
};

/// Scroll direction of an [`ItemList`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Items run left to right.
    #[default]
    Horizontal,
    /// Items run top to bottom.
    Vertical,
}

impl Axis {
    fn main(self, size: Size) -> f64 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> f64 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    fn point(self, origin: Point, main: f64, cross: f64) -> Point {
        match self {
            Axis::Horizontal => Point::new(origin.x + main, origin.y + cross),
            Axis::Vertical => Point::new(origin.x + cross, origin.y + main),
        }
    }
}

/// Result of [`visible_window`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListWindow {
    /// One past the last visible item.
    pub last_visible: usize,
    /// No item from the offset onwards overflows.
    pub all_visible: bool,
    /// Main-axis space used by the visible items, gaps included.
    pub consumed: f64,
}

/// Walk `extents` from `offset`, adding `gap` after each item, and stop at the first item whose
/// running total meets or exceeds `available`. That item is the exclusive end of the window.
pub fn visible_window(extents: &[f64], offset: usize, available: f64, gap: f64) -> ListWindow {
    let mut consumed = 0.0;
    for (i, extent) in extents.iter().enumerate().skip(offset) {
        let next = consumed + extent + gap;
        if next >= available {
            return ListWindow {
                last_visible: i,
                all_visible: false,
                consumed,
            };
        }
        consumed = next;
    }
    ListWindow {
        last_visible: extents.len(),
        all_visible: true,
        consumed,
    }
}

/// Paged list with decrement/increment buttons at either end of its main axis.
///
/// The visible window is recomputed lazily on the next layout after anything marks the list
/// changed (items added or removed, scrolling, resizing).
#[derive(Debug)]
pub struct ItemList {
    /// Lookup key for [`crate::Node::find_mut`].
    pub id: Option<String>,
    /// Placement inside the parent.
    pub placement: Placement,
    /// Unscaled container size.
    pub size: Size,
    /// Scroll axis.
    pub axis: Axis,
    /// Unscaled gap added after every item.
    pub gap: f64,
    /// Re-centre the visible block in the leftover space.
    pub centered: bool,
    items: Vec<Node>,
    decrement: Button,
    increment: Button,
    item_offset: usize,
    last_visible: usize,
    items_all_visible: bool,
    changed: bool,
    rect: Rect,
}

impl ItemList {
    /// Unscaled main-axis extent of each scroll button.
    pub const BUTTON_EXTENT: f64 = 12.0;

    /// Empty list of `size` (unscaled).
    pub fn new(axis: Axis, size: Size) -> Self {
        let (dec, inc) = match axis {
            Axis::Horizontal => ("<", ">"),
            Axis::Vertical => ("^", "v"),
        };
        let button_size = axis.size(Self::BUTTON_EXTENT, axis.cross(size));
        Self {
            id: None,
            placement: Placement::default(),
            size,
            axis,
            gap: 2.0,
            centered: true,
            items: Vec::new(),
            decrement: Button::new(button_size).with_label(dec),
            increment: Button::new(button_size).with_label(inc),
            item_offset: 0,
            last_visible: 0,
            items_all_visible: true,
            changed: true,
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

    /// Set the unscaled gap.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Append an item.
    pub fn with_item(mut self, item: impl Into<Node>) -> Self {
        self.push(item);
        self
    }

    /// Append an item.
    pub fn push(&mut self, item: impl Into<Node>) {
        self.items.push(item.into());
        self.changed = true;
    }

    /// Remove and return item `index`.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.item_offset = self.item_offset.min(self.items.len().saturating_sub(1));
        self.changed = true;
        Some(item)
    }

    /// Drop every item and scroll back to the start.
    pub fn clear(&mut self) {
        self.items.clear();
        self.item_offset = 0;
        self.changed = true;
    }

    /// Items in order.
    pub fn items(&self) -> &[Node] {
        &self.items
    }

    /// Mutable items; the list re-lays itself out afterwards.
    pub fn items_mut(&mut self) -> &mut [Node] {
        self.changed = true;
        &mut self.items
    }

    /// First visible index.
    pub fn item_offset(&self) -> usize {
        self.item_offset
    }

    /// One past the last visible index, as of the last layout.
    pub fn last_visible_index(&self) -> usize {
        self.last_visible
    }

    /// Return `true` when no item past the offset overflows.
    pub fn items_all_visible(&self) -> bool {
        self.items_all_visible
    }

    /// Scroll back one item. No-op at the start.
    pub fn decrement(&mut self) {
        if self.item_offset == 0 {
            return;
        }
        self.item_offset -= 1;
        self.changed = true;
    }

    /// Scroll forward one item. No-op while every remaining item is visible.
    pub fn increment(&mut self) {
        if self.items_all_visible {
            return;
        }
        self.item_offset = (self.item_offset + 1).min(self.items.len().saturating_sub(1));
        self.changed = true;
    }

    /// Items without marking the list changed; used for lookups.
    pub(crate) fn items_lookup_mut(&mut self) -> &mut [Node] {
        &mut self.items
    }

    fn visible(&self) -> std::ops::Range<usize> {
        let start = self.item_offset.min(self.items.len());
        start..self.last_visible.clamp(start, self.items.len())
    }
}

impl Widget for ItemList {
    fn position(&self) -> Point {
        self.rect.origin()
    }

    fn size(&self) -> Size {
        self.rect.size()
    }

    fn layout(&mut self, parent: Rect, opts: &mut LayoutOptions<'_>) -> StaxResult<()> {
        let scale = opts.scale;
        let size = Size::new(self.size.width * scale, self.size.height * scale);
        self.rect = self.placement.resolve(parent, size, scale);
        let axis = self.axis;
        let button_main = Self::BUTTON_EXTENT * scale;
        let cross = axis.cross(size);

        let start = Rect::from_origin_size(self.rect.origin(), axis.size(button_main, cross));
        let end_origin = axis.point(self.rect.origin(), axis.main(size) - button_main, 0.0);
        let end = Rect::from_origin_size(end_origin, axis.size(button_main, cross));
        self.decrement.placement = Placement::default();
        self.increment.placement = Placement::default();
        self.decrement.layout(start, opts)?;
        self.increment.layout(end, opts)?;

        // Natural sizes first, then the window, then final positions.
        let mut extents = Vec::with_capacity(self.items.len());
        for item in &mut self.items {
            item.layout(self.rect, opts)?;
            extents.push(axis.main(item.size()));
        }
        let available = axis.main(size) - 2.0 * button_main;
        let gap = self.gap * scale;
        let window = visible_window(&extents, self.item_offset, available, gap);
        self.last_visible = window.last_visible;
        self.items_all_visible = window.all_visible;

        let lead = if self.centered {
            ((available - window.consumed) * 0.5).max(0.0)
        } else {
            0.0
        };
        let mut cursor = button_main + lead;
        for i in self.visible() {
            let item_size = self.items[i].size();
            let slot_origin = axis.point(
                self.rect.origin(),
                cursor,
                (cross - axis.cross(item_size)) * 0.5,
            );
            self.items[i].layout(Rect::from_origin_size(slot_origin, item_size), opts)?;
            cursor += extents[i] + gap;
        }

        self.decrement.enabled = self.item_offset > 0;
        self.increment.enabled = !self.items_all_visible;
        self.changed = false;
        Ok(())
    }

    fn update(&mut self, opts: &UpdateOptions) {
        self.decrement.update(opts);
        self.increment.update(opts);
        let range = self.visible();
        for item in &mut self.items[range] {
            item.update(opts);
        }
    }

    fn check(&mut self, x: f64, y: f64, kind: CheckKind) -> bool {
        if self.decrement.check(x, y, kind) {
            if kind == CheckKind::Click {
                self.decrement.take_clicked();
                self.decrement();
            }
            return true;
        }
        if self.increment.check(x, y, kind) {
            if kind == CheckKind::Click {
                self.increment.take_clicked();
                self.increment();
            }
            return true;
        }
        let range = self.visible();
        for item in &mut self.items[range] {
            if item.check(x, y, kind) {
                return true;
            }
        }
        hit(self.rect, x, y)
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> StaxResult<()> {
        self.decrement.draw(ctx)?;
        self.increment.draw(ctx)?;
        for item in &self.items[self.visible()] {
            item.draw(ctx)?;
        }
        Ok(())
    }

    fn needs_layout(&self) -> bool {
        self.changed || self.items.iter().any(|i| i.needs_layout())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/item_list.rs"]
mod tests;
