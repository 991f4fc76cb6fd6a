use crate::{
    assets::registry::AssetRegistry,
    foundation::{
        core::{Affine, Point, Rect, Size},
        error::{StaxError, StaxResult},
    },
    render::{surface::Surface, text::TextShaper},
    ui::widget::{CheckKind, DrawContext, LayoutOptions, Node, UpdateOptions, Widget},
};

/// Top of the widget tree, laid out against the whole screen.
#[derive(Debug)]
pub struct UiRoot {
    nodes: Vec<Node>,
    scale: f64,
    screen: Size,
    dirty: bool,
}

impl UiRoot {
    /// Empty tree for a `screen` at UI `scale`.
    pub fn new(screen: Size, scale: f64) -> StaxResult<Self> {
        validate_scale(scale)?;
        Ok(Self {
            nodes: Vec::new(),
            scale,
            screen,
            dirty: true,
        })
    }

    /// Append a top-level node.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
        self.dirty = true;
    }

    /// Top-level nodes in draw order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Current UI scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Change the UI scale; layout reruns on the next frame.
    pub fn set_scale(&mut self, scale: f64) -> StaxResult<()> {
        validate_scale(scale)?;
        if scale != self.scale {
            self.scale = scale;
            self.dirty = true;
        }
        Ok(())
    }

    /// Change the screen size; layout reruns on the next frame.
    pub fn set_screen(&mut self, screen: Size) {
        if screen != self.screen {
            self.screen = screen;
            self.dirty = true;
        }
    }

    /// Depth-first lookup by id across all top-level nodes.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find_map(|n| n.find_mut(id))
    }

    /// Latched click state of the button `id`; `false` when no such button exists.
    pub fn take_clicked(&mut self, id: &str) -> bool {
        self.find_mut(id)
            .and_then(Node::as_button_mut)
            .is_some_and(|b| b.take_clicked())
    }

    /// Return `true` when the next [`UiRoot::layout_if_needed`] will do work.
    pub fn needs_layout(&self) -> bool {
        self.dirty || self.nodes.iter().any(|n| n.needs_layout())
    }

    /// Lay out every node against the screen if anything is stale.
    pub fn layout_if_needed(
        &mut self,
        assets: &mut AssetRegistry,
        shaper: &mut dyn TextShaper,
    ) -> StaxResult<bool> {
        if !self.needs_layout() {
            return Ok(false);
        }
        let screen = Rect::from_origin_size(Point::ORIGIN, self.screen);
        let mut opts = LayoutOptions {
            scale: self.scale,
            assets,
            shaper,
        };
        for node in &mut self.nodes {
            node.layout(screen, &mut opts)?;
        }
        self.dirty = false;
        tracing::debug!(nodes = self.nodes.len(), scale = self.scale, "ui laid out");
        Ok(true)
    }

    /// Per-frame bookkeeping on every node.
    pub fn update(&mut self, opts: &UpdateOptions) {
        for node in &mut self.nodes {
            node.update(opts);
        }
    }

    /// Offer the hit to nodes in child order; the first claim wins.
    pub fn check(&mut self, x: f64, y: f64, kind: CheckKind) -> bool {
        self.nodes.iter_mut().any(|n| n.check(x, y, kind))
    }

    /// Draw every node in order with an identity UI transform.
    pub fn draw(
        &self,
        target: &mut Surface,
        assets: &AssetRegistry,
        shaper: &mut dyn TextShaper,
    ) -> StaxResult<()> {
        let mut ctx = DrawContext {
            target,
            transform: Affine::IDENTITY,
            scale: self.scale,
            assets,
            shaper,
        };
        for node in &self.nodes {
            node.draw(&mut ctx)?;
        }
        Ok(())
    }
}

fn validate_scale(scale: f64) -> StaxResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(StaxError::validation(format!("ui scale must be > 0, got {scale}")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/ui/root.rs"]
mod tests;
