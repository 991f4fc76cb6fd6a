use crate::{
    assets::registry::AssetRegistry,
    foundation::{
        core::{Affine, Vec2},
        error::{StaxError, StaxResult},
    },
    render::{options::RenderOptions, surface::Surface, vgroup::VGroup},
    stack::playback::Stack,
};

/// One floor of a tower: stacks that share a column of depth layers.
///
/// Stack positions are story-local; the story's layers cover `[0, width) x [0, height)` of that
/// space. Layers exist only between [`Story::enter`] and [`Story::leave`].
#[derive(Debug)]
pub struct Story {
    width: u32,
    height: u32,
    depth: usize,
    stacks: Vec<Stack>,
    group: Option<VGroup>,
}

impl Story {
    /// Empty story of `depth` layers over a `width x height` area.
    pub fn new(width: u32, height: u32, depth: usize) -> StaxResult<Self> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(StaxError::validation(format!(
                "story needs a non-empty area and depth, got {width}x{height}x{depth}"
            )));
        }
        Ok(Self {
            width,
            height,
            depth,
            stacks: Vec::new(),
            group: None,
        })
    }

    /// Number of depth layers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Add a stack; it is drawn after the ones already present.
    pub fn push(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    /// Stacks in draw order.
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Mutable stacks in draw order.
    pub fn stacks_mut(&mut self) -> &mut [Stack] {
        &mut self.stacks
    }

    /// Return `true` while the layers are allocated.
    pub fn is_entered(&self) -> bool {
        self.group.is_some()
    }

    /// Allocate the layers. Entering twice keeps the existing ones.
    pub fn enter(&mut self) -> StaxResult<()> {
        if self.group.is_none() {
            self.group = Some(VGroup::create(self.width, self.height, self.depth)?);
        }
        Ok(())
    }

    /// Release the layers; returns how many were freed.
    pub fn leave(&mut self) -> usize {
        self.group.take().map_or(0, VGroup::destroy)
    }

    /// Advance every stack one tick.
    ///
    /// A stack whose cursor no longer resolves is skipped; the others still advance and the
    /// first error is returned afterwards.
    pub fn update(&mut self, assets: &AssetRegistry) -> StaxResult<()> {
        let mut first = None;
        for stack in &mut self.stacks {
            if let Err(e) = stack.update(assets) {
                tracing::debug!(error = %e, "stack update failed");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Redraw every stack into the layers and composite them onto `target`.
    ///
    /// `lift` is an extra screen-space offset applied on top of `opts.transform`.
    pub fn draw(
        &mut self,
        assets: &AssetRegistry,
        target: &mut Surface,
        opts: &RenderOptions,
        lift: f64,
    ) -> StaxResult<()> {
        let group = self
            .group
            .as_mut()
            .ok_or_else(|| StaxError::validation("story drawn before enter()"))?;
        group.clear();
        for stack in &self.stacks {
            stack.draw_into(assets, group)?;
        }
        let transform = Affine::translate(Vec2::new(0.0, -lift)) * opts.transform;
        group.draw(target, transform, opts.pitch)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/world/story.rs"]
mod tests;
