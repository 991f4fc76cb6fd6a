use crate::{
    assets::registry::AssetRegistry,
    foundation::error::StaxResult,
    render::{options::RenderOptions, surface::Surface},
    world::story::Story,
};

/// Stories stacked bottom to top; story `k` is lifted by the depth of every story below it.
#[derive(Debug, Default)]
pub struct Tower {
    stories: Vec<Story>,
}

impl Tower {
    /// Tower with no stories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a story on top.
    pub fn push(&mut self, story: Story) {
        self.stories.push(story);
    }

    /// Stories from the ground up.
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Mutable stories from the ground up.
    pub fn stories_mut(&mut self) -> &mut [Story] {
        &mut self.stories
    }

    /// Enter every story.
    pub fn enter(&mut self) -> StaxResult<()> {
        for story in &mut self.stories {
            story.enter()?;
        }
        Ok(())
    }

    /// Leave every story; returns the total number of layers freed.
    pub fn leave(&mut self) -> usize {
        self.stories.iter_mut().map(Story::leave).sum()
    }

    /// Advance every stack of every story one tick, even when some fail; returns the first
    /// failure.
    pub fn update(&mut self, assets: &AssetRegistry) -> StaxResult<()> {
        let mut first = None;
        for story in &mut self.stories {
            if let Err(e) = story.update(assets) {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Draw stories bottom to top.
    pub fn draw(
        &mut self,
        assets: &AssetRegistry,
        target: &mut Surface,
        opts: &RenderOptions,
    ) -> StaxResult<()> {
        let mut floor = 0usize;
        for story in &mut self.stories {
            story.draw(assets, target, opts, floor as f64 * opts.pitch)?;
            floor += story.depth();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/world/tower.rs"]
mod tests;
