use std::collections::BTreeMap;

use crate::{
    foundation::error::{StaxError, StaxResult},
    render::surface::Surface,
    staxie::slices::acquire_slice_images,
};

/// Decoded sprite-stack asset: stacks of animations of frames of depth slices.
///
/// Immutable once loaded; frame dimensions are uniform across the whole asset.
#[derive(Clone, Debug)]
pub struct Staxie {
    /// Width of every slice in pixels.
    pub frame_width: u16,
    /// Height of every slice in pixels.
    pub frame_height: u16,
    stacks: Vec<StaxieStack>,
    stack_index: BTreeMap<String, usize>,
}

/// Named group of animations sharing a slice count.
#[derive(Clone, Debug)]
pub struct StaxieStack {
    /// Stack name.
    pub name: String,
    /// Depth of every frame in this stack.
    pub slice_count: u16,
    animations: Vec<StaxieAnimation>,
    animation_index: BTreeMap<String, usize>,
}

/// Ordered frames plus the ticks each one stays on screen.
#[derive(Clone, Debug)]
pub struct StaxieAnimation {
    /// Animation name.
    pub name: String,
    /// Ticks per frame.
    pub frame_time: u32,
    /// Frames in playback order.
    pub frames: Vec<StaxieFrame>,
}

/// One animation frame: slices ordered bottom to top.
#[derive(Clone, Debug, Default)]
pub struct StaxieFrame {
    /// Depth slices, bottom first.
    pub slices: Vec<StaxieSlice>,
}

/// One depth layer of a frame.
#[derive(Clone, Debug)]
pub struct StaxieSlice {
    /// Shading byte stored in the file.
    pub shading: u8,
    /// Source X in the sheet.
    pub x: u32,
    /// Source Y in the sheet.
    pub y: u32,
    pub(crate) image: Option<Surface>,
}

impl StaxieSlice {
    /// Slice pixels, once acquired from the sheet.
    pub fn image(&self) -> Option<&Surface> {
        self.image.as_ref()
    }
}

impl Staxie {
    /// Empty asset with the given frame size.
    pub fn new(frame_width: u16, frame_height: u16) -> Self {
        Self {
            frame_width,
            frame_height,
            stacks: Vec::new(),
            stack_index: BTreeMap::new(),
        }
    }

    pub(crate) fn push_stack(&mut self, stack: StaxieStack) {
        self.stack_index.insert(stack.name.clone(), self.stacks.len());
        self.stacks.push(stack);
    }

    /// Lookup a stack by name.
    pub fn stack(&self, name: &str) -> Option<&StaxieStack> {
        self.stack_index.get(name).map(|&i| &self.stacks[i])
    }

    /// Stacks in file order.
    pub fn stacks(&self) -> &[StaxieStack] {
        &self.stacks
    }

    /// First stack in file order.
    pub fn first_stack(&self) -> Option<&StaxieStack> {
        self.stacks.first()
    }

    /// Resolve `name`, or the first stack when `name` is empty.
    pub fn resolve_stack(&self, name: &str) -> StaxResult<&StaxieStack> {
        let found = if name.is_empty() {
            self.first_stack()
        } else {
            self.stack(name)
        };
        found.ok_or_else(|| StaxError::not_found("stack", name))
    }

    /// Largest slice count across stacks.
    pub fn max_slice_count(&self) -> u16 {
        self.stacks.iter().map(|s| s.slice_count).max().unwrap_or(0)
    }

    /// Total frames across all stacks and animations.
    pub fn frame_count(&self) -> usize {
        self.stacks
            .iter()
            .flat_map(|s| s.animations.iter())
            .map(|a| a.frames.len())
            .sum()
    }

    pub(crate) fn slices_mut(&mut self) -> impl Iterator<Item = &mut StaxieSlice> {
        self.stacks
            .iter_mut()
            .flat_map(|s| s.animations.iter_mut())
            .flat_map(|a| a.frames.iter_mut())
            .flat_map(|f| f.slices.iter_mut())
    }

    /// Check the uniform-depth invariant.
    pub fn validate(&self) -> StaxResult<()> {
        for stack in &self.stacks {
            for anim in &stack.animations {
                for (i, frame) in anim.frames.iter().enumerate() {
                    if frame.slices.len() != usize::from(stack.slice_count) {
                        return Err(StaxError::validation(format!(
                            "stack '{}' animation '{}' frame {i} has {} slices, expected {}",
                            stack.name,
                            anim.name,
                            frame.slices.len(),
                            stack.slice_count
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Serializable overview of the asset.
    pub fn summary(&self) -> StaxieSummary {
        StaxieSummary {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            stacks: self
                .stacks
                .iter()
                .map(|s| StackSummary {
                    name: s.name.clone(),
                    slice_count: s.slice_count,
                    animations: s
                        .animations
                        .iter()
                        .map(|a| AnimationSummary {
                            name: a.name.clone(),
                            frame_time: a.frame_time,
                            frames: a.frames.len(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl StaxieStack {
    /// Empty stack.
    pub fn new(name: impl Into<String>, slice_count: u16) -> Self {
        Self {
            name: name.into(),
            slice_count,
            animations: Vec::new(),
            animation_index: BTreeMap::new(),
        }
    }

    pub(crate) fn push_animation(&mut self, animation: StaxieAnimation) {
        self.animation_index
            .insert(animation.name.clone(), self.animations.len());
        self.animations.push(animation);
    }

    /// Lookup an animation by name.
    pub fn animation(&self, name: &str) -> Option<&StaxieAnimation> {
        self.animation_index.get(name).map(|&i| &self.animations[i])
    }

    /// Animations in file order.
    pub fn animations(&self) -> &[StaxieAnimation] {
        &self.animations
    }

    /// Resolve `name`, or the first animation when `name` is empty.
    pub fn resolve_animation(&self, name: &str) -> StaxResult<&StaxieAnimation> {
        let found = if name.is_empty() {
            self.animations.first()
        } else {
            self.animation(name)
        };
        found.ok_or_else(|| StaxError::not_found("animation", name))
    }
}

/// Serializable overview of a [`Staxie`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaxieSummary {
    /// Slice width.
    pub frame_width: u16,
    /// Slice height.
    pub frame_height: u16,
    /// Stacks in file order.
    pub stacks: Vec<StackSummary>,
}

/// Serializable overview of one stack.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StackSummary {
    /// Stack name.
    pub name: String,
    /// Depth.
    pub slice_count: u16,
    /// Animations in file order.
    pub animations: Vec<AnimationSummary>,
}

/// Serializable overview of one animation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSummary {
    /// Animation name.
    pub name: String,
    /// Ticks per frame.
    pub frame_time: u32,
    /// Frame count.
    pub frames: usize,
}

/// Builds a [`Staxie`] in memory using the decoder's sheet addressing.
///
/// Slice `i` of every frame sits at `x = i * frame_width`; each frame with at least one slice
/// advances the sheet row by `frame_height`, across stacks and animations in insertion order.
#[derive(Debug)]
pub struct StaxieBuilder {
    staxie: Staxie,
    y_cursor: u32,
}

impl StaxieBuilder {
    /// Start an asset with the given frame size.
    pub fn new(frame_width: u16, frame_height: u16) -> Self {
        Self {
            staxie: Staxie::new(frame_width, frame_height),
            y_cursor: 0,
        }
    }

    /// Append a stack with no animations.
    pub fn stack(mut self, name: impl Into<String>, slice_count: u16) -> Self {
        self.staxie.push_stack(StaxieStack::new(name, slice_count));
        self
    }

    /// Append an animation to the most recent stack; one shading vector per frame.
    ///
    /// Shading vectors shorter than the stack depth are padded with zero.
    pub fn animation(
        mut self,
        name: impl Into<String>,
        frame_time: u32,
        frames: &[Vec<u8>],
    ) -> StaxResult<Self> {
        let fw = u32::from(self.staxie.frame_width);
        let fh = u32::from(self.staxie.frame_height);
        let stack = self
            .staxie
            .stacks
            .last_mut()
            .ok_or_else(|| StaxError::validation("animation added before any stack"))?;
        let depth = stack.slice_count;
        let mut anim = StaxieAnimation {
            name: name.into(),
            frame_time,
            frames: Vec::with_capacity(frames.len()),
        };
        for shading in frames {
            let slices = (0..depth)
                .map(|i| StaxieSlice {
                    shading: shading.get(usize::from(i)).copied().unwrap_or(0),
                    x: u32::from(i) * fw,
                    y: self.y_cursor,
                    image: None,
                })
                .collect();
            anim.frames.push(StaxieFrame { slices });
            if depth > 0 {
                self.y_cursor += fh;
            }
        }
        stack.push_animation(anim);
        Ok(self)
    }

    /// Sheet size implied by the frames added so far.
    pub fn sheet_size(&self) -> (u32, u32) {
        let w = u32::from(self.staxie.max_slice_count()) * u32::from(self.staxie.frame_width);
        (w, self.y_cursor)
    }

    /// Finish the asset.
    pub fn build(self) -> Staxie {
        self.staxie
    }

    /// Finish the asset and cut slice images out of `sheet`.
    pub fn build_with_sheet(self, sheet: &Surface) -> StaxResult<Staxie> {
        let mut staxie = self.staxie;
        acquire_slice_images(&mut staxie, sheet)?;
        Ok(staxie)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/staxie/model.rs"]
mod tests;
