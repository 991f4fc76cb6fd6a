use crate::{
    assets::registry::{AssetRegistry, StaxieId},
    foundation::{
        core::{Affine, ColorScale, Originable, Point, Positionable, Rotateable, Size, Sizeable, Vec2},
        error::{StaxError, StaxResult},
    },
    render::{
        options::RenderOptions,
        surface::{DrawImageOptions, Surface},
        vgroup::VGroup,
    },
    staxie::model::{Staxie, StaxieAnimation, StaxieFrame, StaxieStack},
};

/// Grey level for slice `index` of `count`: bottom slices are darker, never below half.
pub fn slice_shade(index: usize, count: usize) -> ColorScale {
    if count == 0 {
        return ColorScale::IDENTITY;
    }
    ColorScale::gray((index as f32 / count as f32).clamp(0.5, 1.0))
}

/// Playback cursor over a shared staxie held by an [`AssetRegistry`].
///
/// The asset is referenced through its [`StaxieId`], so a reload in the registry is picked up on
/// the next update or draw. Setters leave the cursor untouched when they fail.
#[derive(Clone, Debug)]
pub struct Stack {
    asset: StaxieId,
    stack: String,
    animation: String,
    frame: usize,
    ticks: u32,
    frame_size: Size,
    size: Size,
    position: Point,
    rotation: f64,
    origin: Vec2,
}

impl Stack {
    /// Cursor on `stack`/`animation` of an already loaded asset, at frame 0.
    ///
    /// Empty names select the first stack or animation in file order.
    pub fn new(
        assets: &AssetRegistry,
        asset: StaxieId,
        stack: &str,
        animation: &str,
    ) -> StaxResult<Self> {
        let staxie = assets.staxie(asset)?;
        if staxie.frame_count() == 0 {
            return Err(StaxError::validation("staxie has no frames"));
        }
        let st = staxie.resolve_stack(stack)?;
        let anim = playable(st, st.resolve_animation(animation)?)?;

        let frame_size = Size::new(
            f64::from(staxie.frame_width),
            f64::from(staxie.frame_height),
        );
        Ok(Self {
            asset,
            stack: st.name.clone(),
            animation: anim.name.clone(),
            frame: 0,
            ticks: 0,
            frame_size,
            size: frame_size,
            position: Point::ORIGIN,
            rotation: 0.0,
            origin: Vec2::new(frame_size.width * 0.5, frame_size.height * 0.5),
        })
    }

    /// Load `asset_name` through the registry (memoized) and build a cursor on it.
    #[tracing::instrument(skip(assets))]
    pub fn create(
        assets: &mut AssetRegistry,
        asset_name: &str,
        stack: &str,
        animation: &str,
    ) -> StaxResult<Self> {
        let id = assets.load_staxie(asset_name)?;
        Self::new(assets, id, stack, animation)
    }

    /// Handle of the underlying asset.
    pub fn asset(&self) -> StaxieId {
        self.asset
    }

    /// Current stack name.
    pub fn stack_name(&self) -> &str {
        &self.stack
    }

    /// Current animation name.
    pub fn animation_name(&self) -> &str {
        &self.animation
    }

    /// Current frame index.
    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Ticks spent on the current frame.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Size of one slice in the asset.
    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    /// Advance one tick, moving to the next frame (looping) once the frame time elapses.
    ///
    /// A frame time of 0 behaves like 1.
    pub fn update(&mut self, assets: &AssetRegistry) -> StaxResult<()> {
        let staxie = assets.staxie(self.asset)?;
        let anim = self.current_animation(staxie)?;
        self.ticks += 1;
        if self.ticks >= anim.frame_time.max(1) {
            self.ticks = 0;
            self.frame += 1;
            if self.frame >= anim.frames.len() {
                self.frame = 0;
            }
        }
        Ok(())
    }

    /// Switch stack, keeping the animation name when the new stack has one of that name.
    pub fn set_stack(&mut self, assets: &AssetRegistry, name: &str) -> StaxResult<()> {
        let staxie = assets.staxie(self.asset)?;
        let st = staxie.stack(name).ok_or_else(|| speculative("stack", name))?;
        let anim = match st.animation(&self.animation) {
            Some(anim) => anim,
            None => st.resolve_animation("")?,
        };
        let anim = playable(st, anim)?;
        self.stack = st.name.clone();
        self.animation = anim.name.clone();
        self.rewind();
        Ok(())
    }

    /// Switch animation within the current stack.
    pub fn set_animation(&mut self, assets: &AssetRegistry, name: &str) -> StaxResult<()> {
        let staxie = assets.staxie(self.asset)?;
        let st = staxie.resolve_stack(&self.stack)?;
        let anim = st
            .animation(name)
            .ok_or_else(|| speculative("animation", name))?;
        let anim = playable(st, anim)?;
        self.animation = anim.name.clone();
        self.rewind();
        Ok(())
    }

    /// Jump to `index` in the current animation.
    pub fn set_frame(&mut self, assets: &AssetRegistry, index: usize) -> StaxResult<()> {
        let staxie = assets.staxie(self.asset)?;
        let anim = self.current_animation(staxie)?;
        if index >= anim.frames.len() {
            return Err(speculative("frame", &index.to_string()));
        }
        self.frame = index;
        self.ticks = 0;
        Ok(())
    }

    /// Frame the cursor points at.
    pub fn current_frame<'a>(&self, assets: &'a AssetRegistry) -> StaxResult<&'a StaxieFrame> {
        let staxie = assets.staxie(self.asset)?;
        let anim = self.current_animation(staxie)?;
        anim.frames
            .get(self.frame.min(anim.frames.len().saturating_sub(1)))
            .ok_or_else(|| StaxError::not_found("frame", self.frame.to_string()))
    }

    /// Slice-local to world transform: pivot on the origin, scale to size, rotate, place.
    pub fn local_affine(&self) -> Affine {
        self.affine_at(self.position)
    }

    /// Draw the current frame in world space through `opts.transform`, lifting slice `i` by
    /// `i * opts.pitch` screen pixels.
    pub fn draw(
        &self,
        assets: &AssetRegistry,
        target: &mut Surface,
        opts: &RenderOptions,
    ) -> StaxResult<()> {
        let base = opts.transform * self.local_affine();
        self.draw_slices(assets, target, base, opts.pitch)
    }

    /// Fixed-camera draw: anchor at the screen centre pushed out by `distance` along the stack's
    /// rotation, ignoring `opts.transform`.
    pub fn draw_orbit(
        &self,
        assets: &AssetRegistry,
        target: &mut Surface,
        opts: &RenderOptions,
        distance: f64,
    ) -> StaxResult<()> {
        let centre = Point::new(opts.screen.width * 0.5, opts.screen.height * 0.5);
        let anchor = centre + Vec2::new(self.rotation.cos(), self.rotation.sin()) * distance;
        self.draw_slices(assets, target, self.affine_at(anchor), opts.pitch)
    }

    /// Draw slice `i` of the current frame into layer `i` of `group`, without any pitch.
    ///
    /// Slices deeper than the group are dropped.
    pub fn draw_into(&self, assets: &AssetRegistry, group: &mut VGroup) -> StaxResult<()> {
        let frame = self.current_frame(assets)?;
        let local = self.local_affine();
        let count = frame.slices.len();
        for (i, slice) in frame.slices.iter().enumerate() {
            let (Some(image), Some(layer)) = (slice.image(), group.layer_mut(i)) else {
                continue;
            };
            layer.draw_surface(
                image,
                &DrawImageOptions {
                    transform: local,
                    color_scale: slice_shade(i, count),
                },
            )?;
        }
        Ok(())
    }

    fn draw_slices(
        &self,
        assets: &AssetRegistry,
        target: &mut Surface,
        base: Affine,
        pitch: f64,
    ) -> StaxResult<()> {
        let frame = self.current_frame(assets)?;
        let count = frame.slices.len();
        for (i, slice) in frame.slices.iter().enumerate() {
            let Some(image) = slice.image() else {
                continue;
            };
            let lift = Affine::translate(Vec2::new(0.0, -pitch * i as f64));
            target.draw_surface(
                image,
                &DrawImageOptions {
                    transform: lift * base,
                    color_scale: slice_shade(i, count),
                },
            )?;
        }
        Ok(())
    }

    fn affine_at(&self, anchor: Point) -> Affine {
        let sx = safe_ratio(self.size.width, self.frame_size.width);
        let sy = safe_ratio(self.size.height, self.frame_size.height);
        Affine::translate(anchor.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-self.origin)
    }

    fn current_animation<'a>(&self, staxie: &'a Staxie) -> StaxResult<&'a StaxieAnimation> {
        staxie
            .resolve_stack(&self.stack)?
            .resolve_animation(&self.animation)
    }

    fn rewind(&mut self) {
        self.frame = 0;
        self.ticks = 0;
    }
}

fn playable<'a>(stack: &StaxieStack, anim: &'a StaxieAnimation) -> StaxResult<&'a StaxieAnimation> {
    if anim.frames.is_empty() {
        return Err(StaxError::validation(format!(
            "animation '{}' of stack '{}' has no frames",
            anim.name, stack.name
        )));
    }
    Ok(anim)
}

fn speculative(kind: &'static str, name: &str) -> StaxError {
    tracing::debug!(kind, name, "stack cursor target not found");
    StaxError::not_found(kind, name)
}

fn safe_ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 1.0 }
}

impl Positionable for Stack {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, p: Point) {
        self.position = p;
    }
}

impl Rotateable for Stack {
    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }
}

impl Sizeable for Stack {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

impl Originable for Stack {
    fn origin(&self) -> Vec2 {
        self.origin
    }

    fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/playback.rs"]
mod tests;
