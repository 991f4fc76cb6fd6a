use crate::{
    foundation::{
        core::{Affine, Vec2},
        error::{StaxError, StaxResult},
    },
    render::surface::{DrawImageOptions, Surface},
};

/// Per-depth offscreen layers used to composite several stacks sharing a column.
///
/// Layer `i` receives slice `i` of every stack drawn into the group; [`VGroup::draw`] then
/// stacks the layers with the same pitch offset a lone stack would use. Buffers are released
/// exactly once, either by [`VGroup::destroy`] or on drop.
pub struct VGroup {
    width: u32,
    height: u32,
    layers: Vec<Surface>,
    destroyed: bool,
}

impl std::fmt::Debug for VGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VGroup")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl VGroup {
    /// Allocate `layer_count` transparent `width x height` layers.
    pub fn create(width: u32, height: u32, layer_count: usize) -> StaxResult<Self> {
        if width == 0 || height == 0 {
            return Err(StaxError::validation("vgroup dimensions must be > 0"));
        }
        if layer_count == 0 {
            return Err(StaxError::validation("vgroup needs at least one layer"));
        }
        let layers = (0..layer_count)
            .map(|_| Surface::new(width, height))
            .collect();
        tracing::debug!(width, height, layer_count, "vgroup acquired");
        Ok(Self {
            width,
            height,
            layers,
            destroyed: false,
        })
    }

    /// Layer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Layer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of depth layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Borrow one layer.
    pub fn layer(&self, index: usize) -> Option<&Surface> {
        self.layers.get(index)
    }

    /// Mutably borrow one layer.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Surface> {
        self.layers.get_mut(index)
    }

    /// Wipe every layer. Call once per frame before drawing into the group.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// Composite layers bottom to top onto `dst`, shifting each by `-pitch` on screen.
    pub fn draw(&self, dst: &mut Surface, transform: Affine, pitch: f64) -> StaxResult<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            let lift = Affine::translate(Vec2::new(0.0, -pitch * i as f64));
            dst.draw_surface(layer, &DrawImageOptions::at(lift * transform))?;
        }
        Ok(())
    }

    /// Release every layer buffer; returns how many were freed.
    pub fn destroy(mut self) -> usize {
        self.release()
    }

    fn release(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }
        self.destroyed = true;
        let n = self.layers.len();
        self.layers = Vec::new();
        tracing::debug!(layers = n, "vgroup released");
        n
    }
}

impl Drop for VGroup {
    fn drop(&mut self) {
        if !self.destroyed {
            tracing::debug!("vgroup dropped without explicit destroy");
            self.release();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/vgroup.rs"]
mod tests;
