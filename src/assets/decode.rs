use anyhow::Context;

use crate::{foundation::error::StaxResult, render::surface::Surface};

/// Decode any raster format the `image` crate understands into a premultiplied surface.
pub fn decode_image(bytes: &[u8]) -> StaxResult<Surface> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(Surface::from_rgba_image(&dyn_img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
