use crate::{
    foundation::{
        core::PixelRect,
        error::{StaxError, StaxResult},
    },
    render::surface::Surface,
    staxie::model::Staxie,
};

/// Copy every slice's region out of `sheet` into an owned surface.
pub fn acquire_slice_images(staxie: &mut Staxie, sheet: &Surface) -> StaxResult<()> {
    let fw = u32::from(staxie.frame_width);
    let fh = u32::from(staxie.frame_height);
    let mut acquired = 0usize;
    for slice in staxie.slices_mut() {
        let region = PixelRect::new(slice.x, slice.y, fw, fh);
        let image = sheet.sub_image(region).map_err(|_| {
            StaxError::validation(format!(
                "slice at ({}, {}) exceeds {}x{} sheet",
                slice.x,
                slice.y,
                sheet.width(),
                sheet.height()
            ))
        })?;
        slice.image = Some(image);
        acquired += 1;
    }
    tracing::debug!(acquired, "staxie slices acquired");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/staxie/slices.rs"]
mod tests;
