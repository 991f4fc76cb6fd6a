use crate::foundation::{
    core::{Affine, ColorScale, PixelRect, Point, Rect, Rgba8Premul, Size},
    error::{StaxError, StaxResult},
    math::{over, unpremultiply},
};

/// Transform and colour scale used when drawing one surface into another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawImageOptions {
    /// Maps source pixel space into destination pixel space.
    pub transform: Affine,
    /// Multiplier applied to each sampled source pixel.
    pub color_scale: ColorScale,
}

impl Default for DrawImageOptions {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            color_scale: ColorScale::IDENTITY,
        }
    }
}

impl DrawImageOptions {
    /// Options with the given transform and no colour scaling.
    pub fn at(transform: Affine) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }
}

/// Owned 2D pixel buffer in premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Surface {
    /// Allocate a fully transparent `width x height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> StaxResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StaxError::validation("surface size overflow"))?;
        if data.len() != expected {
            return Err(StaxError::validation(format!(
                "surface expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert a straight-alpha image into a premultiplied surface.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for px in img.pixels() {
            let [r, g, b, a] = px.0;
            data.extend_from_slice(&Rgba8Premul::from_straight_rgba(r, g, b, a).to_array());
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Convert back to a straight-alpha image (for PNG output).
    pub fn to_rgba_image(&self) -> StaxResult<image::RgbaImage> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| StaxError::render("surface bytes do not match dimensions"))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels as floating point.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Copy `region` out into a new, exclusively owned surface.
    pub fn sub_image(&self, region: PixelRect) -> StaxResult<Surface> {
        self.check_region(region)?;
        let mut out = Surface::new(region.width, region.height);
        let row_bytes = (region.width as usize) * 4;
        for row in 0..region.height {
            let src = self.index(region.x, region.y + row);
            let dst = (row as usize) * row_bytes;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        Ok(out)
    }

    /// Draw all of `src` with `opts`.
    pub fn draw_surface(&mut self, src: &Surface, opts: &DrawImageOptions) -> StaxResult<()> {
        let region = PixelRect::new(0, 0, src.width, src.height);
        self.blit(src, region, opts)
    }

    /// Draw `region` of `src` with `opts`; the region's top-left maps to local `(0, 0)`.
    pub fn draw_surface_region(
        &mut self,
        src: &Surface,
        region: PixelRect,
        opts: &DrawImageOptions,
    ) -> StaxResult<()> {
        src.check_region(region)?;
        self.blit(src, region, opts)
    }

    /// Rasterise the transformed region with `vello_cpu` into a scratch pixmap covering the
    /// clipped destination box, then composite that onto `self`.
    fn blit(&mut self, src: &Surface, region: PixelRect, opts: &DrawImageOptions) -> StaxResult<()> {
        if region.is_empty() || self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let transform = opts.transform;
        if transform.as_coeffs().iter().any(|c| !c.is_finite())
            || transform.determinant().abs() < f64::EPSILON
        {
            return Ok(());
        }
        let opacity = opts.color_scale.a.min(1.0);
        if opacity.is_nan() || opacity <= 0.0 {
            return Ok(());
        }

        let rw = f64::from(region.width);
        let rh = f64::from(region.height);
        let bbox = transform
            .transform_rect_bbox(Rect::new(0.0, 0.0, rw, rh))
            .intersect(Rect::from_origin_size(Point::ORIGIN, self.size()));
        let x0 = bbox.x0.floor() as u32;
        let y0 = bbox.y0.floor() as u32;
        let x1 = (bbox.x1.ceil() as u32).min(self.width);
        let y1 = (bbox.y1.ceil() as u32).min(self.height);
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let w = to_u16(x1 - x0, "draw width")?;
        let h = to_u16(y1 - y0, "draw height")?;

        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(
                src.region_pixmap(region, opts.color_scale.with_alpha(1.0))?,
            )),
            sampler: vello_cpu::peniko::ImageSampler {
                quality: vello_cpu::peniko::ImageQuality::Low,
                ..vello_cpu::peniko::ImageSampler::default()
            },
        };

        let local = Affine::translate((-f64::from(x0), -f64::from(y0))) * transform;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(affine_to_cpu(local));
        ctx.set_paint(paint);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, rw, rh));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        ctx.flush();
        let mut scratch = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut scratch);

        self.composite_over(scratch.data_as_u8_slice(), x0, y0, u32::from(w));
        Ok(())
    }

    /// Copy `region` into a pixmap, tinting each pixel by `tint`.
    fn region_pixmap(&self, region: PixelRect, tint: ColorScale) -> StaxResult<vello_cpu::Pixmap> {
        let w = to_u16(region.width, "image width")?;
        let h = to_u16(region.height, "image height")?;
        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
        for y in region.y..region.y + region.height {
            let row = self.index(region.x, y);
            for px in self.data[row..row + (region.width as usize) * 4].chunks_exact(4) {
                let [r, g, b, a] = tint.apply([px[0], px[1], px[2], px[3]]);
                may_have_opacities |= a != 255;
                pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
            }
        }
        Ok(vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            w,
            h,
            may_have_opacities,
        ))
    }

    /// Source-over a tightly packed premultiplied buffer `width` pixels wide at `(x0, y0)`.
    fn composite_over(&mut self, rgba: &[u8], x0: u32, y0: u32, width: u32) {
        let row_bytes = (width as usize) * 4;
        for (row, src) in rgba.chunks_exact(row_bytes).enumerate() {
            let di = self.index(x0, y0 + row as u32);
            let dst = &mut self.data[di..di + row_bytes];
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                if s[3] == 0 {
                    continue;
                }
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
    }

    fn check_region(&self, region: PixelRect) -> StaxResult<()> {
        let fits = matches!(
            (region.right(), region.bottom()),
            (Some(r), Some(b)) if r <= self.width && b <= self.height
        );
        if !fits {
            return Err(StaxError::validation(format!(
                "region {}x{}+{}+{} exceeds {}x{} surface",
                region.width, region.height, region.x, region.y, self.width, self.height
            )));
        }
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

fn to_u16(v: u32, what: &str) -> StaxResult<u16> {
    u16::try_from(v).map_err(|_| StaxError::render(format!("{what} {v} exceeds {}", u16::MAX)))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
