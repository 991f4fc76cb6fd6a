use crate::foundation::math::mul_div255_u8;

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        Self {
            r: mul_div255_u8(u16::from(r), a16),
            g: mul_div255_u8(u16::from(g), a16),
            b: mul_div255_u8(u16::from(b), a16),
            a,
        }
    }

    /// Pixel as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Per-channel multiplier applied to source pixels while drawing.
///
/// Channels are straight (not premultiplied) factors in `[0, 1]`; the alpha factor also scales
/// the premultiplied colour channels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorScale {
    /// Red factor.
    pub r: f32,
    /// Green factor.
    pub g: f32,
    /// Blue factor.
    pub b: f32,
    /// Alpha factor.
    pub a: f32,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorScale {
    /// Leaves pixels untouched.
    pub const IDENTITY: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Uniform grey scale (`v` on each colour channel, alpha untouched).
    pub fn gray(v: f32) -> Self {
        let v = v.clamp(0.0, 1.0);
        Self {
            r: v,
            g: v,
            b: v,
            a: 1.0,
        }
    }

    /// Same colour factors with a replaced alpha factor.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Return `true` when applying this scale is a no-op.
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Scale a premultiplied pixel.
    pub fn apply(self, px: [u8; 4]) -> [u8; 4] {
        if self.is_identity() {
            return px;
        }
        let q = |c: u8, f: f32| -> u8 { (f32::from(c) * f).round().clamp(0.0, 255.0) as u8 };
        [
            q(px[0], self.r * self.a),
            q(px[1], self.g * self.a),
            q(px[2], self.b * self.a),
            q(px[3], self.a),
        ]
    }
}

/// Integer pixel region inside a [`crate::Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Build a region from origin and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, `None` on overflow.
    pub fn right(self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` on overflow.
    pub fn bottom(self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// Return `true` when the region has no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Something with a 2D position.
pub trait Positionable {
    /// Current position.
    fn position(&self) -> Point;
    /// Move to `p`.
    fn set_position(&mut self, p: Point);
}

/// Something with a rotation in radians.
pub trait Rotateable {
    /// Current rotation in radians.
    fn rotation(&self) -> f64;
    /// Replace the rotation.
    fn set_rotation(&mut self, radians: f64);
}

/// Something with a 2D size.
pub trait Sizeable {
    /// Current size.
    fn size(&self) -> Size;
    /// Replace the size.
    fn set_size(&mut self, size: Size);
}

/// Something with a local origin (pivot) offset.
pub trait Originable {
    /// Pivot in local space.
    fn origin(&self) -> Vec2;
    /// Replace the pivot.
    fn set_origin(&mut self, origin: Vec2);
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
