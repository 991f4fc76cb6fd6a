use crate::{
    foundation::core::{Affine, Point, Positionable, Rotateable, Size, Vec2},
    render::options::RenderOptions,
};

const MIN_ZOOM: f64 = 0.25;
const MAX_ZOOM: f64 = 8.0;

/// World camera: position is what ends up at the centre of the screen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Camera {
    /// World point shown at the screen centre.
    pub position: Point,
    /// Rotation in radians.
    pub rotation: f64,
    /// Uniform scale.
    pub zoom: f64,
    /// Unzoomed per-slice offset.
    pub pitch: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            rotation: 0.0,
            zoom: 1.0,
            pitch: 1.0,
        }
    }
}

impl Camera {
    /// World to screen transform for a destination of `screen` size.
    pub fn affine(&self, screen: Size) -> Affine {
        let half = Vec2::new(screen.width * 0.5, screen.height * 0.5);
        Affine::translate(half)
            * Affine::scale(self.zoom)
            * Affine::rotate(self.rotation)
            * Affine::translate(-self.position.to_vec2())
    }

    /// Apply the camera on top of `opts.transform` and set the zoom-scaled pitch.
    pub fn transform(&self, opts: &mut RenderOptions) {
        opts.transform = self.affine(opts.screen) * opts.transform;
        opts.pitch = self.pitch * self.zoom;
    }

    /// Map a screen point back into world space.
    pub fn screen_to_world(&self, p: Point, screen: Size) -> Point {
        self.affine(screen).inverse() * p
    }

    /// Multiply the zoom by `factor`, clamped to a sane range.
    pub fn zoom_by(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

impl Positionable for Camera {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, p: Point) {
        self.position = p;
    }
}

impl Rotateable for Camera {
    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
