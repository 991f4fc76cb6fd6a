use crate::foundation::core::{Affine, Size};

/// World-space draw state threaded from the camera into stacks and vgroups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// World to screen transform (the camera's GeoM).
    pub transform: Affine,
    /// Effective per-slice vertical offset in screen pixels.
    pub pitch: f64,
    /// Destination size in pixels.
    pub screen: Size,
}

impl RenderOptions {
    /// Identity transform, unit pitch.
    pub fn new(screen: Size) -> Self {
        Self {
            transform: Affine::IDENTITY,
            pitch: 1.0,
            screen,
        }
    }
}
