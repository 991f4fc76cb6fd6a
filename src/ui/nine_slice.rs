use crate::foundation::core::PixelRect;

/// Which of the nine atlas tiles a piece is cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Top-left corner.
    TopLeft,
    /// Top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge.
    Left,
    /// Interior.
    Center,
    /// Right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

/// Corner, edge or centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCategory {
    /// One of the four corners.
    Corner,
    /// One of the four repeating edges.
    Edge,
    /// The repeating interior.
    Center,
}

impl TileKind {
    /// All tiles in atlas row-major order.
    pub const ALL: [TileKind; 9] = [
        TileKind::TopLeft,
        TileKind::Top,
        TileKind::TopRight,
        TileKind::Left,
        TileKind::Center,
        TileKind::Right,
        TileKind::BottomLeft,
        TileKind::Bottom,
        TileKind::BottomRight,
    ];

    /// Column and row of this tile in a 3x3 atlas.
    pub fn cell(self) -> (u32, u32) {
        match self {
            TileKind::TopLeft => (0, 0),
            TileKind::Top => (1, 0),
            TileKind::TopRight => (2, 0),
            TileKind::Left => (0, 1),
            TileKind::Center => (1, 1),
            TileKind::Right => (2, 1),
            TileKind::BottomLeft => (0, 2),
            TileKind::Bottom => (1, 2),
            TileKind::BottomRight => (2, 2),
        }
    }

    /// Corner, edge or centre.
    pub fn category(self) -> TileCategory {
        match self {
            TileKind::TopLeft | TileKind::TopRight | TileKind::BottomLeft | TileKind::BottomRight => {
                TileCategory::Corner
            }
            TileKind::Center => TileCategory::Center,
            _ => TileCategory::Edge,
        }
    }

    /// Atlas region of this tile for a square tile size.
    pub fn atlas_rect(self, tile: u32) -> PixelRect {
        let (c, r) = self.cell();
        PixelRect::new(c * tile, r * tile, tile, tile)
    }
}

/// One draw of a nine-slice panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NinePiece {
    /// Tile the piece comes from.
    pub kind: TileKind,
    /// Destination relative to the panel's top-left.
    pub dst: PixelRect,
    /// Region inside the tile (tile-local coordinates), same size as `dst`.
    pub src: PixelRect,
}

/// Decompose a `width x height` panel into tile pieces for a square `tile`.
///
/// Corners sit at the exact panel corners; edges and centre repeat between them. The last piece
/// of a run is clipped to what is left, so pieces never overlap and never leave the panel. When
/// the panel is narrower (or shorter) than two tiles the corners share the span and no edge or
/// centre pieces exist along that axis.
pub fn nine_slice_pieces(width: u32, height: u32, tile: u32) -> Vec<NinePiece> {
    if width == 0 || height == 0 || tile == 0 {
        return Vec::new();
    }
    let left = tile.min(width / 2);
    let right = tile.min(width - left);
    let top = tile.min(height / 2);
    let bottom = tile.min(height - top);

    // (start, length, offset inside tile) along each axis for the three bands.
    let cols = [
        (0, left, 0),
        (left, width - left - right, 0),
        (width - right, right, tile - right),
    ];
    let rows = [
        (0, top, 0),
        (top, height - top - bottom, 0),
        (height - bottom, bottom, tile - bottom),
    ];

    let mut out = Vec::new();
    for (ri, &(y0, h, sy)) in rows.iter().enumerate() {
        for (ci, &(x0, w, sx)) in cols.iter().enumerate() {
            let kind = TileKind::ALL[ri * 3 + ci];
            for (x, pw) in runs(x0, w, if ci == 1 { tile } else { w }) {
                for (y, ph) in runs(y0, h, if ri == 1 { tile } else { h }) {
                    out.push(NinePiece {
                        kind,
                        dst: PixelRect::new(x, y, pw, ph),
                        src: PixelRect::new(sx, sy, pw, ph),
                    });
                }
            }
        }
    }
    out
}

/// Split `[start, start + len)` into steps of `step`, clipping the last one.
fn runs(start: u32, len: u32, step: u32) -> impl Iterator<Item = (u32, u32)> {
    let step = step.max(1);
    (0..len.div_ceil(step)).map(move |i| {
        let at = i * step;
        (start + at, step.min(len - at))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/ui/nine_slice.rs"]
mod tests;
