pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Source-over for premultiplied RGBA8.
pub(crate) fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let inv = 255u16 - u16::from(src[3]);
    if inv == 0 {
        return src;
    }
    [
        src[0].saturating_add(mul_div255_u8(u16::from(dst[0]), inv)),
        src[1].saturating_add(mul_div255_u8(u16::from(dst[1]), inv)),
        src[2].saturating_add(mul_div255_u8(u16::from(dst[2]), inv)),
        src[3].saturating_add(mul_div255_u8(u16::from(dst[3]), inv)),
    ]
}

pub(crate) fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| -> u8 {
        let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
        v.min(255) as u8
    };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
