use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 128), 64);
}

#[test]
fn over_opaque_source_replaces() {
    assert_eq!(over([10, 20, 30, 255], [1, 2, 3, 255]), [1, 2, 3, 255]);
}

#[test]
fn over_transparent_source_keeps_destination() {
    assert_eq!(over([10, 20, 30, 255], [0, 0, 0, 0]), [10, 20, 30, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let out = over([0, 0, 200, 255], [100, 0, 0, 128]);
    assert_eq!(out, [100, 0, 100, 255]);
}

#[test]
fn unpremultiply_inverts_premultiply() {
    assert_eq!(unpremultiply([100, 50, 0, 128]), [199, 100, 0, 128]);
    assert_eq!(unpremultiply([9, 9, 9, 0]), [0, 0, 0, 0]);
}
