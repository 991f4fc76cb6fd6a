use super::*;
use crate::staxie::model::StaxieBuilder;

#[test]
fn slices_copy_their_sheet_region() {
    let mut staxie = StaxieBuilder::new(2, 1)
        .stack("s", 2)
        .animation("a", 1, &[vec![0, 0], vec![0, 0]])
        .unwrap()
        .build();

    // 4x2 sheet, pixel value encodes its coordinates.
    let mut data = Vec::new();
    for y in 0..2u8 {
        for x in 0..4u8 {
            data.extend_from_slice(&[x, y, 0, 255]);
        }
    }
    let sheet = Surface::from_premul_rgba8(4, 2, data).unwrap();
    acquire_slice_images(&mut staxie, &sheet).unwrap();

    let frames = &staxie.stack("s").unwrap().animation("a").unwrap().frames;
    let top = frames[1].slices[1].image().unwrap();
    assert_eq!((top.width(), top.height()), (2, 1));
    assert_eq!(top.pixel(0, 0).unwrap().to_array(), [2, 1, 0, 255]);
    assert_eq!(top.pixel(1, 0).unwrap().to_array(), [3, 1, 0, 255]);
}

#[test]
fn slice_outside_sheet_is_an_error() {
    let mut staxie = StaxieBuilder::new(4, 4)
        .stack("s", 1)
        .animation("a", 1, &[vec![0]])
        .unwrap()
        .build();
    let sheet = Surface::new(2, 2);
    assert!(acquire_slice_images(&mut staxie, &sheet).is_err());
}
