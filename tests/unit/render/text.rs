use super::*;

#[test]
fn block_shaper_measures_fixed_advance() {
    let mut shaper = BlockShaper;
    let style = TextStyle {
        size_px: 10.0,
        line_height: 1.5,
        color: [255, 255, 255, 255],
    };
    let size = shaper.measure("abcd", &style).unwrap();
    assert!((size.width - 24.0).abs() < 1e-3);
    assert!((size.height - 15.0).abs() < 1e-3);

    let two = shaper.measure("ab\nabcdef", &style).unwrap();
    assert!((two.width - 36.0).abs() < 1e-3);
    assert!((two.height - 30.0).abs() < 1e-3);
}

#[test]
fn block_shaper_rejects_bad_size() {
    let mut shaper = BlockShaper;
    let style = TextStyle {
        size_px: 0.0,
        ..TextStyle::default()
    };
    assert!(shaper.measure("x", &style).is_err());
}

#[test]
fn block_shaper_draws_glyph_blocks_and_skips_spaces() {
    let mut shaper = BlockShaper;
    let style = TextStyle {
        size_px: 10.0,
        line_height: 1.0,
        color: [255, 0, 0, 255],
    };
    let mut target = Surface::new(20, 10);
    shaper
        .draw(&mut target, "a b", &style, Affine::IDENTITY)
        .unwrap();
    assert_eq!(target.pixel(0, 0).unwrap().r, 255);
    assert_eq!(target.pixel(7, 0).unwrap().a, 0);
    assert_eq!(target.pixel(12, 0).unwrap().r, 255);
}

#[test]
fn scaled_style_multiplies_size() {
    let s = TextStyle::default().scaled(2.0);
    assert_eq!(s.size_px, 24.0);
}

fn fixture_font() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/fonts/DejaVuSansMono.ttf"
    ))
    .unwrap()
}

#[test]
fn parley_shaper_rejects_non_font_bytes() {
    let err = ParleyShaper::new(b"not a font".to_vec()).unwrap_err();
    assert!(matches!(err, StaxError::Validation(_)), "{err:?}");
}

#[test]
fn parley_shaper_exposes_family_from_bytes() {
    let shaper = ParleyShaper::new(fixture_font()).unwrap();
    assert_eq!(shaper.family_name(), "DejaVu Sans Mono");
}

#[test]
fn parley_shaper_measures_and_draws_inside_its_box() {
    let mut shaper = ParleyShaper::new(fixture_font()).unwrap();
    let style = TextStyle {
        size_px: 16.0,
        line_height: 1.0,
        color: [255, 255, 255, 255],
    };
    let size = shaper.measure("Stax", &style).unwrap();
    assert!(size.width > 0.0 && size.height > 0.0, "{size:?}");
    let wider = shaper.measure("Stax tower", &style).unwrap();
    assert!(wider.width > size.width);

    let mut target = Surface::new(96, 48);
    let (ox, oy) = (4u32, 6u32);
    shaper
        .draw(
            &mut target,
            "Stax",
            &style,
            Affine::translate((f64::from(ox), f64::from(oy))),
        )
        .unwrap();

    let x1 = ox + size.width.ceil() as u32;
    let y1 = oy + size.height.ceil() as u32;
    let mut inside = 0;
    for y in 0..target.height() {
        for x in 0..target.width() {
            let a = target.pixel(x, y).unwrap().a;
            if a == 0 {
                continue;
            }
            assert!(x >= ox && x < x1 && y >= oy && y < y1, "ink at ({x}, {y})");
            inside += 1;
        }
    }
    assert!(inside > 0);
}

#[test]
fn parley_shaper_rejects_bad_size() {
    let mut shaper = ParleyShaper::new(fixture_font()).unwrap();
    let style = TextStyle {
        size_px: f32::NAN,
        ..TextStyle::default()
    };
    assert!(shaper.measure("x", &style).is_err());
}
