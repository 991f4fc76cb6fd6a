use super::*;
use crate::{
    foundation::core::Rgba8Premul,
    staxie::{encode::encode_staxie_png, model::StaxieBuilder},
};

fn staxie_png(stack: &str, shade: u8) -> Vec<u8> {
    let mut sheet = Surface::new(4, 2);
    sheet.fill(Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    let staxie = StaxieBuilder::new(2, 2)
        .stack(stack, 2)
        .animation("idle", 1, &[vec![shade, shade]])
        .unwrap()
        .build();
    encode_staxie_png(&staxie, &sheet).unwrap()
}

fn image_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn registry() -> AssetRegistry {
    let src = MemorySource::new()
        .with_file("stax/tree.png", staxie_png("tree", 1))
        .unwrap()
        .with_file("ui/panel.png", image_png())
        .unwrap()
        .with_file("fonts/a.ttf", vec![0u8; 4])
        .unwrap();
    AssetRegistry::init(src)
}

#[test]
fn loads_are_memoized() {
    let mut reg = registry();
    let a = reg.load_staxie("stax/tree.png").unwrap();
    let b = reg.load_staxie("./stax/tree.png").unwrap();
    assert_eq!(a, b);

    let stats = reg.stats();
    assert_eq!(stats.staxies, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert!(reg.staxie(a).unwrap().stack("tree").is_some());
}

#[test]
fn generic_load_dispatches_by_kind() {
    let mut reg = registry();
    let img = reg.load(AssetKind::Image, "ui/panel.png").unwrap();
    let AssetRef::Image(id) = img else {
        panic!("expected image ref, got {img:?}");
    };
    assert_eq!(reg.image(id).unwrap().width(), 3);

    let font = reg.load(AssetKind::Font, "fonts/a.ttf").unwrap();
    let AssetRef::Font(id) = font else {
        panic!("expected font ref, got {font:?}");
    };
    assert_eq!(reg.font(id).unwrap().len(), 4);
}

#[test]
fn missing_asset_reports_kind_and_path() {
    let mut reg = registry();
    let err = reg.load_staxie("stax/nope.png").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "staxie 'stax/nope.png' not found");
}

#[test]
fn corrupt_staxie_surfaces_decode_error() {
    let src = MemorySource::new()
        .with_file("bad.png", image_png())
        .unwrap();
    let mut reg = AssetRegistry::init(src);
    let err = reg.load_staxie("bad.png").unwrap_err();
    assert!(matches!(
        err,
        StaxError::Decode(crate::foundation::error::DecodeError::UnknownSection(_))
    ));
    assert_eq!(reg.stats().staxies, 0);
}

#[test]
fn teardown_invalidates_handles() {
    let mut reg = registry();
    let id = reg.load_staxie("stax/tree.png").unwrap();
    reg.teardown();
    assert!(reg.staxie(id).unwrap_err().is_not_found());
    assert_eq!(reg.stats().staxies, 0);

    let again = reg.load_staxie("stax/tree.png").unwrap();
    assert_ne!(id, again);
    assert!(reg.staxie(again).is_ok());
}

#[test]
fn insert_replaces_in_place() {
    let mut reg = AssetRegistry::empty();
    let first = StaxieBuilder::new(1, 1).stack("a", 1).build();
    let second = StaxieBuilder::new(1, 1).stack("b", 1).build();
    let id = reg.insert_staxie("mem/x", first).unwrap();
    let id2 = reg.insert_staxie("mem/x", second).unwrap();
    assert_eq!(id, id2);
    assert!(reg.staxie(id).unwrap().stack("b").is_some());
    assert_eq!(reg.staxie_id("mem/x"), Some(id));
    assert_eq!(reg.staxie_id("mem/y"), None);
}

#[test]
fn insert_rejects_ragged_frames() {
    use crate::staxie::model::{StaxieAnimation, StaxieFrame, StaxieStack};

    let mut stack = StaxieStack::new("a", 2);
    stack.push_animation(StaxieAnimation {
        name: "x".to_string(),
        frame_time: 1,
        frames: vec![StaxieFrame::default()],
    });
    let mut staxie = Staxie::new(1, 1);
    staxie.push_stack(stack);

    let mut reg = AssetRegistry::empty();
    let err = reg.insert_staxie("ragged", staxie).unwrap_err();
    assert!(matches!(err, StaxError::Validation(_)));
    assert_eq!(reg.stats().staxies, 0);
}

#[test]
fn reload_keeps_handles_pointing_at_new_data() {
    let root = std::env::temp_dir().join(format!("stax_reload_{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("tree.png"), staxie_png("tree", 1)).unwrap();

    let mut reg = AssetRegistry::init(crate::assets::source::DirSource::new(&root));
    let id = reg.load_staxie("tree.png").unwrap();
    let shade = |reg: &AssetRegistry| {
        reg.staxie(id).unwrap().first_stack().unwrap().animations()[0].frames[0].slices[0].shading
    };
    assert_eq!(shade(&reg), 1);

    std::fs::write(root.join("tree.png"), staxie_png("tree", 9)).unwrap();
    assert_eq!(shade(&reg), 1);
    let reloaded = reg.reload_staxie("tree.png").unwrap();
    assert_eq!(reloaded, id);
    assert_eq!(shade(&reg), 9);

    std::fs::write(root.join("tree.png"), b"garbage").unwrap();
    assert!(reg.reload_staxie("tree.png").is_err());
    assert_eq!(shade(&reg), 9);

    let _ = std::fs::remove_dir_all(&root);
}
