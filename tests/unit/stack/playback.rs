use super::*;
use crate::{foundation::core::Rgba8Premul, staxie::model::StaxieBuilder};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];

/// 1x1 slices; every frame row is red then green.
fn registry() -> (AssetRegistry, StaxieId) {
    let builder = StaxieBuilder::new(1, 1)
        .stack("tower", 2)
        .animation("idle", 3, &[vec![0, 0], vec![0, 0], vec![0, 0]])
        .unwrap()
        .animation("burn", 0, &[vec![0, 0], vec![0, 0]])
        .unwrap()
        .stack("ruin", 2)
        .animation("burn", 1, &[vec![0, 0]])
        .unwrap()
        .animation("collapse", 1, &[vec![0, 0]])
        .unwrap()
        .stack("empty", 1);
    let (w, h) = builder.sheet_size();
    let mut sheet = Surface::new(w, h);
    for y in 0..h {
        let mut red = Surface::new(1, 1);
        red.fill(Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
        let mut green = Surface::new(1, 1);
        green.fill(Rgba8Premul::from_straight_rgba(0, 255, 0, 255));
        let at = |x: f64| DrawImageOptions::at(Affine::translate((x, f64::from(y))));
        sheet.draw_surface(&red, &at(0.0)).unwrap();
        sheet.draw_surface(&green, &at(1.0)).unwrap();
    }
    let staxie = builder.build_with_sheet(&sheet).unwrap();
    let mut reg = AssetRegistry::empty();
    let id = reg.insert_staxie("tower", staxie).unwrap();
    (reg, id)
}

#[test]
fn empty_names_pick_first_entries() {
    let (reg, id) = registry();
    let s = Stack::new(&reg, id, "", "").unwrap();
    assert_eq!(s.stack_name(), "tower");
    assert_eq!(s.animation_name(), "idle");
    assert_eq!(s.frame_index(), 0);
}

#[test]
fn unknown_names_fail_construction() {
    let (reg, id) = registry();
    assert!(Stack::new(&reg, id, "castle", "").unwrap_err().is_not_found());
    assert!(Stack::new(&reg, id, "tower", "dance").unwrap_err().is_not_found());
    assert!(matches!(
        Stack::new(&reg, id, "empty", "").unwrap_err(),
        StaxError::NotFound { kind: "animation", .. }
    ));
}

#[test]
fn asset_without_frames_is_rejected() {
    let mut reg = AssetRegistry::empty();
    let id = reg
        .insert_staxie("bare", StaxieBuilder::new(1, 1).stack("s", 1).build())
        .unwrap();
    assert!(matches!(
        Stack::new(&reg, id, "", "").unwrap_err(),
        StaxError::Validation(_)
    ));
}

#[test]
fn update_loops_after_frame_time_times_frame_count() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    for _ in 0..(3 * 3 - 1) {
        s.update(&reg).unwrap();
    }
    assert_eq!(s.frame_index(), 2);
    s.update(&reg).unwrap();
    assert_eq!(s.frame_index(), 0);
    assert_eq!(s.ticks(), 0);
}

#[test]
fn zero_frame_time_advances_every_tick() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "burn").unwrap();
    s.update(&reg).unwrap();
    assert_eq!(s.frame_index(), 1);
    s.update(&reg).unwrap();
    assert_eq!(s.frame_index(), 0);
}

#[test]
fn set_stack_keeps_animation_when_available() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "burn").unwrap();
    s.update(&reg).unwrap();
    s.set_stack(&reg, "ruin").unwrap();
    assert_eq!(s.animation_name(), "burn");
    assert_eq!(s.frame_index(), 0);

    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    s.set_stack(&reg, "ruin").unwrap();
    assert_eq!(s.animation_name(), "burn");
    s.set_animation(&reg, "collapse").unwrap();
    s.set_stack(&reg, "tower").unwrap();
    assert_eq!(s.animation_name(), "idle");
}

#[test]
fn failed_setters_leave_cursor_untouched() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    s.set_frame(&reg, 2).unwrap();
    s.update(&reg).unwrap();

    assert!(s.set_stack(&reg, "castle").unwrap_err().is_not_found());
    assert!(s.set_stack(&reg, "empty").is_err());
    assert!(s.set_animation(&reg, "collapse").unwrap_err().is_not_found());
    assert!(s.set_frame(&reg, 3).unwrap_err().is_not_found());

    assert_eq!(s.stack_name(), "tower");
    assert_eq!(s.animation_name(), "idle");
    assert_eq!(s.frame_index(), 2);
    assert_eq!(s.ticks(), 1);
}

#[test]
fn slice_shade_darkens_lower_slices() {
    assert_eq!(slice_shade(0, 4), ColorScale::gray(0.5));
    assert_eq!(slice_shade(3, 4), ColorScale::gray(0.75));
    assert_eq!(slice_shade(9, 4), ColorScale::gray(1.0));
    assert!(slice_shade(0, 0).is_identity());
}

#[test]
fn draw_lifts_each_slice_by_pitch() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    s.set_origin(Vec2::ZERO);
    s.set_position(Point::new(4.0, 4.0));

    let mut target = Surface::new(10, 10);
    let mut opts = RenderOptions::new(target.size());
    opts.pitch = 2.0;
    s.draw(&reg, &mut target, &opts).unwrap();

    assert_eq!(target.pixel(4, 4).unwrap().to_array(), [128, 0, 0, 255]);
    assert_eq!(target.pixel(4, 2).unwrap().to_array(), [0, 128, 0, 255]);
    assert_eq!(target.pixel(4, 3).unwrap().to_array(), [0, 0, 0, 0]);
}

#[test]
fn draw_orbit_anchors_at_screen_centre() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    s.set_origin(Vec2::ZERO);
    s.set_position(Point::new(100.0, 100.0));

    let mut target = Surface::new(10, 10);
    let mut opts = RenderOptions::new(target.size());
    opts.pitch = 0.0;
    s.draw_orbit(&reg, &mut target, &opts, 3.0).unwrap();
    // Rotation 0 pushes the anchor along +x; the green slice covers the red one.
    assert_eq!(target.pixel(8, 5).unwrap().to_array(), [0, 128, 0, 255]);
    assert_eq!(target.pixel(5, 5).unwrap().to_array(), [0, 0, 0, 0]);
}

#[test]
fn draw_into_routes_slices_to_layers() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    s.set_origin(Vec2::ZERO);
    s.set_position(Point::new(1.0, 1.0));

    let mut group = VGroup::create(4, 4, 2).unwrap();
    s.draw_into(&reg, &mut group).unwrap();
    assert_eq!(group.layer(0).unwrap().pixel(1, 1).unwrap().to_array()[0], 128);
    assert_eq!(group.layer(1).unwrap().pixel(1, 1).unwrap().to_array()[1], 128);

    let mut shallow = VGroup::create(4, 4, 1).unwrap();
    s.draw_into(&reg, &mut shallow).unwrap();
    assert_eq!(shallow.layer(0).unwrap().pixel(1, 1).unwrap().to_array()[0], 128);
}

#[test]
fn set_size_scales_slices() {
    let (reg, id) = registry();
    let mut s = Stack::new(&reg, id, "tower", "idle").unwrap();
    s.set_origin(Vec2::ZERO);
    s.set_size(Size::new(3.0, 3.0));
    let mut target = Surface::new(6, 6);
    let mut opts = RenderOptions::new(target.size());
    opts.pitch = 0.0;
    s.draw(&reg, &mut target, &opts).unwrap();
    assert_eq!(target.pixel(2, 2).unwrap().to_array(), [0, 128, 0, 255]);
    assert_eq!(target.pixel(3, 3).unwrap().to_array(), [0, 0, 0, 0]);
}

#[test]
fn torn_down_registry_makes_update_fail() {
    let (mut reg, id) = registry();
    let mut s = Stack::new(&reg, id, "", "").unwrap();
    reg.teardown();
    assert!(s.update(&reg).unwrap_err().is_not_found());
}
