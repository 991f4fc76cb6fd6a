use super::*;
use crate::{
    assets::registry::StaxieId,
    foundation::core::{Point, Positionable, Rgba8Premul},
    staxie::model::{Staxie, StaxieBuilder},
};

/// 1x1 frames; a two-slice pillar with a red base and green top.
fn pillar() -> (AssetRegistry, StaxieId) {
    let mut reg = AssetRegistry::empty();
    let id = reg.insert_staxie("pillar", pillar_asset("pillar")).unwrap();
    (reg, id)
}

fn pillar_asset(stack: &str) -> Staxie {
    let builder = StaxieBuilder::new(1, 1)
        .stack(stack, 2)
        .animation("idle", 1, &[vec![0, 0], vec![0, 0]])
        .unwrap();
    let (w, h) = builder.sheet_size();
    let mut pixels = Vec::new();
    for _ in 0..h {
        pixels.extend_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);
    }
    let sheet = Surface::from_premul_rgba8(w, h, pixels).unwrap();
    builder.build_with_sheet(&sheet).unwrap()
}

fn stack_at(reg: &AssetRegistry, id: StaxieId, x: f64, y: f64) -> Stack {
    let mut s = Stack::new(reg, id, "", "").unwrap();
    s.set_position(Point::new(x, y));
    s
}

const SHADED_RED: Rgba8Premul = Rgba8Premul {
    r: 128,
    g: 0,
    b: 0,
    a: 255,
};
const SHADED_GREEN: Rgba8Premul = Rgba8Premul {
    r: 0,
    g: 128,
    b: 0,
    a: 255,
};

#[test]
fn rejects_empty_dimensions() {
    assert!(Story::new(0, 4, 2).is_err());
    assert!(Story::new(4, 4, 0).is_err());
    assert_eq!(Story::new(4, 4, 3).unwrap().depth(), 3);
}

#[test]
fn draw_requires_enter() {
    let (reg, id) = pillar();
    let mut story = Story::new(4, 4, 2).unwrap();
    story.push(stack_at(&reg, id, 2.5, 2.5));
    let mut target = Surface::new(4, 4);
    let opts = RenderOptions::new(target.size());
    let err = story.draw(&reg, &mut target, &opts, 0.0).unwrap_err();
    assert!(matches!(err, StaxError::Validation(_)));
}

#[test]
fn enter_and_leave_pair_up() {
    let mut story = Story::new(4, 4, 2).unwrap();
    assert!(!story.is_entered());
    story.enter().unwrap();
    story.enter().unwrap();
    assert!(story.is_entered());
    assert_eq!(story.leave(), 2);
    assert_eq!(story.leave(), 0);
    assert!(!story.is_entered());
}

#[test]
fn layers_are_lifted_by_pitch() {
    let (reg, id) = pillar();
    let mut story = Story::new(4, 4, 2).unwrap();
    story.push(stack_at(&reg, id, 2.5, 2.5));
    story.enter().unwrap();

    let mut target = Surface::new(4, 4);
    let opts = RenderOptions::new(target.size());
    story.draw(&reg, &mut target, &opts, 0.0).unwrap();
    assert_eq!(target.pixel(2, 2), Some(SHADED_RED));
    assert_eq!(target.pixel(2, 1), Some(SHADED_GREEN));
    assert_eq!(target.pixel(2, 3), Some(Rgba8Premul::transparent()));
}

#[test]
fn stacks_share_layers() {
    let (reg, id) = pillar();
    let mut story = Story::new(4, 4, 2).unwrap();
    // The second pillar's base sits where the first one's top is drawn.
    story.push(stack_at(&reg, id, 1.5, 2.5));
    story.push(stack_at(&reg, id, 1.5, 1.5));
    story.enter().unwrap();

    let mut target = Surface::new(4, 4);
    let opts = RenderOptions::new(target.size());
    story.draw(&reg, &mut target, &opts, 0.0).unwrap();
    // Layer 1 (green) composites above layer 0, so the top of the first pillar wins.
    assert_eq!(target.pixel(1, 1), Some(SHADED_GREEN));
    assert_eq!(target.pixel(1, 0), Some(SHADED_GREEN));
    assert_eq!(target.pixel(1, 2), Some(SHADED_RED));
}

#[test]
fn redraw_clears_previous_frame() {
    let (reg, id) = pillar();
    let mut story = Story::new(4, 4, 2).unwrap();
    story.push(stack_at(&reg, id, 2.5, 2.5));
    story.enter().unwrap();
    let mut target = Surface::new(4, 4);
    let opts = RenderOptions::new(target.size());
    story.draw(&reg, &mut target, &opts, 0.0).unwrap();

    story.stacks_mut()[0].set_position(Point::new(0.5, 3.5));
    target.clear();
    story.draw(&reg, &mut target, &opts, 0.0).unwrap();
    assert_eq!(target.pixel(2, 2), Some(Rgba8Premul::transparent()));
    assert_eq!(target.pixel(0, 3), Some(SHADED_RED));
}

#[test]
fn update_advances_every_stack() {
    let (reg, id) = pillar();
    let mut story = Story::new(4, 4, 2).unwrap();
    story.push(stack_at(&reg, id, 0.5, 0.5));
    story.push(stack_at(&reg, id, 1.5, 0.5));
    story.update(&reg).unwrap();
    assert!(story.stacks().iter().all(|s| s.frame_index() == 1));
}

#[test]
fn failing_stack_does_not_stall_the_others() {
    let (mut reg, id) = pillar();
    let rubble = reg.insert_staxie("rubble", pillar_asset("pillar")).unwrap();
    let mut story = Story::new(4, 4, 2).unwrap();
    story.push(stack_at(&reg, rubble, 0.5, 0.5));
    story.push(stack_at(&reg, id, 2.5, 2.5));

    reg.insert_staxie("rubble", pillar_asset("heap")).unwrap();
    let err = story.update(&reg).unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
    assert_eq!(story.stacks()[0].frame_index(), 0);
    assert_eq!(story.stacks()[1].frame_index(), 1);
}
