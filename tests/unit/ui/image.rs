use super::*;
use crate::{
    assets::registry::AssetRegistry,
    foundation::core::Rgba8Premul,
    render::{surface::Surface, text::BlockShaper},
};

fn assets() -> AssetRegistry {
    let mut gem = Surface::new(3, 2);
    gem.fill(Rgba8Premul::from_straight_rgba(0, 0, 255, 255));
    let mut reg = AssetRegistry::empty();
    reg.insert_image("ui/gem.png", gem).unwrap();
    reg
}

fn layout(widget: &mut ImageWidget, assets: &mut AssetRegistry, scale: f64) -> StaxResult<()> {
    let mut shaper = BlockShaper;
    let mut opts = LayoutOptions {
        scale,
        assets,
        shaper: &mut shaper,
    };
    widget.layout(Rect::new(0.0, 0.0, 64.0, 64.0), &mut opts)
}

#[test]
fn natural_size_follows_the_image_times_scale() {
    let mut reg = assets();
    let mut w = ImageWidget::new("ui/gem.png");
    assert!(w.image().is_none());
    layout(&mut w, &mut reg, 1.0).unwrap();
    assert_eq!(w.size(), Size::new(3.0, 2.0));
    assert!(w.image().is_some());

    layout(&mut w, &mut reg, 3.0).unwrap();
    assert_eq!(w.size(), Size::new(9.0, 6.0));
}

#[test]
fn explicit_size_overrides_the_image_and_scales() {
    let mut reg = assets();
    let mut w = ImageWidget::new("ui/gem.png")
        .with_size(Size::new(5.0, 5.0))
        .with_placement(Placement::at(1.0, 2.0));
    layout(&mut w, &mut reg, 2.0).unwrap();
    assert_eq!(w.bounds(), Rect::new(2.0, 4.0, 12.0, 14.0));
}

#[test]
fn missing_asset_fails_layout() {
    let mut reg = AssetRegistry::empty();
    let mut w = ImageWidget::new("ui/absent.png");
    let err = layout(&mut w, &mut reg, 1.0).unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

#[test]
fn draw_before_layout_is_a_no_op() {
    let reg = assets();
    let w = ImageWidget::new("ui/gem.png");
    let mut shaper = BlockShaper;
    let mut target = Surface::new(4, 4);
    let mut ctx = DrawContext {
        target: &mut target,
        transform: Affine::IDENTITY,
        scale: 1.0,
        assets: &reg,
        shaper: &mut shaper,
    };
    w.draw(&mut ctx).unwrap();
    assert!(target.data().iter().all(|&b| b == 0));
}

#[test]
fn draw_applies_tint_and_stretches() {
    let mut reg = assets();
    let mut w = ImageWidget::new("ui/gem.png").with_size(Size::new(6.0, 4.0));
    w.color_scale = ColorScale::gray(0.5);
    layout(&mut w, &mut reg, 1.0).unwrap();

    let mut shaper = BlockShaper;
    let mut target = Surface::new(8, 8);
    let mut ctx = DrawContext {
        target: &mut target,
        transform: Affine::IDENTITY,
        scale: 1.0,
        assets: &reg,
        shaper: &mut shaper,
    };
    w.draw(&mut ctx).unwrap();
    assert_eq!(target.pixel(5, 3).unwrap().to_array(), [0, 0, 128, 255]);
    assert_eq!(target.pixel(6, 3).unwrap().a, 0);
    assert_eq!(target.pixel(5, 4).unwrap().a, 0);
}
