use super::*;
use crate::{
    assets::registry::AssetRegistry,
    foundation::core::Rgba8Premul,
    render::{surface::Surface, text::BlockShaper},
};

fn style() -> TextStyle {
    TextStyle {
        size_px: 10.0,
        line_height: 1.0,
        color: [255, 0, 0, 255],
    }
}

fn layout(label: &mut TextWidget, scale: f64) {
    let mut assets = AssetRegistry::empty();
    let mut shaper = BlockShaper;
    let mut opts = LayoutOptions {
        scale,
        assets: &mut assets,
        shaper: &mut shaper,
    };
    label
        .layout(Rect::new(0.0, 0.0, 100.0, 50.0), &mut opts)
        .unwrap();
}

#[test]
fn set_text_remeasures_on_next_layout() {
    let mut label = TextWidget::new("ab").with_style(style());
    assert!(label.needs_layout());
    layout(&mut label, 1.0);
    assert!(!label.needs_layout());
    assert_eq!(label.size(), Size::new(12.0, 10.0));

    label.set_text("ab");
    assert!(!label.needs_layout());

    label.set_text("abcd");
    assert!(label.needs_layout());
    assert_eq!(label.size(), Size::new(12.0, 10.0));
    layout(&mut label, 1.0);
    assert_eq!(label.text(), "abcd");
    assert_eq!(label.size(), Size::new(24.0, 10.0));
}

#[test]
fn layout_scales_and_places_the_label() {
    let mut label = TextWidget::new("ab")
        .with_style(style())
        .with_placement(Placement::at(3.0, 1.0));
    layout(&mut label, 2.0);
    assert_eq!(label.bounds(), Rect::new(6.0, 2.0, 30.0, 22.0));
}

#[test]
fn text_never_claims_hits() {
    let mut label = TextWidget::new("ab").with_style(style());
    layout(&mut label, 1.0);
    assert!(!label.check(1.0, 1.0, CheckKind::Click));
    assert!(!label.check(1.0, 1.0, CheckKind::Hover));
}

#[test]
fn draw_paints_at_the_laid_out_origin() {
    let mut label = TextWidget::new("a")
        .with_style(style())
        .with_placement(Placement::at(2.0, 3.0));
    layout(&mut label, 1.0);

    let assets = AssetRegistry::empty();
    let mut shaper = BlockShaper;
    let mut target = Surface::new(16, 16);
    let mut ctx = DrawContext {
        target: &mut target,
        transform: Affine::IDENTITY,
        scale: 1.0,
        assets: &assets,
        shaper: &mut shaper,
    };
    label.draw(&mut ctx).unwrap();
    let red = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    assert_eq!(target.pixel(2, 3), Some(red));
    assert_eq!(target.pixel(1, 3), Some(Rgba8Premul::transparent()));
    assert_eq!(target.pixel(2, 2), Some(Rgba8Premul::transparent()));
}
