use super::*;
use crate::{render::text::BlockShaper, ui::button::Button};

fn layout(panel: &mut Panel, assets: &mut AssetRegistry, scale: f64) -> StaxResult<()> {
    let mut shaper = BlockShaper;
    let mut opts = LayoutOptions {
        scale,
        assets,
        shaper: &mut shaper,
    };
    panel.layout(Rect::new(0.0, 0.0, 64.0, 64.0), &mut opts)
}

fn draw(panel: &Panel, assets: &AssetRegistry, scale: f64, target: &mut Surface) {
    let mut shaper = BlockShaper;
    let mut ctx = DrawContext {
        target,
        transform: Affine::IDENTITY,
        scale,
        assets,
        shaper: &mut shaper,
    };
    panel.draw(&mut ctx).unwrap();
}

/// 3x3 atlas of 1px tiles; tile `i` (row-major) is grey level `10 * (i + 1)`.
fn one_pixel_atlas() -> Surface {
    let mut data = Vec::new();
    for i in 0..9u8 {
        let v = 10 * (i + 1);
        data.extend_from_slice(&[v, v, v, 255]);
    }
    Surface::from_premul_rgba8(3, 3, data).unwrap()
}

fn grey(v: u8) -> Rgba8Premul {
    Rgba8Premul {
        r: v,
        g: v,
        b: v,
        a: 255,
    }
}

#[test]
fn missing_atlas_draws_flat_colour() {
    let mut assets = AssetRegistry::empty();
    let mut panel = Panel::new(PanelStyle::Inset, Size::new(4.0, 4.0));
    layout(&mut panel, &mut assets, 1.0).unwrap();
    let mut target = Surface::new(6, 6);
    draw(&panel, &assets, 1.0, &mut target);
    assert_eq!(target.pixel(0, 0), Some(PanelStyle::Inset.fallback_color()));
    assert_eq!(target.pixel(3, 3), Some(PanelStyle::Inset.fallback_color()));
    assert_eq!(target.pixel(4, 4), Some(Rgba8Premul::transparent()));
}

#[test]
fn atlas_tiles_are_scaled_into_place() {
    let mut assets = AssetRegistry::empty();
    assets
        .insert_image(PanelStyle::Frame.atlas_path(), one_pixel_atlas())
        .unwrap();
    let mut panel = Panel::new(PanelStyle::Frame, Size::new(4.0, 3.0));
    panel.tile = 1;
    layout(&mut panel, &mut assets, 2.0).unwrap();
    assert_eq!(panel.size(), Size::new(8.0, 6.0));

    let mut target = Surface::new(8, 6);
    draw(&panel, &assets, 2.0, &mut target);
    // top-left corner, top edge (repeated twice), top-right corner
    assert_eq!(target.pixel(1, 1), Some(grey(10)));
    assert_eq!(target.pixel(2, 0), Some(grey(20)));
    assert_eq!(target.pixel(5, 1), Some(grey(20)));
    assert_eq!(target.pixel(7, 0), Some(grey(30)));
    assert_eq!(target.pixel(3, 3), Some(grey(50)));
    assert_eq!(target.pixel(0, 5), Some(grey(70)));
    assert_eq!(target.pixel(7, 5), Some(grey(90)));
}

#[test]
fn undersized_atlas_is_rejected() {
    let mut assets = AssetRegistry::empty();
    assets
        .insert_image(PanelStyle::Frame.atlas_path(), Surface::new(2, 2))
        .unwrap();
    let mut panel = Panel::new(PanelStyle::Frame, Size::new(4.0, 4.0));
    panel.tile = 1;
    let err = layout(&mut panel, &mut assets, 1.0).unwrap_err();
    assert!(matches!(err, StaxError::Validation(_)));
}

#[test]
fn children_sit_inside_padding() {
    let mut assets = AssetRegistry::empty();
    let mut panel = Panel::new(PanelStyle::Frame, Size::new(30.0, 30.0))
        .with_placement(Placement::at(5.0, 5.0))
        .with_padding(4.0)
        .with_child(Button::new(Size::new(6.0, 6.0)).with_id("ok"));
    layout(&mut panel, &mut assets, 1.0).unwrap();
    assert_eq!(panel.content_rect(1.0), Rect::new(9.0, 9.0, 31.0, 31.0));
    assert_eq!(panel.children[0].position(), Point::new(9.0, 9.0));
}

#[test]
fn children_are_checked_before_the_panel() {
    let mut assets = AssetRegistry::empty();
    let mut panel = Panel::new(PanelStyle::Frame, Size::new(30.0, 30.0))
        .with_child(Button::new(Size::new(10.0, 10.0)).with_id("ok"));
    layout(&mut panel, &mut assets, 1.0).unwrap();

    assert!(panel.check(5.0, 5.0, CheckKind::Click));
    assert!(panel.children[0].as_button_mut().unwrap().take_clicked());

    assert!(panel.check(20.0, 20.0, CheckKind::Click));
    assert!(!panel.children[0].as_button_mut().unwrap().take_clicked());

    assert!(!panel.check(40.0, 40.0, CheckKind::Click));
}
