use super::*;
use crate::{
    foundation::core::{Positionable, Size},
    game::input::{ScriptedEvent, ScriptedInput},
    render::text::BlockShaper,
    staxie::model::StaxieBuilder,
};

fn assets() -> AssetRegistry {
    let builder = StaxieBuilder::new(1, 1)
        .stack("pillar", 2)
        .animation("idle", 2, &[vec![0, 0], vec![0, 0]])
        .unwrap();
    let sheet = Surface::from_premul_rgba8(
        2,
        2,
        [255, 0, 0, 255, 0, 255, 0, 255].repeat(2),
    )
    .unwrap();
    let mut reg = AssetRegistry::empty();
    reg.insert_staxie("stax/pillar.png", builder.build_with_sheet(&sheet).unwrap())
        .unwrap();
    reg
}

const SCENE: &str = r#"{
    "screen": { "width": 8, "height": 8 },
    "clear": [0, 0, 255, 255],
    "story": { "width": 4, "height": 4, "depth": 2 },
    "stories": [
        { "stacks": [ { "asset": "stax/pillar.png", "position": { "x": 2.5, "y": 2.5 } } ] }
    ],
    "ui": [
        { "type": "button", "id": "go", "size": { "width": 2, "height": 2 }, "style": null,
          "placement": { "align_x": "end", "align_y": "start" } }
    ]
}"#;

fn game() -> Game {
    let config = SceneConfig::from_json_str(SCENE).unwrap();
    Game::from_config(&config, assets(), Box::new(BlockShaper)).unwrap()
}

fn click_at(x: f64, y: f64) -> ScriptedInput {
    let mut input = ScriptedInput::new(vec![ScriptedEvent {
        tick: 0,
        cursor: Point::new(x, y),
        click: Some(MouseButton::Left),
    }]);
    input.seek(0);
    input
}

#[test]
fn from_config_builds_world_and_ui() {
    let g = game();
    assert_eq!(g.tower().stories().len(), 1);
    assert!(g.tower().stories()[0].is_entered());
    assert_eq!(g.ui().nodes().len(), 1);
    assert_eq!(g.screen(), Size::new(8.0, 8.0));
}

#[test]
fn from_config_rejects_invalid_scene() {
    let mut config = SceneConfig::from_json_str(SCENE).unwrap();
    config.story.depth = 0;
    assert!(Game::from_config(&config, assets(), Box::new(BlockShaper)).is_err());

    let mut config = SceneConfig::from_json_str(SCENE).unwrap();
    config.stories[0].stacks[0].asset = "stax/missing.png".into();
    let err = Game::from_config(&config, assets(), Box::new(BlockShaper)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn update_routes_clicks_to_ui() {
    let mut g = game();
    g.update(&click_at(7.0, 1.0)).unwrap();
    assert!(g.ui_mut().take_clicked("go"));
    assert_eq!(g.tick(), 1);

    g.update(&click_at(1.0, 7.0)).unwrap();
    assert!(!g.ui_mut().take_clicked("go"));
}

#[test]
fn update_plays_stacks() {
    let mut g = game();
    let idle = ScriptedInput::default();
    g.update(&idle).unwrap();
    g.update(&idle).unwrap();
    assert_eq!(g.tower().stories()[0].stacks()[0].frame_index(), 1);
}

#[test]
fn draw_layers_world_under_camera() {
    let mut g = game();
    let frame = g.render_frame().unwrap();
    let blue = Rgba8Premul::from_straight_rgba(0, 0, 255, 255);
    assert_eq!(frame.pixel(0, 0), Some(blue));
    // World origin sits at the screen centre.
    assert_eq!(frame.pixel(6, 6).map(|p| (p.r, p.g)), Some((128, 0)));
    assert_eq!(frame.pixel(6, 5).map(|p| (p.r, p.g)), Some((0, 128)));

    g.camera_mut().set_position(Point::new(1.0, 0.0));
    let frame = g.render_frame().unwrap();
    assert_eq!(frame.pixel(5, 6).map(|p| p.r), Some(128));
    assert_eq!(g.world_point(Point::new(4.0, 4.0)), Point::new(1.0, 0.0));
}

#[test]
fn teardown_releases_layers_and_assets() {
    let mut g = game();
    assert_eq!(g.teardown(), 2);
    assert!(g.update(&ScriptedInput::default()).is_err());
}

#[test]
fn failed_stack_update_still_counts_the_tick() {
    let mut g = game();
    let heap = StaxieBuilder::new(1, 1)
        .stack("heap", 2)
        .animation("idle", 2, &[vec![0, 0], vec![0, 0]])
        .unwrap();
    let sheet = Surface::from_premul_rgba8(
        2,
        2,
        [255, 0, 0, 255, 0, 255, 0, 255].repeat(2),
    )
    .unwrap();
    g.assets_mut()
        .insert_staxie("stax/pillar.png", heap.build_with_sheet(&sheet).unwrap())
        .unwrap();

    let err = g.update(&ScriptedInput::default()).unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
    assert_eq!(g.tick(), 1);
}
