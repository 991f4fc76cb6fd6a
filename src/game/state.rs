use crate::{
    assets::registry::AssetRegistry,
    config::scene::SceneConfig,
    foundation::{
        core::{Point, Rgba8Premul, Size},
        error::StaxResult,
    },
    game::input::{InputSource, MouseButton},
    render::{camera::Camera, options::RenderOptions, surface::Surface, text::TextShaper},
    ui::{
        root::UiRoot,
        widget::{CheckKind, UpdateOptions},
    },
    world::tower::Tower,
};

/// Headless game: world tower under a camera, UI on top, driven one tick at a time.
pub struct Game {
    assets: AssetRegistry,
    shaper: Box<dyn TextShaper>,
    ui: UiRoot,
    camera: Camera,
    tower: Tower,
    clear: Rgba8Premul,
    screen: Size,
    tick: u64,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("screen", &self.screen)
            .field("tick", &self.tick)
            .field("camera", &self.camera)
            .field("stories", &self.tower.stories().len())
            .field("ui_nodes", &self.ui.nodes().len())
            .finish()
    }
}

impl Game {
    /// Empty world and UI for a `screen` at UI `scale`.
    pub fn new(
        screen: Size,
        scale: f64,
        assets: AssetRegistry,
        shaper: Box<dyn TextShaper>,
    ) -> StaxResult<Self> {
        Ok(Self {
            assets,
            shaper,
            ui: UiRoot::new(screen, scale)?,
            camera: Camera::default(),
            tower: Tower::new(),
            clear: Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
            screen,
            tick: 0,
        })
    }

    /// Build the world and UI described by `config`; stories are entered immediately.
    #[tracing::instrument(skip_all)]
    pub fn from_config(
        config: &SceneConfig,
        mut assets: AssetRegistry,
        shaper: Box<dyn TextShaper>,
    ) -> StaxResult<Self> {
        config.validate()?;
        let mut ui = UiRoot::new(config.screen, config.ui_scale)?;
        for widget in &config.ui {
            ui.push(widget.build(&mut assets)?);
        }
        let mut tower = Tower::new();
        for story in config.build_stories(&mut assets)? {
            tower.push(story);
        }
        tower.enter()?;
        let [r, g, b, a] = config.clear;
        tracing::debug!(
            stories = tower.stories().len(),
            widgets = ui.nodes().len(),
            "scene built"
        );
        Ok(Self {
            assets,
            shaper,
            ui,
            camera: config.camera,
            tower,
            clear: Rgba8Premul::from_straight_rgba(r, g, b, a),
            screen: config.screen,
            tick: 0,
        })
    }

    /// Ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Destination size.
    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Resize the destination; the UI re-lays itself out on the next tick.
    pub fn set_screen(&mut self, screen: Size) {
        self.screen = screen;
        self.ui.set_screen(screen);
    }

    /// Loaded assets.
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Loaded assets, for inserts and reloads.
    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    /// Widget tree.
    pub fn ui(&self) -> &UiRoot {
        &self.ui
    }

    /// Widget tree, for lookups and click polling.
    pub fn ui_mut(&mut self) -> &mut UiRoot {
        &mut self.ui
    }

    /// World camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// World camera.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// World stories.
    pub fn tower(&self) -> &Tower {
        &self.tower
    }

    /// World stories.
    pub fn tower_mut(&mut self) -> &mut Tower {
        &mut self.tower
    }

    /// Screen point under the camera, in world space.
    pub fn world_point(&self, p: Point) -> Point {
        self.camera.screen_to_world(p, self.screen)
    }

    /// One tick: UI layout if stale, UI update, hover and click checks, then stack playback.
    ///
    /// Once the UI has run the tick always counts; a stack that fails to advance is reported
    /// after every other stack has advanced.
    #[tracing::instrument(skip_all, fields(tick = self.tick))]
    pub fn update(&mut self, input: &dyn InputSource) -> StaxResult<()> {
        self.ui
            .layout_if_needed(&mut self.assets, self.shaper.as_mut())?;
        let cursor = input.cursor_position();
        self.ui.update(&UpdateOptions {
            tick: self.tick,
            cursor,
        });
        self.ui.check(cursor.x, cursor.y, CheckKind::Hover);
        if input.was_clicked(MouseButton::Left) {
            let claimed = self.ui.check(cursor.x, cursor.y, CheckKind::Click);
            tracing::debug!(x = cursor.x, y = cursor.y, claimed, "click");
        }
        let world = self.tower.update(&self.assets);
        self.tick += 1;
        world
    }

    /// Clear, draw the world through the camera, then the UI with its own transform.
    #[tracing::instrument(skip_all, fields(tick = self.tick))]
    pub fn draw(&mut self, target: &mut Surface) -> StaxResult<()> {
        target.fill(self.clear);
        let mut opts = RenderOptions::new(target.size());
        self.camera.transform(&mut opts);
        self.tower.draw(&self.assets, target, &opts)?;
        self.ui
            .layout_if_needed(&mut self.assets, self.shaper.as_mut())?;
        self.ui.draw(target, &self.assets, self.shaper.as_mut())
    }

    /// Draw into a fresh screen-sized surface.
    pub fn render_frame(&mut self) -> StaxResult<Surface> {
        let mut frame = Surface::new(
            self.screen.width.round().max(1.0) as u32,
            self.screen.height.round().max(1.0) as u32,
        );
        self.draw(&mut frame)?;
        Ok(frame)
    }

    /// Release story layers and drop every cached asset; returns the layers freed.
    pub fn teardown(&mut self) -> usize {
        let freed = self.tower.leave();
        self.assets.teardown();
        freed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/game/state.rs"]
mod tests;
