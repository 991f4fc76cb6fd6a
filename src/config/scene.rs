use std::{fs::File, io::BufReader, path::Path};

use crate::{
    assets::registry::AssetRegistry,
    foundation::{
        core::{Point, Positionable, Rotateable, Size, Sizeable},
        error::{StaxError, StaxResult},
    },
    game::input::ScriptedEvent,
    render::{camera::Camera, text::TextStyle},
    stack::playback::Stack,
    ui::{
        button::Button,
        image::ImageWidget,
        item_list::{Axis, ItemList},
        panel::{Panel, PanelStyle},
        text::TextWidget,
        widget::{Node, Placement},
    },
    world::story::Story,
};

/// JSON scene description: screen, camera, world stories and the UI tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    /// Destination size in pixels.
    pub screen: Size,
    /// Global UI scale.
    #[serde(default = "one")]
    pub ui_scale: f64,
    /// Straight-alpha RGBA8 colour the frame is cleared to.
    #[serde(default = "default_clear")]
    pub clear: [u8; 4],
    /// World camera.
    #[serde(default)]
    pub camera: Camera,
    /// Layer area and depth shared by every story.
    pub story: StoryConfig,
    /// Stories from the ground up.
    #[serde(default)]
    pub stories: Vec<StoryEntry>,
    /// Top-level widgets in draw order.
    #[serde(default)]
    pub ui: Vec<WidgetConfig>,
    /// Font asset path; block glyphs are used when absent.
    #[serde(default)]
    pub font: Option<String>,
    /// Input played back by headless runs.
    #[serde(default)]
    pub input: Vec<ScriptedEvent>,
}

/// Shape of every story's layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoryConfig {
    /// Layer width in world pixels.
    pub width: u32,
    /// Layer height in world pixels.
    pub height: u32,
    /// Number of depth layers.
    pub depth: usize,
}

/// One story's stacks.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StoryEntry {
    /// Stacks in draw order.
    #[serde(default)]
    pub stacks: Vec<StackConfig>,
}

/// A stack placed in a story.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StackConfig {
    /// Staxie asset path.
    pub asset: String,
    /// Stack name; empty selects the first.
    #[serde(default)]
    pub stack: String,
    /// Animation name; empty selects the first.
    #[serde(default)]
    pub animation: String,
    /// Story-local position.
    #[serde(default)]
    pub position: Point,
    /// Rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Drawn size; the frame size when absent.
    #[serde(default)]
    pub size: Option<Size>,
}

/// Recursive widget description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetConfig {
    /// [`Panel`] with children.
    Panel {
        /// Lookup key.
        #[serde(default)]
        id: Option<String>,
        /// Placement inside the parent.
        #[serde(default)]
        placement: Placement,
        /// Unscaled size.
        size: Size,
        /// Background atlas.
        #[serde(default)]
        style: PanelStyle,
        /// Unscaled inner margin.
        #[serde(default)]
        padding: f64,
        /// Children in draw order.
        #[serde(default)]
        children: Vec<WidgetConfig>,
    },
    /// [`Button`].
    Button {
        /// Lookup key.
        #[serde(default)]
        id: Option<String>,
        /// Placement inside the parent.
        #[serde(default)]
        placement: Placement,
        /// Unscaled size.
        size: Size,
        /// Centred label.
        #[serde(default)]
        label: Option<String>,
        /// Hover tooltip.
        #[serde(default)]
        tooltip: Option<String>,
        /// Icon image path.
        #[serde(default)]
        icon: Option<String>,
        /// Face style; `null` draws no face.
        #[serde(default = "button_face")]
        style: Option<PanelStyle>,
        /// Whether clicks latch.
        #[serde(default = "yes")]
        enabled: bool,
    },
    /// [`TextWidget`].
    Text {
        /// Lookup key.
        #[serde(default)]
        id: Option<String>,
        /// Placement inside the parent.
        #[serde(default)]
        placement: Placement,
        /// Label contents.
        text: String,
        /// Unscaled style.
        #[serde(default)]
        style: Option<TextStyle>,
    },
    /// [`ImageWidget`].
    Image {
        /// Lookup key.
        #[serde(default)]
        id: Option<String>,
        /// Placement inside the parent.
        #[serde(default)]
        placement: Placement,
        /// Image asset path.
        path: String,
        /// Unscaled size; natural size when absent.
        #[serde(default)]
        size: Option<Size>,
    },
    /// [`ItemList`].
    ItemList {
        /// Lookup key.
        #[serde(default)]
        id: Option<String>,
        /// Placement inside the parent.
        #[serde(default)]
        placement: Placement,
        /// Unscaled size including the scroll buttons.
        size: Size,
        /// Scroll axis.
        #[serde(default)]
        axis: Axis,
        /// Unscaled gap after each item.
        #[serde(default)]
        gap: Option<f64>,
        /// Items in order.
        #[serde(default)]
        items: Vec<WidgetConfig>,
    },
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

fn button_face() -> Option<PanelStyle> {
    Some(PanelStyle::Button)
}

fn default_clear() -> [u8; 4] {
    [0, 0, 0, 255]
}

impl SceneConfig {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StaxResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StaxError::validation(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON string.
    pub fn from_json_str(s: &str) -> StaxResult<Self> {
        serde_json::from_str(s).map_err(|e| StaxError::validation(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StaxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StaxError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the values parsing cannot.
    pub fn validate(&self) -> StaxResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.screen.width) || !positive(self.screen.height) {
            return Err(StaxError::validation(format!(
                "screen must be non-empty, got {}x{}",
                self.screen.width, self.screen.height
            )));
        }
        if !positive(self.ui_scale) {
            return Err(StaxError::validation(format!(
                "ui_scale must be > 0, got {}",
                self.ui_scale
            )));
        }
        if !positive(self.camera.zoom) {
            return Err(StaxError::validation(format!(
                "camera zoom must be > 0, got {}",
                self.camera.zoom
            )));
        }
        if self.story.depth == 0 || self.story.width == 0 || self.story.height == 0 {
            return Err(StaxError::validation("story width, height and depth must be > 0"));
        }
        for (k, story) in self.stories.iter().enumerate() {
            if let Some(s) = story.stacks.iter().find(|s| s.asset.trim().is_empty()) {
                return Err(StaxError::validation(format!(
                    "story {k}: stack '{}' has no asset",
                    s.stack
                )));
            }
        }
        Ok(())
    }

    /// Pixel size of the frame.
    pub fn screen_pixels(&self) -> (u32, u32) {
        (
            self.screen.width.round() as u32,
            self.screen.height.round() as u32,
        )
    }

    /// Build every story, loading stack assets through `assets`.
    pub fn build_stories(&self, assets: &mut AssetRegistry) -> StaxResult<Vec<Story>> {
        let shape = self.story;
        self.stories
            .iter()
            .map(|entry| {
                let mut story = Story::new(shape.width, shape.height, shape.depth)?;
                for sc in &entry.stacks {
                    story.push(sc.build(assets)?);
                }
                Ok(story)
            })
            .collect()
    }
}

impl StackConfig {
    /// Load the asset and place a playback cursor on it.
    pub fn build(&self, assets: &mut AssetRegistry) -> StaxResult<Stack> {
        let mut stack = Stack::create(assets, &self.asset, &self.stack, &self.animation)?;
        stack.set_position(self.position);
        stack.set_rotation(self.rotation);
        if let Some(size) = self.size {
            stack.set_size(size);
        }
        Ok(stack)
    }
}

impl WidgetConfig {
    /// Build the widget subtree. Button icons are loaded here; other images load at layout.
    pub fn build(&self, assets: &mut AssetRegistry) -> StaxResult<Node> {
        Ok(match self {
            WidgetConfig::Panel {
                id,
                placement,
                size,
                style,
                padding,
                children,
            } => {
                let mut panel = Panel::new(*style, *size)
                    .with_placement(*placement)
                    .with_padding(*padding);
                panel.id = id.clone();
                for child in children {
                    panel.children.push(child.build(assets)?);
                }
                panel.into()
            }
            WidgetConfig::Button {
                id,
                placement,
                size,
                label,
                tooltip,
                icon,
                style,
                enabled,
            } => {
                let mut button = Button::new(*size)
                    .with_placement(*placement)
                    .with_style(*style);
                button.id = id.clone();
                button.label = label.clone();
                button.tooltip = tooltip.clone();
                button.enabled = *enabled;
                if let Some(path) = icon {
                    button.icon = Some(assets.load_image(path)?);
                }
                button.into()
            }
            WidgetConfig::Text {
                id,
                placement,
                text,
                style,
            } => {
                let mut widget = TextWidget::new(text.as_str()).with_placement(*placement);
                widget.id = id.clone();
                if let Some(style) = style {
                    widget.style = *style;
                }
                widget.into()
            }
            WidgetConfig::Image {
                id,
                placement,
                path,
                size,
            } => {
                let mut widget = ImageWidget::new(path.as_str()).with_placement(*placement);
                widget.id = id.clone();
                if let Some(size) = size {
                    widget = widget.with_size(*size);
                }
                widget.into()
            }
            WidgetConfig::ItemList {
                id,
                placement,
                size,
                axis,
                gap,
                items,
            } => {
                let mut list = ItemList::new(*axis, *size).with_placement(*placement);
                list.id = id.clone();
                if let Some(gap) = gap {
                    list.gap = *gap;
                }
                for item in items {
                    list.push(item.build(assets)?);
                }
                list.into()
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/scene.rs"]
mod tests;
