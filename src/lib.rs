//! Stax renders pseudo-3D pixel art from sprite stacks.
//!
//! A sprite stack is a column of same-sized horizontal slices drawn bottom to top, each lifted by
//! the camera pitch. The crate covers the whole path from file to frame:
//!
//! - Decode `.staxie` PNG containers ([`decode_staxie`]) into a [`Staxie`] model
//! - Play them back with a [`Stack`] cursor, loaded through an [`AssetRegistry`]
//! - Interleave several stacks by depth in a [`VGroup`], organised into [`Story`]s and a [`Tower`]
//! - Lay out, hit-test and draw a retained widget tree rooted at [`UiRoot`]
//! - Drive everything one tick at a time with [`Game`]
//!
//! Rendering is CPU-only into premultiplied RGBA8 [`Surface`]s.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;
mod game;
mod render;
mod stack;
mod staxie;
mod ui;
mod world;

pub use crate::foundation::core::{
    Affine, ColorScale, Originable, PixelRect, Point, Positionable, Rect, Rgba8Premul, Rotateable,
    Size, Sizeable, Vec2,
};
pub use crate::foundation::error::{DecodeError, StaxError, StaxResult};

pub use crate::assets::decode::decode_image;
pub use crate::assets::registry::{
    AssetKind, AssetRef, AssetRegistry, AssetStats, FontId, ImageId, StaxieId,
};
pub use crate::assets::source::{
    AssetSource, DirSource, LayeredSource, MemorySource, normalize_rel_path,
};
pub use crate::config::scene::{SceneConfig, StackConfig, StoryConfig, StoryEntry, WidgetConfig};
pub use crate::game::input::{InputSource, MouseButton, ScriptedEvent, ScriptedInput};
pub use crate::game::state::Game;
pub use crate::render::camera::Camera;
pub use crate::render::options::RenderOptions;
pub use crate::render::surface::{DrawImageOptions, Surface};
pub use crate::render::text::{BlockShaper, ParleyShaper, TextBrushRgba8, TextShaper, TextStyle};
pub use crate::render::vgroup::VGroup;
pub use crate::stack::playback::{Stack, slice_shade};
pub use crate::staxie::decode::{
    END_CHUNK, PNG_SIGNATURE, STAXIE_CHUNK, STAXIE_VERSION, decode_staxie, decode_staxie_metadata,
};
pub use crate::staxie::encode::{embed_staxie, encode_staxie_metadata, encode_staxie_png};
pub use crate::staxie::model::{
    AnimationSummary, StackSummary, Staxie, StaxieAnimation, StaxieBuilder, StaxieFrame,
    StaxieSlice, StaxieStack, StaxieSummary,
};
pub use crate::staxie::slices::acquire_slice_images;
pub use crate::ui::button::{Button, TOOLTIP_DELAY_TICKS};
pub use crate::ui::image::ImageWidget;
pub use crate::ui::item_list::{Axis, ItemList, ListWindow, visible_window};
pub use crate::ui::nine_slice::{NinePiece, TileCategory, TileKind, nine_slice_pieces};
pub use crate::ui::panel::{NineTiles, Panel, PanelStyle};
pub use crate::ui::root::UiRoot;
pub use crate::ui::text::TextWidget;
pub use crate::ui::widget::{
    AlignX, AlignY, CheckKind, DrawContext, LayoutOptions, Node, Placement, UpdateOptions, Widget,
};
pub use crate::world::story::Story;
pub use crate::world::tower::Tower;
