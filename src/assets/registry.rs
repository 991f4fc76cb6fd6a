use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{
        decode::decode_image,
        source::{AssetSource, MemorySource, normalize_rel_path},
    },
    foundation::error::{StaxError, StaxResult},
    render::surface::Surface,
    staxie::{decode::decode_staxie, model::Staxie},
};

/// Asset categories the registry knows how to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Raster image decoded into a [`Surface`].
    Image,
    /// PNG with embedded staxie metadata.
    Staxie,
    /// Raw font bytes for text shaping.
    Font,
}

impl AssetKind {
    fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Staxie => "staxie",
            Self::Font => "font",
        }
    }
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            index: u32,
            generation: u32,
        }
    };
}

handle!(
    /// Handle to a cached image.
    ImageId
);
handle!(
    /// Handle to a cached staxie. Stacks hold this instead of the asset itself.
    StaxieId
);
handle!(
    /// Handle to cached font bytes.
    FontId
);

/// Result of [`AssetRegistry::load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetRef {
    /// Image handle.
    Image(ImageId),
    /// Staxie handle.
    Staxie(StaxieId),
    /// Font handle.
    Font(FontId),
}

/// Counters reported by [`AssetRegistry::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AssetStats {
    /// Cached images.
    pub images: usize,
    /// Cached staxies.
    pub staxies: usize,
    /// Cached fonts.
    pub fonts: usize,
    /// Loads that read and decoded from the source.
    pub misses: u64,
    /// Loads answered from the cache.
    pub hits: u64,
}

#[derive(Debug)]
struct Slots<T> {
    items: Vec<T>,
    by_name: HashMap<String, u32>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<T> Slots<T> {
    fn lookup(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Insert or replace in place, keeping the slot index stable.
    fn upsert(&mut self, name: String, item: T) -> StaxResult<u32> {
        if let Some(index) = self.lookup(&name) {
            self.items[index as usize] = item;
            return Ok(index);
        }
        let index = u32::try_from(self.items.len())
            .map_err(|_| StaxError::validation("asset registry slot overflow"))?;
        self.items.push(item);
        self.by_name.insert(name, index);
        Ok(index)
    }

    fn get(&self, index: u32) -> Option<&T> {
        self.items.get(index as usize)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.by_name.clear();
    }
}

/// Load-once cache of decoded assets keyed by normalized path.
///
/// Handles carry the registry generation; [`AssetRegistry::teardown`] bumps it so handles issued
/// before teardown resolve to `NotFound` instead of aliasing newer assets.
#[derive(Debug)]
pub struct AssetRegistry {
    source: Box<dyn AssetSource>,
    generation: u32,
    images: Slots<Surface>,
    staxies: Slots<Staxie>,
    fonts: Slots<Arc<Vec<u8>>>,
    hits: u64,
    misses: u64,
}

impl AssetRegistry {
    /// Registry reading from `source`.
    pub fn init(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            generation: 0,
            images: Slots::default(),
            staxies: Slots::default(),
            fonts: Slots::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Registry with no backing files; assets come from the `insert_*` methods.
    pub fn empty() -> Self {
        Self::init(MemorySource::new())
    }

    /// Backing source.
    pub fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    /// Memoized load of any kind.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self, kind: AssetKind, name: &str) -> StaxResult<AssetRef> {
        Ok(match kind {
            AssetKind::Image => AssetRef::Image(self.load_image(name)?),
            AssetKind::Staxie => AssetRef::Staxie(self.load_staxie(name)?),
            AssetKind::Font => AssetRef::Font(self.load_font(name)?),
        })
    }

    /// Decode and cache an image, or return the cached handle.
    pub fn load_image(&mut self, name: &str) -> StaxResult<ImageId> {
        let key = normalize_rel_path(name)?;
        if let Some(index) = self.images.lookup(&key) {
            self.hits += 1;
            return Ok(ImageId::new(index, self.generation));
        }
        let surface = decode_image(&self.read(AssetKind::Image, &key)?)?;
        let index = self.images.upsert(key, surface)?;
        Ok(ImageId::new(index, self.generation))
    }

    /// Decode and cache a staxie, or return the cached handle.
    pub fn load_staxie(&mut self, name: &str) -> StaxResult<StaxieId> {
        let key = normalize_rel_path(name)?;
        if let Some(index) = self.staxies.lookup(&key) {
            self.hits += 1;
            return Ok(StaxieId::new(index, self.generation));
        }
        let staxie = decode_staxie(&self.read(AssetKind::Staxie, &key)?)?;
        let index = self.staxies.upsert(key, staxie)?;
        Ok(StaxieId::new(index, self.generation))
    }

    /// Cache font bytes, or return the cached handle.
    pub fn load_font(&mut self, name: &str) -> StaxResult<FontId> {
        let key = normalize_rel_path(name)?;
        if let Some(index) = self.fonts.lookup(&key) {
            self.hits += 1;
            return Ok(FontId::new(index, self.generation));
        }
        let bytes = self.read(AssetKind::Font, &key)?;
        let index = self.fonts.upsert(key, Arc::new(bytes))?;
        Ok(FontId::new(index, self.generation))
    }

    /// Re-read and re-decode a staxie, replacing it in place.
    ///
    /// Existing [`StaxieId`]s for `name` stay valid and observe the new data. On failure the
    /// previous asset is kept.
    #[tracing::instrument(skip(self))]
    pub fn reload_staxie(&mut self, name: &str) -> StaxResult<StaxieId> {
        let key = normalize_rel_path(name)?;
        let staxie = decode_staxie(&self.read(AssetKind::Staxie, &key)?)?;
        let index = self.staxies.upsert(key, staxie)?;
        tracing::debug!(index, "staxie reloaded");
        Ok(StaxieId::new(index, self.generation))
    }

    /// Register an already decoded image under `name`, replacing any previous one.
    pub fn insert_image(&mut self, name: &str, surface: Surface) -> StaxResult<ImageId> {
        let index = self.images.upsert(normalize_rel_path(name)?, surface)?;
        Ok(ImageId::new(index, self.generation))
    }

    /// Register an already built staxie under `name`, replacing any previous one.
    pub fn insert_staxie(&mut self, name: &str, staxie: Staxie) -> StaxResult<StaxieId> {
        staxie.validate()?;
        let index = self.staxies.upsert(normalize_rel_path(name)?, staxie)?;
        Ok(StaxieId::new(index, self.generation))
    }

    /// Register font bytes under `name`, replacing any previous ones.
    pub fn insert_font(&mut self, name: &str, bytes: Vec<u8>) -> StaxResult<FontId> {
        let index = self.fonts.upsert(normalize_rel_path(name)?, Arc::new(bytes))?;
        Ok(FontId::new(index, self.generation))
    }

    /// Cached image.
    pub fn image(&self, id: ImageId) -> StaxResult<&Surface> {
        self.check_generation(id.generation, AssetKind::Image)?;
        self.images
            .get(id.index)
            .ok_or_else(|| stale(AssetKind::Image, id.index))
    }

    /// Cached staxie.
    pub fn staxie(&self, id: StaxieId) -> StaxResult<&Staxie> {
        self.check_generation(id.generation, AssetKind::Staxie)?;
        self.staxies
            .get(id.index)
            .ok_or_else(|| stale(AssetKind::Staxie, id.index))
    }

    /// Cached font bytes.
    pub fn font(&self, id: FontId) -> StaxResult<Arc<Vec<u8>>> {
        self.check_generation(id.generation, AssetKind::Font)?;
        self.fonts
            .get(id.index)
            .cloned()
            .ok_or_else(|| stale(AssetKind::Font, id.index))
    }

    /// Handle of an already cached staxie, without touching the source.
    pub fn staxie_id(&self, name: &str) -> Option<StaxieId> {
        let key = normalize_rel_path(name).ok()?;
        self.staxies
            .lookup(&key)
            .map(|index| StaxieId::new(index, self.generation))
    }

    /// Cache sizes and hit/miss counters.
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            images: self.images.items.len(),
            staxies: self.staxies.items.len(),
            fonts: self.fonts.items.len(),
            misses: self.misses,
            hits: self.hits,
        }
    }

    /// Drop every cached asset and invalidate all handles issued so far.
    pub fn teardown(&mut self) {
        let stats = self.stats();
        self.images.clear();
        self.staxies.clear();
        self.fonts.clear();
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(
            images = stats.images,
            staxies = stats.staxies,
            fonts = stats.fonts,
            "asset registry torn down"
        );
    }

    fn read(&mut self, kind: AssetKind, key: &str) -> StaxResult<Vec<u8>> {
        self.misses += 1;
        tracing::debug!(kind = kind.label(), path = key, "asset cache miss");
        match self.source.read_file(key) {
            Err(e) if e.is_not_found() => Err(StaxError::not_found(kind.label(), key)),
            other => other,
        }
    }

    fn check_generation(&self, generation: u32, kind: AssetKind) -> StaxResult<()> {
        if generation != self.generation {
            return Err(StaxError::not_found(
                kind.label(),
                format!("handle from generation {generation}"),
            ));
        }
        Ok(())
    }
}

fn stale(kind: AssetKind, index: u32) -> StaxError {
    StaxError::not_found(kind.label(), format!("#{index}"))
}

impl ImageId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl StaxieId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl FontId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/registry.rs"]
mod tests;
