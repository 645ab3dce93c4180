//! Texture atlas lookup
//!
//! Textures are opaque to the simulation: a name and a pixel size. The host
//! owns a [`TextureProvider`] and passes it to whatever needs to resolve a
//! texture group (generators and the parallax stack at construction, the
//! stack again on a texture-set switch).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A loaded texture, shared read-only by every sprite that shows it
#[derive(Debug, PartialEq)]
pub struct Texture {
    pub atlas: String,
    pub name: String,
    pub size: Vec2,
}

/// Ordered textures of one group
pub type TextureSet = Vec<Arc<Texture>>;

/// Source of textures by atlas and group name.
///
/// Lookups must be idempotent: asking twice for the same group returns the
/// same textures.
pub trait TextureProvider {
    /// Textures in `atlas` whose names start with `group`, sorted by name
    fn textures(&mut self, atlas: &str, group: &str) -> TextureSet;

    /// A single texture by exact name
    fn texture(&mut self, atlas: &str, name: &str) -> Option<Arc<Texture>>;
}

/// Manifest entry for one texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

impl TextureInfo {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Names and sizes of every texture in every atlas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub atlases: BTreeMap<String, Vec<TextureInfo>>,
}

impl AtlasManifest {
    pub fn insert(&mut self, atlas: impl Into<String>, textures: Vec<TextureInfo>) {
        self.atlases.insert(atlas.into(), textures);
    }

    /// Placeholder atlases for the built-in level
    pub fn starlight() -> Self {
        fn numbered(prefix: &str, sizes: &[(f32, f32)]) -> Vec<TextureInfo> {
            sizes
                .iter()
                .enumerate()
                .map(|(i, &(w, h))| TextureInfo::new(format!("{}_{:02}", prefix, i + 1), w, h))
                .collect()
        }

        fn biome(small: &[(f32, f32)], large: &[(f32, f32)], float: &[(f32, f32)]) -> Vec<TextureInfo> {
            let mut textures = numbered("ground_small", small);
            textures.extend(numbered("ground_large", large));
            textures.extend(numbered("ground_float", float));
            textures.extend(numbered("planet", &[(256.0, 256.0)]));
            textures
        }

        let mut manifest = Self::default();
        let mut ship = vec![
            TextureInfo::new("idle", 50.0, 50.0),
            TextureInfo::new("shield", 75.0, 75.0),
        ];
        ship.extend(numbered("boost", &[(50.0, 50.0); 4]));
        manifest.insert("Ship", ship);
        manifest.insert(
            "Enemies",
            vec![
                TextureInfo::new("enemy_flyer", 40.0, 40.0),
                TextureInfo::new("enemy_mine", 40.0, 40.0),
            ],
        );
        let mut collectibles = vec![TextureInfo::new("point", 20.0, 20.0)];
        collectibles.extend(numbered("point", &[(20.0, 20.0); 6]));
        manifest.insert("Collectibles", collectibles);
        manifest.insert(
            "Desert",
            biome(
                &[(160.0, 48.0), (200.0, 60.0), (120.0, 40.0)],
                &[(480.0, 160.0), (560.0, 200.0), (420.0, 140.0)],
                &[(96.0, 64.0), (128.0, 80.0)],
            ),
        );
        manifest.insert("Skybox", numbered("planet", &[(256.0, 256.0)]));
        manifest.insert(
            "Tundra",
            biome(
                &[(150.0, 40.0), (180.0, 52.0)],
                &[(500.0, 180.0), (460.0, 150.0)],
                &[(110.0, 70.0)],
            ),
        );
        manifest.insert(
            "Lush",
            biome(
                &[(140.0, 56.0), (170.0, 64.0)],
                &[(520.0, 190.0), (440.0, 170.0)],
                &[(100.0, 72.0), (90.0, 60.0)],
            ),
        );
        manifest
    }
}

/// Memoizing [`TextureProvider`] over an [`AtlasManifest`].
///
/// Atlases load on first use and stay loaded; group lookups are cached so a
/// repeat request hands back the same `Arc`s.
#[derive(Debug)]
pub struct TextureCache {
    manifest: AtlasManifest,
    display_scale: f32,
    atlases: HashMap<String, TextureSet>,
    groups: HashMap<(String, String), TextureSet>,
    loads: usize,
}

impl TextureCache {
    pub fn new(manifest: AtlasManifest, display_scale: f32) -> Self {
        Self {
            manifest,
            display_scale,
            atlases: HashMap::new(),
            groups: HashMap::new(),
            loads: 0,
        }
    }

    /// Number of atlas loads performed so far
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Density suffix for the display scale (`@2x` style), empty at 1x
    pub fn density_suffix(&self) -> String {
        density_suffix(self.display_scale)
    }

    fn atlas(&mut self, name: &str) -> Option<&TextureSet> {
        if !self.atlases.contains_key(name) {
            let infos = self.manifest.atlases.get(name)?;
            let mut textures: TextureSet = infos
                .iter()
                .map(|info| {
                    Arc::new(Texture {
                        atlas: name.to_string(),
                        name: info.name.clone(),
                        size: Vec2::new(info.width, info.height),
                    })
                })
                .collect();
            textures.sort_by(|a, b| a.name.cmp(&b.name));
            self.loads += 1;
            log::debug!("Loaded atlas '{}' ({} textures)", name, textures.len());
            self.atlases.insert(name.to_string(), textures);
        }
        self.atlases.get(name)
    }
}

impl TextureProvider for TextureCache {
    fn textures(&mut self, atlas: &str, group: &str) -> TextureSet {
        let key = (atlas.to_string(), group.to_string());
        if let Some(cached) = self.groups.get(&key) {
            return cached.clone();
        }

        let suffix = self.density_suffix();
        let Some(all) = self.atlas(atlas) else {
            return Vec::new();
        };
        let selected: TextureSet = all
            .iter()
            .filter(|t| t.name.starts_with(group) && matches_density(&t.name, &suffix))
            .cloned()
            .collect();

        self.groups.insert(key, selected.clone());
        selected
    }

    fn texture(&mut self, atlas: &str, name: &str) -> Option<Arc<Texture>> {
        let wanted = format!("{}{}", name, self.density_suffix());
        self.atlas(atlas)?.iter().find(|t| t.name == wanted).cloned()
    }
}

fn density_suffix(scale: f32) -> String {
    if scale > 1.0 {
        format!("@{:.0}x", scale)
    } else {
        String::new()
    }
}

/// At 1x only unsuffixed names qualify; above 1x only names with the suffix
fn matches_density(name: &str, suffix: &str) -> bool {
    if suffix.is_empty() {
        !name.contains('@')
    } else {
        name.ends_with(suffix)
    }
}
