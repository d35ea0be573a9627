//! # Tiled Map Reader
//!
//! Reads maps exported from the Tiled editor as JSON into a [`LevelMap`].
//!
//! Supported: finite tile layers (`data` + `width`), infinite tile layers
//! (`chunks`), group layers, object groups, and tilesets either embedded in
//! the map or stored as separate JSON files next to it. Each tile's
//! semantic type comes from the tileset's per-tile `type` (or `class` in
//! newer Tiled versions); tiles without one get the `none` tag.
//!
//! Tiled rows and object y values grow downwards; both are negated into
//! the y-up world frame.

use super::{LevelMap, MapObject, TextureRef, TileReference};
use crate::game::world::{TileCoordinate, TAG_NONE};
use crate::{DungeonError, DungeonResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Tiled stores flip and rotation flags in the top bits of each gid.
const GID_MASK: u32 = 0x1FFF_FFFF;

fn default_tile_width() -> u32 {
    crate::config::DEFAULT_TILE_SIZE
}

#[derive(Debug, Deserialize)]
struct TiledMap {
    #[serde(default = "default_tile_width")]
    tilewidth: u32,
    #[serde(default)]
    tilesets: Vec<TiledTilesetRef>,
    #[serde(default)]
    layers: Vec<TiledLayer>,
}

#[derive(Debug, Deserialize)]
struct TiledTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    embedded: TiledTileset,
}

#[derive(Debug, Default, Deserialize)]
struct TiledTileset {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tilecount: Option<u32>,
    #[serde(default)]
    tiles: Vec<TiledTile>,
}

#[derive(Debug, Deserialize)]
struct TiledTile {
    id: u32,
    #[serde(default, rename = "type", alias = "class")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TiledLayer {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayer),
    #[serde(rename = "objectgroup")]
    Objects(ObjectLayer),
    #[serde(rename = "group")]
    Group {
        #[serde(default)]
        layers: Vec<TiledLayer>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TileLayer {
    #[serde(default)]
    chunks: Vec<TileChunk>,
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    startx: i32,
    #[serde(default)]
    starty: i32,
}

#[derive(Debug, Deserialize)]
struct TileChunk {
    x: i32,
    y: i32,
    width: u32,
    data: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct ObjectLayer {
    #[serde(default)]
    objects: Vec<TiledObject>,
}

#[derive(Debug, Deserialize)]
struct TiledObject {
    x: f32,
    y: f32,
    #[serde(default, rename = "type", alias = "class")]
    kind: String,
    #[serde(default)]
    name: String,
}

/// Gid to semantic type lookup built from a map's tilesets.
#[derive(Debug, Default)]
struct TileAtlas {
    /// (first gid, tile count, local id → type), sorted by first gid.
    sets: Vec<(u32, Option<u32>, HashMap<u32, String>)>,
}

impl TileAtlas {
    fn add(&mut self, first_gid: u32, tileset: &TiledTileset) {
        let types = tileset
            .tiles
            .iter()
            .filter_map(|t| t.kind.as_ref().map(|k| (t.id, k.clone())))
            .filter(|(_, k)| !k.is_empty())
            .collect();
        self.sets.push((first_gid, tileset.tilecount, types));
        self.sets.sort_by_key(|(first, _, _)| *first);
    }

    fn resolve(&self, gid: u32) -> DungeonResult<String> {
        let (first, count, types) = self
            .sets
            .iter()
            .rev()
            .find(|(first, _, _)| *first <= gid)
            .ok_or_else(|| DungeonError::InvalidMap(format!("gid {gid} has no tileset")))?;
        let local = gid - first;
        if let Some(count) = count {
            if local >= *count {
                return Err(DungeonError::InvalidMap(format!(
                    "gid {gid} is outside its tileset ({count} tiles from {first})"
                )));
            }
        }
        Ok(types
            .get(&local)
            .cloned()
            .unwrap_or_else(|| TAG_NONE.to_string()))
    }
}

/// Reader for Tiled JSON maps.
///
/// External tileset files are looked up relative to `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct TiledMapReader {
    base_dir: Option<PathBuf>,
}

impl TiledMapReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves external tilesets relative to `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Reads a map file; its directory becomes the tileset base.
    pub fn read_file(path: impl AsRef<Path>) -> DungeonResult<LevelMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let reader = match path.parent() {
            Some(dir) => Self::with_base_dir(dir),
            None => Self::new(),
        };
        let map = reader.read_str(&text)?;
        log::info!(
            "read map {} ({} cells, {} object types)",
            path.display(),
            map.tiles.len(),
            map.objects.len()
        );
        Ok(map)
    }

    /// Parses map JSON.
    pub fn read_str(&self, json: &str) -> DungeonResult<LevelMap> {
        let raw: TiledMap = serde_json::from_str(json)?;
        if raw.tilewidth == 0 {
            return Err(DungeonError::InvalidMap("tilewidth is zero".to_string()));
        }

        let mut map = LevelMap::new(raw.tilewidth);
        let mut atlas = TileAtlas::default();
        for tileset in &raw.tilesets {
            match &tileset.source {
                Some(source) => {
                    let external = self.load_tileset(source)?;
                    atlas.add(tileset.firstgid, &external);
                    map.textures.push(TextureRef {
                        first_gid: tileset.firstgid,
                        source: source.clone(),
                    });
                }
                None => {
                    atlas.add(tileset.firstgid, &tileset.embedded);
                    map.textures.push(TextureRef {
                        first_gid: tileset.firstgid,
                        source: tileset.embedded.name.clone().unwrap_or_default(),
                    });
                }
            }
        }

        read_layers(&raw.layers, &atlas, &mut map)?;
        Ok(map)
    }

    fn load_tileset(&self, source: &str) -> DungeonResult<TiledTileset> {
        let dir = self.base_dir.as_ref().ok_or_else(|| {
            DungeonError::InvalidMap(format!(
                "external tileset {source} needs a base directory"
            ))
        })?;
        let text = std::fs::read_to_string(dir.join(source))?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn read_layers(layers: &[TiledLayer], atlas: &TileAtlas, map: &mut LevelMap) -> DungeonResult<()> {
    for layer in layers {
        match layer {
            TiledLayer::Tiles(tiles) => read_tile_layer(tiles, atlas, map)?,
            TiledLayer::Objects(objects) => {
                for object in &objects.objects {
                    map.add_object(MapObject {
                        x: object.x,
                        y: -object.y,
                        kind: object.kind.clone(),
                        name: object.name.clone(),
                    });
                }
            }
            TiledLayer::Group { layers } => read_layers(layers, atlas, map)?,
            TiledLayer::Other => {}
        }
    }
    Ok(())
}

fn read_tile_layer(layer: &TileLayer, atlas: &TileAtlas, map: &mut LevelMap) -> DungeonResult<()> {
    if layer.chunks.is_empty() {
        read_cells(layer.startx, layer.starty, layer.width, &layer.data, atlas, map)
    } else {
        for chunk in &layer.chunks {
            read_cells(chunk.x, chunk.y, chunk.width, &chunk.data, atlas, map)?;
        }
        Ok(())
    }
}

fn read_cells(
    start_x: i32,
    start_y: i32,
    width: u32,
    data: &[u32],
    atlas: &TileAtlas,
    map: &mut LevelMap,
) -> DungeonResult<()> {
    if data.is_empty() {
        return Ok(());
    }
    if width == 0 {
        return Err(DungeonError::InvalidMap(
            "tile layer has data but no width".to_string(),
        ));
    }
    for (index, raw_gid) in data.iter().enumerate() {
        let gid = raw_gid & GID_MASK;
        if gid == 0 {
            continue;
        }
        let column = (index as u32 % width) as i32;
        let row = (index as u32 / width) as i32;
        let coordinate = TileCoordinate::new(start_x + column, -(start_y + row));
        let kind = atlas.resolve(gid)?;
        map.push_tile(coordinate, TileReference { gid, kind });
    }
    Ok(())
}
