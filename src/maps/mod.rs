//! # Maps Module
//!
//! Plain level data handed to the simulation: tile size, the tile
//! references stacked on each cell (already resolved to a semantic type)
//! and the placed objects grouped by type.
//!
//! Coordinates here are already in the simulation's y-up world frame.
//! [`tiled`] produces a [`LevelMap`] from Tiled JSON exports.

pub mod tiled;

pub use tiled::*;

use crate::game::world::TileCoordinate;
use crate::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Object type holding the knight's start position.
pub const SPAWN_OBJECT: &str = "spawn";

/// A reference to a texture atlas used by the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    pub first_gid: u32,
    pub source: String,
}

/// One tile placed on a cell by one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileReference {
    pub gid: u32,
    /// Semantic type from the atlas, e.g. `floor` or `wall`.
    pub kind: String,
}

impl TileReference {
    pub fn new(gid: u32, kind: &str) -> Self {
        Self {
            gid,
            kind: kind.to_string(),
        }
    }
}

/// An object placed on the map, e.g. a spawn point or a monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl MapObject {
    pub fn new(x: f32, y: f32, kind: &str) -> Self {
        Self {
            x,
            y,
            kind: kind.to_string(),
            name: String::new(),
        }
    }
}

/// Everything the simulation needs from a map file.
///
/// # Examples
///
/// ```
/// use dungeonlife::{LevelMap, MapObject};
///
/// let mut map = LevelMap::new(16);
/// assert!(map.spawn().is_err());
/// map.add_object(MapObject::new(100.0, 100.0, "spawn"));
/// assert_eq!(map.spawn().unwrap().x, 100.0);
/// assert!(map.objects_of("orc").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelMap {
    pub tile_width: u32,
    pub textures: Vec<TextureRef>,
    pub tiles: HashMap<TileCoordinate, Vec<TileReference>>,
    pub objects: HashMap<String, Vec<MapObject>>,
}

impl LevelMap {
    pub fn new(tile_width: u32) -> Self {
        Self {
            tile_width,
            ..Self::default()
        }
    }

    /// Stacks a tile reference on a cell.
    pub fn push_tile(&mut self, coordinate: TileCoordinate, reference: TileReference) {
        self.tiles.entry(coordinate).or_default().push(reference);
    }

    /// Stacks the same kind of tile on every cell of an inclusive rectangle.
    pub fn fill(&mut self, from: TileCoordinate, to: TileCoordinate, gid: u32, kind: &str) {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.push_tile(TileCoordinate::new(x, y), TileReference::new(gid, kind));
            }
        }
    }

    pub fn add_object(&mut self, object: MapObject) {
        self.objects
            .entry(object.kind.clone())
            .or_default()
            .push(object);
    }

    /// Objects of one type. Absent types yield an empty slice.
    pub fn objects_of(&self, kind: &str) -> &[MapObject] {
        self.objects.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The knight's start point. A map without one cannot be played.
    pub fn spawn(&self) -> DungeonResult<&MapObject> {
        let spawns = self.objects_of(SPAWN_OBJECT);
        if spawns.len() > 1 {
            log::warn!("map has {} spawn points, using the first", spawns.len());
        }
        spawns.first().ok_or(DungeonError::MissingSpawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_spawn_is_fatal() {
        let map = LevelMap::new(16);
        assert!(matches!(map.spawn(), Err(DungeonError::MissingSpawn)));
    }

    #[test]
    fn test_first_spawn_wins() {
        let mut map = LevelMap::new(16);
        map.add_object(MapObject::new(1.0, 2.0, SPAWN_OBJECT));
        map.add_object(MapObject::new(3.0, 4.0, SPAWN_OBJECT));
        assert_eq!(map.spawn().unwrap().x, 1.0);
    }

    #[test]
    fn test_fill_stacks_references() {
        let mut map = LevelMap::new(16);
        map.fill(TileCoordinate::new(0, 0), TileCoordinate::new(1, 1), 1, "floor");
        map.fill(TileCoordinate::new(1, 1), TileCoordinate::new(1, 1), 2, "wall");
        assert_eq!(map.tiles.len(), 4);
        assert_eq!(map.tiles[&TileCoordinate::new(1, 1)].len(), 2);
    }
}
