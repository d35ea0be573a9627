//! # World Module
//!
//! The tile grid built from a level map and the collision queries actors
//! run against it.
//!
//! Each grid cell carries a set of semantic tags (`floor`, `wall`,
//! `stairs`, `none`, ...), the union of every map layer stacked on it. A
//! cell that no layer touches has the empty tag set. The grid is immutable
//! once built and is shared read-only by every actor during a tick.

use crate::maps::LevelMap;
use crate::utils::Vector2;
use crate::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Tag for tiles an actor may stand on.
pub const TAG_FLOOR: &str = "floor";
/// Tag for tiles that block movement.
pub const TAG_WALL: &str = "wall";
/// Tag for level exit tiles.
pub const TAG_STAIRS: &str = "stairs";
/// Tag given to tiles whose atlas entry declares no type.
pub const TAG_NONE: &str = "none";

/// The semantic tags attached to one grid cell.
pub type TagSet = BTreeSet<String>;

static EMPTY_TAGS: TagSet = BTreeSet::new();

/// Integer grid cell identity.
///
/// # Examples
///
/// ```
/// use dungeonlife::TileCoordinate;
///
/// assert_eq!(TileCoordinate::from_world(-1.0, 17.0, 16.0), TileCoordinate::new(-1, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub x: i32,
    pub y: i32,
}

impl TileCoordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Maps a world position to the cell containing it.
    ///
    /// Uses floor division, so `-1.0` lands in cell `-1` rather than `0`.
    pub fn from_world(x: f32, y: f32, tile_size: f32) -> Self {
        Self::new(
            (x / tile_size).floor() as i32,
            (y / tile_size).floor() as i32,
        )
    }

    /// World position of the cell's lower-left corner.
    pub fn to_world(self, tile_size: f32) -> Vector2 {
        Vector2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }
}

/// Which cells an actor may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkPolicy {
    /// Any tagged cell that is not a wall. Untagged cells block.
    #[default]
    NonWall,
    /// Only cells tagged `floor`.
    FloorOnly,
}

impl WalkPolicy {
    /// Applies the policy to one cell's tags.
    pub fn permits(self, tags: &TagSet) -> bool {
        match self {
            WalkPolicy::NonWall => !tags.is_empty() && !tags.contains(TAG_WALL),
            WalkPolicy::FloorOnly => tags.contains(TAG_FLOOR),
        }
    }
}

/// Read-only collision oracle over the tagged grid.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tile_size: f32,
    cells: HashMap<TileCoordinate, TagSet>,
    policy: WalkPolicy,
}

impl TileGrid {
    /// Creates an empty grid.
    pub fn new(tile_size: f32, policy: WalkPolicy) -> DungeonResult<Self> {
        if tile_size.is_nan() || tile_size <= 0.0 {
            return Err(DungeonError::InvalidMap(format!(
                "tile size must be positive, got {}",
                tile_size
            )));
        }
        Ok(Self {
            tile_size,
            cells: HashMap::new(),
            policy,
        })
    }

    /// Builds the grid from a level map, unioning the types of every tile
    /// reference stacked at a coordinate.
    pub fn from_level_map(map: &LevelMap, policy: WalkPolicy) -> DungeonResult<Self> {
        let mut grid = Self::new(map.tile_width as f32, policy)?;
        for (coordinate, references) in &map.tiles {
            for reference in references {
                grid.add_tag(*coordinate, &reference.kind);
            }
        }
        log::debug!(
            "built tile grid with {} cells (tile size {})",
            grid.cells.len(),
            grid.tile_size
        );
        Ok(grid)
    }

    /// Adds a tag to a cell.
    pub fn add_tag(&mut self, coordinate: TileCoordinate, tag: &str) {
        self.cells
            .entry(coordinate)
            .or_default()
            .insert(tag.to_string());
    }

    /// Tags a rectangular block of cells, inclusive on both ends.
    pub fn fill(&mut self, from: TileCoordinate, to: TileCoordinate, tag: &str) {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.add_tag(TileCoordinate::new(x, y), tag);
            }
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn policy(&self) -> WalkPolicy {
        self.policy
    }

    /// Number of tagged cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over every tagged cell.
    pub fn cells(&self) -> impl Iterator<Item = (&TileCoordinate, &TagSet)> {
        self.cells.iter()
    }

    /// The cell containing a world position.
    pub fn coordinate_of(&self, x: f32, y: f32) -> TileCoordinate {
        TileCoordinate::from_world(x, y, self.tile_size)
    }

    /// Tags of the cell containing `(x, y)`. Unknown cells yield the empty set.
    pub fn tags_at(&self, x: f32, y: f32) -> &TagSet {
        self.tags_of(self.coordinate_of(x, y))
    }

    /// Tags of a cell. Unknown cells yield the empty set.
    pub fn tags_of(&self, coordinate: TileCoordinate) -> &TagSet {
        self.cells.get(&coordinate).unwrap_or(&EMPTY_TAGS)
    }

    /// Whether the configured walk policy lets an actor stand at `(x, y)`.
    pub fn is_walkable(&self, x: f32, y: f32) -> bool {
        self.policy.permits(self.tags_at(x, y))
    }
}

/// Four sample points approximating an actor's feet, relative to its
/// position.
///
/// A position is occupiable only if every corner is walkable, which keeps
/// actors from clipping wall corners while moving diagonally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub corners: [Vector2; 4],
}

impl Footprint {
    /// Footprint spanning `[left, right] x [bottom, top]` relative to the actor.
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            corners: [
                Vector2::new(left, bottom),
                Vector2::new(right, bottom),
                Vector2::new(left, top),
                Vector2::new(right, top),
            ],
        }
    }

    /// World positions of the corners for an actor at `position`.
    pub fn corners_at(&self, position: Vector2) -> [Vector2; 4] {
        self.corners.map(|c| position + c)
    }

    /// True if every corner is walkable.
    pub fn fits(&self, grid: &TileGrid, position: Vector2) -> bool {
        self.corners_at(position)
            .iter()
            .all(|c| grid.is_walkable(c.x, c.y))
    }

    /// True if any corner stands on a cell carrying `tag`.
    pub fn touches_tag(&self, grid: &TileGrid, position: Vector2, tag: &str) -> bool {
        self.corners_at(position)
            .iter()
            .any(|c| grid.tags_at(c.x, c.y).contains(tag))
    }
}

/// Decides whether an actor may occupy a candidate position.
///
/// The physics step consults a gate before committing movement. Closures
/// over a position work as gates too.
pub trait MoveGate {
    fn permits(&self, position: Vector2) -> bool;
}

impl<F> MoveGate for F
where
    F: Fn(Vector2) -> bool,
{
    fn permits(&self, position: Vector2) -> bool {
        self(position)
    }
}

/// Gate checking an actor footprint against the tile grid.
#[derive(Debug, Clone, Copy)]
pub struct FootprintGate<'a> {
    pub grid: &'a TileGrid,
    pub footprint: &'a Footprint,
}

impl MoveGate for FootprintGate<'_> {
    fn permits(&self, position: Vector2) -> bool {
        self.footprint.fits(self.grid, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::{LevelMap, TileReference};

    fn grid(policy: WalkPolicy) -> TileGrid {
        let mut grid = TileGrid::new(16.0, policy).unwrap();
        grid.fill(TileCoordinate::new(0, 0), TileCoordinate::new(3, 3), TAG_FLOOR);
        grid.add_tag(TileCoordinate::new(2, 2), TAG_WALL);
        grid.add_tag(TileCoordinate::new(5, 5), TAG_NONE);
        grid
    }

    #[test]
    fn test_floor_division_for_negative_coordinates() {
        assert_eq!(TileCoordinate::from_world(-1.0, -1.0, 16.0), TileCoordinate::new(-1, -1));
        assert_eq!(TileCoordinate::from_world(-16.0, 0.0, 16.0), TileCoordinate::new(-1, 0));
        assert_eq!(TileCoordinate::from_world(-16.5, 15.9, 16.0), TileCoordinate::new(-2, 0));
        assert_eq!(TileCoordinate::from_world(16.0, 31.9, 16.0), TileCoordinate::new(1, 1));
    }

    #[test]
    fn test_unknown_cells_have_empty_tags() {
        let grid = grid(WalkPolicy::NonWall);
        assert!(grid.tags_at(-500.0, 900.0).is_empty());
        assert!(!grid.is_walkable(-500.0, 900.0));
    }

    #[test]
    fn test_non_wall_policy() {
        let grid = grid(WalkPolicy::NonWall);
        assert!(grid.is_walkable(8.0, 8.0));
        // Floor with a wall stacked on top blocks.
        assert!(!grid.is_walkable(40.0, 40.0));
        // Untyped tile counts as walkable ground.
        assert!(grid.is_walkable(88.0, 88.0));
    }

    #[test]
    fn test_floor_only_policy() {
        let grid = grid(WalkPolicy::FloorOnly);
        assert!(grid.is_walkable(8.0, 8.0));
        // Allow-list ignores the stacked wall.
        assert!(grid.is_walkable(40.0, 40.0));
        assert!(!grid.is_walkable(88.0, 88.0));
    }

    #[test]
    fn test_footprint_requires_all_corners() {
        let grid = grid(WalkPolicy::NonWall);
        let footprint = Footprint::new(10.0, 22.0, -1.0, 6.0);
        assert!(footprint.fits(&grid, Vector2::new(2.0, 4.0)));
        // Bottom corners dip below row 0 into unknown cells.
        assert!(!footprint.fits(&grid, Vector2::new(2.0, 0.5)));
        // Right corners reach the wall cell at (2, 2).
        assert!(!footprint.fits(&grid, Vector2::new(14.0, 36.0)));
    }

    #[test]
    fn test_footprint_touches_tag() {
        let mut grid = grid(WalkPolicy::NonWall);
        grid.add_tag(TileCoordinate::new(1, 0), TAG_STAIRS);
        let footprint = Footprint::new(10.0, 22.0, -1.0, 6.0);
        assert!(footprint.touches_tag(&grid, Vector2::new(2.0, 4.0), TAG_STAIRS));
        assert!(!footprint.touches_tag(&grid, Vector2::new(20.0, 36.0), TAG_STAIRS));
    }

    #[test]
    fn test_closure_gate() {
        let gate = |p: Vector2| p.x < 10.0;
        assert!(gate.permits(Vector2::new(5.0, 0.0)));
        assert!(!gate.permits(Vector2::new(15.0, 0.0)));
    }

    #[test]
    fn test_from_level_map_unions_stacked_types() {
        let mut map = LevelMap::new(16);
        map.tiles.insert(
            TileCoordinate::new(0, 0),
            vec![TileReference::new(1, TAG_FLOOR), TileReference::new(7, TAG_WALL)],
        );
        let grid = TileGrid::from_level_map(&map, WalkPolicy::NonWall).unwrap();
        let tags = grid.tags_of(TileCoordinate::new(0, 0));
        assert!(tags.contains(TAG_FLOOR));
        assert!(tags.contains(TAG_WALL));
        assert!(!grid.is_walkable(1.0, 1.0));
    }

    #[test]
    fn test_rejects_non_positive_tile_size() {
        assert!(TileGrid::new(0.0, WalkPolicy::NonWall).is_err());
    }
}
