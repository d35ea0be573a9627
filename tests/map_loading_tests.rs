//! Integration tests for reading Tiled maps from disk.

use dungeonlife::{
    ClipRegistry, DungeonError, DungeonResult, GameConfig, Level, ManualClock, TileCoordinate,
    TileGrid, TiledMapReader, WalkPolicy,
};
use std::fs;
use tempfile::tempdir;

const TILESET: &str = r#"{
    "name": "cellar", "tilecount": 3, "tilewidth": 16, "tileheight": 16,
    "tiles": [ { "id": 0, "type": "floor" }, { "id": 1, "type": "wall" }, { "id": 2, "type": "stairs" } ]
}"#;

const MAP: &str = r#"{
    "tilewidth": 16, "tileheight": 16, "infinite": true,
    "tilesets": [ { "firstgid": 1, "source": "cellar.json" } ],
    "layers": [
        { "type": "tilelayer", "name": "floor", "chunks": [
            { "x": -2, "y": -2, "width": 4, "height": 4,
              "data": [1,1,1,1, 1,1,1,1, 1,1,1,1, 1,1,1,3] } ] },
        { "type": "tilelayer", "name": "walls", "chunks": [
            { "x": -2, "y": -2, "width": 4, "height": 1, "data": [2,2,2,2] } ] },
        { "type": "objectgroup", "objects": [
            { "x": -8, "y": 8, "type": "spawn", "name": "" },
            { "x": 16, "y": 16, "type": "orc2", "name": "guard" } ] }
    ]
}"#;

#[test]
fn test_reads_map_with_external_tileset() -> DungeonResult<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("cellar.json"), TILESET)?;
    let path = dir.path().join("cellar-map.json");
    fs::write(&path, MAP)?;

    let map = TiledMapReader::read_file(&path)?;
    assert_eq!(map.tile_width, 16);
    assert_eq!(map.textures.len(), 1);
    assert_eq!(map.textures[0].source, "cellar.json");

    let grid = TileGrid::from_level_map(&map, WalkPolicy::NonWall)?;
    // Chunk origin (-2, -2) becomes world row 2 after the y flip.
    assert!(grid.tags_of(TileCoordinate::new(-2, 2)).contains("wall"));
    assert!(grid.tags_of(TileCoordinate::new(1, -1)).contains("stairs"));
    assert!(grid.is_walkable(0.0, 0.0));
    assert!(!grid.is_walkable(-20.0, 40.0));

    let spawn = map.spawn()?;
    assert_eq!((spawn.x, spawn.y), (-8.0, -8.0));
    assert_eq!(map.objects_of("orc2")[0].name, "guard");
    Ok(())
}

#[test]
fn test_missing_tileset_file_is_io_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("lonely.json");
    fs::write(&path, MAP).expect("write map");
    assert!(matches!(
        TiledMapReader::read_file(&path),
        Err(DungeonError::Io(_))
    ));
}

#[test]
fn test_map_without_spawn_cannot_become_a_level() -> DungeonResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.json");
    fs::write(
        &path,
        r#"{ "tilewidth": 16, "tilesets": [], "layers": [ { "type": "objectgroup", "objects": [] } ] }"#,
    )?;
    let map = TiledMapReader::read_file(&path)?;
    let result = Level::new(
        "empty",
        &map,
        &GameConfig::default(),
        Box::new(ManualClock::new(0)),
        &mut ClipRegistry::new(),
    );
    assert!(matches!(result, Err(DungeonError::MissingSpawn)));
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> DungeonResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "weapon": { "range": 24.0, "hit_duration_ms": 300, "offset_x": 6.0, "knockback_speed": 400.0 } }"#,
    )?;
    let config = GameConfig::load_from_file(&path)?;
    assert_eq!(config.weapon.range, 24.0);
    assert_eq!(config.hero, GameConfig::default().hero);
    Ok(())
}

#[test]
fn test_malformed_map_is_serde_error() -> DungeonResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"layers\": [ ")?;
    assert!(matches!(
        TiledMapReader::read_file(&path),
        Err(DungeonError::Serde(_))
    ));
    Ok(())
}
