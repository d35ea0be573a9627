//! End-to-end simulation scenarios driven through the level's trigger points.

use dungeonlife::{
    ClipRegistry, Clock, Direction, GameConfig, GameEvent, Level, LevelMap, LevelTransition,
    ManualClock, MapObject, MonsterBehavior, TileCoordinate, Vector2,
};

const DT: f32 = 1.0 / 60.0;

fn open_floor() -> LevelMap {
    let mut map = LevelMap::new(16);
    map.fill(TileCoordinate::new(-4, -4), TileCoordinate::new(30, 30), 1, "floor");
    map.add_object(MapObject::new(100.0, 100.0, "spawn"));
    map
}

fn build(map: &LevelMap, clock: &ManualClock) -> Level {
    Level::new(
        "scenario",
        map,
        &GameConfig::default(),
        Box::new(clock.clone()),
        &mut ClipRegistry::new(),
    )
    .expect("level builds")
}

#[test]
fn test_walking_right_for_one_second() {
    let clock = ManualClock::new(0);
    let mut level = build(&open_floor(), &clock);
    let mut last_x = level.knight().actor.position().x;

    for _ in 0..60 {
        level.on_move_input(Direction::Right);
        assert_eq!(level.tick(DT), None);
        clock.advance(16);

        let knight = &level.knight().actor;
        assert!(knight.position().x > last_x);
        assert!(knight.body.speed() <= 75.0 + 1e-3);
        assert_eq!(knight.position().y, 100.0);
        last_x = knight.position().x;
    }

    let knight = &level.knight().actor;
    assert!((knight.body.speed() - 75.0).abs() < 1e-3);
    // 0.375 s ramping to 75 then 0.625 s at full speed.
    let expected = 100.0 + 0.5 * 200.0 * 0.375 * 0.375 + 75.0 * 0.625;
    assert!((knight.position().x - expected).abs() < 2.0);
    assert!(knight.animator.state().is_walking());
}

#[test]
fn test_swing_knocks_back_and_stuns() {
    let mut map = open_floor();
    // Centers (117, 108) and (127, 108): ten units apart.
    map.add_object(MapObject::new(121.0, 102.0, "orc"));
    let clock = ManualClock::new(5_000);
    let mut level = build(&map, &clock);

    let distance = level.monsters()[0].actor.distance_to(&level.knight().actor);
    assert!((distance - 10.0).abs() < 1e-4);

    assert_eq!(level.on_attack_input(), 1);
    let orc = &level.monsters()[0];
    assert_eq!(orc.state.health(), 10.0);
    assert!(orc.is_stunned(clock.now_ms()));
    assert_eq!(orc.behavior, MonsterBehavior::Stunned);
    let velocity = orc.actor.body.velocity();
    assert!((velocity.length() - 500.0).abs() < 1e-2);
    assert!(velocity.x > 0.0);
    assert!(velocity.y.abs() < 1e-2);
    assert!(level.weapon().is_hitting(clock.now_ms()));

    let events = level.drain_events();
    assert!(matches!(events[0], GameEvent::MonsterHit { damage, .. } if damage == 10.0));
    assert_eq!(events[1], GameEvent::WeaponSwung { targets: 1 });
}

#[test]
fn test_stun_expires_after_duration() {
    let mut map = open_floor();
    map.add_object(MapObject::new(121.0, 102.0, "orc"));
    let clock = ManualClock::new(1_000);
    let mut level = build(&map, &clock);
    level.on_attack_input();

    clock.set(1_000 + 499);
    level.tick(DT);
    assert!(level.monsters()[0].is_stunned(clock.now_ms()));
    assert_eq!(level.monsters()[0].behavior, MonsterBehavior::Stunned);

    clock.set(1_000 + 501);
    level.tick(DT);
    assert!(!level.monsters()[0].is_stunned(clock.now_ms()));
    assert_ne!(level.monsters()[0].behavior, MonsterBehavior::Stunned);
}

#[test]
fn test_stairs_signal_once_and_reset_to_spawn() {
    let mut map = open_floor();
    // Right-hand corners reach x = 128 after six units of travel.
    map.push_tile(
        TileCoordinate::new(8, 6),
        dungeonlife::TileReference::new(3, "stairs"),
    );
    let clock = ManualClock::new(0);
    let mut level = build(&map, &clock);

    let mut transitions = Vec::new();
    for _ in 0..240 {
        if transitions.is_empty() {
            level.on_move_input(Direction::Right);
        }
        if let Some(t) = level.tick(DT) {
            transitions.push(t);
        }
        clock.advance(16);
    }

    assert_eq!(transitions, vec![LevelTransition::Exit]);
    assert_eq!(level.knight().actor.position(), Vector2::new(100.0, 100.0));
    let exits = level
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::LevelExit { .. }))
        .count();
    assert_eq!(exits, 1);
}

#[test]
fn test_wall_blocks_every_footprint_corner() {
    let mut map = open_floor();
    map.fill(TileCoordinate::new(8, -4), TileCoordinate::new(8, 30), 2, "wall");
    let clock = ManualClock::new(0);
    let mut level = build(&map, &clock);

    for _ in 0..180 {
        let before = level.knight().actor.position();
        level.on_move_input(Direction::Right);
        level.on_move_input(Direction::Up);
        level.tick(DT);
        clock.advance(16);

        let knight = &level.knight().actor;
        assert!(knight.fits(level.grid()));
        let moved = knight.position() != before;
        if moved {
            assert!(knight.position().x + 22.0 < 128.0);
        }
    }
    assert!(level.knight().actor.position().x + 22.0 < 128.0);
}

#[test]
fn test_monsters_chase_then_bite() {
    let mut map = open_floor();
    map.add_object(MapObject::new(160.0, 102.0, "orc"));
    let clock = ManualClock::new(0);
    let mut level = build(&map, &clock);

    let mut bitten = false;
    for _ in 0..600 {
        level.tick(DT);
        clock.advance(16);
        if level.knight().state.combatant.health() < 100.0 {
            bitten = true;
            break;
        }
    }
    assert!(bitten);
    let events = level.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::HeroDamaged { amount, .. } if *amount == 10.0)));
}
