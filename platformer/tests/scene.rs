use std::time::Duration;

use platformer::{
    physics::DebugShapeKind, Action, ActionSnapshot, JumpPhase, Level, PlatformerConfig,
    PlatformerScene, Sound, SoundLog, Vec2,
};
use serde_json::json;

const FRAME: Duration = Duration::from_nanos(16_666_667);
const WIDTH: u32 = 40;
const HEIGHT: u32 = 10;

/// A 40x10 map of 64 px tiles with the floor top at y = 512, plus extra
/// solid `(column, row)` tiles.
fn level(solid: &[(u32, u32)], objects: serde_json::Value) -> Level {
    let tiles = (WIDTH * HEIGHT) as usize;
    let mut ground = vec![0u32; tiles];
    for tile in &mut ground[(8 * WIDTH) as usize..] {
        *tile = 2;
    }
    for &(x, y) in solid {
        ground[(y * WIDTH + x) as usize] = 2;
    }
    let map = json!({
        "width": WIDTH, "height": HEIGHT, "tilewidth": 64, "tileheight": 64,
        "layers": [
            { "type": "tilelayer", "name": "Layer 0", "data": vec![0u32; tiles] },
            { "type": "tilelayer", "name": "Layer 1", "data": ground },
            { "type": "objectgroup", "name": "Objects", "objects": objects }
        ],
        "tilesets": [
            { "firstgid": 1, "tiles": [
                { "id": 1, "properties": [ { "name": "collides", "type": "bool", "value": true } ] }
            ]}
        ]
    });
    Level::from_json(&map.to_string()).unwrap()
}

fn tile_object(name: &str, tile_x: u32) -> serde_json::Value {
    json!({ "name": name, "x": tile_x * 64, "y": 512, "width": 64, "height": 64, "gid": 36 })
}

fn scene(objects: serde_json::Value) -> PlatformerScene {
    scene_with(Vec2::new(200.0, 480.0), &[], objects)
}

fn scene_with(spawn: Vec2, solid: &[(u32, u32)], objects: serde_json::Value) -> PlatformerScene {
    let mut config = PlatformerConfig::default();
    config.player.spawn = spawn;
    PlatformerScene::new(config, level(solid, objects)).unwrap()
}

fn run(
    scene: &mut PlatformerScene,
    controls: &ActionSnapshot,
    audio: &mut SoundLog,
    frames: usize,
) {
    for _ in 0..frames {
        scene.update(controls, audio, FRAME).unwrap();
    }
}

/// Run until `done` holds, failing after `limit` frames.
fn run_until(
    scene: &mut PlatformerScene,
    controls: &ActionSnapshot,
    audio: &mut SoundLog,
    limit: usize,
    done: impl Fn(&PlatformerScene) -> bool,
) {
    for _ in 0..limit {
        if done(scene) {
            return;
        }
        scene.update(controls, audio, FRAME).unwrap();
    }
    assert!(done(scene), "condition not reached in {limit} frames");
}

fn right() -> ActionSnapshot {
    ActionSnapshot::new().hold(Action::Right)
}

#[test]
fn player_lands_on_the_floor() {
    let mut scene = scene(json!([]));
    let mut audio = SoundLog::new();
    run(&mut scene, &ActionSnapshot::new(), &mut audio, 30);

    let state = scene.player_state().unwrap();
    assert!(state.on_ground);
    assert_eq!(state.phase, JumpPhase::Grounded);
    assert!((scene.player_position().y - 488.0).abs() < 1.0);
}

#[test]
fn coin_pickup_removes_only_that_coin() {
    let mut scene = scene(json!([tile_object("coin", 7), tile_object("coin", 30)]));
    let mut audio = SoundLog::new();
    assert_eq!(scene.coins().len(), 2);

    run_until(&mut scene, &right(), &mut audio, 120, |s| s.coins().len() < 2);

    assert_eq!(scene.coins().len(), 1);
    assert_eq!(scene.coins()[0].x, 30.0 * 64.0);
    assert_eq!(audio.count(Sound::Coin), 1);
    assert!(audio.plays().contains(&(Sound::Coin, 3.0)));
    assert!(!scene.is_won());
}

#[test]
fn reaching_the_flag_wins_once_and_pauses() {
    let mut scene = scene(json!([tile_object("flag", 15)]));
    let mut audio = SoundLog::new();

    run_until(&mut scene, &right(), &mut audio, 300, |s| s.is_won());
    assert!(scene.is_paused());
    assert!(scene.clock().is_paused());
    assert_eq!(scene.hud().len(), 1);

    let frozen = scene.player_position();
    run(&mut scene, &right(), &mut audio, 30);
    assert!(scene.is_won());
    assert_eq!(scene.hud().len(), 1);
    assert_eq!(scene.player_position(), frozen);
    assert_eq!(scene.clock().delta_time(), Duration::ZERO);
}

#[test]
fn restart_recovers_from_a_win() {
    let mut scene = scene(json!([tile_object("coin", 7), tile_object("flag", 15)]));
    let mut audio = SoundLog::new();
    run_until(&mut scene, &right(), &mut audio, 300, |s| s.is_won());
    assert!(scene.coins().is_empty());

    let restart = ActionSnapshot::new().press(Action::Restart);
    scene.update(&restart, &mut audio, FRAME).unwrap();

    assert!(!scene.is_won());
    assert!(!scene.is_paused());
    assert!(!scene.clock().is_paused());
    assert!(scene.hud().is_empty());
    assert_eq!(scene.coins().len(), 1);
    assert_eq!(scene.player_position(), Vec2::new(200.0, 480.0));

    // Play resumes normally after the restart.
    run(&mut scene, &ActionSnapshot::new(), &mut audio, 5);
    assert!(scene.player_position().y > 480.0);
}

#[test]
fn jump_leaves_the_ground_and_comes_back() {
    let mut scene = scene(json!([]));
    let mut audio = SoundLog::new();
    run(&mut scene, &ActionSnapshot::new(), &mut audio, 30);

    let jump = ActionSnapshot::new().press(Action::Jump);
    scene.update(&jump, &mut audio, FRAME).unwrap();
    let state = scene.player_state().unwrap();
    assert!(state.is_jumping);
    assert_eq!(scene.player_velocity().y, -650.0);
    assert_eq!(audio.count(Sound::Jump), 1);

    run(&mut scene, &ActionSnapshot::new(), &mut audio, 10);
    assert!(scene.player_position().y < 440.0);

    run(&mut scene, &ActionSnapshot::new(), &mut audio, 90);
    let state = scene.player_state().unwrap();
    assert!(state.on_ground);
    assert!(!state.is_jumping);
}

#[test]
fn debug_toggle_exposes_collider_outlines() {
    let mut scene = scene(json!([tile_object("coin", 7)]));
    let mut audio = SoundLog::new();
    assert!(scene.debug_shapes().is_empty());

    let toggle = ActionSnapshot::new().press(Action::DebugToggle);
    scene.update(&toggle, &mut audio, FRAME).unwrap();
    let kinds: Vec<DebugShapeKind> = scene.debug_shapes().iter().map(|s| s.kind).collect();
    assert!(kinds.contains(&DebugShapeKind::Static));
    assert!(kinds.contains(&DebugShapeKind::Dynamic));
    assert!(kinds.contains(&DebugShapeKind::Sensor));

    scene.update(&toggle, &mut audio, FRAME).unwrap();
    assert!(scene.debug_shapes().is_empty());
}

#[test]
fn camera_follows_with_lookahead_inside_the_level() {
    let mut scene = scene(json!([]));
    let mut audio = SoundLog::new();

    let mut max_scroll: f32 = 0.0;
    let mut saw_lookahead = false;
    for _ in 0..240 {
        scene.update(&right(), &mut audio, FRAME).unwrap();
        let camera = scene.camera();
        assert!(camera.position.x >= 0.0 && camera.position.x <= 1280.0);
        // The level is shorter than the view, so it stays centered vertically.
        assert_eq!(camera.position.y, -80.0);
        assert!(scene.player_velocity().x <= 600.0);
        max_scroll = max_scroll.max(camera.position.x);
        saw_lookahead |= scene.controller().camera_follow().lookahead_target == 200.0;
    }
    assert!(max_scroll > 100.0);
    assert!(saw_lookahead);
    assert!(audio.count(Sound::Footstep1) > 0);
    assert!(audio.count(Sound::Footstep2) > 0);
}

#[test]
fn sliding_down_a_wall_then_jumping_off_it() {
    // A solid column at tile x = 2 whose right face is at x = 192; the
    // player falls just beside it.
    let column: Vec<(u32, u32)> = (0..8).map(|row| (2, row)).collect();
    let mut scene = scene_with(Vec2::new(217.0, 150.0), &column, json!([]));
    let mut audio = SoundLog::new();
    let slide_speed = scene.config().wall.slide_speed;
    let hold_left = ActionSnapshot::new().hold(Action::Left);

    let mut sliding_frames = 0;
    for _ in 0..60 {
        scene.update(&hold_left, &mut audio, FRAME).unwrap();
        let state = scene.player_state().unwrap();
        if state.wall_sliding {
            sliding_frames += 1;
            assert!(state.touching_left_wall);
            assert!(!state.on_ground);
        }
        if sliding_frames > 0 {
            assert!(state.wall_sliding);
            assert!(scene.player_velocity().y <= slide_speed);
        }
    }
    assert!(sliding_frames > 30, "slid for {sliding_frames} frames");
    assert!(scene.player_position().y < 480.0);

    let wall_jump = ActionSnapshot::new().hold(Action::Left).press(Action::Jump);
    scene.update(&wall_jump, &mut audio, FRAME).unwrap();
    let state = scene.player_state().unwrap();
    assert!(state.is_jumping);
    assert_eq!(scene.player_velocity(), Vec2::new(500.0, -650.0));
    assert_eq!(audio.count(Sound::Jump), 1);

    run(&mut scene, &ActionSnapshot::new(), &mut audio, 5);
    assert!(scene.player_position().x > 217.0);
    assert!(!scene.player_state().unwrap().touching_left_wall);
}
