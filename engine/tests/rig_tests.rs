//! Rig Tests - Character and Camera Together
//!
//! The rig runs camera input, character step and camera placement in a
//! fixed order; these tests check what that order guarantees.

use std::sync::Arc;

use glam::Vec3;
use lockon_locomotion_engine::camera::{CameraState, NoFade};
use lockon_locomotion_engine::input::{CameraInputs, InputState, KeyCode, PlayerCharacterInputs};
use lockon_locomotion_engine::physics::{Aabb, ObjectId};
use lockon_locomotion_engine::player::{CharacterState, FlatGroundMotor};
use lockon_locomotion_engine::world::{BoxScene, SceneObject};
use lockon_locomotion_engine::{PlayerRig, RigConfig};

const DT: f32 = 1.0 / 60.0;

fn arena() -> (Arc<BoxScene>, ObjectId) {
    let mut scene = BoxScene::new();
    let target = scene.insert(
        SceneObject::solid(Aabb::from_center(Vec3::new(0.0, 1.0, 10.0), Vec3::splat(0.5)), 6).with_tag("LockOnTarget"),
    );
    (Arc::new(scene), target)
}

fn rig_with(config: RigConfig) -> (PlayerRig<FlatGroundMotor, BoxScene>, ObjectId) {
    let (scene, target) = arena();
    let motor = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
    (PlayerRig::new(config, motor, scene, None).expect("valid rig"), target)
}

#[test]
fn test_rig_from_json_config() {
    let json = r#"{
        "character": { "stable": { "max_stable_move_speed": 6.0 } },
        "camera": { "orbit": { "distance": 4.0 } }
    }"#;
    let config = RigConfig::from_json_str(json).expect("valid json");
    let (rig, _) = rig_with(config);

    assert_eq!(rig.character().tuning().stable.max_stable_move_speed, 6.0);
    let camera = rig.camera().position();
    let look_at = Vec3::new(0.0, 2.5, 0.0);
    assert!((camera.distance(look_at) - 4.0).abs() < 0.001);
}

#[test]
fn test_keyboard_lock_on_through_rig() {
    let (mut rig, target) = rig_with(RigConfig::default());
    let mut input = InputState::new();

    input.keyboard.handle_key(KeyCode::ShiftLeft, true);
    rig.tick_input(DT, &mut input, &mut NoFade);
    input.keyboard.handle_key(KeyCode::ShiftLeft, false);
    rig.tick_input(DT, &mut input, &mut NoFade);

    let snapshot = rig.snapshot();
    assert_eq!(snapshot.camera_state, CameraState::LockOn);
    assert_eq!(snapshot.lock_on_target, Some(target));

    // Walking forward while locked on heads toward the target
    input.keyboard.handle_key(KeyCode::W, true);
    for _ in 0..60 {
        rig.tick_input(DT, &mut input, &mut NoFade);
    }
    let snapshot = rig.snapshot();
    assert!(snapshot.character_pose.position.z > 2.0, "{:?}", snapshot.character_pose.position);
    assert!(snapshot.character_pose.position.x.abs() < 0.5);
    assert_eq!(snapshot.camera_state, CameraState::LockOn);
}

#[test]
fn test_lock_on_pitch_frozen_while_airborne() {
    let (mut rig, _) = rig_with(RigConfig::default());
    let mut input = InputState::new();

    input.keyboard.handle_key(KeyCode::ShiftLeft, true);
    rig.tick_input(DT, &mut input, &mut NoFade);
    input.keyboard.handle_key(KeyCode::ShiftLeft, false);
    for _ in 0..30 {
        rig.tick_input(DT, &mut input, &mut NoFade);
    }
    assert_eq!(rig.camera().state(), CameraState::LockOn);

    input.keyboard.handle_key(KeyCode::Space, true);
    rig.tick_input(DT, &mut input, &mut NoFade);
    input.keyboard.handle_key(KeyCode::Space, false);

    let mut airborne_pitches = Vec::new();
    for _ in 0..60 {
        rig.tick_input(DT, &mut input, &mut NoFade);
        if !rig.snapshot().stable_on_ground {
            airborne_pitches.push(rig.camera().lock_on_pitch());
        }
    }
    assert!(airborne_pitches.len() > 10);
    assert!(airborne_pitches.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_camera_reads_finalized_character_pose() {
    let (mut rig, _) = rig_with(RigConfig::default());
    let walk = PlayerCharacterInputs::moving(1.0, 0.0, glam::Quat::IDENTITY);

    for _ in 0..30 {
        rig.tick(DT, &walk, &CameraInputs::default(), &mut NoFade);
        let character = rig.snapshot().character_pose.position;
        assert_eq!(rig.camera().follow().position, character);
    }
    assert_eq!(rig.character().state(), CharacterState::Default);
}
