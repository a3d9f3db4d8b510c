//! Fade output
//!
//! Geometry that blocks the view of the follow subject, and the subject
//! itself when the camera gets too close, is reported as a transparency
//! request. The host owns the renderers and eases their opacity at the
//! requested speeds.

use glam::Vec3;

use super::config::FadeConfig;
use crate::physics::{LayerMask, ObjectId, Pose};
use crate::world::SceneQuery;

/// What a fade request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTarget {
    /// A scene object between camera and subject
    Object(ObjectId),
    /// Every renderer of the follow subject
    FollowSubject,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeCommand {
    pub target: FadeTarget,
    /// Desired opacity, 0 fully transparent
    pub alpha: f32,
    pub fade_in_speed: f32,
    pub fade_out_speed: f32,
}

/// Receives fade requests from the camera.
pub trait FadeSink {
    fn set_transparency(&mut self, command: FadeCommand);
}

impl FadeSink for Vec<FadeCommand> {
    fn set_transparency(&mut self, command: FadeCommand) {
        self.push(command);
    }
}

/// Sink that drops every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFade;

impl FadeSink for NoFade {
    fn set_transparency(&mut self, _command: FadeCommand) {}
}

/// Opacity of an obstruction hit `hit_distance` along a cast of length `cast_length`.
pub fn obstruction_alpha(config: &FadeConfig, hit_distance: f32, cast_length: f32) -> f32 {
    if config.always_fully_transparent || hit_distance <= config.full_transparency_distance {
        return 0.0;
    }
    let span = cast_length - config.full_transparency_distance;
    if span <= 0.0 {
        return 0.0;
    }
    ((hit_distance - config.full_transparency_distance) / span).clamp(0.0, 1.0)
}

/// Fade everything a sphere cast from the camera to the subject passes through.
///
/// # Arguments
/// * `camera` - Current camera transform (looking along its +Z)
/// * `near_clip` - Near plane distance; the cast starts just in front of it
/// * `character_offset` - Point on the subject the cast aims at
pub fn fade_obstructions(
    scene: &dyn SceneQuery,
    config: &FadeConfig,
    layers: LayerMask,
    camera: Pose,
    near_clip: f32,
    character_offset: Vec3,
    sink: &mut dyn FadeSink,
) {
    if !config.fade_objects {
        return;
    }

    let radius = config.spherecast_radius;
    let start = camera.position + camera.forward() * (near_clip - radius);
    let direction = character_offset - camera.position;
    let length = direction.length();

    for hit in scene.sphere_cast_all(start, radius, direction, length + radius, layers) {
        sink.set_transparency(FadeCommand {
            target: FadeTarget::Object(hit.object),
            alpha: obstruction_alpha(config, hit.distance, length),
            fade_in_speed: config.fade_in_speed,
            fade_out_speed: config.fade_out_speed,
        });
    }
}

/// Fade the subject out while the camera is within the configured distance.
pub fn fade_follow_subject(config: &FadeConfig, camera_position: Vec3, character_offset: Vec3, sink: &mut dyn FadeSink) {
    if config.fade_player_when_close && camera_position.distance(character_offset) < config.player_fade_distance {
        sink.set_transparency(FadeCommand {
            target: FadeTarget::FollowSubject,
            alpha: 0.0,
            fade_in_speed: config.fade_in_speed,
            fade_out_speed: config.fade_out_speed,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::physics::Aabb;
    use crate::world::{BoxScene, SceneObject};

    #[test]
    fn test_obstruction_alpha() {
        let config = FadeConfig::default();
        assert_eq!(obstruction_alpha(&config, 1.0, 6.0), 0.0);
        assert!((obstruction_alpha(&config, 4.0, 6.0) - 0.5).abs() < 0.0001);
        assert_eq!(obstruction_alpha(&config, 9.0, 6.0), 1.0);

        let always = FadeConfig {
            always_fully_transparent: true,
            ..FadeConfig::default()
        };
        assert_eq!(obstruction_alpha(&always, 4.0, 6.0), 0.0);
    }

    #[test]
    fn test_pillar_between_camera_and_subject_fades() {
        let mut scene = BoxScene::new();
        let pillar = scene.insert(SceneObject::solid(
            Aabb::new(Vec3::new(-0.5, 0.0, 3.5), Vec3::new(0.5, 5.0, 4.5)),
            12,
        ));
        let config = FadeConfig::default();
        let mut sink: Vec<FadeCommand> = Vec::new();

        fade_obstructions(
            &scene,
            &config,
            LayerMask::layer(12),
            Pose::new(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY),
            0.3,
            Vec3::new(0.0, 2.0, 8.0),
            &mut sink,
        );

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].target, FadeTarget::Object(pillar));
        // Cast starts at z = -0.3, sphere touches the pillar after 3.2m
        assert!((sink[0].alpha - (3.2 - 2.0) / (8.0 - 2.0)).abs() < 0.001);
    }

    #[test]
    fn test_follow_fades_when_close() {
        let config = FadeConfig::default();
        let mut sink: Vec<FadeCommand> = Vec::new();
        fade_follow_subject(&config, Vec3::new(0.0, 2.5, 0.5), Vec3::new(0.0, 2.5, 0.0), &mut sink);
        fade_follow_subject(&config, Vec3::new(0.0, 2.5, 3.0), Vec3::new(0.0, 2.5, 0.0), &mut sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].target, FadeTarget::FollowSubject);
        assert_eq!(sink[0].alpha, 0.0);
    }
}
