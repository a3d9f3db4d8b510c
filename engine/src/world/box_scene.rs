//! In-memory AABB scene
//!
//! A flat list of axis-aligned boxes, each on one collision layer, optionally
//! a trigger, optionally tagged and optionally carrying a ladder. Implements
//! [`SceneQuery`] with the slab/Minkowski primitives from
//! [`crate::physics::collision`]. Used for headless simulation and tests.

use glam::{Quat, Vec3};

use super::ladder::Ladder;
use super::scene::SceneQuery;
use crate::physics::collision::{oriented_box_extents, sweep_aabb};
use crate::physics::{Aabb, LayerMask, ObjectId, QueryTriggerInteraction, SceneHit};

/// One box in a [`BoxScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub bounds: Aabb,
    /// Collision layer index (0..32)
    pub layer: u8,
    pub is_trigger: bool,
    pub tag: Option<String>,
    pub ladder: Option<Ladder>,
}

impl SceneObject {
    /// Solid box on the given layer
    pub fn solid(bounds: Aabb, layer: u8) -> Self {
        Self {
            bounds,
            layer,
            is_trigger: false,
            tag: None,
            ladder: None,
        }
    }

    /// Trigger volume on the given layer
    pub fn trigger(bounds: Aabb, layer: u8) -> Self {
        Self {
            is_trigger: true,
            ..Self::solid(bounds, layer)
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_ladder(mut self, ladder: Ladder) -> Self {
        self.ladder = Some(ladder);
        self
    }
}

/// Scene made of axis-aligned boxes.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    objects: Vec<(ObjectId, SceneObject)>,
    next_id: u32,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its handle
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push((id, object));
        id
    }

    /// Remove an object. Returns it if it existed.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|(oid, _)| *oid == id)?;
        Some(self.objects.remove(index).1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|(oid, _)| *oid == id).map(|(_, o)| o)
    }

    /// Move an object so its bounds are centred on `center`
    pub fn set_center(&mut self, id: ObjectId, center: Vec3) -> bool {
        match self.objects.iter_mut().find(|(oid, _)| *oid == id) {
            Some((_, object)) => {
                object.bounds = Aabb::from_center(center, object.bounds.half_extents());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn on_layers(&self, layers: LayerMask) -> impl Iterator<Item = &(ObjectId, SceneObject)> {
        self.objects.iter().filter(move |(_, o)| layers.contains(o.layer))
    }

    fn sweep(&self, origin: Vec3, direction: Vec3, max_distance: f32, extents: Vec3, layers: LayerMask) -> Vec<SceneHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance < 0.0 {
            return Vec::new();
        }

        self.on_layers(layers)
            .filter_map(|(id, object)| {
                let (distance, point, normal) = sweep_aabb(origin, direction, max_distance, extents, &object.bounds)?;
                Some(SceneHit {
                    object: *id,
                    point,
                    normal,
                    distance,
                    is_trigger: object.is_trigger,
                })
            })
            .collect()
    }
}

impl SceneQuery for BoxScene {
    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        layers: LayerMask,
        triggers: QueryTriggerInteraction,
        results: &mut [ObjectId],
    ) -> usize {
        let query = Aabb::from_center(center, oriented_box_extents(half_extents, orientation));
        let mut count = 0;
        for (id, object) in self.on_layers(layers) {
            if count >= results.len() {
                break;
            }
            if object.is_trigger && triggers == QueryTriggerInteraction::Ignore {
                continue;
            }
            if object.bounds.intersects(&query) {
                results[count] = *id;
                count += 1;
            }
        }
        count
    }

    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, layers: LayerMask) -> Vec<SceneHit> {
        self.sweep(origin, direction, max_distance, Vec3::ZERO, layers)
    }

    fn box_cast_all(
        &self,
        center: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        orientation: Quat,
        max_distance: f32,
        layers: LayerMask,
    ) -> Vec<SceneHit> {
        let extents = oriented_box_extents(half_extents, orientation);
        self.sweep(center, direction, max_distance, extents, layers)
    }

    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Vec<SceneHit> {
        self.sweep(origin, direction, max_distance, Vec3::splat(radius.max(0.0)), layers)
    }

    fn closest_point(&self, object: ObjectId, point: Vec3) -> Option<Vec3> {
        self.get(object).map(|o| o.bounds.closest_point(point))
    }

    fn objects_with_tag(&self, tag: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.tag.as_deref() == Some(tag))
            .map(|(id, _)| *id)
            .collect()
    }

    fn object_position(&self, object: ObjectId) -> Option<Vec3> {
        self.get(object).map(|o| o.bounds.center())
    }

    fn ladder(&self, object: ObjectId) -> Option<Ladder> {
        self.get(object).and_then(|o| o.ladder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLS: u8 = 1;
    const WATER: u8 = 4;

    fn scene() -> (BoxScene, ObjectId, ObjectId) {
        let mut scene = BoxScene::new();
        let wall = scene.insert(SceneObject::solid(
            Aabb::new(Vec3::new(-5.0, 0.0, 10.0), Vec3::new(5.0, 5.0, 11.0)),
            WALLS,
        ));
        let water = scene.insert(SceneObject::trigger(
            Aabb::new(Vec3::new(-5.0, -3.0, -5.0), Vec3::new(5.0, 0.5, 5.0)),
            WATER,
        ));
        (scene, wall, water)
    }

    #[test]
    fn test_overlap_respects_layers_and_triggers() {
        let (scene, _, water) = scene();
        let mut results = [ObjectId(0); 8];

        let n = scene.overlap_box(
            Vec3::ZERO,
            Vec3::splat(0.5),
            Quat::IDENTITY,
            LayerMask::layer(WATER),
            QueryTriggerInteraction::Collide,
            &mut results,
        );
        assert_eq!(n, 1);
        assert_eq!(results[0], water);

        let n = scene.overlap_box(
            Vec3::ZERO,
            Vec3::splat(0.5),
            Quat::IDENTITY,
            LayerMask::layer(WATER),
            QueryTriggerInteraction::Ignore,
            &mut results,
        );
        assert_eq!(n, 0);

        let n = scene.overlap_box(
            Vec3::ZERO,
            Vec3::splat(0.5),
            Quat::IDENTITY,
            LayerMask::layer(WALLS),
            QueryTriggerInteraction::Collide,
            &mut results,
        );
        assert_eq!(n, 0);
    }

    #[test]
    fn test_overlap_fills_at_most_buffer() {
        let mut scene = BoxScene::new();
        for i in 0..4 {
            scene.insert(SceneObject::solid(Aabb::from_center(Vec3::new(i as f32 * 0.1, 0.0, 0.0), Vec3::ONE), 0));
        }
        let mut results = [ObjectId(99); 2];
        let n = scene.overlap_box(Vec3::ZERO, Vec3::ONE, Quat::IDENTITY, LayerMask::ALL, QueryTriggerInteraction::Ignore, &mut results);
        assert_eq!(n, 2);
    }

    #[test]
    fn test_box_cast_hits_wall() {
        let (scene, wall, _) = scene();
        let hits = scene.box_cast_all(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.2, 0.2, 0.1),
            Vec3::Z,
            Quat::IDENTITY,
            20.0,
            LayerMask::layer(WALLS),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, wall);
        assert!((hits[0].distance - 9.9).abs() < 0.001, "distance was {}", hits[0].distance);
        assert_eq!(hits[0].normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_raycast_skips_triggers() {
        let (scene, wall, _) = scene();
        let hit = scene
            .raycast(Vec3::new(0.0, 0.2, -10.0), Vec3::Z, 40.0, LayerMask::ALL)
            .expect("ray should reach the wall");
        assert_eq!(hit.object, wall);
    }

    #[test]
    fn test_closest_point_inside_water() {
        let (scene, _, water) = scene();
        let inside = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(scene.closest_point(water, inside), Some(inside));
        let above = Vec3::new(1.0, 2.0, 1.0);
        assert_eq!(scene.closest_point(water, above), Some(Vec3::new(1.0, 0.5, 1.0)));
        assert_eq!(scene.closest_point(ObjectId(42), above), None);
    }

    #[test]
    fn test_tags_and_positions() {
        let mut scene = BoxScene::new();
        let a = scene.insert(SceneObject::solid(Aabb::from_center(Vec3::new(0.0, 1.0, 5.0), Vec3::ONE), 0).with_tag("LockOnTarget"));
        scene.insert(SceneObject::solid(Aabb::from_center(Vec3::ZERO, Vec3::ONE), 0));
        assert_eq!(scene.objects_with_tag("LockOnTarget"), vec![a]);
        assert_eq!(scene.object_position(a), Some(Vec3::new(0.0, 1.0, 5.0)));

        assert!(scene.set_center(a, Vec3::new(2.0, 1.0, 5.0)));
        assert_eq!(scene.object_position(a), Some(Vec3::new(2.0, 1.0, 5.0)));
        assert!(scene.remove(a).is_some());
        assert!(scene.objects_with_tag("LockOnTarget").is_empty());
    }
}
