//! Trigger volume shapes and overlap tracking

use crate::events::TriggerEvent;
use crate::object::ObjectId;
use crate::scene::SceneObjects;
use glam::{Mat4, Vec3};
use std::collections::HashSet;

/// Oriented box trigger volume
///
/// The box is described by `center` and `size` in the local space of
/// `transform` (local-to-world).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    transform: Mat4,
    center: Vec3,
    size: Vec3,
    world_to_local: Option<Mat4>,
}

impl TriggerVolume {
    /// Create a box volume. Negative size components are clamped to zero.
    pub fn new(transform: Mat4, center: Vec3, size: Vec3) -> Self {
        let det = transform.determinant();
        let world_to_local = (det != 0.0 && det.is_finite()).then(|| transform.inverse());

        Self {
            transform,
            center,
            size: size.max(Vec3::ZERO),
            world_to_local,
        }
    }

    /// Axis-aligned box at the world origin
    pub fn box_shape(width: f32, height: f32, depth: f32) -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO, Vec3::new(width, height, depth))
    }

    /// Same volume with `amount` added to every size component
    pub fn inflated(&self, amount: f32) -> Self {
        Self::new(self.transform, self.center, self.size + Vec3::splat(amount))
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Box center in world space
    pub fn world_center(&self) -> Vec3 {
        self.transform.transform_point3(self.center)
    }

    /// Check if a world-space point is inside the box (boundary included)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let Some(world_to_local) = self.world_to_local else {
            return false;
        };

        let local = world_to_local.transform_point3(point) - self.center;
        let half = self.size * 0.5;

        local.x.abs() <= half.x && local.y.abs() <= half.y && local.z.abs() <= half.z
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::box_shape(1.0, 1.0, 1.0)
    }
}

/// Per-volume overlap state, diffed every frame into enter/exit events
#[derive(Debug, Default, Clone)]
pub struct VolumeOverlaps {
    inside: HashSet<ObjectId>,
}

impl VolumeOverlaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare active scene objects against the volume.
    ///
    /// Exit events come first, then enter events, each in ascending
    /// object id order. Objects that vanished from the scene or became
    /// inactive produce an exit.
    pub fn update(
        &mut self,
        trigger: u64,
        volume: &TriggerVolume,
        scene: &SceneObjects,
    ) -> Vec<TriggerEvent> {
        let current: HashSet<ObjectId> = scene
            .iter()
            .filter(|(_, object)| object.is_active() && volume.contains_point(object.position))
            .map(|(id, _)| id)
            .collect();

        let mut exited: Vec<_> = self.inside.difference(&current).copied().collect();
        let mut entered: Vec<_> = current.difference(&self.inside).copied().collect();
        exited.sort();
        entered.sort();

        self.inside = current;

        exited
            .into_iter()
            .map(|id| TriggerEvent::exit(trigger, id))
            .chain(entered.into_iter().map(|id| TriggerEvent::enter(trigger, id)))
            .collect()
    }

    /// Forget everything, producing exit events for what was inside
    pub fn clear(&mut self, trigger: u64) -> Vec<TriggerEvent> {
        let mut exited: Vec<_> = self.inside.drain().collect();
        exited.sort();
        exited
            .into_iter()
            .map(|id| TriggerEvent::exit(trigger, id))
            .collect()
    }

    /// Drop an object without an exit event, so that it is reported as
    /// entering again on the next update if it is still inside.
    ///
    /// Used when a consumer released the object for a reason other than a
    /// geometric exit (a disable notification, for instance).
    pub fn forget(&mut self, object: ObjectId) -> bool {
        self.inside.remove(&object)
    }

    pub fn is_inside(&self, object: ObjectId) -> bool {
        self.inside.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }
}
