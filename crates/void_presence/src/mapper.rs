//! Runtime presence mapper
//!
//! A mapper owns the presence map of one zone. Every tick it looks at the
//! objects currently tracked inside the zone and, for each map cell, stores
//! the world position of the nearest object (after projection onto the map
//! plane) together with an influence strength in `[0, 1]`.

use crate::config::PresenceOverrides;
use crate::consumer::{self, ConsumerHandle};
use crate::geometry::MapGeometry;
use crate::grid::{PresenceMap, PresenceTexel, SharedPresenceMap};
use crate::zone::PresenceZone;
use glam::{Mat4, Vec3};
use parking_lot::RwLock;
use std::sync::Arc;
use void_triggers::{
    ObjectId, SceneObjects, TriggerEvent, TriggerEventType, TriggerPolicy, TriggerTracker,
    TriggerVolume,
};

/// What a tick did to the presence map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Map recomputed from the tracked objects
    Updated,
    /// Objects tracked but the zone is beyond the render distance; map untouched
    Skipped,
    /// Nothing tracked any more; map cleared once
    Cleared,
    /// Nothing to do
    Idle,
}

/// Per-zone runtime instance computing the presence map
pub struct PresenceMapper {
    geometry: MapGeometry,
    overrides: PresenceOverrides,
    tracker: TriggerTracker,
    map: SharedPresenceMap,
    consumers: Vec<ConsumerHandle>,
    enabled: bool,
    needs_clear: bool,
    /// Positions gathered this tick (world space)
    positions: Vec<Vec3>,
    /// Same positions projected onto the sampling plane
    projected: Vec<Vec3>,
    /// Objects evicted without an exit event since the last
    /// [`take_released`](Self::take_released)
    released: Vec<ObjectId>,
}

impl PresenceMapper {
    /// Create a mapper for a zone and bind its map to the zone's consumers.
    ///
    /// A lifecycle subscriber is registered in `scene`; release it with
    /// [`shutdown`](Self::shutdown).
    pub fn new(
        scene: &mut SceneObjects,
        zone: &PresenceZone,
        overrides: Option<&PresenceOverrides>,
    ) -> Self {
        let overrides = overrides.cloned().unwrap_or_default();
        let subscriber = scene.lifecycle_mut().register_subscriber();
        let tracker = TriggerTracker::new(subscriber, zone.keywords().clone(), TriggerPolicy::new())
            .with_ignore_mask(overrides.ignore_mask);

        let geometry = MapGeometry::compile(zone.settings());
        let map = Arc::new(RwLock::new(PresenceMap::new(geometry.width, geometry.height)));

        let mapper = Self {
            geometry,
            overrides,
            tracker,
            map,
            consumers: zone.consumers().to_vec(),
            enabled: true,
            needs_clear: true,
            positions: Vec::new(),
            projected: Vec::new(),
            released: Vec::new(),
        };
        mapper.publish();
        mapper
    }

    /// Re-apply zone settings and/or shared overrides.
    ///
    /// Geometry is recompiled, a fresh map of the new resolution is
    /// allocated and rebound to the consumers. Tracked objects are kept.
    pub fn override_parameters(
        &mut self,
        zone: Option<&PresenceZone>,
        overrides: Option<&PresenceOverrides>,
    ) {
        if let Some(overrides) = overrides {
            self.overrides = overrides.clone();
            self.tracker.set_ignore_mask(overrides.ignore_mask);
        }

        if let Some(zone) = zone {
            self.geometry = MapGeometry::compile(zone.settings());
            self.tracker.set_filter(zone.keywords().clone());
            self.consumers = zone.consumers().to_vec();
        }

        self.map = Arc::new(RwLock::new(PresenceMap::new(
            self.geometry.width,
            self.geometry.height,
        )));
        self.needs_clear = true;
        self.publish();
    }

    fn publish(&self) {
        consumer::publish(&self.consumers, &self.map, self.geometry.world_to_uv);
    }

    /// Candidate object entered the trigger volume
    pub fn admit(&mut self, scene: &mut SceneObjects, object: ObjectId) -> bool {
        if !self.enabled {
            return false;
        }

        let admitted = self.tracker.enter(scene, object);
        if admitted {
            log::debug!("Presence mapper tracking {} ({} total)", object, self.tracker.len());
        }
        admitted
    }

    /// Candidate object left the trigger volume
    pub fn evict(&mut self, scene: &mut SceneObjects, object: ObjectId) -> bool {
        let evicted = self.tracker.exit(scene, object);
        if evicted {
            log::debug!("Presence mapper released {} ({} left)", object, self.tracker.len());
        }
        evicted
    }

    /// Route a trigger volume event
    pub fn handle_event(&mut self, scene: &mut SceneObjects, event: &TriggerEvent) -> bool {
        match event.event_type {
            TriggerEventType::Enter => self.admit(scene, event.object),
            TriggerEventType::Exit => self.evict(scene, event.object),
        }
    }

    /// Advance one frame
    pub fn tick(&mut self, scene: &mut SceneObjects) -> TickOutcome {
        if !self.enabled {
            return TickOutcome::Idle;
        }

        let released = self.tracker.process_lifecycle(scene);
        if !released.is_empty() {
            log::debug!(
                "Presence mapper released {} destroyed/disabled objects",
                released.len()
            );
            self.released.extend(released);
        }

        if !self.tracker.is_empty() {
            self.needs_clear = true;
            self.update_presence(scene)
        } else if self.needs_clear {
            self.map.write().clear();
            self.needs_clear = false;
            TickOutcome::Cleared
        } else {
            TickOutcome::Idle
        }
    }

    fn update_presence(&mut self, scene: &mut SceneObjects) -> TickOutcome {
        if let Some(reference) = self.overrides.reference.and_then(|id| scene.position(id)) {
            if reference.distance_squared(self.geometry.center) > self.overrides.render_sqr_distance {
                return TickOutcome::Skipped;
            }
        }

        self.gather_positions(scene);

        let plane = self.geometry.plane;
        self.projected.clear();
        self.projected
            .extend(self.positions.iter().map(|&position| plane.closest_point(position)));

        let mut map = self.map.write();
        sample_presence(&self.geometry, &self.positions, &self.projected, map.texels_mut());
        TickOutcome::Updated
    }

    /// Collect positions of usable tracked objects, dropping stale entries.
    ///
    /// Objects are visited in ascending id order so that equidistant
    /// objects resolve the same way every tick.
    fn gather_positions(&mut self, scene: &mut SceneObjects) {
        self.positions.clear();

        let mut tracked: Vec<ObjectId> = self.tracker.objects().collect();
        tracked.sort_unstable();

        let mut stale = Vec::new();
        for id in tracked {
            let Some(object) = scene.get(id) else {
                stale.push(id);
                continue;
            };

            if !object.is_active() {
                stale.push(id);
                continue;
            }

            if self.overrides.filter_disabled_objects && !object.enabled {
                continue;
            }

            if self.overrides.filter_far_objects
                && self.geometry.center.distance_squared(object.position)
                    > self.overrides.filter_sqr_distance
            {
                continue;
            }

            self.positions.push(object.position);
        }

        for id in stale {
            log::debug!("Presence mapper dropped stale object {}", id);
            if self.tracker.exit(scene, id) {
                self.released.push(id);
            }
        }
    }

    /// Enable or disable the mapper. Disabling evicts every tracked object
    /// and clears the map.
    pub fn set_enabled(&mut self, scene: &mut SceneObjects, enabled: bool) {
        if self.enabled == enabled {
            return;
        }

        self.enabled = enabled;
        if !enabled {
            self.release_all(scene);
            self.map.write().clear();
            self.needs_clear = false;
        }
    }

    /// Tear down: evict everything, clear the map and release the
    /// lifecycle subscriber
    pub fn shutdown(&mut self, scene: &mut SceneObjects) {
        self.release_all(scene);
        self.tracker.shutdown(scene);
        self.map.write().clear();
        self.enabled = false;
        self.needs_clear = false;
    }

    fn release_all(&mut self, scene: &mut SceneObjects) {
        let mut tracked: Vec<ObjectId> = self.tracker.objects().collect();
        tracked.sort_unstable();

        self.tracker.clear(scene);
        self.released.extend(tracked);
    }

    /// Objects evicted by lifecycle notifications, stale-entry checks or
    /// disabling, rather than by an exit event. Whoever feeds the mapper
    /// enter events must forget these so that objects still inside are
    /// reported as entering again.
    pub fn take_released(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.released)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    pub fn overrides(&self) -> &PresenceOverrides {
        &self.overrides
    }

    /// The map currently bound to consumers
    pub fn map(&self) -> SharedPresenceMap {
        Arc::clone(&self.map)
    }

    pub fn world_to_uv(&self) -> Mat4 {
        self.geometry.world_to_uv
    }

    /// Detection volume (zone box plus margin)
    pub fn trigger_volume(&self) -> &TriggerVolume {
        &self.geometry.trigger_volume
    }

    pub fn is_tracking(&self, object: ObjectId) -> bool {
        self.tracker.contains(object)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracker.len()
    }

    pub fn tracked(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.tracker.objects()
    }
}

impl std::fmt::Debug for PresenceMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceMapper")
            .field("geometry", &self.geometry)
            .field("overrides", &self.overrides)
            .field("tracker", &self.tracker)
            .field("consumer_count", &self.consumers.len())
            .field("enabled", &self.enabled)
            .field("needs_clear", &self.needs_clear)
            .finish()
    }
}

/// Fill `texels` (row-major, `width * height`) from the gathered positions.
///
/// Each cell takes the nearest projected position (linear scan, first
/// minimum wins) and stores the unprojected position with its strength.
/// With no positions every cell is [`PresenceTexel::EMPTY`].
fn sample_presence(
    geometry: &MapGeometry,
    positions: &[Vec3],
    projected: &[Vec3],
    texels: &mut [PresenceTexel],
) {
    if positions.is_empty() {
        texels.fill(PresenceTexel::EMPTY);
        return;
    }

    let width = geometry.width as usize;
    for y in 0..geometry.height {
        for x in 0..geometry.width {
            let sample = geometry.sample_point(x, y);

            let mut min_sqr = f32::INFINITY;
            let mut closest = 0;
            for (index, point) in projected.iter().enumerate() {
                let sqr = point.distance_squared(sample);
                if sqr < min_sqr {
                    min_sqr = sqr;
                    closest = index;
                }
            }

            texels[x as usize + y as usize * width] =
                PresenceTexel::new(positions[closest], geometry.strength(min_sqr.sqrt()));
        }
    }
}
