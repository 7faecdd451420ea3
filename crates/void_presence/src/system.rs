//! Zone registry and session slot
//!
//! Zones are registered with a [`PresenceSystem`]. When the session starts
//! every zone gets a trigger volume matching its (inflated) bounds and a
//! [`PresenceMapper`]; from then on [`PresenceSystem::tick`] diffs each
//! volume against the scene, routes enter/exit events to the mapper and
//! ticks it.

use crate::config::{PresenceOverrides, ZoneSettings};
use crate::error::{PresenceError, Result};
use crate::mapper::{PresenceMapper, TickOutcome};
use crate::zone::{PresenceZone, ZoneId};
use std::collections::BTreeMap;
use void_triggers::{SceneObjects, TriggerVolume, VolumeOverlaps};

struct ZoneRuntime {
    volume: TriggerVolume,
    overlaps: VolumeOverlaps,
    mapper: PresenceMapper,
}

impl ZoneRuntime {
    /// Objects the mapper dropped without an exit must be able to enter again
    fn forget_released(&mut self) {
        for object in self.mapper.take_released() {
            self.overlaps.forget(object);
        }
    }

    fn shutdown(&mut self, scene: &mut SceneObjects) {
        self.overlaps = VolumeOverlaps::new();
        self.mapper.shutdown(scene);
    }
}

struct ZoneEntry {
    zone: PresenceZone,
    runtime: Option<ZoneRuntime>,
}

/// Registry of presence zones for one session
#[derive(Default)]
pub struct PresenceSystem {
    zones: BTreeMap<ZoneId, ZoneEntry>,
    next_zone: u64,
    overrides: Option<PresenceOverrides>,
    started: bool,
}

impl PresenceSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone. After [`start`](Self::start) the zone is initialised
    /// right away.
    pub fn register_zone(&mut self, scene: &mut SceneObjects, zone: PresenceZone) -> ZoneId {
        self.next_zone += 1;
        let id = ZoneId(self.next_zone);

        let mut entry = ZoneEntry {
            zone,
            runtime: None,
        };
        if self.started {
            Self::init_zone(scene, id, &mut entry, self.overrides.as_ref());
        }

        log::info!("Registered presence zone {:?}", id);
        self.zones.insert(id, entry);
        id
    }

    /// Remove a zone, shutting down its mapper
    pub fn remove_zone(&mut self, scene: &mut SceneObjects, id: ZoneId) -> Result<PresenceZone> {
        let mut entry = self.zones.remove(&id).ok_or(PresenceError::UnknownZone(id))?;
        if let Some(runtime) = entry.runtime.as_mut() {
            runtime.shutdown(scene);
        }
        log::info!("Removed presence zone {:?}", id);
        Ok(entry.zone)
    }

    /// Initialise every registered zone. Calling it again replaces the
    /// existing volumes and mappers.
    pub fn start(&mut self, scene: &mut SceneObjects, overrides: Option<PresenceOverrides>) {
        self.overrides = overrides;
        for (id, entry) in self.zones.iter_mut() {
            Self::init_zone(scene, *id, entry, self.overrides.as_ref());
        }
        self.started = true;

        log::info!("Presence system started with {} zones", self.zones.len());
    }

    fn init_zone(
        scene: &mut SceneObjects,
        id: ZoneId,
        entry: &mut ZoneEntry,
        overrides: Option<&PresenceOverrides>,
    ) {
        if let Some(mut old) = entry.runtime.take() {
            old.shutdown(scene);
        }

        let mapper = PresenceMapper::new(scene, &entry.zone, overrides);
        let volume = *mapper.trigger_volume();
        log::debug!(
            "Presence zone {:?} volume at {:?} size {:?}",
            id,
            volume.world_center(),
            volume.size()
        );

        entry.runtime = Some(ZoneRuntime {
            volume,
            overlaps: VolumeOverlaps::new(),
            mapper,
        });
    }

    /// Replace a zone's settings and recompile its mapper
    pub fn update_zone(&mut self, id: ZoneId, settings: ZoneSettings) -> Result<()> {
        let entry = self.zones.get_mut(&id).ok_or(PresenceError::UnknownZone(id))?;
        entry.zone.set_settings(settings);

        if let Some(runtime) = entry.runtime.as_mut() {
            runtime.mapper.override_parameters(Some(&entry.zone), None);
            runtime.volume = *runtime.mapper.trigger_volume();
        }
        Ok(())
    }

    /// Replace the shared overrides on every running mapper
    pub fn apply_overrides(&mut self, overrides: PresenceOverrides) {
        for entry in self.zones.values_mut() {
            if let Some(runtime) = entry.runtime.as_mut() {
                runtime.mapper.override_parameters(None, Some(&overrides));
            }
        }
        self.overrides = Some(overrides);
    }

    /// Advance every running zone by one frame
    ///
    /// A disabled mapper's volume is not diffed; its overlap state is dropped
    /// so that objects still inside enter again once it is re-enabled.
    pub fn tick(&mut self, scene: &mut SceneObjects) -> Vec<(ZoneId, TickOutcome)> {
        let mut outcomes = Vec::with_capacity(self.zones.len());

        for (id, entry) in self.zones.iter_mut() {
            let Some(runtime) = entry.runtime.as_mut() else {
                continue;
            };
            runtime.forget_released();

            if runtime.mapper.is_enabled() {
                for event in runtime.overlaps.update(id.raw(), &runtime.volume, scene) {
                    runtime.mapper.handle_event(scene, &event);
                }
            } else if !runtime.overlaps.is_empty() {
                for event in runtime.overlaps.clear(id.raw()) {
                    runtime.mapper.handle_event(scene, &event);
                }
            }

            outcomes.push((*id, runtime.mapper.tick(scene)));
            runtime.forget_released();
        }

        outcomes
    }

    /// Shut down every mapper and forget all zones
    pub fn shutdown(&mut self, scene: &mut SceneObjects) {
        for entry in self.zones.values_mut() {
            if let Some(runtime) = entry.runtime.as_mut() {
                runtime.shutdown(scene);
            }
        }

        log::info!("Presence system shut down ({} zones)", self.zones.len());
        self.zones.clear();
        self.overrides = None;
        self.started = false;
    }

    pub fn zone(&self, id: ZoneId) -> Option<&PresenceZone> {
        self.zones.get(&id).map(|entry| &entry.zone)
    }

    pub fn mapper(&self, id: ZoneId) -> Option<&PresenceMapper> {
        self.zones
            .get(&id)
            .and_then(|entry| entry.runtime.as_ref())
            .map(|runtime| &runtime.mapper)
    }

    pub fn mapper_mut(&mut self, id: ZoneId) -> Option<&mut PresenceMapper> {
        self.zones
            .get_mut(&id)
            .and_then(|entry| entry.runtime.as_mut())
            .map(|runtime| &mut runtime.mapper)
    }

    /// Detection volume of a running zone
    pub fn volume(&self, id: ZoneId) -> Option<&TriggerVolume> {
        self.zones
            .get(&id)
            .and_then(|entry| entry.runtime.as_ref())
            .map(|runtime| &runtime.volume)
    }

    pub fn overrides(&self) -> Option<&PresenceOverrides> {
        self.overrides.as_ref()
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.keys().copied()
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl std::fmt::Debug for PresenceSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceSystem")
            .field("zone_count", &self.zones.len())
            .field("started", &self.started)
            .field("overrides", &self.overrides)
            .finish()
    }
}

/// Session-scoped slot holding the presence system
///
/// The system is created on first access and torn down with
/// [`end_session`](Self::end_session); a later access creates a fresh one.
#[derive(Debug, Default)]
pub struct PresenceContext {
    system: Option<PresenceSystem>,
}

impl PresenceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session's system, created on first access
    pub fn system(&mut self) -> &mut PresenceSystem {
        self.system.get_or_insert_with(|| {
            log::info!("Creating presence system");
            PresenceSystem::new()
        })
    }

    /// The session's system if one exists
    pub fn get(&self) -> Option<&PresenceSystem> {
        self.system.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.system.is_some()
    }

    /// Tear down the session's system
    pub fn end_session(&mut self, scene: &mut SceneObjects) {
        if let Some(mut system) = self.system.take() {
            system.shutdown(scene);
        }
    }
}
