//! Presence zone configuration

use crate::error::Result;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use void_triggers::{LayerMask, ObjectId};

/// Largest presence map size along either axis
pub const MAX_MAP_RESOLUTION: u32 = 4096;

/// Local-to-world placement of a zone box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl ZoneTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-world matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for ZoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Box in the zone's local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneBounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl ZoneBounds {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Minimum corner in local space
    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }
}

impl Default for ZoneBounds {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::splat(2.0),
        }
    }
}

/// Author-time settings of a presence zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// Placement of the sampling box
    pub transform: ZoneTransform,
    /// Size and center of the sampling box
    pub bounds: ZoneBounds,
    /// Physical radius of tracked objects
    pub objects_radius: f32,
    /// Radius over which an object's influence falls off to zero
    pub presence_radius: f32,
    /// Presence map resolution (width, height)
    pub map_resolution: [u32; 2],
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            transform: ZoneTransform::IDENTITY,
            bounds: ZoneBounds::default(),
            objects_radius: 0.0,
            presence_radius: 1.0,
            map_resolution: [16, 16],
        }
    }
}

impl ZoneSettings {
    /// Load settings from JSON. Missing fields take their defaults; the
    /// result is validated.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    pub fn with_transform(mut self, transform: ZoneTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_bounds(mut self, center: Vec3, size: Vec3) -> Self {
        self.bounds = ZoneBounds::new(center, size);
        self
    }

    pub fn with_radii(mut self, objects_radius: f32, presence_radius: f32) -> Self {
        self.objects_radius = objects_radius;
        self.presence_radius = presence_radius;
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.map_resolution = [width, height];
        self
    }

    pub fn width(&self) -> u32 {
        self.map_resolution[0]
    }

    pub fn height(&self) -> u32 {
        self.map_resolution[1]
    }

    /// Clamp to a usable configuration: sizes and radii non-negative and
    /// finite, presence radius at least the objects radius, resolution at
    /// most [`MAX_MAP_RESOLUTION`] per axis.
    pub fn validated(mut self) -> Self {
        let size = self.bounds.size;
        let clamped = Vec3::new(non_negative(size.x), non_negative(size.y), non_negative(size.z));
        if clamped != size {
            log::warn!("Presence zone size {:?} clamped to {:?}", size, clamped);
            self.bounds.size = clamped;
        }

        if !self.bounds.center.is_finite() {
            log::warn!("Presence zone center {:?} reset to origin", self.bounds.center);
            self.bounds.center = Vec3::ZERO;
        }

        let objects_radius = non_negative(self.objects_radius);
        if objects_radius != self.objects_radius {
            log::warn!(
                "Objects radius {} clamped to {}",
                self.objects_radius,
                objects_radius
            );
            self.objects_radius = objects_radius;
        }

        let presence_radius = if self.presence_radius.is_finite() {
            self.presence_radius.max(self.objects_radius)
        } else {
            self.objects_radius.max(1.0)
        };
        if presence_radius != self.presence_radius {
            log::warn!(
                "Presence radius {} clamped to {}",
                self.presence_radius,
                presence_radius
            );
            self.presence_radius = presence_radius;
        }

        let resolution = self.map_resolution.map(|n| n.min(MAX_MAP_RESOLUTION));
        if resolution != self.map_resolution {
            log::warn!(
                "Presence map resolution {:?} clamped to {:?}",
                self.map_resolution,
                resolution
            );
            self.map_resolution = resolution;
        }

        self
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Zone-independent parameters shared read-only by every mapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceOverrides {
    /// Mappers farther than this (squared) from the reference object skip their update
    pub render_sqr_distance: f32,
    /// Layers never admitted
    pub ignore_mask: LayerMask,
    /// Skip tracked objects that are not enabled
    pub filter_disabled_objects: bool,
    /// Skip tracked objects farther than `filter_sqr_distance` from the mapper
    pub filter_far_objects: bool,
    pub filter_sqr_distance: f32,
    /// Reference object (player or camera) for the render cutoff
    pub reference: Option<ObjectId>,
}

impl Default for PresenceOverrides {
    fn default() -> Self {
        Self {
            render_sqr_distance: 10_000.0,
            ignore_mask: LayerMask::NONE,
            filter_disabled_objects: false,
            filter_far_objects: false,
            filter_sqr_distance: 10.0,
            reference: None,
        }
    }
}

impl PresenceOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_reference(mut self, reference: ObjectId, render_sqr_distance: f32) -> Self {
        self.reference = Some(reference);
        self.render_sqr_distance = render_sqr_distance;
        self
    }

    pub fn with_ignore_mask(mut self, mask: LayerMask) -> Self {
        self.ignore_mask = mask;
        self
    }

    pub fn filter_disabled(mut self) -> Self {
        self.filter_disabled_objects = true;
        self
    }

    pub fn filter_far(mut self, sqr_distance: f32) -> Self {
        self.filter_far_objects = true;
        self.filter_sqr_distance = sqr_distance;
        self
    }
}
