//! Sampling basis derived from a zone's settings

use crate::config::ZoneSettings;
use glam::{Mat4, Vec3};
use void_triggers::TriggerVolume;

/// Plane used to project tracked positions onto the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed distance term (`normal . p + distance == 0` on the plane)
    pub distance: f32,
}

impl SamplingPlane {
    /// Plane through `point`; a degenerate normal falls back to +Y
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        let normal = if normal == Vec3::ZERO { Vec3::Y } else { normal };

        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }
}

/// Compiled sampling geometry of one mapper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapGeometry {
    pub width: u32,
    pub height: u32,
    /// World position of sample (0, 0): the box's minimal local corner
    pub origin: Vec3,
    /// World offset between neighbouring samples along local +X
    pub u_step: Vec3,
    /// World offset between neighbouring samples along local +Z
    pub v_step: Vec3,
    pub plane: SamplingPlane,
    /// Maps world positions into the unit cube spanned by the box
    pub world_to_uv: Mat4,
    /// Mapper position used by the distance filters
    pub center: Vec3,
    pub objects_radius: f32,
    pub presence_radius: f32,
    /// Box inflated by the detection margin
    pub trigger_volume: TriggerVolume,
}

impl MapGeometry {
    /// Derive the sampling basis. Never fails: a resolution of 0 or 1 on an
    /// axis gives a zero step, a flat box gives a zero `world_to_uv`.
    pub fn compile(settings: &ZoneSettings) -> Self {
        let box_to_world = settings.transform.to_matrix();
        let size = settings.bounds.size;
        let min_corner = settings.bounds.min();
        let [width, height] = settings.map_resolution;

        let origin = box_to_world.transform_point3(min_corner);
        let u_step = box_to_world.transform_vector3(Vec3::X * step_length(size.x, width));
        let v_step = box_to_world.transform_vector3(Vec3::Z * step_length(size.z, height));
        let plane = SamplingPlane::from_point_normal(origin, box_to_world.transform_vector3(Vec3::Y));

        let box_to_uv = box_to_world * Mat4::from_translation(min_corner) * Mat4::from_scale(size);
        let det = box_to_uv.determinant();
        let world_to_uv = if det != 0.0 && det.is_finite() {
            box_to_uv.inverse()
        } else {
            Mat4::ZERO
        };

        let margin = 2.0 * (settings.presence_radius + settings.objects_radius);
        let trigger_volume =
            TriggerVolume::new(box_to_world, settings.bounds.center, size).inflated(margin);

        log::debug!(
            "Compiled presence geometry {}x{} origin={:?} u={:?} v={:?}",
            width,
            height,
            origin,
            u_step,
            v_step
        );

        Self {
            width,
            height,
            origin,
            u_step,
            v_step,
            plane,
            world_to_uv,
            center: settings.transform.translation,
            objects_radius: settings.objects_radius,
            presence_radius: settings.presence_radius,
            trigger_volume,
        }
    }

    /// World position of sample `(x, y)`
    #[inline]
    pub fn sample_point(&self, x: u32, y: u32) -> Vec3 {
        self.origin + self.u_step * x as f32 + self.v_step * y as f32
    }

    /// Influence at `distance` from the nearest object: 1 within the object
    /// radius, falling linearly to 0 at `objects_radius + presence_radius`.
    #[inline]
    pub fn strength(&self, distance: f32) -> f32 {
        if self.presence_radius > 0.0 {
            (1.0 - (distance - self.objects_radius) / self.presence_radius).clamp(0.0, 1.0)
        } else if distance <= self.objects_radius {
            1.0
        } else {
            0.0
        }
    }
}

fn step_length(extent: f32, samples: u32) -> f32 {
    if samples > 1 {
        extent / (samples - 1) as f32
    } else {
        0.0
    }
}
