//! Void Presence - Presence Maps for Object-Reactive Effects
//!
//! A presence zone is an oriented box sampled on a regular grid. Every
//! frame each grid cell records the position of the nearest tracked object
//! and an influence strength, so that GPU effects (grass bending, footprints,
//! water ripples) can react to characters walking through the zone.
//!
//! # Features
//!
//! - Zone geometry compiled from a transform, bounds, radii and resolution
//! - Trigger-volume driven tracking with keyword and layer filtering
//! - Render-distance cutoff and disabled/far object filters
//! - A shared presence map bound once to every consumer
//! - A session-scoped registry of zones
//!
//! # Example
//!
//! ```ignore
//! use void_presence::prelude::*;
//!
//! let mut scene = SceneObjects::new();
//! let mut context = PresenceContext::new();
//!
//! let zone = PresenceZone::new(ZoneSettings::default().with_resolution(64, 64))
//!     .with_keywords(KeywordsFilter::new("player"));
//! let id = context.system().register_zone(&mut scene, zone);
//! context.system().start(&mut scene, None);
//!
//! scene.spawn(ObjectDesc::new().with_keywords(["player"]));
//! for (zone, outcome) in context.system().tick(&mut scene) {
//!     println!("{:?}: {:?}", zone, outcome);
//! }
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod mapper;
pub mod system;
pub mod zone;

pub mod prelude {
    pub use crate::config::{
        PresenceOverrides, ZoneBounds, ZoneSettings, ZoneTransform, MAX_MAP_RESOLUTION,
    };
    pub use crate::consumer::{
        consumer_handle, ConsumerHandle, PresenceConsumer, PRESENCE_MAP_PARAM, WORLD_TO_UV_PARAM,
    };
    pub use crate::error::{PresenceError, Result};
    pub use crate::geometry::{MapGeometry, SamplingPlane};
    pub use crate::grid::{PresenceMap, PresenceTexel, SharedPresenceMap};
    pub use crate::mapper::{PresenceMapper, TickOutcome};
    pub use crate::system::{PresenceContext, PresenceSystem};
    pub use crate::zone::{PresenceZone, ZoneId};

    pub use void_triggers::prelude::*;
}

pub use prelude::*;
