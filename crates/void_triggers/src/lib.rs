//! Void Triggers - Trigger Volumes and Tracked Objects
//!
//! This crate provides the glue between scene objects and anything that
//! reacts to objects entering a volume.
//!
//! # Features
//!
//! - Oriented box trigger volumes with per-frame enter/exit diffing
//! - Layer-mask and keyword filtering
//! - Explicit destroy/disable notifications for tracked objects
//! - A single tracking core driven by a policy table (basic, switch, custom)
//!
//! # Example
//!
//! ```ignore
//! use void_triggers::prelude::*;
//!
//! let mut scene = SceneObjects::new();
//! let player = scene.spawn(ObjectDesc::new().with_keywords(["player"]));
//!
//! let mut tracker = TriggerTracker::new(
//!     scene.lifecycle_mut().register_subscriber(),
//!     KeywordsFilter::new("player"),
//!     TriggerPolicy::new().on_enter(|id, _| println!("{:?} entered", id)),
//! );
//! tracker.enter(&mut scene, player);
//! ```

pub mod events;
pub mod filter;
pub mod keywords;
pub mod lifecycle;
pub mod object;
pub mod scene;
pub mod trigger;
pub mod volume;

pub mod prelude {
    pub use crate::events::{TriggerEvent, TriggerEventType};
    pub use crate::filter::{KeywordsFilter, LayerMask};
    pub use crate::keywords::Keywords;
    pub use crate::lifecycle::{LifecycleEvent, LifecycleHub, SubscriberId};
    pub use crate::object::ObjectId;
    pub use crate::scene::{ObjectDesc, SceneObject, SceneObjects};
    pub use crate::trigger::{TriggerPolicy, TriggerTracker};
    pub use crate::volume::{TriggerVolume, VolumeOverlaps};
}

pub use prelude::*;
