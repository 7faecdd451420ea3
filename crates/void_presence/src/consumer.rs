//! GPU effects reading a presence map

use crate::grid::SharedPresenceMap;
use glam::Mat4;
use parking_lot::Mutex;
use std::sync::Arc;

/// Parameter name the presence map is bound to
pub const PRESENCE_MAP_PARAM: &str = "PresenceMap";

/// Parameter name the world-to-UV matrix is bound to
pub const WORLD_TO_UV_PARAM: &str = "WorldToUVMatrix";

/// An effect that samples a presence map
///
/// Bindings happen once per geometry compile; the map contents change in
/// place every tick without rebinding.
pub trait PresenceConsumer: Send {
    /// Bind a presence map buffer
    fn set_buffer(&mut self, name: &str, map: SharedPresenceMap);

    /// Bind a transform matrix
    fn set_transform(&mut self, name: &str, matrix: Mat4);
}

/// Shared handle to a consumer, as stored in zones
pub type ConsumerHandle = Arc<Mutex<dyn PresenceConsumer>>;

/// Wrap a consumer into a [`ConsumerHandle`]
pub fn consumer_handle<C: PresenceConsumer + 'static>(consumer: C) -> ConsumerHandle {
    Arc::new(Mutex::new(consumer))
}

/// Bind a map and its transform to every consumer
pub(crate) fn publish(consumers: &[ConsumerHandle], map: &SharedPresenceMap, world_to_uv: Mat4) {
    for consumer in consumers {
        let mut consumer = consumer.lock();
        consumer.set_buffer(PRESENCE_MAP_PARAM, Arc::clone(map));
        consumer.set_transform(WORLD_TO_UV_PARAM, world_to_uv);
    }
}
