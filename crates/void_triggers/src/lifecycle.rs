//! Destroy/disable notifications for tracked objects
//!
//! Trackers subscribe to the objects they admit. When the scene disables or
//! destroys one of those objects the hub queues a [`LifecycleEvent`] for
//! every subscriber, which then drains its queue on its next update. A
//! subscription fires once and is removed when it fires.

use crate::object::ObjectId;
use std::collections::{HashMap, HashSet};

/// Identifies one subscriber (a tracker) in a [`LifecycleHub`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

/// Something happened to a watched object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Object was deactivated
    Disabled(ObjectId),
    /// Object was destroyed
    Destroyed(ObjectId),
}

impl LifecycleEvent {
    /// The object this event is about
    pub fn object(&self) -> ObjectId {
        match *self {
            Self::Disabled(id) | Self::Destroyed(id) => id,
        }
    }
}

/// Subscription registry owned by the scene
#[derive(Debug, Default)]
pub struct LifecycleHub {
    next_subscriber: u64,
    /// Registered subscribers and their pending events
    queues: HashMap<SubscriberId, Vec<LifecycleEvent>>,
    /// Watched object -> subscribers
    watchers: HashMap<ObjectId, HashSet<SubscriberId>>,
}

impl LifecycleHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn register_subscriber(&mut self) -> SubscriberId {
        self.next_subscriber += 1;
        let id = SubscriberId(self.next_subscriber);
        self.queues.insert(id, Vec::new());
        id
    }

    /// Drop a subscriber together with all its subscriptions and pending events
    pub fn unregister_subscriber(&mut self, subscriber: SubscriberId) {
        self.queues.remove(&subscriber);
        self.watchers.retain(|_, subs| {
            subs.remove(&subscriber);
            !subs.is_empty()
        });
    }

    /// Check if a subscriber is registered
    pub fn is_registered(&self, subscriber: SubscriberId) -> bool {
        self.queues.contains_key(&subscriber)
    }

    /// Watch an object. Returns false for unknown subscribers.
    pub fn subscribe(&mut self, object: ObjectId, subscriber: SubscriberId) -> bool {
        if !self.queues.contains_key(&subscriber) {
            return false;
        }
        self.watchers.entry(object).or_default().insert(subscriber);
        true
    }

    /// Stop watching an object
    pub fn unsubscribe(&mut self, object: ObjectId, subscriber: SubscriberId) {
        if let Some(subs) = self.watchers.get_mut(&object) {
            subs.remove(&subscriber);
            if subs.is_empty() {
                self.watchers.remove(&object);
            }
        }
    }

    /// Check if a subscriber watches an object
    pub fn is_subscribed(&self, object: ObjectId, subscriber: SubscriberId) -> bool {
        self.watchers
            .get(&object)
            .is_some_and(|subs| subs.contains(&subscriber))
    }

    /// Queue an event for every subscriber of its object
    pub fn notify(&mut self, event: LifecycleEvent) {
        let Some(subs) = self.watchers.remove(&event.object()) else {
            return;
        };

        for subscriber in subs {
            if let Some(queue) = self.queues.get_mut(&subscriber) {
                queue.push(event);
            }
        }
    }

    /// Take all pending events for a subscriber
    pub fn drain(&mut self, subscriber: SubscriberId) -> Vec<LifecycleEvent> {
        self.queues
            .get_mut(&subscriber)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Number of watched objects
    pub fn watched_count(&self) -> usize {
        self.watchers.len()
    }
}
