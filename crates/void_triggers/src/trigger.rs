//! Trigger tracking core
//!
//! [`TriggerTracker`] owns the set of objects currently inside a trigger.
//! What happens on membership changes is decided by a [`TriggerPolicy`]
//! table instead of per-variant trigger types.

use crate::filter::{KeywordsFilter, LayerMask};
use crate::lifecycle::SubscriberId;
use crate::object::ObjectId;
use crate::scene::SceneObjects;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Callback for an object entering or leaving, with the tracked count after the change
pub type MembershipCallback = Box<dyn FnMut(ObjectId, usize) + Send>;

/// Callback for the tracked set becoming non-empty or empty
pub type TransitionCallback = Box<dyn FnMut() + Send>;

/// Policy table invoked by a [`TriggerTracker`]
#[derive(Default)]
pub struct TriggerPolicy {
    pub on_enter: Option<MembershipCallback>,
    pub on_exit: Option<MembershipCallback>,
    /// Tracked set went from empty to non-empty
    pub on_has_any: Option<TransitionCallback>,
    /// Tracked set went from non-empty to empty
    pub on_none_left: Option<TransitionCallback>,
}

impl TriggerPolicy {
    /// Policy without callbacks
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: FnMut(ObjectId, usize) + Send + 'static,
    {
        self.on_enter = Some(Box::new(f));
        self
    }

    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: FnMut(ObjectId, usize) + Send + 'static,
    {
        self.on_exit = Some(Box::new(f));
        self
    }

    pub fn on_has_any<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_has_any = Some(Box::new(f));
        self
    }

    pub fn on_none_left<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_none_left = Some(Box::new(f));
        self
    }

    /// Visibility switch: `apply(true)` while anything is inside, `apply(false)`
    /// once empty. `invert` flips both.
    pub fn switch<F>(invert: bool, apply: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        let apply = Arc::new(Mutex::new(apply));
        let on_any = Arc::clone(&apply);

        Self::new()
            .on_has_any(move || (&mut *on_any.lock())(!invert))
            .on_none_left(move || (&mut *apply.lock())(invert))
    }
}

impl std::fmt::Debug for TriggerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerPolicy")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("on_has_any", &self.on_has_any.is_some())
            .field("on_none_left", &self.on_none_left.is_some())
            .finish()
    }
}

/// Tracks which objects are inside a trigger
///
/// Objects are admitted on enter when they pass the ignore mask and the
/// keyword filter, and are evicted on exit, on a destroy/disable
/// notification, or when the tracker shuts down.
#[derive(Debug)]
pub struct TriggerTracker {
    subscriber: SubscriberId,
    filter: KeywordsFilter,
    ignore_mask: LayerMask,
    policy: TriggerPolicy,
    objects: HashSet<ObjectId>,
}

impl TriggerTracker {
    /// Create a tracker using a subscriber registered in the scene's lifecycle hub
    pub fn new(subscriber: SubscriberId, filter: KeywordsFilter, policy: TriggerPolicy) -> Self {
        Self {
            subscriber,
            filter,
            ignore_mask: LayerMask::NONE,
            policy,
            objects: HashSet::new(),
        }
    }

    /// Set the ignored layers
    pub fn with_ignore_mask(mut self, mask: LayerMask) -> Self {
        self.ignore_mask = mask;
        self
    }

    pub fn set_ignore_mask(&mut self, mask: LayerMask) {
        self.ignore_mask = mask;
    }

    pub fn set_filter(&mut self, filter: KeywordsFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &KeywordsFilter {
        &self.filter
    }

    pub fn ignore_mask(&self) -> LayerMask {
        self.ignore_mask
    }

    pub fn subscriber(&self) -> SubscriberId {
        self.subscriber
    }

    /// Check whether an object would be admitted
    pub fn admits(&self, scene: &SceneObjects, object: ObjectId) -> bool {
        let Some(layer) = scene.layer(object) else {
            return false;
        };

        if self.ignore_mask.contains(layer) {
            return false;
        }

        self.filter.check(scene.keywords_of(object))
    }

    /// Report the initial state through the policy
    pub fn start(&mut self) {
        let callback = if self.objects.is_empty() {
            self.policy.on_none_left.as_mut()
        } else {
            self.policy.on_has_any.as_mut()
        };

        if let Some(callback) = callback {
            callback();
        }
    }

    /// Object entered the trigger. Returns true if it was admitted.
    pub fn enter(&mut self, scene: &mut SceneObjects, object: ObjectId) -> bool {
        if self.objects.contains(&object) || !self.admits(scene, object) {
            return false;
        }

        let had_any = !self.objects.is_empty();
        self.objects.insert(object);
        scene.lifecycle_mut().subscribe(object, self.subscriber);

        log::trace!("{} entered trigger ({} tracked)", object, self.objects.len());

        let count = self.objects.len();
        if let Some(callback) = self.policy.on_enter.as_mut() {
            callback(object, count);
        }
        if !had_any {
            if let Some(callback) = self.policy.on_has_any.as_mut() {
                callback();
            }
        }
        true
    }

    /// Object left the trigger (or must be dropped). Returns true if it was tracked.
    pub fn exit(&mut self, scene: &mut SceneObjects, object: ObjectId) -> bool {
        if !self.objects.remove(&object) {
            return false;
        }
        scene.lifecycle_mut().unsubscribe(object, self.subscriber);

        log::trace!("{} left trigger ({} tracked)", object, self.objects.len());

        let count = self.objects.len();
        if let Some(callback) = self.policy.on_exit.as_mut() {
            callback(object, count);
        }
        if count == 0 {
            if let Some(callback) = self.policy.on_none_left.as_mut() {
                callback();
            }
        }
        true
    }

    /// Evict every object whose destroy/disable notification arrived.
    /// Returns the evicted objects in notification order.
    pub fn process_lifecycle(&mut self, scene: &mut SceneObjects) -> Vec<ObjectId> {
        let events = scene.lifecycle_mut().drain(self.subscriber);

        events
            .into_iter()
            .map(|event| event.object())
            .filter(|&object| self.exit(scene, object))
            .collect()
    }

    /// Evict everything and release the lifecycle subscriber
    pub fn shutdown(&mut self, scene: &mut SceneObjects) {
        self.clear(scene);
        scene.lifecycle_mut().unregister_subscriber(self.subscriber);
    }

    /// Evict everything, keeping the subscriber registered
    pub fn clear(&mut self, scene: &mut SceneObjects) {
        let mut objects: Vec<_> = self.objects.iter().copied().collect();
        objects.sort();

        for object in objects {
            self.exit(scene, object);
        }
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains(&object)
    }

    /// Iterate over tracked objects (unordered)
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectDesc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn tracker(scene: &mut SceneObjects, filter: &str, policy: TriggerPolicy) -> TriggerTracker {
        let subscriber = scene.lifecycle_mut().register_subscriber();
        TriggerTracker::new(subscriber, KeywordsFilter::new(filter), policy)
    }

    #[test]
    fn test_enter_and_exit() {
        let mut scene = SceneObjects::new();
        let object = scene.spawn(ObjectDesc::new().with_keywords(["player"]));
        let mut tracker = tracker(&mut scene, "player", TriggerPolicy::new());

        assert!(tracker.enter(&mut scene, object));
        assert!(!tracker.enter(&mut scene, object));
        assert!(tracker.contains(object));
        assert!(scene.lifecycle().is_subscribed(object, tracker.subscriber()));

        assert!(tracker.exit(&mut scene, object));
        assert!(tracker.is_empty());
        assert!(!scene.lifecycle().is_subscribed(object, tracker.subscriber()));
    }

    #[test]
    fn test_ignore_mask_rejects() {
        let mut scene = SceneObjects::new();
        let object = scene.spawn(ObjectDesc::new().with_layer(4).with_keywords(["player"]));
        let mut tracker =
            tracker(&mut scene, "", TriggerPolicy::new()).with_ignore_mask(LayerMask::layer(4));

        assert!(!tracker.enter(&mut scene, object));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_keyword_filter_rejects() {
        let mut scene = SceneObjects::new();
        let enemy = scene.spawn(ObjectDesc::new().with_keywords(["enemy"]));
        let plain = scene.spawn(ObjectDesc::new());
        let mut tracker = tracker(&mut scene, "player", TriggerPolicy::new());

        assert!(!tracker.enter(&mut scene, enemy));
        assert!(!tracker.enter(&mut scene, plain));
    }

    #[test]
    fn test_destroy_evicts_on_process() {
        let mut scene = SceneObjects::new();
        let object = scene.spawn(ObjectDesc::new().with_keywords(["player"]));
        let mut tracker = tracker(&mut scene, "player", TriggerPolicy::new());

        tracker.enter(&mut scene, object);
        scene.destroy(object);

        assert_eq!(tracker.process_lifecycle(&mut scene), vec![object]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_transition_callbacks() {
        let has_any = Arc::new(AtomicU32::new(0));
        let none_left = Arc::new(AtomicU32::new(0));
        let has_any_clone = has_any.clone();
        let none_left_clone = none_left.clone();

        let policy = TriggerPolicy::new()
            .on_has_any(move || {
                has_any_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_none_left(move || {
                none_left_clone.fetch_add(1, Ordering::SeqCst);
            });

        let mut scene = SceneObjects::new();
        let a = scene.spawn(ObjectDesc::new().with_keywords(["player"]));
        let b = scene.spawn(ObjectDesc::new().with_keywords(["player"]));
        let mut tracker = tracker(&mut scene, "", policy);

        tracker.start();
        assert_eq!(none_left.load(Ordering::SeqCst), 1);

        tracker.enter(&mut scene, a);
        tracker.enter(&mut scene, b);
        assert_eq!(has_any.load(Ordering::SeqCst), 1);

        tracker.exit(&mut scene, a);
        assert_eq!(none_left.load(Ordering::SeqCst), 1);
        tracker.exit(&mut scene, b);
        assert_eq!(none_left.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_switch_policy() {
        let visible = Arc::new(Mutex::new(Vec::new()));
        let sink = visible.clone();

        let mut scene = SceneObjects::new();
        let object = scene.spawn(ObjectDesc::new().with_keywords(["player"]));
        let mut tracker = tracker(
            &mut scene,
            "player",
            TriggerPolicy::switch(true, move |v| sink.lock().push(v)),
        );

        tracker.start();
        tracker.enter(&mut scene, object);
        tracker.exit(&mut scene, object);

        assert_eq!(*visible.lock(), vec![true, false, true]);
    }

    #[test]
    fn test_shutdown_evicts_all() {
        let exits = Arc::new(AtomicU32::new(0));
        let exits_clone = exits.clone();

        let mut scene = SceneObjects::new();
        let a = scene.spawn(ObjectDesc::new().with_keywords(["x"]));
        let b = scene.spawn(ObjectDesc::new().with_keywords(["x"]));
        let mut tracker = tracker(
            &mut scene,
            "",
            TriggerPolicy::new().on_exit(move |_, _| {
                exits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tracker.enter(&mut scene, a);
        tracker.enter(&mut scene, b);
        let subscriber = tracker.subscriber();
        tracker.shutdown(&mut scene);

        assert!(tracker.is_empty());
        assert_eq!(exits.load(Ordering::SeqCst), 2);
        assert!(!scene.lifecycle().is_registered(subscriber));
        assert_eq!(scene.lifecycle().watched_count(), 0);
    }
}
