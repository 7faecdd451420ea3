//! Scene object store used by triggers and their trackers

use crate::keywords::Keywords;
use crate::lifecycle::{LifecycleEvent, LifecycleHub};
use crate::object::ObjectId;
use glam::Vec3;
use std::collections::HashMap;

/// Runtime state of a single scene object
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// World position
    pub position: Vec3,
    /// Layer index (0..32)
    pub layer: u8,
    /// Whether the object itself is enabled (independent of activation)
    pub enabled: bool,
    active: bool,
    keyword_provider: ObjectId,
}

impl SceneObject {
    /// Whether the object is active in the scene
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Object whose keywords stand for this one
    pub fn keyword_provider(&self) -> ObjectId {
        self.keyword_provider
    }
}

/// Description of an object to spawn
#[derive(Debug, Clone)]
pub struct ObjectDesc {
    pub position: Vec3,
    pub layer: u8,
    pub active: bool,
    pub enabled: bool,
    /// Explicit keyword provider; `None` means the object provides its own
    pub keyword_provider: Option<ObjectId>,
    /// Keywords owned by the new object
    pub keywords: Option<Keywords>,
}

impl ObjectDesc {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            layer: 0,
            active: true,
            enabled: true,
            keyword_provider: None,
            keywords: None,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new().with_position(position)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Give the object its own keywords
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().collect());
        self
    }

    /// Resolve keywords through another object (e.g. the root of a prefab)
    pub fn with_keyword_provider(mut self, provider: ObjectId) -> Self {
        self.keyword_provider = Some(provider);
        self
    }
}

impl Default for ObjectDesc {
    fn default() -> Self {
        Self::new()
    }
}

/// All objects of a scene plus their lifecycle notifications
#[derive(Debug, Default)]
pub struct SceneObjects {
    next_id: u64,
    objects: HashMap<ObjectId, SceneObject>,
    keywords: HashMap<ObjectId, Keywords>,
    lifecycle: LifecycleHub,
}

impl SceneObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an object
    pub fn spawn(&mut self, desc: ObjectDesc) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);

        if let Some(keywords) = desc.keywords {
            self.keywords.insert(id, keywords);
        }

        self.objects.insert(
            id,
            SceneObject {
                position: desc.position,
                layer: desc.layer,
                enabled: desc.enabled,
                active: desc.active,
                keyword_provider: desc.keyword_provider.unwrap_or(id),
            },
        );
        id
    }

    /// Destroy an object, notifying its watchers
    pub fn destroy(&mut self, id: ObjectId) -> bool {
        if self.objects.remove(&id).is_none() {
            return false;
        }
        self.keywords.remove(&id);
        self.lifecycle.notify(LifecycleEvent::Destroyed(id));
        true
    }

    /// Activate or deactivate an object. Deactivation notifies watchers.
    pub fn set_active(&mut self, id: ObjectId, active: bool) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };

        let was_active = std::mem::replace(&mut object.active, active);
        if was_active && !active {
            self.lifecycle.notify(LifecycleEvent::Disabled(id));
        }
        true
    }

    /// Deactivate without notifying watchers (e.g. a parent hierarchy being
    /// switched off before the notification could be delivered)
    pub fn set_active_silently(&mut self, id: ObjectId, active: bool) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.active = active;
                true
            }
            None => false,
        }
    }

    /// Remove an object without notifying watchers
    pub fn forget(&mut self, id: ObjectId) -> bool {
        self.keywords.remove(&id);
        self.objects.remove(&id).is_some()
    }

    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.position = position;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.objects.get(&id).map(|o| o.position)
    }

    pub fn layer(&self, id: ObjectId) -> Option<u8> {
        self.objects.get(&id).map(|o| o.layer)
    }

    pub fn is_active(&self, id: ObjectId) -> bool {
        self.objects.get(&id).is_some_and(|o| o.active)
    }

    /// Keywords standing for an object, resolved through its provider link
    pub fn keywords_of(&self, id: ObjectId) -> Option<&Keywords> {
        let provider = self.objects.get(&id)?.keyword_provider;
        self.keywords.get(&provider)
    }

    /// Keywords owned by an object
    pub fn keywords_mut(&mut self, id: ObjectId) -> Option<&mut Keywords> {
        self.keywords.get_mut(&id)
    }

    /// Attach (or replace) keywords owned by an object
    pub fn attach_keywords(&mut self, id: ObjectId, keywords: Keywords) -> bool {
        if !self.objects.contains_key(&id) {
            return false;
        }
        self.keywords.insert(id, keywords);
        true
    }

    /// Iterate over all objects (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn lifecycle(&self) -> &LifecycleHub {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut LifecycleHub {
        &mut self.lifecycle
    }
}
