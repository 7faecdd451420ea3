//! Trigger events

use crate::object::ObjectId;
use serde::{Deserialize, Serialize};

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEventType {
    /// Object entered the trigger volume
    Enter,
    /// Object left the trigger volume (or vanished while inside)
    Exit,
}

/// A geometric enter/exit reported by a trigger volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Type of event
    pub event_type: TriggerEventType,
    /// The trigger that produced the event
    pub trigger: u64,
    /// The object that entered or left
    pub object: ObjectId,
}

impl TriggerEvent {
    /// Create an enter event
    pub fn enter(trigger: u64, object: ObjectId) -> Self {
        Self {
            event_type: TriggerEventType::Enter,
            trigger,
            object,
        }
    }

    /// Create an exit event
    pub fn exit(trigger: u64, object: ObjectId) -> Self {
        Self {
            event_type: TriggerEventType::Exit,
            trigger,
            object,
        }
    }

    /// Check if this is an enter event
    pub fn is_enter(&self) -> bool {
        self.event_type == TriggerEventType::Enter
    }

    /// Check if this is an exit event
    pub fn is_exit(&self) -> bool {
        self.event_type == TriggerEventType::Exit
    }
}
