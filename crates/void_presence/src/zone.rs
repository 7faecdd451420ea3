//! Presence zones: author-time configuration of a mapped volume

use crate::config::ZoneSettings;
use crate::consumer::ConsumerHandle;
use crate::error::Result;
use void_triggers::KeywordsFilter;

/// Identifies a zone registered in a [`PresenceSystem`](crate::system::PresenceSystem)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u64);

impl ZoneId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A volume whose tracked objects are mapped onto a presence map
pub struct PresenceZone {
    settings: ZoneSettings,
    keywords: KeywordsFilter,
    consumers: Vec<ConsumerHandle>,
}

impl PresenceZone {
    /// Create a zone; settings are validated on the way in
    pub fn new(settings: ZoneSettings) -> Self {
        Self {
            settings: settings.validated(),
            keywords: KeywordsFilter::any(),
            consumers: Vec::new(),
        }
    }

    /// Create a zone from a JSON settings document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(ZoneSettings::from_json(json)?))
    }

    /// Keywords to filter incoming objects (empty accepts any keyword holder)
    pub fn with_keywords(mut self, filter: KeywordsFilter) -> Self {
        self.keywords = filter;
        self
    }

    /// Add an effect receiving this zone's presence map
    pub fn with_consumer(mut self, consumer: ConsumerHandle) -> Self {
        self.consumers.push(consumer);
        self
    }

    pub fn settings(&self) -> &ZoneSettings {
        &self.settings
    }

    /// Replace the settings (validated)
    pub fn set_settings(&mut self, settings: ZoneSettings) {
        self.settings = settings.validated();
    }

    pub fn keywords(&self) -> &KeywordsFilter {
        &self.keywords
    }

    pub fn consumers(&self) -> &[ConsumerHandle] {
        &self.consumers
    }

    pub fn add_consumer(&mut self, consumer: ConsumerHandle) {
        self.consumers.push(consumer);
    }
}

impl std::fmt::Debug for PresenceZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceZone")
            .field("settings", &self.settings)
            .field("keywords", &self.keywords)
            .field("consumer_count", &self.consumers.len())
            .finish()
    }
}
