//! Admission filters for trigger trackers

use crate::keywords::Keywords;
use serde::{Deserialize, Serialize};

/// Bitmask of object layers (layer `n` is bit `1 << n`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask containing no layers
    pub const NONE: Self = Self(0);
    /// Mask containing every layer
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing a single layer
    pub const fn layer(layer: u8) -> Self {
        Self(Self::bit(layer))
    }

    /// Add a layer
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.0 |= Self::bit(layer);
        self
    }

    /// Check if a layer is part of this mask
    ///
    /// Layers outside `0..32` are never contained.
    pub fn contains(&self, layer: u8) -> bool {
        self.0 & Self::bit(layer) != 0
    }

    /// Check if the mask is empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    const fn bit(layer: u8) -> u32 {
        if layer < 32 {
            1 << layer
        } else {
            0
        }
    }
}

/// Keyword filter applied to objects entering a trigger.
///
/// The expression is a plain string: an object passes when any of its
/// keywords occurs in the expression as a substring (case-sensitive).
/// An empty expression accepts every object that has a keyword provider.
/// Objects without a provider never pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordsFilter {
    expression: String,
}

impl KeywordsFilter {
    /// Create a filter from an expression
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// Filter that accepts every object with a keyword provider
    pub fn any() -> Self {
        Self::default()
    }

    /// The raw expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Check a resolved keyword provider against this filter
    pub fn check(&self, keywords: Option<&Keywords>) -> bool {
        let Some(keywords) = keywords else {
            return false;
        };

        if self.expression.is_empty() {
            return true;
        }

        keywords
            .iter()
            .any(|keyword| self.expression.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::layer(3).with_layer(5);

        assert!(mask.contains(3));
        assert!(mask.contains(5));
        assert!(!mask.contains(4));
        assert!(!LayerMask::ALL.contains(40));
        assert!(LayerMask::NONE.is_empty());
    }

    #[test]
    fn test_filter_requires_provider() {
        assert!(!KeywordsFilter::any().check(None));
        assert!(!KeywordsFilter::new("player").check(None));
    }

    #[test]
    fn test_empty_expression_accepts_any_provider() {
        let empty = Keywords::default();
        assert!(KeywordsFilter::any().check(Some(&empty)));
    }

    #[test]
    fn test_substring_match() {
        let filter = KeywordsFilter::new("player,npc");
        let player: Keywords = ["player"].into_iter().collect();
        let enemy: Keywords = ["enemy"].into_iter().collect();
        let partial: Keywords = ["np"].into_iter().collect();

        assert!(filter.check(Some(&player)));
        assert!(!filter.check(Some(&enemy)));
        // Raw containment, not a token match
        assert!(filter.check(Some(&partial)));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let filter = KeywordsFilter::new("Player");
        let lower: Keywords = ["player"].into_iter().collect();
        assert!(!filter.check(Some(&lower)));
    }

    #[test]
    fn test_non_empty_expression_rejects_empty_provider() {
        let empty = Keywords::default();
        assert!(!KeywordsFilter::new("player").check(Some(&empty)));
    }
}
