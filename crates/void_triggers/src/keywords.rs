//! Keyword sets attached to scene objects

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Set of keywords carried by a keyword provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    keywords: HashSet<String>,
}

impl Keywords {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword, returns false if it was already present
    pub fn add_keyword(&mut self, keyword: impl Into<String>) -> bool {
        self.keywords.insert(keyword.into())
    }

    /// Check for a keyword
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    /// Iterate over the keywords
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Keywords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keywords: iter.into_iter().map(Into::into).collect(),
        }
    }
}
