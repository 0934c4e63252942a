//! Per-search robots.txt cache
//!
//! A search touches only a handful of origins, and the result pages of one
//! marketplace all share the same robots.txt. Entries live exactly as long as
//! the politeness gate that owns the cache.

use crate::robots::ParsedRobots;
use std::collections::HashMap;

/// Robots.txt policies keyed by origin (`scheme://host[:port]`)
///
/// An origin whose robots.txt could not be fetched is stored with the
/// policy the failure resolved to, so it is not retried within the search.
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: HashMap<String, ParsedRobots>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: &str) -> Option<&ParsedRobots> {
        self.entries.get(origin)
    }

    pub fn insert(&mut self, origin: String, robots: ParsedRobots) {
        self.entries.insert(origin, robots);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
