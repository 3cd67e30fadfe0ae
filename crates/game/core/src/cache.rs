//! Explicitly invalidated memo tables.
//!
//! A [`TokenCache`] remembers the [`CacheToken`] its entries were computed
//! under. Presenting a different token drops every entry, so callers
//! invalidate by changing the level or bumping the session version rather
//! than by clearing caches by hand.

use std::collections::HashMap;
use std::hash::Hash;

use crate::state::LevelId;

/// Level identity plus a monotonically increasing session version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CacheToken {
    pub level: LevelId,
    pub version: u32,
}

impl CacheToken {
    pub const fn new(level: LevelId, version: u32) -> Self {
        Self { level, version }
    }
}

#[derive(Clone, Debug)]
pub struct TokenCache<K, V> {
    token: Option<CacheToken>,
    entries: HashMap<K, V>,
}

impl<K, V> Default for TokenCache<K, V> {
    fn default() -> Self {
        Self {
            token: None,
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> TokenCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn revalidate(&mut self, token: CacheToken) {
        if self.token != Some(token) {
            self.entries.clear();
            self.token = Some(token);
        }
    }

    /// Returns the cached value, computing it on a miss.
    pub fn get_or_insert_with(&mut self, token: CacheToken, key: K, compute: impl FnOnce() -> V) -> &V {
        self.revalidate(token);
        self.entries.entry(key).or_insert_with(compute)
    }

    pub fn get(&self, token: CacheToken, key: &K) -> Option<&V> {
        if self.token != Some(token) {
            return None;
        }
        self.entries.get(key)
    }

    pub fn invalidate(&mut self) {
        self.token = None;
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
