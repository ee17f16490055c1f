use crate::model::{Neighborhood, strip_presentation};
use std::collections::HashMap;
use std::sync::Arc;

struct CacheEntry {
    neighborhood: Arc<Neighborhood>,
    inserted: u64,
}

/// Neighborhoods fetched during this session, keyed by canonical node id.
///
/// Entries never expire; a neighborhood is treated as immutable once stored.
/// With a `max_entries` bound, inserting into a full cache drops the oldest entry.
pub struct GraphDataCache {
    max_entries: Option<usize>,
    entries: HashMap<String, CacheEntry>,
    clock: u64,
}

impl Default for GraphDataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphDataCache {
    pub fn new() -> Self {
        Self {
            max_entries: None,
            entries: HashMap::new(),
            clock: 0,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new()
        }
    }

    pub fn get(&self, node_id: &str) -> Option<Arc<Neighborhood>> {
        self.entries
            .get(strip_presentation(node_id))
            .map(|entry| entry.neighborhood.clone())
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.entries.contains_key(strip_presentation(node_id))
    }

    pub fn put(&mut self, node_id: &str, neighborhood: Arc<Neighborhood>) {
        let key = strip_presentation(node_id).to_string();

        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                if let Some(victim) = self
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted)
                    .map(|(k, _)| k.clone())
                {
                    self.entries.remove(&victim);
                }
            }
        }

        self.clock += 1;
        self.entries.insert(
            key,
            CacheEntry {
                neighborhood,
                inserted: self.clock,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn neighborhood(id: &str) -> Arc<Neighborhood> {
        Arc::new(Neighborhood::new(Node::new(id, "data.core.int.Int.")))
    }

    #[test]
    fn test_get_strips_presentation_suffix() {
        let mut cache = GraphDataCache::new();
        cache.put("abc", neighborhood("abc"));

        assert!(cache.get("abc#k2j1").is_some());
        assert_eq!(cache.get("abc").unwrap().focal.id, "abc");
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut cache = GraphDataCache::new();
        for i in 0..100 {
            cache.put(&format!("n{}", i), neighborhood("n"));
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_bounded_cache_evicts_oldest() {
        let mut cache = GraphDataCache::with_max_entries(2);
        cache.put("a", neighborhood("a"));
        cache.put("b", neighborhood("b"));
        cache.put("c", neighborhood("c"));

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }
}
