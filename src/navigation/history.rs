use super::NavigationError;
use crate::model::ViewGraph;
use std::collections::VecDeque;

pub const DEFAULT_MAX_BREADCRUMBS: usize = 8;

/// Bounded stack of views the user navigated away from.
///
/// Restoring an entry is a jump back: every entry after it is dropped.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<ViewGraph>,
    max_entries: usize,
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BREADCRUMBS)
    }
}

impl NavigationHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Append a snapshot. Once the bound is exceeded the oldest one is dropped
    /// and returned.
    pub fn push(&mut self, entry: ViewGraph) -> Option<ViewGraph> {
        self.entries.push_back(entry);
        if self.entries.len() > self.max_entries {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Put back an entry that `push` evicted.
    pub fn push_front(&mut self, entry: ViewGraph) {
        if self.entries.len() < self.max_entries {
            self.entries.push_front(entry);
        }
    }

    pub fn pop(&mut self) -> Option<ViewGraph> {
        self.entries.pop_back()
    }

    pub fn top(&self) -> Option<&ViewGraph> {
        self.entries.back()
    }

    /// Return the snapshot at `index`, keeping entries `0..=index`.
    pub fn restore(&mut self, index: usize) -> Result<ViewGraph, NavigationError> {
        let entry = self
            .entries
            .get(index)
            .cloned()
            .ok_or(NavigationError::BreadcrumbOutOfRange {
                index,
                len: self.entries.len(),
            })?;
        self.entries.truncate(index + 1);
        Ok(entry)
    }

    pub fn get(&self, index: usize) -> Option<&ViewGraph> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewGraph> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.focal_id.clone(), e.label.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
