use crate::model::{ViewGraph, decorate_id};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashSet;

const SUFFIX_LEN: usize = 6;

/// Hands out view ids: the canonical id the first time a node is placed, a
/// randomly suffixed presentation id for every further appearance.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    /// Seed with the ids already present in a view.
    pub(crate) fn from_view(view: &ViewGraph) -> Self {
        Self {
            taken: view.nodes.iter().map(|n| n.id.clone()).collect(),
        }
    }

    pub(crate) fn allocate(&mut self, canonical: &str) -> String {
        if self.taken.insert(canonical.to_string()) {
            return canonical.to_string();
        }

        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(SUFFIX_LEN)
                .map(char::from)
                .collect();
            let id = decorate_id(canonical, &suffix);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }
}
