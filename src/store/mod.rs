//! In-memory storage for the example resource.

pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

pub use types::{Example, ExampleUpdate, NewExample};

/// Concurrent in-memory example store.
///
/// Cloning is cheap and every clone sees the same data. Identifiers come
/// from a counter that only moves forward, so deleted ids are never handed
/// out again.
#[derive(Debug, Clone)]
pub struct ExampleStore {
    examples: Arc<DashMap<u64, Example>>,
    next_id: Arc<AtomicU64>,
}

impl ExampleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            examples: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create a store holding the two sample records served at startup.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.create(NewExample {
            name: "Example 1".to_string(),
            description: "This is the first example".to_string(),
        });
        store.create(NewExample {
            name: "Example 2".to_string(),
            description: "This is the second example".to_string(),
        });
        store
    }

    /// All examples ordered by id.
    pub fn list(&self) -> Vec<Example> {
        let mut all: Vec<Example> = self
            .examples
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|example| example.id);
        all
    }

    /// Look up a single example.
    pub fn get(&self, id: u64) -> Option<Example> {
        self.examples.get(&id).map(|entry| entry.value().clone())
    }

    /// Insert a new example and return it with its assigned id.
    pub fn create(&self, new: NewExample) -> Example {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let example = Example {
            id,
            name: new.name,
            description: new.description,
        };
        self.examples.insert(id, example.clone());
        debug!(id, "example created");
        example
    }

    /// Apply a partial update. Returns `None` if the id is unknown.
    pub fn update(&self, id: u64, update: ExampleUpdate) -> Option<Example> {
        let mut entry = self.examples.get_mut(&id)?;
        update.apply(entry.value_mut());
        debug!(id, "example updated");
        Some(entry.value().clone())
    }

    /// Remove an example. Returns the removed record if it existed.
    pub fn delete(&self, id: u64) -> Option<Example> {
        let removed = self.examples.remove(&id).map(|(_, example)| example);
        if removed.is_some() {
            debug!(id, "example deleted");
        }
        removed
    }

    /// Number of stored examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the store holds no examples.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

impl Default for ExampleStore {
    fn default() -> Self {
        Self::new()
    }
}
