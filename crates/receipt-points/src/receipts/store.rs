use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::domain::ReceiptId;

pub const NOT_FOUND_DESCRIPTION: &str = "No receipt found for that ID.";

/// Keeps computed point totals so they can be fetched after processing.
pub trait ReceiptStore: Send + Sync {
    /// Records `points` under a freshly generated identifier.
    fn create(&self, points: u64) -> Result<ReceiptId, StoreError>;
    fn lookup(&self, id: &ReceiptId) -> Result<u64, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}", NOT_FOUND_DESCRIPTION)]
    NotFound(ReceiptId),
    #[error("receipt store unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime store. Entries are only ever added.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReceiptStore {
    points: Arc<RwLock<HashMap<ReceiptId, u64>>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReceiptStore for InMemoryReceiptStore {
    fn create(&self, points: u64) -> Result<ReceiptId, StoreError> {
        let mut guard = self
            .points
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        loop {
            match guard.entry(ReceiptId::generate()) {
                Entry::Vacant(slot) => {
                    let id = slot.key().clone();
                    slot.insert(points);
                    return Ok(id);
                }
                // A v4 collision is practically impossible; draw again rather than overwrite.
                Entry::Occupied(_) => continue,
            }
        }
    }

    fn lookup(&self, id: &ReceiptId) -> Result<u64, StoreError> {
        let guard = self
            .points
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        guard
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}
