//! In-memory product store

use crate::extract::ProductData;
use crate::store::{ProductStore, StoreError, StoreResult, StoredProduct};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Capped, newest-first product store behind a single mutex
#[derive(Debug)]
pub struct MemoryStore {
    products: Mutex<VecDeque<StoredProduct>>,
    capacity: usize,
}

impl MemoryStore {
    /// Creates an empty store holding at most `capacity` products (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            products: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<StoredProduct>> {
        self.products
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProductStore for MemoryStore {
    fn append(&self, product: ProductData) -> StoredProduct {
        let stored = StoredProduct::from_product(product);
        let mut products = self.lock();

        products.push_front(stored.clone());
        while products.len() > self.capacity {
            if let Some(evicted) = products.pop_back() {
                tracing::debug!(id = %evicted.id, "evicted oldest product");
            }
        }

        tracing::debug!(id = %stored.id, count = products.len(), "stored product");
        stored
    }

    fn list_all(&self) -> Vec<StoredProduct> {
        self.lock().iter().cloned().collect()
    }

    fn remove_by_id(&self, id: &str) -> StoreResult<StoredProduct> {
        let mut products = self.lock();
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        products
            .remove(index)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
