//! Store trait and error types
//!
//! This module defines the trait interface for product stores and the
//! associated error type.

use crate::extract::ProductData;
use crate::store::StoredProduct;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    NotFound(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for product store implementations
///
/// Implementations must be safe to share between request handlers; every
/// method takes `&self`.
pub trait ProductStore: Send + Sync {
    /// Adds a freshly extracted product as the newest entry
    ///
    /// Assigns an id and timestamp. If the store is at capacity, the oldest
    /// entry is evicted.
    fn append(&self, product: ProductData) -> StoredProduct;

    /// Returns every stored product, newest first
    fn list_all(&self) -> Vec<StoredProduct>;

    /// Removes the product with the given id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no product has that id.
    fn remove_by_id(&self, id: &str) -> StoreResult<StoredProduct>;

    /// Number of stored products
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
