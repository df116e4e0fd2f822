//! Product store
//!
//! A small, capped, newest-first collection of extracted products. The HTTP
//! API writes to it after a successful extraction and reads it back for
//! listing and deletion. Nothing is persisted across restarts.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{ProductStore, StoreError, StoreResult};

use crate::extract::ProductData;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A product as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub amazon_url: String,
    pub added_at: DateTime<Utc>,
}

impl StoredProduct {
    /// Wraps extracted data with a fresh id and the current time
    pub fn from_product(product: ProductData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: product.title,
            image_url: product.image_url,
            amazon_url: product.amazon_url,
            added_at: Utc::now(),
        }
    }
}
