use crate::error::StoreError;
use crate::models::{Product, ProductDraft, ProductId, ProductPatch};
use async_trait::async_trait;

/// Which products a listing returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive pattern matched anywhere in `name`.
    pub name: Option<String>,
}

/// A window over the matching products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const SIZE: u64 = 10;

    /// Window for a requested page number: `offset = SIZE * page`.
    ///
    /// Page 0 and an absent page both start at the first product, so page 1
    /// is the *second* window of ten.
    pub fn numbered(page: Option<u64>) -> Self {
        Self {
            limit: Self::SIZE,
            offset: Self::SIZE.saturating_mul(page.unwrap_or(0)),
        }
    }
}

/// Persistence for products. Implementations are shared across in-flight
/// requests and must tolerate concurrent calls.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, StoreError>;

    /// Insert a new product; the store assigns its id.
    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Remove a product, returning what was removed.
    async fn find_one_and_delete(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Merge `patch` into a product, returning the updated state.
    async fn find_one_and_update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
