use crate::error::StoreError;
use crate::models::{Product, ProductDraft, ProductId, ProductPatch};
use crate::services::store::{Page, ProductFilter, ProductStore};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use regex::RegexBuilder;
use tokio::sync::RwLock;

/// Process-local product store with the same filtering and paging rules as
/// the MongoDB store. Used by tests and for running without a database.
#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, StoreError> {
        let pattern = filter
            .name
            .as_deref()
            .map(|name| RegexBuilder::new(name).case_insensitive(true).build())
            .transpose()?;

        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|product| match &pattern {
                Some(pattern) => product
                    .name
                    .as_deref()
                    .is_some_and(|name| pattern.is_match(name)),
                None => true,
            })
            .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let product = Product::new(ProductId::from(ObjectId::new()), draft);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| product.id == *id).cloned())
    }

    async fn find_one_and_delete(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        Ok(products
            .iter()
            .position(|product| product.id == *id)
            .map(|index| products.remove(index)))
    }

    async fn find_one_and_update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        Ok(products
            .iter_mut()
            .find(|product| product.id == *id)
            .map(|product| {
                product.apply(patch);
                product.clone()
            }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
