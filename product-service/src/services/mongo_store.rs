use crate::error::StoreError;
use crate::models::{Product, ProductDraft, ProductId, ProductPatch};
use crate::services::database::MongoDb;
use crate::services::store::{Page, ProductFilter, ProductStore};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;
use serde_json::{Map, Value};

/// Products stored as plain BSON documents in a single collection.
#[derive(Clone)]
pub struct MongoProductStore {
    db: MongoDb,
    collection: Collection<Document>,
}

impl MongoProductStore {
    pub fn new(db: &MongoDb, collection: &str) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection(collection),
        }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn find(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, StoreError> {
        let mut query = Document::new();
        if let Some(name) = &filter.name {
            query.insert("name", doc! { "$regex": name.as_str(), "$options": "i" });
        }

        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(page.offset.min(i64::MAX as u64))
            .limit(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .build();

        let documents: Vec<Document> = self
            .collection
            .find(query, options)
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(product_from_document).collect()
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut document = fields_to_document(&draft.fields)?;
        if let Some(name) = &draft.name {
            document.insert("name", name.as_str());
        }

        let result = self.collection.insert_one(&document, None).await?;
        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Decoding(format!("unexpected inserted id: {}", result.inserted_id))
        })?;

        let id = ProductId::from(oid);
        tracing::debug!(product_id = %id, "Inserted product document");

        Ok(Product::new(id, draft))
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.object_id() }, None)
            .await?
            .map(product_from_document)
            .transpose()
    }

    async fn find_one_and_delete(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.collection
            .find_one_and_delete(doc! { "_id": id.object_id() }, None)
            .await?
            .map(product_from_document)
            .transpose()
    }

    async fn find_one_and_update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        // `$set` rejects an empty document; nothing to change is a lookup.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let set = patch_to_set_document(&patch)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(doc! { "_id": id.object_id() }, doc! { "$set": set }, options)
            .await?
            .map(product_from_document)
            .transpose()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db
            .health_check()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn fields_to_document(fields: &Map<String, Value>) -> Result<Document, StoreError> {
    let mut document = Document::new();
    for (key, value) in fields {
        document.insert(key.clone(), bson::to_bson(value)?);
    }
    Ok(document)
}

/// Contents of the `$set` stage for a patch. `"name": null` clears the name.
fn patch_to_set_document(patch: &ProductPatch) -> Result<Document, StoreError> {
    let mut set = fields_to_document(&patch.fields)?;
    match &patch.name {
        Some(Some(name)) => {
            set.insert("name", name.as_str());
        }
        Some(None) => {
            set.insert("name", Bson::Null);
        }
        None => {}
    }
    Ok(set)
}

fn product_from_document(mut document: Document) -> Result<Product, StoreError> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => ProductId::from(oid),
        other => {
            return Err(StoreError::Decoding(format!(
                "expected ObjectId in _id, found {:?}",
                other
            )))
        }
    };

    let mut fields = Map::new();
    let name = match document.remove("name") {
        Some(Bson::String(name)) => Some(name),
        Some(Bson::Null) | None => None,
        // Written by something other than this service; pass it through.
        Some(other) => {
            fields.insert("name".to_string(), other.into_relaxed_extjson());
            None
        }
    };

    for (key, value) in document {
        fields.insert(key, value.into_relaxed_extjson());
    }

    Ok(Product { id, name, fields })
}
