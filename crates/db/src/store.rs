use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Document, Query, RawDocument, Stored, UpdateSpec, Write, encode};
use clanhall_shared::Result;

/// A read recorded by a transaction: the version the body observed. A
/// version of 0 means the document was absent at read time, so commit also
/// guards against concurrent creation.
#[derive(Debug, Clone)]
pub struct ReadGuard {
    pub collection: String,
    pub id: String,
    pub version: i64,
}

/// Capability contract of the document store. Object safe so callers can
/// hold a `&dyn DocumentStore` where the backend is chosen at runtime.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>>;

    /// Read together with the document version, for transactional reads.
    async fn get_versioned(&self, collection: &str, id: &str)
    -> Result<(Option<RawDocument>, i64)>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<RawDocument>>;

    /// Insert under a generated id.
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String>;

    /// Insert under a caller-chosen id; fails with `AlreadyExists` when the
    /// id is taken.
    async fn create(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()>;

    /// Partial field update; fails with `NotFound` when the document is
    /// missing.
    async fn update(&self, collection: &str, id: &str, spec: UpdateSpec) -> Result<()>;

    /// Idempotent delete.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Atomic all-or-nothing write set.
    async fn batch(&self, writes: Vec<Write>) -> Result<()>;

    /// Optimistic commit: apply `writes` only if every entry of `reads` is
    /// still at its recorded version, otherwise fail with `Conflict` and no
    /// effect.
    async fn commit(&self, reads: Vec<ReadGuard>, writes: Vec<Write>) -> Result<()>;
}

/// Typed convenience layer over the raw contract.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    async fn get_doc<D: Document>(&self, id: &str) -> Result<Option<Stored<D>>> {
        match self.get(D::COLLECTION, id).await? {
            Some(raw) => Ok(Some(raw.decode()?)),
            None => Ok(None),
        }
    }

    async fn find<D: Document>(&self, query: &Query) -> Result<Vec<Stored<D>>> {
        self.query(D::COLLECTION, query)
            .await?
            .into_iter()
            .map(RawDocument::decode)
            .collect()
    }

    async fn add_doc<D: Document>(&self, doc: &D) -> Result<String> {
        self.add(D::COLLECTION, encode(doc)?).await
    }

    async fn create_doc<D: Document>(&self, id: &str, doc: &D) -> Result<()> {
        self.create(D::COLLECTION, id, encode(doc)?).await
    }

    async fn update_doc<D: Document>(&self, id: &str, spec: UpdateSpec) -> Result<()> {
        self.update(D::COLLECTION, id, spec).await
    }

    async fn delete_doc<D: Document>(&self, id: &str) -> Result<()> {
        self.delete(D::COLLECTION, id).await
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}
