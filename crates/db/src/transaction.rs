use ulid::Ulid;

use crate::{Document, DocumentStore, RawDocument, ReadGuard, Stored, UpdateSpec, Write};
use clanhall_shared::{Error, Result};

const MAX_ATTEMPTS: u32 = 5;

/// Handle passed to a [`run_transaction`] body. Every `get` records the
/// observed version; staged writes only land if the whole read set is
/// still current at commit time.
pub struct Transaction<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    reads: Vec<ReadGuard>,
    writes: Vec<Write>,
}

impl<'a, S: DocumentStore + ?Sized> Transaction<'a, S> {
    fn new(store: &'a S) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Versioned read. Reading an absent document also guards the commit
    /// against a concurrent create of the same id.
    pub async fn get<D: Document>(&mut self, id: &str) -> Result<Option<Stored<D>>> {
        let (doc, version) = self.store.get_versioned(D::COLLECTION, id).await?;
        self.reads.push(ReadGuard {
            collection: D::COLLECTION.to_string(),
            id: id.to_string(),
            version,
        });

        doc.map(RawDocument::decode).transpose()
    }

    pub fn create<D: Document>(&mut self, id: impl Into<String>, doc: &D) -> Result<()> {
        self.writes.push(Write::create(id, doc)?);

        Ok(())
    }

    /// Stage a create under a generated id and return that id.
    pub fn add<D: Document>(&mut self, doc: &D) -> Result<String> {
        let id = Ulid::new().to_string();
        self.create(id.clone(), doc)?;

        Ok(id)
    }

    pub fn update<D: Document>(&mut self, id: impl Into<String>, spec: UpdateSpec) {
        self.writes.push(Write::update::<D>(id, spec));
    }

    pub fn delete<D: Document>(&mut self, id: impl Into<String>) {
        self.writes.push(Write::delete::<D>(id));
    }
}

/// Run `body` as an optimistic read-validate-write transaction.
///
/// The body re-reads its dependencies through the handle, stages writes,
/// and returns its result; the commit applies atomically only if no read
/// document changed underneath. Conflicts retry the whole body up to a
/// bounded budget and then surface as [`Error::Conflict`]. Business-rule
/// failures returned by the body abort immediately, with no state change
/// and no retry.
pub async fn run_transaction<S, T, F>(store: &S, mut body: F) -> Result<T>
where
    S: DocumentStore + ?Sized,
    F: AsyncFnMut(&mut Transaction<'_, S>) -> Result<T>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let mut txn = Transaction::new(store);
        let value = body(&mut txn).await?;

        match store.commit(txn.reads, txn.writes).await {
            Ok(()) => return Ok(value),
            Err(Error::Conflict) if attempt < MAX_ATTEMPTS => {
                tracing::debug!(attempt, "optimistic commit conflicted, retrying");
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::Conflict)
}
