use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};
use ulid::Ulid;

use crate::{DocumentStore, Query, RawDocument, ReadGuard, UpdateSpec, Write};
use clanhall_shared::{Error, Result};

#[derive(Debug, Clone)]
struct Entry {
    fields: Map<String, Value>,
    version: i64,
}

type Docs = HashMap<(String, String), Entry>;

/// In-memory backend. Single mutex, every write set applied under one
/// critical section, so batches and commits are trivially atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Docs>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Docs>> {
        self.inner
            .lock()
            .map_err(|_| Error::Store("memory store mutex poisoned".to_string()))
    }

    fn check_and_apply(docs: &mut Docs, reads: &[ReadGuard], writes: Vec<Write>) -> Result<()> {
        for read in reads {
            let current = docs
                .get(&(read.collection.clone(), read.id.clone()))
                .map(|entry| entry.version)
                .unwrap_or(0);
            if current != read.version {
                return Err(Error::Conflict);
            }
        }

        // validate the whole write set before touching anything, so a
        // failed batch leaves no partial state behind; later writes may
        // target documents created earlier in the same set
        let mut created: Vec<(String, String)> = Vec::new();
        for write in &writes {
            match write {
                Write::Create { collection, id, .. } => {
                    let key = (collection.clone(), id.clone());
                    if docs.contains_key(&key) || created.contains(&key) {
                        return Err(Error::Conflict);
                    }
                    created.push(key);
                }
                Write::Update { collection, id, .. } => {
                    let key = (collection.clone(), id.clone());
                    if !docs.contains_key(&key) && !created.contains(&key) {
                        return Err(Error::NotFound("document"));
                    }
                }
                Write::Delete { .. } => {}
            }
        }

        for write in writes {
            match write {
                Write::Create {
                    collection,
                    id,
                    fields,
                } => {
                    docs.insert((collection, id), Entry { fields, version: 1 });
                }
                Write::Update {
                    collection,
                    id,
                    spec,
                } => {
                    if let Some(entry) = docs.get_mut(&(collection, id)) {
                        spec.apply(&mut entry.fields);
                        entry.version += 1;
                    }
                }
                Write::Delete { collection, id } => {
                    docs.remove(&(collection, id));
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>> {
        let docs = self.lock()?;

        Ok(docs
            .get(&(collection.to_string(), id.to_string()))
            .map(|entry| RawDocument {
                id: id.to_string(),
                fields: entry.fields.clone(),
            }))
    }

    async fn get_versioned(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<(Option<RawDocument>, i64)> {
        let docs = self.lock()?;

        Ok(
            match docs.get(&(collection.to_string(), id.to_string())) {
                Some(entry) => (
                    Some(RawDocument {
                        id: id.to_string(),
                        fields: entry.fields.clone(),
                    }),
                    entry.version,
                ),
                None => (None, 0),
            },
        )
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<RawDocument>> {
        let docs = self.lock()?;

        let snapshot: Vec<RawDocument> = docs
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((_, id), entry)| RawDocument {
                id: id.clone(),
                fields: entry.fields.clone(),
            })
            .collect();

        Ok(query.apply(snapshot))
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        let id = Ulid::new().to_string();
        self.create(collection, &id, fields).await?;

        Ok(id)
    }

    async fn create(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        let write = Write::Create {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        };

        match self.commit(Vec::new(), vec![write]).await {
            Err(Error::Conflict) => Err(Error::AlreadyExists("document")),
            other => other,
        }
    }

    async fn update(&self, collection: &str, id: &str, spec: UpdateSpec) -> Result<()> {
        let write = Write::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            spec,
        };

        self.commit(Vec::new(), vec![write]).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let write = Write::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        self.commit(Vec::new(), vec![write]).await
    }

    async fn batch(&self, writes: Vec<Write>) -> Result<()> {
        self.commit(Vec::new(), writes).await
    }

    async fn commit(&self, reads: Vec<ReadGuard>, writes: Vec<Write>) -> Result<()> {
        let mut docs = self.lock()?;

        Self::check_and_apply(&mut docs, &reads, writes)
    }
}
