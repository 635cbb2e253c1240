use serde_json::{Map, Value};
use ulid::Ulid;

use crate::{Document, UpdateSpec, encode};
use clanhall_shared::Result;

/// One entry of an atomic write set, as consumed by
/// [`DocumentStore::batch`](crate::DocumentStore::batch) and the
/// transaction commit path.
#[derive(Debug, Clone)]
pub enum Write {
    Create {
        collection: String,
        id: String,
        fields: Map<String, Value>,
    },
    Update {
        collection: String,
        id: String,
        spec: UpdateSpec,
    },
    Delete {
        collection: String,
        id: String,
    },
}

impl Write {
    pub fn create<D: Document>(id: impl Into<String>, doc: &D) -> Result<Self> {
        Ok(Self::Create {
            collection: D::COLLECTION.to_string(),
            id: id.into(),
            fields: encode(doc)?,
        })
    }

    /// Create under a freshly generated id; returns the write and the id.
    pub fn add<D: Document>(doc: &D) -> Result<(Self, String)> {
        let id = Ulid::new().to_string();
        Ok((Self::create(id.clone(), doc)?, id))
    }

    pub fn update<D: Document>(id: impl Into<String>, spec: UpdateSpec) -> Self {
        Self::Update {
            collection: D::COLLECTION.to_string(),
            id: id.into(),
            spec,
        }
    }

    pub fn delete<D: Document>(id: impl Into<String>) -> Self {
        Self::Delete {
            collection: D::COLLECTION.to_string(),
            id: id.into(),
        }
    }
}
