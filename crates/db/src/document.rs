use clanhall_shared::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A typed document bound to its collection name. Documents must encode to
/// a JSON object; the id lives outside the body.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

/// A document read back from the store together with its id.
#[derive(Debug, Clone)]
pub struct Stored<D> {
    pub id: String,
    pub data: D,
}

/// Untyped document as the backends hand it over.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn decode<D: Document>(self) -> Result<Stored<D>> {
        let data = serde_json::from_value(Value::Object(self.fields))?;

        Ok(Stored { id: self.id, data })
    }
}

/// Encode a typed document into the field map the backends persist.
pub fn encode<D: Document>(doc: &D) -> Result<Map<String, Value>> {
    match serde_json::to_value(doc)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::Store(format!(
            "{} document must encode to an object, got {other}",
            D::COLLECTION
        ))),
    }
}
