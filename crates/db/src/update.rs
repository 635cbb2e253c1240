use serde_json::{Map, Value};

/// Mutation of a single top-level field.
#[derive(Debug, Clone)]
pub enum FieldOp {
    Set(Value),
    /// Atomic numeric increment; a missing field counts as zero.
    Increment(i64),
    /// Idempotent set-union append; a missing field counts as an empty
    /// array.
    ArrayUnion(Vec<Value>),
}

/// Partial update over a document, applied field by field in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct UpdateSpec {
    ops: Vec<(String, FieldOp)>,
}

impl UpdateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.ops.push((field.into(), FieldOp::Set(value)));
        self
    }

    pub fn increment(mut self, field: impl Into<String>, delta: i64) -> Self {
        self.ops.push((field.into(), FieldOp::Increment(delta)));
        self
    }

    pub fn array_union(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.ops.push((field.into(), FieldOp::ArrayUnion(values)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn apply(&self, fields: &mut Map<String, Value>) {
        for (field, op) in &self.ops {
            match op {
                FieldOp::Set(value) => {
                    fields.insert(field.clone(), value.clone());
                }
                FieldOp::Increment(delta) => {
                    let current = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
                    fields.insert(field.clone(), Value::from(current + delta));
                }
                FieldOp::ArrayUnion(values) => {
                    let entry = fields
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(existing) = entry {
                        for value in values {
                            if !existing.contains(value) {
                                existing.push(value.clone());
                            }
                        }
                    }
                }
            }
        }
    }
}
