use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::RawDocument;

/// Predicate over a single top-level field. Both backends evaluate filters
/// with the same code, so query semantics never diverge between them.
#[derive(Debug, Clone)]
pub enum Filter {
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Gt { field: String, value: Value },
    Ge { field: String, value: Value },
    Lt { field: String, value: Value },
    Le { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    ArrayContains { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ge {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Le {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in(field: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::ArrayContains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        match self {
            Self::Eq { field, value } => fields.get(field) == Some(value),
            Self::Ne { field, value } => fields.get(field) != Some(value),
            Self::Gt { field, value } => cmp_field(fields, field, value) == Some(Ordering::Greater),
            Self::Ge { field, value } => matches!(
                cmp_field(fields, field, value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt { field, value } => cmp_field(fields, field, value) == Some(Ordering::Less),
            Self::Le { field, value } => matches!(
                cmp_field(fields, field, value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::In { field, values } => fields
                .get(field)
                .is_some_and(|actual| values.contains(actual)),
            Self::ArrayContains { field, value } => fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

fn cmp_field(fields: &Map<String, Value>, field: &str, value: &Value) -> Option<Ordering> {
    compare(fields.get(field)?, value)
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
struct OrderBy {
    field: String,
    direction: Direction,
}

/// Filter + ordering + limit over one collection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Option<OrderBy>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate against an unordered collection snapshot.
    pub fn apply(&self, docs: Vec<RawDocument>) -> Vec<RawDocument> {
        let mut out: Vec<RawDocument> = docs
            .into_iter()
            .filter(|doc| self.filters.iter().all(|f| f.matches(&doc.fields)))
            .collect();

        if let Some(order) = &self.order_by {
            out.sort_by(|a, b| {
                let ord = match (a.fields.get(&order.field), b.fields.get(&order.field)) {
                    (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }

        out
    }
}
