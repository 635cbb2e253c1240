//! Document store boundary.
//!
//! Every collaborator above this crate talks to a [`DocumentStore`]: a
//! collection/id keyed map of flat JSON documents with partial updates,
//! atomic batches and optimistic read-validate-write transactions. Two
//! backends ship in-tree: [`MemoryStore`] for tests and reference
//! semantics, [`SqliteStore`] for persistence.

mod document;
mod memory;
mod query;
mod sqlite;
mod store;
mod transaction;
mod update;
mod write;

pub use document::{Document, RawDocument, Stored, encode};
pub use memory::MemoryStore;
pub use query::{Direction, Filter, Query};
pub use sqlite::{SqliteStore, create_pool};
pub use store::{DocumentStore, DocumentStoreExt, ReadGuard};
pub use transaction::{Transaction, run_transaction};
pub use update::{FieldOp, UpdateSpec};
pub use write::Write;
