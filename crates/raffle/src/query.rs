use clanhall_db::{DocumentStore, DocumentStoreExt, Query as DocQuery, Stored};
use clanhall_shared::Result;

use crate::Raffle;

#[derive(Clone)]
pub struct Query<S> {
    store: S,
}

impl<S: DocumentStore> Query<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every raffle, open first, then closed, then completed; newest first
    /// within each group.
    pub async fn all(&self) -> Result<Vec<Stored<Raffle>>> {
        let mut raffles = self.store.find::<Raffle>(&DocQuery::new()).await?;

        raffles.sort_by(|a, b| {
            a.data
                .status
                .sort_rank()
                .cmp(&b.data.status.sort_rank())
                .then_with(|| b.data.created_at.cmp(&a.data.created_at))
        });

        Ok(raffles)
    }

    pub async fn get(&self, raffle_id: &str) -> Result<Option<Stored<Raffle>>> {
        self.store.get_doc::<Raffle>(raffle_id).await
    }
}
