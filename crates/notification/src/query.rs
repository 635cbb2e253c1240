use clanhall_db::{Direction, DocumentStore, DocumentStoreExt, Filter, Query as DocQuery, Stored};
use clanhall_shared::Result;

use crate::Notification;

#[derive(Clone)]
pub struct Query<S> {
    store: S,
}

impl<S: DocumentStore> Query<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// A user's notifications, newest first.
    pub async fn for_user(&self, user_id: &str) -> Result<Vec<Stored<Notification>>> {
        self.store
            .find::<Notification>(
                &DocQuery::new()
                    .filter(Filter::eq("user_id", user_id))
                    .order_by("created_at", Direction::Descending),
            )
            .await
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        let unread = self
            .store
            .find::<Notification>(
                &DocQuery::new()
                    .filter(Filter::eq("user_id", user_id))
                    .filter(Filter::eq("read", false)),
            )
            .await?;

        Ok(unread.len())
    }
}
