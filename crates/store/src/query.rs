use clanhall_db::{Direction, DocumentStore, DocumentStoreExt, Filter, Query as DocQuery, Stored};
use clanhall_shared::Result;

use crate::{Item, Redemption, RedemptionStatus};

#[derive(Clone)]
pub struct Query<S> {
    store: S,
}

impl<S: DocumentStore> Query<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// What the storefront shows: active items, cheapest first.
    pub async fn active_items(&self) -> Result<Vec<Stored<Item>>> {
        self.store
            .find::<Item>(
                &DocQuery::new()
                    .filter(Filter::eq("active", true))
                    .order_by("points_cost", Direction::Ascending),
            )
            .await
    }

    pub async fn item(&self, item_id: &str) -> Result<Option<Stored<Item>>> {
        self.store.get_doc::<Item>(item_id).await
    }

    /// Admin view over every redemption: pending ones first, newest first
    /// within each group.
    pub async fn all_redemptions(&self) -> Result<Vec<Stored<Redemption>>> {
        let mut redemptions = self.store.find::<Redemption>(&DocQuery::new()).await?;

        redemptions.sort_by(|a, b| {
            let a_pending = a.data.status == RedemptionStatus::Pending;
            let b_pending = b.data.status == RedemptionStatus::Pending;
            b_pending
                .cmp(&a_pending)
                .then_with(|| b.data.created_at.cmp(&a.data.created_at))
        });

        Ok(redemptions)
    }

    pub async fn redemptions_of_user(&self, user_id: &str) -> Result<Vec<Stored<Redemption>>> {
        self.store
            .find::<Redemption>(
                &DocQuery::new()
                    .filter(Filter::eq("user_id", user_id))
                    .order_by("created_at", Direction::Descending),
            )
            .await
    }
}
