use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use clanhall_db::{DocumentStore, DocumentStoreExt, Stored, UpdateSpec, run_transaction};
use clanhall_shared::{Actor, Error, Result};
use clanhall_user::User;

use crate::{Item, Redemption, RedemptionStatus};

#[derive(Validate)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    pub image_url: String,
    #[validate(range(min = 0))]
    pub points_cost: i64,
    #[validate(range(min = 0))]
    pub stock: i64,
    pub active: bool,
}

#[derive(Clone)]
pub struct Command<S> {
    store: S,
}

impl<S: DocumentStore> Command<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_item(&self, actor: &Actor, input: ItemInput) -> Result<String> {
        actor.require_admin()?;
        input.validate()?;

        let item = Item {
            name: input.name,
            description: input.description,
            image_url: input.image_url,
            points_cost: input.points_cost,
            stock: input.stock,
            active: input.active,
            created_by: actor.id.clone(),
            created_at: Utc::now(),
        };
        let id = self.store.add_doc(&item).await?;

        info!(item_id = %id, admin_id = %actor.id, "store item created");

        Ok(id)
    }

    pub async fn update_item(&self, actor: &Actor, item_id: &str, input: ItemInput) -> Result<()> {
        actor.require_admin()?;
        input.validate()?;

        if self.store.get_doc::<Item>(item_id).await?.is_none() {
            return Err(Error::NotFound("item"));
        }

        self.store
            .update_doc::<Item>(
                item_id,
                UpdateSpec::new()
                    .set("name", json!(input.name))
                    .set("description", json!(input.description))
                    .set("image_url", json!(input.image_url))
                    .set("points_cost", json!(input.points_cost))
                    .set("stock", json!(input.stock))
                    .set("active", json!(input.active)),
            )
            .await?;

        info!(item_id, admin_id = %actor.id, "store item updated");

        Ok(())
    }

    pub async fn delete_item(&self, actor: &Actor, item_id: &str) -> Result<()> {
        actor.require_admin()?;

        if self.store.get_doc::<Item>(item_id).await?.is_none() {
            return Err(Error::NotFound("item"));
        }

        self.store.delete_doc::<Item>(item_id).await?;

        info!(item_id, admin_id = %actor.id, "store item deleted");

        Ok(())
    }

    /// Redeem one unit of an item.
    ///
    /// Balance and stock are re-read inside the transaction; cached values
    /// from the caller count for nothing. Either every effect lands (debit,
    /// stock decrement, pending record) or none does, and a concurrent
    /// writer on the same user or item retries the whole body.
    pub async fn redeem(&self, actor: &Actor, item_id: &str) -> Result<Stored<Redemption>> {
        actor.require_member()?;

        let now = Utc::now();

        let redemption = run_transaction(&self.store, async |txn| {
            let user = txn
                .get::<User>(&actor.id)
                .await?
                .ok_or(Error::NotFound("user"))?;
            let item = txn
                .get::<Item>(item_id)
                .await?
                .ok_or(Error::NotFound("item"))?;

            let cost = item.data.points_cost;
            if user.data.pontos < cost {
                return Err(Error::InsufficientPoints {
                    required: cost,
                    balance: user.data.pontos,
                });
            }
            if item.data.stock <= 0 {
                return Err(Error::OutOfStock);
            }

            txn.update::<User>(actor.id.as_str(), UpdateSpec::new().increment("pontos", -cost));
            txn.update::<Item>(item_id, UpdateSpec::new().increment("stock", -1));

            let redemption = Redemption {
                item_id: item.id.clone(),
                item_name: item.data.name.clone(),
                user_id: actor.id.clone(),
                user_name: actor.nick.clone(),
                points_spent: cost,
                status: RedemptionStatus::Pending,
                created_at: now,
                delivered_at: None,
                delivered_by: None,
            };
            let id = txn.add(&redemption)?;

            Ok(Stored {
                id,
                data: redemption,
            })
        })
        .await?;

        info!(
            item_id,
            user_id = %actor.id,
            points_spent = redemption.data.points_spent,
            redemption_id = %redemption.id,
            "item redeemed"
        );

        Ok(redemption)
    }

    /// Move a redemption out of `pending`. Delivery stamps who handed the
    /// item over and when; cancellation refunds the spent points to the
    /// balance (the lifetime counter stays put, a refund is not an award).
    pub async fn set_redemption_status(
        &self,
        actor: &Actor,
        redemption_id: &str,
        status: RedemptionStatus,
    ) -> Result<()> {
        actor.require_admin()?;

        let now = Utc::now();

        run_transaction(&self.store, async |txn| {
            let redemption = txn
                .get::<Redemption>(redemption_id)
                .await?
                .ok_or(Error::NotFound("redemption"))?;
            if redemption.data.status != RedemptionStatus::Pending
                || status == RedemptionStatus::Pending
            {
                return Err(Error::InvalidTransition {
                    from: redemption.data.status.to_string(),
                    to: status.to_string(),
                });
            }

            let mut spec = UpdateSpec::new().set("status", json!(status));
            match status {
                RedemptionStatus::Delivered => {
                    spec = spec
                        .set("delivered_at", json!(now))
                        .set("delivered_by", json!(actor.id));
                }
                RedemptionStatus::Cancelled => {
                    if txn.get::<User>(&redemption.data.user_id).await?.is_some() {
                        txn.update::<User>(
                            redemption.data.user_id.as_str(),
                            UpdateSpec::new()
                                .increment("pontos", redemption.data.points_spent),
                        );
                    }
                }
                RedemptionStatus::Pending => {}
            }

            txn.update::<Redemption>(redemption_id, spec);

            Ok(())
        })
        .await?;

        info!(
            redemption_id,
            admin_id = %actor.id,
            status = %status,
            "redemption status changed"
        );

        Ok(())
    }
}
