use serde_json::json;
use tracing::info;

use clanhall_db::{DocumentStore, DocumentStoreExt, Filter, Query, UpdateSpec, Write};
use clanhall_shared::{Actor, Result};
use clanhall_store::{Redemption, RedemptionStatus};
use clanhall_user::User;

/// Outcome of one reconciliation sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileReport {
    pub scanned: usize,
    pub backfilled: usize,
}

impl<S: DocumentStore> super::Command<S> {
    /// One-time backfill for users that predate the lifetime counter.
    ///
    /// For each user the candidate lifetime total is the current balance
    /// plus everything spent on redemptions that were not cancelled. It is
    /// applied where the counter is absent, or stored as zero while the
    /// candidate is positive (zero is read as "never set"; a legitimately
    /// zero lifetime total is indistinguishable and gets rewritten to the
    /// same value). All affected users are updated in a single atomic
    /// batch, and a second sweep finds nothing left to do.
    pub async fn reconcile_lifetime_totals(&self, actor: &Actor) -> Result<ReconcileReport> {
        actor.require_admin()?;

        let users = self.store.find::<User>(&Query::new()).await?;
        let mut writes = Vec::new();
        let mut backfilled = 0usize;

        for user in &users {
            let redemptions = self
                .store
                .find::<Redemption>(
                    &Query::new().filter(Filter::eq("user_id", user.id.as_str())),
                )
                .await?;
            let spent: i64 = redemptions
                .iter()
                .filter(|r| {
                    matches!(
                        r.data.status,
                        RedemptionStatus::Pending | RedemptionStatus::Delivered
                    )
                })
                .map(|r| r.data.points_spent)
                .sum();

            let candidate = user.data.pontos + spent;
            let needs_backfill = match user.data.total_points_earned {
                None => true,
                Some(0) => candidate > 0,
                Some(_) => false,
            };
            if !needs_backfill {
                continue;
            }

            writes.push(Write::update::<User>(
                user.id.as_str(),
                UpdateSpec::new().set("total_points_earned", json!(candidate)),
            ));
            backfilled += 1;
        }

        if !writes.is_empty() {
            self.store.batch(writes).await?;
        }

        info!(
            scanned = users.len(),
            backfilled,
            admin_id = %actor.id,
            "lifetime counter reconciliation finished"
        );

        Ok(ReconcileReport {
            scanned: users.len(),
            backfilled,
        })
    }
}
