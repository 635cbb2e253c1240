use chrono::Utc;
use serde_json::json;
use tracing::info;

use clanhall_db::{DocumentStore, DocumentStoreExt, Filter, Query, UpdateSpec, Write, run_transaction};
use clanhall_shared::{Actor, Error, Result};
use clanhall_user::User;

use crate::{ClanEvent, EventVote};

impl<S: DocumentStore> super::Command<S> {
    /// Admin confirmation that a voter actually showed up. Awards the
    /// event's attendance amount at most once per vote: the flag is
    /// one-shot, and unmarking never claws points back. Returns the
    /// awarded amount (zero when nothing moved).
    pub async fn confirm_attendance(
        &self,
        actor: &Actor,
        vote_id: &str,
        attended: bool,
    ) -> Result<i64> {
        actor.require_admin()?;

        let now = Utc::now();

        let awarded = run_transaction(&self.store, async |txn| {
            let vote = txn
                .get::<EventVote>(vote_id)
                .await?
                .ok_or(Error::NotFound("vote"))?;
            let event = txn
                .get::<ClanEvent>(&vote.data.event_id)
                .await?
                .ok_or(Error::NotFound("event"))?;

            let mut spec = UpdateSpec::new()
                .set("attended", json!(attended))
                .set("attendance_confirmed_by", json!(actor.id))
                .set("attendance_confirmed_at", json!(now))
                .set("updated_at", json!(now));

            let mut awarded = 0;
            if attended && !vote.data.attendance_points_awarded {
                spec = spec.set("attendance_points_awarded", json!(true));

                let points = event.data.points_for_attendance;
                if points > 0 {
                    if txn.get::<User>(&vote.data.user_id).await?.is_none() {
                        return Err(Error::NotFound("user"));
                    }
                    txn.update::<User>(
                        vote.data.user_id.as_str(),
                        UpdateSpec::new()
                            .increment("pontos", points)
                            .increment("total_points_earned", points),
                    );
                    awarded = points;
                }
            }

            txn.update::<EventVote>(vote_id, spec);

            Ok(awarded)
        })
        .await?;

        info!(
            vote_id,
            admin_id = %actor.id,
            attended,
            awarded,
            "attendance confirmation applied"
        );

        Ok(awarded)
    }

    /// Confirm every opted-in voter that is not yet marked attended, as
    /// one all-or-nothing batch over the votes and the balances. Votes
    /// whose award flag is already set keep their points untouched.
    pub async fn confirm_all_attendees(&self, actor: &Actor, event_id: &str) -> Result<usize> {
        actor.require_admin()?;

        let event = self
            .store
            .get_doc::<ClanEvent>(event_id)
            .await?
            .ok_or(Error::NotFound("event"))?;
        let votes = self
            .store
            .find::<EventVote>(&Query::new().filter(Filter::eq("event_id", event_id)))
            .await?;

        let now = Utc::now();
        let points = event.data.points_for_attendance;
        let mut writes = Vec::new();
        let mut confirmed = 0usize;

        for vote in votes {
            if !vote.data.can_participate || vote.data.attended == Some(true) {
                continue;
            }

            writes.push(Write::update::<EventVote>(
                vote.id.as_str(),
                UpdateSpec::new()
                    .set("attended", json!(true))
                    .set("attendance_confirmed_by", json!(actor.id))
                    .set("attendance_confirmed_at", json!(now))
                    .set("attendance_points_awarded", json!(true))
                    .set("updated_at", json!(now)),
            ));

            if !vote.data.attendance_points_awarded && points > 0 {
                writes.push(Write::update::<User>(
                    vote.data.user_id.as_str(),
                    UpdateSpec::new()
                        .increment("pontos", points)
                        .increment("total_points_earned", points),
                ));
            }

            confirmed += 1;
        }

        if writes.is_empty() {
            return Ok(0);
        }

        self.store.batch(writes).await?;

        info!(event_id, confirmed, admin_id = %actor.id, "bulk attendance confirmation");

        Ok(confirmed)
    }
}
