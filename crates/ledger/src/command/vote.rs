use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use clanhall_db::{DocumentStore, UpdateSpec, run_transaction};
use clanhall_shared::{Actor, Error, Result};
use clanhall_user::User;

use crate::{ClanEvent, EventVote, vote_id};

#[derive(Validate)]
pub struct VoteInput {
    pub can_participate: bool,
    #[validate(length(max = 500))]
    pub comment: String,
}

impl<S: DocumentStore> super::Command<S> {
    /// Record or change a member's participation vote. The first vote on
    /// an event pays the event's voting award once; any later change is an
    /// update in place that moves no points in either direction. Returns
    /// whether this was the first vote.
    pub async fn confirm_vote(
        &self,
        actor: &Actor,
        event_id: &str,
        input: VoteInput,
    ) -> Result<bool> {
        actor.require_member()?;
        input.validate()?;

        let now = Utc::now();
        let id = vote_id(event_id, &actor.id);

        let first_vote = run_transaction(&self.store, async |txn| {
            let event = txn
                .get::<ClanEvent>(event_id)
                .await?
                .ok_or(Error::NotFound("event"))?;
            if !event.data.active {
                return Err(Error::NotFound("event"));
            }

            if txn.get::<EventVote>(&id).await?.is_some() {
                // the award flag is deliberately untouched here: changing
                // a vote must never re-award points
                txn.update::<EventVote>(
                    id.as_str(),
                    UpdateSpec::new()
                        .set("can_participate", json!(input.can_participate))
                        .set("comment", json!(input.comment))
                        .set("updated_at", json!(now)),
                );
                return Ok(false);
            }

            let points = event.data.points_for_voting;
            let vote = EventVote {
                event_id: event_id.to_string(),
                user_id: actor.id.clone(),
                user_name: actor.nick.clone(),
                can_participate: input.can_participate,
                comment: input.comment.clone(),
                voting_points_awarded: true,
                attended: None,
                attendance_points_awarded: false,
                attendance_confirmed_by: None,
                attendance_confirmed_at: None,
                created_at: now,
                updated_at: now,
            };
            txn.create(id.as_str(), &vote)?;

            if points > 0 {
                txn.update::<User>(
                    actor.id.as_str(),
                    UpdateSpec::new()
                        .increment("pontos", points)
                        .increment("total_points_earned", points),
                );
            }

            Ok(true)
        })
        .await?;

        info!(
            event_id,
            user_id = %actor.id,
            can_participate = input.can_participate,
            first_vote,
            "event vote recorded"
        );

        Ok(first_vote)
    }
}
