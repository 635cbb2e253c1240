use clanhall_db::{Direction, DocumentStore, DocumentStoreExt, Filter, Query as DocQuery, Stored};
use clanhall_shared::Result;

use crate::{Attendance, ClanEvent, EventVote, vote_id};

#[derive(Clone)]
pub struct Query<S> {
    store: S,
}

impl<S: DocumentStore> Query<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Upcoming and running events, soonest first.
    pub async fn active_events(&self) -> Result<Vec<Stored<ClanEvent>>> {
        self.store
            .find::<ClanEvent>(
                &DocQuery::new()
                    .filter(Filter::eq("active", true))
                    .order_by("date", Direction::Ascending),
            )
            .await
    }

    pub async fn event(&self, event_id: &str) -> Result<Option<Stored<ClanEvent>>> {
        self.store.get_doc::<ClanEvent>(event_id).await
    }

    /// All votes on an event, opted-in voters first (the order admins work
    /// through on the confirmation screen).
    pub async fn votes_for_event(&self, event_id: &str) -> Result<Vec<Stored<EventVote>>> {
        let mut votes = self
            .store
            .find::<EventVote>(&DocQuery::new().filter(Filter::eq("event_id", event_id)))
            .await?;

        votes.sort_by(|a, b| {
            b.data
                .can_participate
                .cmp(&a.data.can_participate)
                .then_with(|| a.data.created_at.cmp(&b.data.created_at))
        });

        Ok(votes)
    }

    pub async fn vote_of(&self, event_id: &str, user_id: &str) -> Result<Option<Stored<EventVote>>> {
        self.store
            .get_doc::<EventVote>(&vote_id(event_id, user_id))
            .await
    }

    pub async fn votes_of_user(&self, user_id: &str) -> Result<Vec<Stored<EventVote>>> {
        self.store
            .find::<EventVote>(&DocQuery::new().filter(Filter::eq("user_id", user_id)))
            .await
    }

    /// Check-in history, newest first.
    pub async fn attendance_of_user(&self, user_id: &str) -> Result<Vec<Stored<Attendance>>> {
        self.store
            .find::<Attendance>(
                &DocQuery::new()
                    .filter(Filter::eq("user_id", user_id))
                    .order_by("date", Direction::Descending),
            )
            .await
    }
}
