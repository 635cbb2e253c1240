use chrono::{DateTime, Utc};
use tracing::info;
use validator::Validate;

use clanhall_db::{DocumentStore, DocumentStoreExt};
use clanhall_shared::{Actor, Error, Result};

use crate::{ClanEvent, EventKind};

#[derive(Validate)]
pub struct CreateEventInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    pub date: DateTime<Utc>,
    pub kind: EventKind,
    #[validate(range(min = 0))]
    pub points_for_voting: i64,
    #[validate(range(min = 0))]
    pub points_for_attendance: i64,
}

impl<S: DocumentStore> super::Command<S> {
    pub async fn create_event(&self, actor: &Actor, input: CreateEventInput) -> Result<String> {
        actor.require_admin()?;
        input.validate()?;

        let event = ClanEvent {
            title: input.title,
            description: input.description,
            date: input.date,
            kind: input.kind,
            points_for_voting: input.points_for_voting,
            points_for_attendance: input.points_for_attendance,
            created_by: actor.id.clone(),
            created_at: Utc::now(),
            active: true,
        };
        let id = self.store.add_doc(&event).await?;

        info!(event_id = %id, admin_id = %actor.id, kind = %event.kind, "event created");

        Ok(id)
    }

    pub async fn delete_event(&self, actor: &Actor, event_id: &str) -> Result<()> {
        actor.require_admin()?;

        if self.store.get_doc::<ClanEvent>(event_id).await?.is_none() {
            return Err(Error::NotFound("event"));
        }

        self.store.delete_doc::<ClanEvent>(event_id).await?;

        info!(event_id, admin_id = %actor.id, "event deleted");

        Ok(())
    }
}
