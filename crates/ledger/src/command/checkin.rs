use chrono::Utc;
use tracing::info;

use clanhall_db::{DocumentStore, UpdateSpec, run_transaction};
use clanhall_shared::{Actor, Error, Result};
use clanhall_user::User;

use crate::{Attendance, attendance_id};

impl<S: DocumentStore> super::Command<S> {
    /// Daily check-in. The day-keyed record id makes "once per UTC day" a
    /// create conflict instead of a client-side date comparison, and the
    /// record plus both balance increments land in one commit.
    pub async fn check_in(&self, actor: &Actor) -> Result<Attendance> {
        actor.require_member()?;

        let now = Utc::now();
        let points = self.awards.daily_check_in;
        let record_id = attendance_id(&actor.id, now);

        let record = run_transaction(&self.store, async |txn| {
            if txn.get::<Attendance>(&record_id).await?.is_some() {
                return Err(Error::AlreadyCheckedIn);
            }

            let user = txn
                .get::<User>(&actor.id)
                .await?
                .ok_or(Error::NotFound("user"))?;

            let record = Attendance {
                user_id: actor.id.clone(),
                user_name: user.data.nick,
                date: now,
                points,
                created_by: actor.id.clone(),
                created_at: now,
            };
            txn.create(record_id.as_str(), &record)?;

            if points > 0 {
                txn.update::<User>(
                    actor.id.as_str(),
                    UpdateSpec::new()
                        .increment("pontos", points)
                        .increment("total_points_earned", points),
                );
            }

            Ok(record)
        })
        .await?;

        info!(user_id = %actor.id, points, "daily check-in recorded");

        Ok(record)
    }
}
