use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use clanhall_db::{DocumentStore, DocumentStoreExt, UpdateSpec, run_transaction};
use clanhall_notification::{Notification, NotificationKind};
use clanhall_shared::{Actor, Error, Result};
use clanhall_user::User;

use crate::{Raffle, RaffleStatus, pick_winner};

#[derive(Validate)]
pub struct CreateRaffleInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 200))]
    pub prize: String,
}

/// What a draw decided.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub winner_id: String,
    pub winner_name: String,
}

#[derive(Clone)]
pub struct Command<S> {
    store: S,
}

impl<S: DocumentStore> Command<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_raffle(&self, actor: &Actor, input: CreateRaffleInput) -> Result<String> {
        actor.require_admin()?;
        input.validate()?;

        let raffle = Raffle {
            title: input.title,
            description: input.description,
            prize: input.prize,
            participants: Vec::new(),
            status: RaffleStatus::Open,
            winner_id: None,
            winner_name: None,
            draw_date: None,
            created_by: actor.id.clone(),
            created_at: Utc::now(),
        };
        let id = self.store.add_doc(&raffle).await?;

        info!(raffle_id = %id, admin_id = %actor.id, "raffle created");

        Ok(id)
    }

    /// Enter the caller into the roster. Union semantics: joining twice
    /// changes nothing.
    pub async fn join(&self, actor: &Actor, raffle_id: &str) -> Result<()> {
        actor.require_member()?;

        run_transaction(&self.store, async |txn| {
            let raffle = txn
                .get::<Raffle>(raffle_id)
                .await?
                .ok_or(Error::NotFound("raffle"))?;
            if raffle.data.status != RaffleStatus::Open {
                return Err(Error::RaffleClosed);
            }

            txn.update::<Raffle>(
                raffle_id,
                UpdateSpec::new().array_union("participants", vec![json!(actor.id)]),
            );

            Ok(())
        })
        .await?;

        info!(raffle_id, user_id = %actor.id, "joined raffle");

        Ok(())
    }

    /// Stop accepting entries without drawing.
    pub async fn close(&self, actor: &Actor, raffle_id: &str) -> Result<()> {
        actor.require_admin()?;

        run_transaction(&self.store, async |txn| {
            let raffle = txn
                .get::<Raffle>(raffle_id)
                .await?
                .ok_or(Error::NotFound("raffle"))?;
            if raffle.data.status != RaffleStatus::Open {
                return Err(Error::InvalidTransition {
                    from: raffle.data.status.to_string(),
                    to: RaffleStatus::Closed.to_string(),
                });
            }

            txn.update::<Raffle>(
                raffle_id,
                UpdateSpec::new().set("status", json!(RaffleStatus::Closed)),
            );

            Ok(())
        })
        .await?;

        info!(raffle_id, admin_id = %actor.id, "raffle closed");

        Ok(())
    }

    /// Draw the winner and finish the raffle.
    ///
    /// Selection happens on the roster as read inside the transaction, and
    /// the winner fields, the `completed` status and the winner's
    /// notification commit together. The raffle is done the moment this
    /// returns; anything a client animates afterwards is theatre.
    pub async fn draw(&self, actor: &Actor, raffle_id: &str) -> Result<DrawOutcome> {
        actor.require_admin()?;

        let now = Utc::now();

        let outcome = run_transaction(&self.store, async |txn| {
            let raffle = txn
                .get::<Raffle>(raffle_id)
                .await?
                .ok_or(Error::NotFound("raffle"))?;
            if raffle.data.status == RaffleStatus::Completed {
                return Err(Error::AlreadyDrawn);
            }

            let index = pick_winner(&raffle.data.participants, &mut rand::rng())
                .ok_or(Error::EmptyRaffle)?;
            let winner_id = raffle.data.participants[index].clone();

            let winner_name = match txn.get::<User>(&winner_id).await? {
                Some(user) => user.data.nick,
                None => "unknown".to_string(),
            };

            txn.update::<Raffle>(
                raffle_id,
                UpdateSpec::new()
                    .set("winner_id", json!(winner_id))
                    .set("winner_name", json!(winner_name))
                    .set("status", json!(RaffleStatus::Completed))
                    .set("draw_date", json!(now)),
            );

            let notification = Notification::new(
                winner_id.as_str(),
                NotificationKind::RaffleWin,
                "You won!",
                format!(
                    "Congratulations! You won the raffle: {} - {}",
                    raffle.data.title, raffle.data.prize
                ),
                now,
            );
            txn.add(&notification)?;

            Ok(DrawOutcome {
                winner_id,
                winner_name,
            })
        })
        .await?;

        info!(
            raffle_id,
            winner_id = %outcome.winner_id,
            winner_name = %outcome.winner_name,
            admin_id = %actor.id,
            "raffle drawn"
        );

        Ok(outcome)
    }
}
