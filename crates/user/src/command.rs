use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use clanhall_db::{DocumentStore, DocumentStoreExt, UpdateSpec, Write};
use clanhall_notification::{Notification, NotificationKind};
use clanhall_shared::{Actor, Error, Result, Role};

use crate::{PlayerClass, User};

/// Input for account registration. The id comes from the identity
/// provider, which already authenticated the caller.
#[derive(Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 25))]
    pub nick: String,
    pub class: PlayerClass,
    pub phone: String,
    pub whatsapp: String,
}

#[derive(Clone)]
pub struct Command<S> {
    store: S,
}

impl<S: DocumentStore> Command<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create the account in `pending` state with an empty balance. Admins
    /// rule on it later via [`approve`](Self::approve) or
    /// [`reject`](Self::reject).
    pub async fn register(&self, input: RegisterInput) -> Result<()> {
        input.validate()?;

        let user = User {
            email: input.email,
            nick: input.nick,
            class: input.class,
            phone: input.phone,
            whatsapp: input.whatsapp,
            role: Role::Pending,
            pontos: 0,
            total_points_earned: Some(0),
            created_at: Utc::now(),
            approved_at: None,
            approved_by: None,
        };

        match self.store.create_doc(&input.id, &user).await {
            Err(Error::AlreadyExists(_)) => return Err(Error::AlreadyExists("user")),
            other => other?,
        }

        info!(user_id = %input.id, nick = %user.nick, "user registered, awaiting approval");

        Ok(())
    }

    /// Promote a pending account to member and notify the user, as one
    /// atomic batch.
    pub async fn approve(&self, actor: &Actor, user_id: &str) -> Result<()> {
        actor.require_admin()?;

        let user = self
            .store
            .get_doc::<User>(user_id)
            .await?
            .ok_or(Error::NotFound("user"))?;
        if user.data.role != Role::Pending {
            return Err(Error::InvalidTransition {
                from: user.data.role.to_string(),
                to: Role::Member.to_string(),
            });
        }

        let now = Utc::now();
        let notification = Notification::new(
            user_id,
            NotificationKind::Approval,
            "Registration approved",
            format!("Welcome to the clan, {}!", user.data.nick),
            now,
        );
        let (notify, _) = Write::add(&notification)?;

        self.store
            .batch(vec![
                Write::update::<User>(
                    user_id,
                    UpdateSpec::new()
                        .set("role", json!(Role::Member))
                        .set("approved_at", json!(now))
                        .set("approved_by", json!(actor.id)),
                ),
                notify,
            ])
            .await?;

        info!(user_id = %user_id, admin_id = %actor.id, "user approved");

        Ok(())
    }

    pub async fn reject(&self, actor: &Actor, user_id: &str) -> Result<()> {
        actor.require_admin()?;

        let user = self
            .store
            .get_doc::<User>(user_id)
            .await?
            .ok_or(Error::NotFound("user"))?;
        if user.data.role != Role::Pending {
            return Err(Error::InvalidTransition {
                from: user.data.role.to_string(),
                to: Role::Rejected.to_string(),
            });
        }

        self.store
            .update_doc::<User>(user_id, UpdateSpec::new().set("role", json!(Role::Rejected)))
            .await?;

        info!(user_id = %user_id, admin_id = %actor.id, "user rejected");

        Ok(())
    }

    pub async fn promote(&self, actor: &Actor, user_id: &str) -> Result<()> {
        self.change_role(actor, user_id, Role::Member, Role::Admin).await
    }

    pub async fn demote(&self, actor: &Actor, user_id: &str) -> Result<()> {
        self.change_role(actor, user_id, Role::Admin, Role::Member).await
    }

    async fn change_role(&self, actor: &Actor, user_id: &str, from: Role, to: Role) -> Result<()> {
        actor.require_admin()?;

        let user = self
            .store
            .get_doc::<User>(user_id)
            .await?
            .ok_or(Error::NotFound("user"))?;
        if user.data.role != from {
            return Err(Error::InvalidTransition {
                from: user.data.role.to_string(),
                to: to.to_string(),
            });
        }

        self.store
            .update_doc::<User>(user_id, UpdateSpec::new().set("role", json!(to)))
            .await?;

        info!(user_id = %user_id, admin_id = %actor.id, role = %to, "role changed");

        Ok(())
    }

    /// Hard delete. Only explicit admin removal ever deletes a user
    /// document.
    pub async fn remove(&self, actor: &Actor, user_id: &str) -> Result<()> {
        actor.require_admin()?;

        if self.store.get_doc::<User>(user_id).await?.is_none() {
            return Err(Error::NotFound("user"));
        }

        self.store.delete_doc::<User>(user_id).await?;

        info!(user_id = %user_id, admin_id = %actor.id, "user removed");

        Ok(())
    }
}
