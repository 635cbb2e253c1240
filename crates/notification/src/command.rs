use chrono::Utc;
use serde_json::json;
use tracing::info;

use clanhall_db::{DocumentStore, DocumentStoreExt, UpdateSpec};
use clanhall_shared::{Error, Result};

use crate::{Notification, NotificationKind};

#[derive(Clone)]
pub struct Command<S> {
    store: S,
}

impl<S: DocumentStore> Command<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn notify(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<String> {
        let notification = Notification::new(user_id, kind, title, message, Utc::now());
        let id = self.store.add_doc(&notification).await?;

        info!(
            notification_id = %id,
            user_id = %user_id,
            kind = %kind,
            "notification created"
        );

        Ok(id)
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        if self.store.get_doc::<Notification>(id).await?.is_none() {
            return Err(Error::NotFound("notification"));
        }

        self.store
            .update_doc::<Notification>(id, UpdateSpec::new().set("read", json!(true)))
            .await
    }
}
