use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use clanhall_db::Document;

#[derive(
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    RaffleWin,
    Approval,
    Event,
    General,
}

/// Fire-and-forget message to a single user; delivery and rendering belong
/// to the consumer, `read` is the only field that ever changes.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Notification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Notification {
    const COLLECTION: &'static str = "notifications";
}

impl Notification {
    pub fn new(
        user_id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            read: false,
            created_at: at,
        }
    }
}
