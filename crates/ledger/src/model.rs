use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use clanhall_db::Document;
use clanhall_shared::day_key;

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
pub enum EventKind {
    #[serde(rename = "TW")]
    #[strum(serialize = "TW")]
    Tw,
    #[serde(rename = "GvG")]
    #[strum(serialize = "GvG")]
    Gvg,
    Boss,
    Farm,
    Other,
}

/// A scheduled clan activity members vote on. The award amounts are part
/// of the event, so different event kinds can pay differently.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClanEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub kind: EventKind,
    pub points_for_voting: i64,
    pub points_for_attendance: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl Document for ClanEvent {
    const COLLECTION: &'static str = "events";
}

/// One vote per (event, user), enforced by the deterministic document id
/// from [`vote_id`]. Re-votes update this document in place; the two
/// award flags are one-shot and never reset once true.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventVote {
    pub event_id: String,
    pub user_id: String,
    pub user_name: String,
    pub can_participate: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub voting_points_awarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended: Option<bool>,
    #[serde(default)]
    pub attendance_points_awarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_confirmed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for EventVote {
    const COLLECTION: &'static str = "event_votes";
}

/// Daily check-in record, one per (user, UTC day) via [`attendance_id`].
/// Append-only; carries the amount that was awarded with it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Attendance {
    pub user_id: String,
    pub user_name: String,
    pub date: DateTime<Utc>,
    pub points: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Attendance {
    const COLLECTION: &'static str = "attendances";
}

pub fn vote_id(event_id: &str, user_id: &str) -> String {
    format!("{event_id}:{user_id}")
}

pub fn attendance_id(user_id: &str, at: DateTime<Utc>) -> String {
    format!("{user_id}:{}", day_key(at))
}
