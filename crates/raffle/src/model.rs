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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RaffleStatus {
    Open,
    Closed,
    Completed,
}

impl RaffleStatus {
    /// Listing order: open raffles first, finished ones last.
    pub fn sort_rank(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
            Self::Completed => 2,
        }
    }
}

/// A prize draw. The roster only grows (idempotent union), and
/// `completed` is terminal: the winner fields are written exactly once.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Raffle {
    pub title: String,
    pub description: String,
    pub prize: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub status: RaffleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Raffle {
    const COLLECTION: &'static str = "raffles";
}
