use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use clanhall_db::Document;

/// Catalog entry. Stock is decremented one unit per redemption, never
/// below zero.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Item {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub points_cost: i64,
    pub stock: i64,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Item {
    const COLLECTION: &'static str = "items";
}

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
pub enum RedemptionStatus {
    Pending,
    Delivered,
    Cancelled,
}

/// Purchase record, created atomically with the balance and stock debit.
/// Admins move it out of `pending` exactly once.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Redemption {
    pub item_id: String,
    pub item_name: String,
    pub user_id: String,
    pub user_name: String,
    pub points_spent: i64,
    pub status: RedemptionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_by: Option<String>,
}

impl Document for Redemption {
    const COLLECTION: &'static str = "redemptions";
}
