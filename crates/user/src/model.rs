use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use clanhall_db::Document;
use clanhall_shared::Role;

/// In-game class of a clan member.
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
pub enum PlayerClass {
    Warrior,
    Archer,
    Mage,
    Priest,
    Barbarian,
    Arcanist,
    Mystic,
    Sorceress,
    Mercenary,
    Spiritualist,
}

/// A clan member. The document id is the identity-provider uid, so there
/// is exactly one document per account.
///
/// `pontos` is the spendable balance; `total_points_earned` counts every
/// point ever awarded and never decreases. Legacy documents predate the
/// counter, which is why it is optional here (see the reconciliation
/// routine in clanhall-ledger).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub email: String,
    pub nick: String,
    pub class: PlayerClass,
    pub phone: String,
    pub whatsapp: String,
    pub role: Role,
    pub pontos: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points_earned: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";
}
