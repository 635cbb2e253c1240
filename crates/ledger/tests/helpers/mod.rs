use chrono::Utc;

use clanhall_db::{DocumentStoreExt, MemoryStore};
use clanhall_ledger::{ClanEvent, EventKind};
use clanhall_shared::{Actor, Role};
use clanhall_user::{PlayerClass, User};

pub async fn seed_user(
    store: &MemoryStore,
    id: &str,
    nick: &str,
    role: Role,
    pontos: i64,
) -> anyhow::Result<Actor> {
    let user = User {
        email: format!("{nick}@clanhall.localhost"),
        nick: nick.to_string(),
        class: PlayerClass::Warrior,
        phone: String::new(),
        whatsapp: String::new(),
        role,
        pontos,
        total_points_earned: Some(pontos),
        created_at: Utc::now(),
        approved_at: None,
        approved_by: None,
    };
    store.create_doc(id, &user).await?;

    Ok(Actor::new(id, nick, role))
}

#[allow(dead_code)]
pub async fn seed_event(
    store: &MemoryStore,
    points_for_voting: i64,
    points_for_attendance: i64,
) -> anyhow::Result<String> {
    let event = ClanEvent {
        title: "Territory War".to_string(),
        description: "weekly TW".to_string(),
        date: Utc::now(),
        kind: EventKind::Tw,
        points_for_voting,
        points_for_attendance,
        created_by: "admin-1".to_string(),
        created_at: Utc::now(),
        active: true,
    };

    Ok(store.add_doc(&event).await?)
}

#[allow(dead_code)]
pub async fn balance_of(store: &MemoryStore, user_id: &str) -> anyhow::Result<(i64, Option<i64>)> {
    let user = store
        .get_doc::<User>(user_id)
        .await?
        .expect("seeded user exists");

    Ok((user.data.pontos, user.data.total_points_earned))
}
