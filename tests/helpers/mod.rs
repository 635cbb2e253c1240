use chrono::Utc;

use clanhall::State;
use clanhall::db::{DocumentStore, DocumentStoreExt, MemoryStore};
use clanhall::ledger::AwardConfig;
use clanhall::user::{PlayerClass, User};
use clanhall_shared::{Actor, Role};

#[allow(dead_code)]
pub fn memory_state() -> State<MemoryStore> {
    State::new(MemoryStore::new(), AwardConfig::default())
}

pub async fn seed_member<S: DocumentStore + Clone>(
    state: &State<S>,
    id: &str,
    nick: &str,
    pontos: i64,
) -> anyhow::Result<Actor> {
    seed_with_role(state, id, nick, Role::Member, pontos).await
}

pub async fn seed_admin<S: DocumentStore + Clone>(
    state: &State<S>,
    id: &str,
    nick: &str,
) -> anyhow::Result<Actor> {
    seed_with_role(state, id, nick, Role::Admin, 0).await
}

pub async fn seed_with_role<S: DocumentStore + Clone>(
    state: &State<S>,
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
    state.db.create_doc(id, &user).await?;

    Ok(Actor::new(id, nick, role))
}

pub async fn balance_of<S: DocumentStore + Clone>(
    state: &State<S>,
    user_id: &str,
) -> anyhow::Result<(i64, Option<i64>)> {
    let user = state
        .db
        .get_doc::<User>(user_id)
        .await?
        .expect("seeded user exists");

    Ok((user.data.pontos, user.data.total_points_earned))
}
