use chrono::Utc;

use clanhall_db::{DocumentStoreExt, MemoryStore};
use clanhall_shared::{Actor, Role};
use clanhall_store::{Item, Redemption};
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
        class: PlayerClass::Mercenary,
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

pub async fn seed_item(
    store: &MemoryStore,
    name: &str,
    points_cost: i64,
    stock: i64,
) -> anyhow::Result<String> {
    let item = Item {
        name: name.to_string(),
        description: String::new(),
        image_url: String::new(),
        points_cost,
        stock,
        active: true,
        created_by: "admin-1".to_string(),
        created_at: Utc::now(),
    };

    Ok(store.add_doc(&item).await?)
}

#[allow(dead_code)]
pub async fn balance_of(store: &MemoryStore, user_id: &str) -> anyhow::Result<(i64, Option<i64>)> {
    let user = store
        .get_doc::<User>(user_id)
        .await?
        .expect("seeded user exists");

    Ok((user.data.pontos, user.data.total_points_earned))
}

#[allow(dead_code)]
pub async fn stock_of(store: &MemoryStore, item_id: &str) -> anyhow::Result<i64> {
    Ok(store
        .get_doc::<Item>(item_id)
        .await?
        .expect("seeded item exists")
        .data
        .stock)
}

#[allow(dead_code)]
pub async fn redemptions(store: &MemoryStore) -> anyhow::Result<Vec<Redemption>> {
    Ok(store
        .find::<Redemption>(&clanhall_db::Query::new())
        .await?
        .into_iter()
        .map(|r| r.data)
        .collect())
}
