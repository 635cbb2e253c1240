use clanhall_db::MemoryStore;
use clanhall_shared::{Actor, Error, Role};
use clanhall_store::{Command, ItemInput, Query, RedemptionStatus};

mod helpers;

fn admin() -> Actor {
    Actor::new("admin-1", "boss", Role::Admin)
}

async fn redeem_one(store: &MemoryStore) -> anyhow::Result<String> {
    let actor = helpers::seed_user(store, "u1", "hunter", Role::Member, 100).await?;
    let item_id = helpers::seed_item(store, "rare mount", 60, 1).await?;
    let redemption = Command::new(store.clone()).redeem(&actor, &item_id).await?;

    Ok(redemption.id)
}

#[tokio::test]
async fn test_delivery_stamps_metadata() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = redeem_one(&store).await?;
    let command = Command::new(store.clone());

    command
        .set_redemption_status(&admin(), &id, RedemptionStatus::Delivered)
        .await?;

    let records = helpers::redemptions(&store).await?;
    assert_eq!(records[0].status, RedemptionStatus::Delivered);
    assert_eq!(records[0].delivered_by.as_deref(), Some("admin-1"));
    assert!(records[0].delivered_at.is_some());

    // balance untouched by delivery
    assert_eq!(helpers::balance_of(&store, "u1").await?.0, 40);

    Ok(())
}

#[tokio::test]
async fn test_cancellation_refunds_the_balance_only() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = redeem_one(&store).await?;
    let command = Command::new(store.clone());

    command
        .set_redemption_status(&admin(), &id, RedemptionStatus::Cancelled)
        .await?;

    let (pontos, lifetime) = helpers::balance_of(&store, "u1").await?;
    assert_eq!(pontos, 100);
    // a refund is not an award
    assert_eq!(lifetime, Some(100));

    let records = helpers::redemptions(&store).await?;
    assert_eq!(records[0].status, RedemptionStatus::Cancelled);

    Ok(())
}

#[tokio::test]
async fn test_status_transition_is_one_shot() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = redeem_one(&store).await?;
    let command = Command::new(store.clone());

    command
        .set_redemption_status(&admin(), &id, RedemptionStatus::Delivered)
        .await?;

    // no cancellation (and no double refund) after delivery
    let err = command
        .set_redemption_status(&admin(), &id, RedemptionStatus::Cancelled)
        .await;
    assert!(matches!(err, Err(Error::InvalidTransition { .. })));

    // and no resetting to pending
    let err = command
        .set_redemption_status(&admin(), &id, RedemptionStatus::Pending)
        .await;
    assert!(matches!(err, Err(Error::InvalidTransition { .. })));

    Ok(())
}

#[tokio::test]
async fn test_status_change_requires_admin() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = redeem_one(&store).await?;

    let member = Actor::new("u1", "hunter", Role::Member);
    assert!(matches!(
        Command::new(store.clone())
            .set_redemption_status(&member, &id, RedemptionStatus::Delivered)
            .await,
        Err(Error::PermissionDenied)
    ));

    Ok(())
}

#[tokio::test]
async fn test_item_crud_and_storefront_order() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let command = Command::new(store.clone());
    let query = Query::new(store.clone());

    let cheap = command
        .create_item(
            &admin(),
            ItemInput {
                name: "potion".to_string(),
                description: String::new(),
                image_url: String::new(),
                points_cost: 10,
                stock: 5,
                active: true,
            },
        )
        .await?;
    let dear = command
        .create_item(
            &admin(),
            ItemInput {
                name: "mount".to_string(),
                description: String::new(),
                image_url: String::new(),
                points_cost: 200,
                stock: 1,
                active: true,
            },
        )
        .await?;
    command
        .create_item(
            &admin(),
            ItemInput {
                name: "retired".to_string(),
                description: String::new(),
                image_url: String::new(),
                points_cost: 50,
                stock: 0,
                active: false,
            },
        )
        .await?;

    let items = query.active_items().await?;
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, [cheap.as_str(), dear.as_str()]);

    command.delete_item(&admin(), &dear).await?;
    assert_eq!(query.active_items().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_item_input_is_validated() {
    let store = MemoryStore::new();

    let result = Command::new(store)
        .create_item(
            &admin(),
            ItemInput {
                name: String::new(),
                description: String::new(),
                image_url: String::new(),
                points_cost: -5,
                stock: 0,
                active: true,
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Validate(_))));
}
