use serde::{Deserialize, Serialize};
use temp_dir::TempDir;

use clanhall_db::{
    Direction, Document, DocumentStore, DocumentStoreExt, Filter, Query, ReadGuard, SqliteStore,
    UpdateSpec, Write, run_transaction,
};
use clanhall_shared::Error;

#[derive(Serialize, Deserialize, Clone)]
struct Wallet {
    owner: String,
    balance: i64,
}

impl Document for Wallet {
    const COLLECTION: &'static str = "wallets";
}

async fn setup_store(dir: &TempDir) -> anyhow::Result<SqliteStore> {
    let path = dir.child("db.sqlite3");
    let url = format!("sqlite:{}", path.to_str().unwrap());

    Ok(SqliteStore::connect(&url, 2).await?)
}

#[tokio::test]
async fn test_crud_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(&dir).await?;

    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 100,
            },
        )
        .await?;

    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 100);

    store
        .update_doc::<Wallet>("w1", UpdateSpec::new().increment("balance", -25))
        .await?;
    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 75);

    store.delete_doc::<Wallet>("w1").await?;
    assert!(store.get_doc::<Wallet>("w1").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_versions_bump_on_every_write() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(&dir).await?;

    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 0,
            },
        )
        .await?;
    let (_, v1) = store.get_versioned(Wallet::COLLECTION, "w1").await?;

    store
        .update_doc::<Wallet>("w1", UpdateSpec::new().increment("balance", 1))
        .await?;
    let (_, v2) = store.get_versioned(Wallet::COLLECTION, "w1").await?;

    assert_eq!(v1, 1);
    assert_eq!(v2, 2);

    Ok(())
}

#[tokio::test]
async fn test_stale_commit_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(&dir).await?;

    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 0,
            },
        )
        .await?;
    let (_, version) = store.get_versioned(Wallet::COLLECTION, "w1").await?;

    store
        .update_doc::<Wallet>("w1", UpdateSpec::new().increment("balance", 1))
        .await?;

    let reads = vec![ReadGuard {
        collection: Wallet::COLLECTION.to_string(),
        id: "w1".to_string(),
        version,
    }];
    let writes = vec![Write::update::<Wallet>(
        "w1",
        UpdateSpec::new().increment("balance", 100),
    )];
    assert!(matches!(
        store.commit(reads, writes).await,
        Err(Error::Conflict)
    ));

    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 1);

    Ok(())
}

#[tokio::test]
async fn test_batch_rolls_back_on_failure() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(&dir).await?;

    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 0,
            },
        )
        .await?;

    let writes = vec![
        Write::update::<Wallet>("w1", UpdateSpec::new().increment("balance", 10)),
        Write::update::<Wallet>("ghost", UpdateSpec::new().increment("balance", 10)),
    ];
    assert!(store.batch(writes).await.is_err());

    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 0);

    Ok(())
}

#[tokio::test]
async fn test_query_filters_and_orders() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(&dir).await?;

    for (owner, balance) in [("a", 10), ("b", 40), ("c", 25)] {
        store
            .add_doc(&Wallet {
                owner: owner.to_string(),
                balance,
            })
            .await?;
    }

    let wallets = store
        .find::<Wallet>(
            &Query::new()
                .filter(Filter::gt("balance", 10))
                .order_by("balance", Direction::Descending),
        )
        .await?;
    let owners: Vec<&str> = wallets.iter().map(|w| w.data.owner.as_str()).collect();
    assert_eq!(owners, ["b", "c"]);

    Ok(())
}

#[tokio::test]
async fn test_transaction_runs_against_sqlite() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(&dir).await?;

    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 100,
            },
        )
        .await?;

    run_transaction(&store, async |txn| {
        let wallet = txn
            .get::<Wallet>("w1")
            .await?
            .ok_or(Error::NotFound("wallet"))?;
        txn.update::<Wallet>(
            "w1",
            UpdateSpec::new().increment("balance", -wallet.data.balance),
        );

        Ok(())
    })
    .await?;

    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 0);

    Ok(())
}
