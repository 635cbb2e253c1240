use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use clanhall_db::{
    Document, DocumentStore, DocumentStoreExt, MemoryStore, Query, RawDocument, ReadGuard,
    UpdateSpec, Write, run_transaction,
};
use clanhall_shared::{Error, Result};

#[derive(Serialize, Deserialize, Clone)]
struct Wallet {
    owner: String,
    balance: i64,
}

impl Document for Wallet {
    const COLLECTION: &'static str = "wallets";
}

/// Delegates to a MemoryStore but fails the first N commits with a
/// conflict, to exercise the retry loop.
struct FlakyStore {
    inner: MemoryStore,
    conflicts_left: AtomicU32,
}

impl FlakyStore {
    fn new(inner: MemoryStore, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_left: AtomicU32::new(conflicts),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>> {
        self.inner.get(collection, id).await
    }

    async fn get_versioned(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<(Option<RawDocument>, i64)> {
        self.inner.get_versioned(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<RawDocument>> {
        self.inner.query(collection, query).await
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        self.inner.add(collection, fields).await
    }

    async fn create(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.inner.create(collection, id, fields).await
    }

    async fn update(&self, collection: &str, id: &str, spec: UpdateSpec) -> Result<()> {
        self.inner.update(collection, id, spec).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.inner.delete(collection, id).await
    }

    async fn batch(&self, writes: Vec<Write>) -> Result<()> {
        self.inner.batch(writes).await
    }

    async fn commit(&self, reads: Vec<ReadGuard>, writes: Vec<Write>) -> Result<()> {
        let left = self.conflicts_left.load(Ordering::SeqCst);
        if left > 0 {
            self.conflicts_left.store(left - 1, Ordering::SeqCst);
            return Err(Error::Conflict);
        }

        self.inner.commit(reads, writes).await
    }
}

#[tokio::test]
async fn test_transaction_commits_staged_writes() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 100,
            },
        )
        .await?;

    let debited = run_transaction(&store, async |txn| {
        let wallet = txn.get::<Wallet>("w1").await?.ok_or(Error::NotFound("wallet"))?;
        txn.update::<Wallet>("w1", UpdateSpec::new().increment("balance", -40));

        Ok(wallet.data.balance - 40)
    })
    .await?;
    assert_eq!(debited, 60);

    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 60);

    Ok(())
}

#[tokio::test]
async fn test_transaction_retries_on_conflict() -> anyhow::Result<()> {
    let store = FlakyStore::new(MemoryStore::new(), 2);
    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 10,
            },
        )
        .await?;

    let mut attempts = 0u32;
    run_transaction(&store, async |txn| {
        attempts += 1;
        txn.get::<Wallet>("w1").await?;
        txn.update::<Wallet>("w1", UpdateSpec::new().increment("balance", 1));

        Ok(())
    })
    .await?;

    // two conflicted commits plus the one that landed
    assert_eq!(attempts, 3);
    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 11);

    Ok(())
}

#[tokio::test]
async fn test_transaction_surfaces_conflict_when_retries_exhaust() -> anyhow::Result<()> {
    let store = FlakyStore::new(MemoryStore::new(), u32::MAX);
    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 10,
            },
        )
        .await?;

    let result = run_transaction(&store, async |txn| {
        txn.get::<Wallet>("w1").await?;
        txn.update::<Wallet>("w1", UpdateSpec::new().increment("balance", 1));

        Ok(())
    })
    .await;
    assert!(matches!(result, Err(Error::Conflict)));

    Ok(())
}

#[tokio::test]
async fn test_business_failure_aborts_without_writes() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store
        .create_doc(
            "w1",
            &Wallet {
                owner: "a".to_string(),
                balance: 10,
            },
        )
        .await?;

    let result: Result<()> = run_transaction(&store, async |txn| {
        txn.update::<Wallet>("w1", UpdateSpec::new().increment("balance", -100));

        Err(Error::InsufficientPoints {
            required: 100,
            balance: 10,
        })
    })
    .await;
    assert!(matches!(result, Err(Error::InsufficientPoints { .. })));

    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.balance, 10);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_create_of_same_id_conflicts() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let result = run_transaction(&store, async |txn| {
        if txn.get::<Wallet>("w1").await?.is_some() {
            return Err(Error::AlreadyExists("wallet"));
        }

        // a rival lands the same document between our read and commit
        store
            .create_doc(
                "w1",
                &Wallet {
                    owner: "rival".to_string(),
                    balance: 0,
                },
            )
            .await?;

        txn.create(
            "w1",
            &Wallet {
                owner: "me".to_string(),
                balance: 0,
            },
        )?;

        Ok(())
    })
    .await;

    // every retry re-reads the now-existing document and reports it taken
    assert!(matches!(result, Err(Error::AlreadyExists(_))));
    let wallet = store.get_doc::<Wallet>("w1").await?.expect("wallet");
    assert_eq!(wallet.data.owner, "rival");

    Ok(())
}
