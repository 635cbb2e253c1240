use std::str::FromStr;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use ulid::Ulid;

use crate::{DocumentStore, Query, RawDocument, ReadGuard, UpdateSpec, Write};
use clanhall_shared::{Error, Result};

/// WAL mode plus the pragmas that keep SQLITE_BUSY rare under concurrent
/// readers.
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;
    sqlx::query("PRAGMA synchronous = NORMAL").execute(pool).await?;
    sqlx::query("PRAGMA temp_store = memory").execute(pool).await?;

    Ok(())
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::info!(max_connections, "created sqlite pool");

    Ok(pool)
}

/// SQLite backend: one `documents` table keyed by (collection, id), JSON
/// body, and a version column bumped on every write for optimistic commit
/// validation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = create_pool(database_url, max_connections).await?;
        let store = Self::new(pool);
        store.migrate().await?;

        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (collection, id)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn parse_body(id: &str, body: &str) -> Result<RawDocument> {
    let fields: Map<String, Value> = serde_json::from_str(body)?;

    Ok(RawDocument {
        id: id.to_string(),
        fields,
    })
}

fn encode_body(fields: &Map<String, Value>) -> Result<String> {
    Ok(serde_json::to_string(fields)?)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(body,)| parse_body(id, &body)).transpose()
    }

    async fn get_versioned(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<(Option<RawDocument>, i64)> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT body, version FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((body, version)) => Ok((Some(parse_body(id, &body)?), version)),
            None => Ok((None, 0)),
        }
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<RawDocument>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, body FROM documents WHERE collection = ?")
                .bind(collection)
                .fetch_all(&self.pool)
                .await?;

        let docs = rows
            .into_iter()
            .map(|(id, body)| parse_body(&id, &body))
            .collect::<Result<Vec<_>>>()?;

        Ok(query.apply(docs))
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        let id = Ulid::new().to_string();
        self.create(collection, &id, fields).await?;

        Ok(id)
    }

    async fn create(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        let write = Write::Create {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        };

        match self.commit(Vec::new(), vec![write]).await {
            Err(Error::Conflict) => Err(Error::AlreadyExists("document")),
            other => other,
        }
    }

    async fn update(&self, collection: &str, id: &str, spec: UpdateSpec) -> Result<()> {
        let write = Write::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            spec,
        };

        self.commit(Vec::new(), vec![write]).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let write = Write::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        self.commit(Vec::new(), vec![write]).await
    }

    async fn batch(&self, writes: Vec<Write>) -> Result<()> {
        self.commit(Vec::new(), writes).await
    }

    async fn commit(&self, reads: Vec<ReadGuard>, writes: Vec<Write>) -> Result<()> {
        // dropping the sqlx transaction on any early return rolls it back
        let mut tx = self.pool.begin().await?;

        for read in &reads {
            let row: Option<(i64,)> =
                sqlx::query_as("SELECT version FROM documents WHERE collection = ? AND id = ?")
                    .bind(&read.collection)
                    .bind(&read.id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let current = row.map(|(version,)| version).unwrap_or(0);
            if current != read.version {
                return Err(Error::Conflict);
            }
        }

        for write in &writes {
            match write {
                Write::Create {
                    collection,
                    id,
                    fields,
                } => {
                    let exists: Option<(i64,)> = sqlx::query_as(
                        "SELECT version FROM documents WHERE collection = ? AND id = ?",
                    )
                    .bind(collection)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
                    if exists.is_some() {
                        return Err(Error::Conflict);
                    }

                    sqlx::query(
                        "INSERT INTO documents (collection, id, body, version) VALUES (?, ?, ?, 1)",
                    )
                    .bind(collection)
                    .bind(id)
                    .bind(encode_body(fields)?)
                    .execute(&mut *tx)
                    .await?;
                }
                Write::Update {
                    collection,
                    id,
                    spec,
                } => {
                    let row: Option<(String,)> =
                        sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                            .bind(collection)
                            .bind(id)
                            .fetch_optional(&mut *tx)
                            .await?;
                    let Some((body,)) = row else {
                        return Err(Error::NotFound("document"));
                    };

                    let mut doc = parse_body(id, &body)?;
                    spec.apply(&mut doc.fields);

                    sqlx::query(
                        "UPDATE documents SET body = ?, version = version + 1
                         WHERE collection = ? AND id = ?",
                    )
                    .bind(encode_body(&doc.fields)?)
                    .bind(collection)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                }
                Write::Delete { collection, id } => {
                    sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
                        .bind(collection)
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;

        Ok(())
    }
}
