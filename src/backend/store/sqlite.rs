/**
 * SQLite Store
 *
 * sqlx-backed implementation of `ListStore` and `PrincipalDirectory`.
 * Each list is one row; its members and items are stored as JSON arrays
 * so a whole list is read and written in a single statement.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::User;
use crate::backend::store::{
    ListPredicate, ListStore, PrincipalDirectory, StoreError, StoreResult,
};
use crate::shared::{ItemSet, Principal, ShoppingList};

const LIST_COLUMNS: &str =
    "uid, name, owner, members, archived, items, version, created_at, updated_at";

/// Raw `shopping_lists` row
#[derive(Debug, sqlx::FromRow)]
struct ListRow {
    uid: String,
    name: String,
    owner: Option<String>,
    members: String,
    archived: bool,
    items: String,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListRow> for ShoppingList {
    type Error = StoreError;

    fn try_from(row: ListRow) -> Result<Self, Self::Error> {
        let members: Vec<Principal> = serde_json::from_str(&row.members)
            .map_err(|e| StoreError::Corrupt(format!("members of {}: {}", row.name, e)))?;
        let items: ItemSet = serde_json::from_str(&row.items)
            .map_err(|e| StoreError::Corrupt(format!("items of {}: {}", row.name, e)))?;
        let id = Uuid::parse_str(&row.uid)
            .map_err(|e| StoreError::Corrupt(format!("id of {}: {}", row.name, e)))?;
        let version = u64::try_from(row.version)
            .map_err(|_| StoreError::Corrupt(format!("negative version on {}", row.name)))?;

        Ok(ShoppingList {
            name: row.name,
            owner: row.owner.map(Principal::new),
            members,
            archived: row.archived,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
            id,
            version,
        })
    }
}

fn encode_json<T: serde::Serialize>(value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |db| db.is_unique_violation())
}

fn version_param(version: u64) -> StoreResult<i64> {
    i64::try_from(version).map_err(|_| StoreError::Corrupt(format!("version overflow: {version}")))
}

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and run migrations
    ///
    /// `sqlite::memory:` is held on a single, never-recycled connection so
    /// the database lives as long as the store.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and run migrations on it
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ListStore for SqliteStore {
    async fn get(&self, name: &str) -> StoreResult<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShoppingList::try_from).transpose()
    }

    async fn insert(&self, list: &ShoppingList) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO shopping_lists (uid, name, owner, members, archived, items, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(list.id.to_string())
        .bind(&list.name)
        .bind(list.owner.as_ref().map(Principal::as_str))
        .bind(encode_json(&list.members)?)
        .bind(list.archived)
        .bind(encode_json(&list.items)?)
        .bind(version_param(list.version)?)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn put(&self, original_name: &str, list: &ShoppingList) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE shopping_lists
            SET name = ?, owner = ?, members = ?, archived = ?, items = ?,
                updated_at = ?, version = version + 1
            WHERE name = ? AND uid = ? AND version = ?
            "#,
        )
        .bind(&list.name)
        .bind(list.owner.as_ref().map(Principal::as_str))
        .bind(encode_json(&list.members)?)
        .bind(list.archived)
        .bind(encode_json(&list.items)?)
        .bind(list.updated_at)
        .bind(original_name)
        .bind(list.id.to_string())
        .bind(version_param(list.version)?)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => Ok(list.version + 1),
            Ok(_) => Err(StoreError::VersionConflict(original_name.to_string())),
            Err(err) if is_unique_violation(&err) => Err(StoreError::NameTaken(list.name.clone())),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, list: &ShoppingList) -> StoreResult<()> {
        let result =
            sqlx::query("DELETE FROM shopping_lists WHERE name = ? AND uid = ? AND version = ?")
                .bind(&list.name)
                .bind(list.id.to_string())
                .bind(version_param(list.version)?)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(StoreError::VersionConflict(list.name.clone()))
        }
    }

    async fn find_by(&self, predicate: ListPredicate<'_>) -> StoreResult<Vec<ShoppingList>> {
        let rows = sqlx::query_as::<_, ListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut lists = Vec::new();
        for row in rows {
            let list = ShoppingList::try_from(row)?;
            if predicate(&list) {
                lists.push(list);
            }
        }
        Ok(lists)
    }
}

#[async_trait]
impl PrincipalDirectory for SqliteStore {
    async fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_session(&self, session: &Session) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token, username, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.username)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, username, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete_session(&self, token: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
