//! Account queries

use mixtape_core::{error::Result, types::*};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) const ACCOUNT_COLUMNS: &str = "a.id, a.identity, a.nickname, a.created_at";

pub(crate) fn from_row(row: &SqliteRow) -> Result<Account> {
    Ok(Account {
        id: row.try_get("id")?,
        identity: row.try_get("identity")?,
        nickname: row.try_get("nickname")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Create a new account
pub async fn create(pool: &SqlitePool, input: CreateAccount) -> Result<Account> {
    let account = Account::new(input)?;

    sqlx::query("INSERT INTO accounts (id, identity, nickname, created_at) VALUES (?, ?, ?, ?)")
        .bind(&account.id)
        .bind(&account.identity)
        .bind(&account.nickname)
        .bind(account.created_at)
        .execute(pool)
        .await?;

    tracing::info!(account = %account.id, nickname = %account.nickname, "Account created");

    Ok(account)
}

/// Get account by ID
pub async fn get_by_id(pool: &SqlitePool, id: &AccountId) -> Result<Option<Account>> {
    let row = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts a WHERE a.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Get account by external identity reference
pub async fn get_by_identity(pool: &SqlitePool, identity: &str) -> Result<Option<Account>> {
    let row = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts a WHERE a.identity = ?"
    ))
    .bind(identity)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Account for an identity, created on first authentication
pub async fn get_or_create(pool: &SqlitePool, input: CreateAccount) -> Result<Account> {
    if let Some(existing) = get_by_identity(pool, &input.identity).await? {
        return Ok(existing);
    }
    create(pool, input).await
}

/// Get all accounts
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Account>> {
    let rows = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts a ORDER BY a.nickname"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}
