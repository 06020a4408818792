//! Membership queries
//!
//! Listings are ordered by `position` with the row id as tie breaker, so a
//! library that holds duplicate positions still lists in a stable order.

use crate::accounts;
use futures_util::stream::{BoxStream, StreamExt};
use mixtape_core::{error::Result, types::*, PositionOrder};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Row, SqlitePool};

const SELECT_FOR_ACCOUNT_ASC: &str = r#"
    SELECT id, account_id, playlist_id, is_owner, position
    FROM memberships
    WHERE account_id = ?
    ORDER BY position ASC, rowid ASC
"#;

const SELECT_FOR_ACCOUNT_DESC: &str = r#"
    SELECT id, account_id, playlist_id, is_owner, position
    FROM memberships
    WHERE account_id = ?
    ORDER BY position DESC, rowid DESC
"#;

const SELECT_FOR_PLAYLIST: &str = r#"
    SELECT id, account_id, playlist_id, is_owner, position
    FROM memberships
    WHERE playlist_id = ?
    ORDER BY rowid ASC
"#;

const SELECT_MEMBERS: &str = r#"
    SELECT a.id, a.identity, a.nickname, a.created_at
    FROM memberships m
    INNER JOIN accounts a ON a.id = m.account_id
    WHERE m.playlist_id = ?
    ORDER BY m.rowid ASC
"#;

pub(crate) fn from_row(row: &SqliteRow) -> Result<Membership> {
    Ok(Membership {
        id: row.try_get("id")?,
        account_id: row.try_get("account_id")?,
        playlist_id: row.try_get("playlist_id")?,
        is_owner: row.try_get::<i64, _>("is_owner")? != 0,
        position: row.try_get("position")?,
    })
}

/// Insert a new membership
pub async fn insert(pool: &SqlitePool, membership: &Membership) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO memberships (id, account_id, playlist_id, is_owner, position)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&membership.id)
    .bind(&membership.account_id)
    .bind(&membership.playlist_id)
    .bind(membership.is_owner)
    .bind(membership.position)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get membership by ID
pub async fn get_by_id(pool: &SqlitePool, id: &MembershipId) -> Result<Option<Membership>> {
    let row = sqlx::query(
        "SELECT id, account_id, playlist_id, is_owner, position FROM memberships WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// The membership linking an account to a playlist
pub async fn find(
    pool: &SqlitePool,
    account_id: &AccountId,
    playlist_id: &PlaylistId,
) -> Result<Option<Membership>> {
    let row = sqlx::query(
        r#"
        SELECT id, account_id, playlist_id, is_owner, position
        FROM memberships
        WHERE account_id = ? AND playlist_id = ?
        "#,
    )
    .bind(account_id)
    .bind(playlist_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Stream an account's memberships by position
pub fn for_account<'a>(
    pool: &'a SqlitePool,
    account_id: &AccountId,
    order: PositionOrder,
) -> BoxStream<'a, Result<Membership>> {
    let sql = match order {
        PositionOrder::Ascending => SELECT_FOR_ACCOUNT_ASC,
        PositionOrder::Descending => SELECT_FOR_ACCOUNT_DESC,
    };

    sqlx::query(sql)
        .bind(account_id.clone())
        .fetch(pool)
        .map(|row| from_row(&row?))
        .boxed()
}

/// Stream every membership referencing a playlist
pub fn for_playlist<'a>(
    pool: &'a SqlitePool,
    playlist_id: &PlaylistId,
) -> BoxStream<'a, Result<Membership>> {
    sqlx::query(SELECT_FOR_PLAYLIST)
        .bind(playlist_id.clone())
        .fetch(pool)
        .map(|row| from_row(&row?))
        .boxed()
}

/// Stream the accounts that hold a playlist
pub fn members<'a>(pool: &'a SqlitePool, playlist_id: &PlaylistId) -> BoxStream<'a, Result<Account>> {
    sqlx::query(SELECT_MEMBERS)
        .bind(playlist_id.clone())
        .fetch(pool)
        .map(|row| accounts::from_row(&row?))
        .boxed()
}

/// Upsert a batch of memberships in one transaction
///
/// Only `is_owner` and `position` of existing rows are rewritten.
pub async fn put_batch(pool: &SqlitePool, batch: &[Membership]) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    upsert_all(&mut tx, batch).await?;
    tx.commit().await?;

    tracing::debug!(rows = batch.len(), "Membership batch committed");

    Ok(())
}

/// An account's memberships in display order, read on an open connection
pub(crate) async fn load_for_account(
    conn: &mut SqliteConnection,
    account_id: &AccountId,
) -> Result<Vec<Membership>> {
    let rows = sqlx::query(SELECT_FOR_ACCOUNT_ASC)
        .bind(account_id)
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(from_row).collect()
}

pub(crate) async fn upsert_all(conn: &mut SqliteConnection, batch: &[Membership]) -> Result<()> {
    for membership in batch {
        sqlx::query(
            r#"
            INSERT INTO memberships (id, account_id, playlist_id, is_owner, position)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                is_owner = excluded.is_owner,
                position = excluded.position
            "#,
        )
        .bind(&membership.id)
        .bind(&membership.account_id)
        .bind(&membership.playlist_id)
        .bind(membership.is_owner)
        .bind(membership.position)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Delete a membership
pub async fn delete(pool: &SqlitePool, id: &MembershipId) -> Result<()> {
    let result = sqlx::query("DELETE FROM memberships WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(mixtape_core::MixtapeError::not_found(
            "Membership",
            id.as_str(),
        ));
    }

    Ok(())
}
