//! Playlist queries

use crate::memberships;
use mixtape_core::ordering::plan_reindex;
use mixtape_core::{error::Result, types::*, MixtapeError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const PLAYLIST_COLUMNS: &str = r#"
    id, name, created_at, collaborative, tracks, smart, share_hash, version, owner_id,
    genres, artist, tags, uploaded_from, uploaded_to, bpm_from, bpm_to,
    search_term, user_favorites, sort_order, duration_from, duration_to
"#;

fn from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        collaborative: row.try_get::<i64, _>("collaborative")? != 0,
        tracks: row.try_get("tracks")?,
        smart: row.try_get::<i64, _>("smart")? != 0,
        version: row.try_get("version")?,
        share_hash: row.try_get("share_hash")?,
        owner_id: row.try_get("owner_id")?,
        filter: SmartFilter {
            genres: row.try_get("genres")?,
            artist: row.try_get("artist")?,
            tags: row.try_get("tags")?,
            uploaded_from: row.try_get("uploaded_from")?,
            uploaded_to: row.try_get("uploaded_to")?,
            bpm_from: row.try_get("bpm_from")?,
            bpm_to: row.try_get("bpm_to")?,
            search_term: row.try_get("search_term")?,
            user_favorites: row.try_get("user_favorites")?,
            order: row.try_get("sort_order")?,
            duration_from: row.try_get("duration_from")?,
            duration_to: row.try_get("duration_to")?,
        },
    })
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Get playlist by its share hash
pub async fn get_by_share_hash(pool: &SqlitePool, share_hash: &str) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE share_hash = ?"
    ))
    .bind(share_hash)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Create a new playlist
///
/// When the playlist has an owner, the owning membership is appended to the
/// owner's library in the same transaction.
pub async fn create(
    pool: &SqlitePool,
    input: CreatePlaylist,
) -> Result<(Playlist, Option<Membership>)> {
    let playlist = Playlist::new(input)?;
    let filter = &playlist.filter;

    let mut tx = pool.begin().await?;

    if let Some(owner_id) = &playlist.owner_id {
        let owner_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = ?)")
                .bind(owner_id)
                .fetch_one(&mut *tx)
                .await?;
        if !owner_exists {
            return Err(MixtapeError::not_found("Account", owner_id.as_str()));
        }
    }

    sqlx::query(
        r#"
        INSERT INTO playlists (
            id, name, created_at, collaborative, tracks, smart, share_hash, version, owner_id,
            genres, artist, tags, uploaded_from, uploaded_to, bpm_from, bpm_to,
            search_term, user_favorites, sort_order, duration_from, duration_to
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&playlist.id)
    .bind(&playlist.name)
    .bind(playlist.created_at)
    .bind(playlist.collaborative)
    .bind(&playlist.tracks)
    .bind(playlist.smart)
    .bind(&playlist.share_hash)
    .bind(playlist.version)
    .bind(&playlist.owner_id)
    .bind(&filter.genres)
    .bind(&filter.artist)
    .bind(&filter.tags)
    .bind(filter.uploaded_from)
    .bind(filter.uploaded_to)
    .bind(filter.bpm_from)
    .bind(filter.bpm_to)
    .bind(&filter.search_term)
    .bind(&filter.user_favorites)
    .bind(&filter.order)
    .bind(filter.duration_from)
    .bind(filter.duration_to)
    .execute(&mut *tx)
    .await?;

    let membership = match &playlist.owner_id {
        Some(owner_id) => {
            let last: i64 = sqlx::query_scalar(
                "SELECT COALESCE(MAX(position), -1) FROM memberships WHERE account_id = ?",
            )
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

            let membership =
                Membership::new(owner_id.clone(), playlist.id.clone(), true, last + 1);
            sqlx::query(
                r#"
                INSERT INTO memberships (id, account_id, playlist_id, is_owner, position)
                VALUES (?, ?, ?, 1, ?)
                "#,
            )
            .bind(&membership.id)
            .bind(&membership.account_id)
            .bind(&membership.playlist_id)
            .bind(membership.position)
            .execute(&mut *tx)
            .await?;

            Some(membership)
        }
        None => None,
    };

    tx.commit().await?;

    tracing::info!(playlist = %playlist.id, smart = playlist.smart, "Playlist created");

    Ok((playlist, membership))
}

/// Replace the track token and bump the version
pub async fn replace_tracks(
    pool: &SqlitePool,
    id: &PlaylistId,
    tracks: &str,
) -> Result<Playlist> {
    let result =
        sqlx::query("UPDATE playlists SET tracks = ?, version = version + 1 WHERE id = ?")
            .bind(tracks)
            .bind(id)
            .execute(pool)
            .await?;

    require_updated(result.rows_affected(), id)?;
    require(pool, id).await
}

/// Toggle whether non-owner members may edit the playlist
pub async fn set_collaborative(
    pool: &SqlitePool,
    id: &PlaylistId,
    collaborative: bool,
) -> Result<Playlist> {
    let result = sqlx::query("UPDATE playlists SET collaborative = ? WHERE id = ?")
        .bind(collaborative)
        .bind(id)
        .execute(pool)
        .await?;

    require_updated(result.rows_affected(), id)?;
    require(pool, id).await
}

/// Replace the smart flag and criteria
pub async fn update_smart_filter(
    pool: &SqlitePool,
    id: &PlaylistId,
    smart: bool,
    filter: &SmartFilter,
) -> Result<Playlist> {
    let result = sqlx::query(
        r#"
        UPDATE playlists SET
            smart = ?, genres = ?, artist = ?, tags = ?, uploaded_from = ?, uploaded_to = ?,
            bpm_from = ?, bpm_to = ?, search_term = ?, user_favorites = ?, sort_order = ?,
            duration_from = ?, duration_to = ?
        WHERE id = ?
        "#,
    )
    .bind(smart)
    .bind(&filter.genres)
    .bind(&filter.artist)
    .bind(&filter.tags)
    .bind(filter.uploaded_from)
    .bind(filter.uploaded_to)
    .bind(filter.bpm_from)
    .bind(filter.bpm_to)
    .bind(&filter.search_term)
    .bind(&filter.user_favorites)
    .bind(&filter.order)
    .bind(filter.duration_from)
    .bind(filter.duration_to)
    .bind(id)
    .execute(pool)
    .await?;

    require_updated(result.rows_affected(), id)?;
    require(pool, id).await
}

/// Delete playlist
///
/// Memberships go with it (foreign key cascade) and every account that held
/// the playlist gets its library compacted, all in one transaction.
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let holders: Vec<AccountId> =
        sqlx::query_scalar("SELECT account_id FROM memberships WHERE playlist_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    require_updated(result.rows_affected(), id)?;

    for account_id in &holders {
        let remaining = memberships::load_for_account(&mut tx, account_id).await?;
        let plan = plan_reindex(&remaining);
        memberships::upsert_all(&mut tx, &plan).await?;
    }

    tx.commit().await?;

    tracing::info!(playlist = %id, holders = holders.len(), "Playlist deleted");

    Ok(())
}

async fn require(pool: &SqlitePool, id: &PlaylistId) -> Result<Playlist> {
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id.as_str()))
}

fn require_updated(rows: u64, id: &PlaylistId) -> Result<()> {
    if rows == 0 {
        return Err(MixtapeError::not_found("Playlist", id.as_str()));
    }
    Ok(())
}
