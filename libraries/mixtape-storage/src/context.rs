use crate::{accounts, memberships, playlists};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use mixtape_core::{error::Result, types::*, LibraryStore, PositionOrder};
use sqlx::SqlitePool;

/// `LibraryStore` backed by `SQLite`
#[derive(Clone)]
pub struct SqliteLibraryStore {
    pool: SqlitePool,
}

impl SqliteLibraryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LibraryStore for SqliteLibraryStore {
    // Lookups
    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>> {
        accounts::get_by_id(&self.pool, id).await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn get_membership(&self, id: &MembershipId) -> Result<Option<Membership>> {
        memberships::get_by_id(&self.pool, id).await
    }

    async fn find_membership(
        &self,
        account_id: &AccountId,
        playlist_id: &PlaylistId,
    ) -> Result<Option<Membership>> {
        memberships::find(&self.pool, account_id, playlist_id).await
    }

    // Streams
    fn account_memberships<'a>(
        &'a self,
        account_id: &AccountId,
        order: PositionOrder,
    ) -> BoxStream<'a, Result<Membership>> {
        memberships::for_account(&self.pool, account_id, order)
    }

    fn playlist_memberships<'a>(
        &'a self,
        playlist_id: &PlaylistId,
    ) -> BoxStream<'a, Result<Membership>> {
        memberships::for_playlist(&self.pool, playlist_id)
    }

    fn playlist_members<'a>(&'a self, playlist_id: &PlaylistId) -> BoxStream<'a, Result<Account>> {
        memberships::members(&self.pool, playlist_id)
    }

    // Writes
    async fn insert_membership(&self, membership: &Membership) -> Result<()> {
        memberships::insert(&self.pool, membership).await
    }

    async fn delete_membership(&self, id: &MembershipId) -> Result<()> {
        memberships::delete(&self.pool, id).await
    }

    async fn put_memberships(&self, batch: &[Membership]) -> Result<()> {
        memberships::put_batch(&self.pool, batch).await
    }
}
