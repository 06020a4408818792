//! Persistence interface consumed by the library operations

use crate::error::Result;
use crate::types::{Account, AccountId, Membership, MembershipId, Playlist, PlaylistId};
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Direction for an account's membership listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOrder {
    Ascending,
    Descending,
}

/// Storage backing accounts, playlists and memberships
///
/// Streams are lazy and finite; calling the method again re-runs the query.
/// Ties on `position` are broken by insertion order in both directions.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    // ========================================================================
    // Lookups
    // ========================================================================

    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>>;

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    async fn get_membership(&self, id: &MembershipId) -> Result<Option<Membership>>;

    /// The membership linking `account_id` to `playlist_id`, if any
    async fn find_membership(
        &self,
        account_id: &AccountId,
        playlist_id: &PlaylistId,
    ) -> Result<Option<Membership>>;

    // ========================================================================
    // Streams
    // ========================================================================

    /// An account's memberships ordered by position
    fn account_memberships<'a>(
        &'a self,
        account_id: &AccountId,
        order: PositionOrder,
    ) -> BoxStream<'a, Result<Membership>>;

    /// Every membership that references a playlist
    fn playlist_memberships<'a>(
        &'a self,
        playlist_id: &PlaylistId,
    ) -> BoxStream<'a, Result<Membership>>;

    /// Accounts holding a membership for a playlist
    fn playlist_members<'a>(&'a self, playlist_id: &PlaylistId) -> BoxStream<'a, Result<Account>>;

    // ========================================================================
    // Writes
    // ========================================================================

    async fn insert_membership(&self, membership: &Membership) -> Result<()>;

    async fn delete_membership(&self, id: &MembershipId) -> Result<()>;

    /// Upsert every membership in one atomic batch
    ///
    /// Either all rows are written or none are.
    async fn put_memberships(&self, batch: &[Membership]) -> Result<()>;

    // ========================================================================
    // Convenience
    // ========================================================================

    async fn require_account(&self, id: &AccountId) -> Result<Account> {
        self.get_account(id)
            .await?
            .ok_or_else(|| crate::MixtapeError::not_found("Account", id.as_str()))
    }

    async fn require_playlist(&self, id: &PlaylistId) -> Result<Playlist> {
        self.get_playlist(id)
            .await?
            .ok_or_else(|| crate::MixtapeError::not_found("Playlist", id.as_str()))
    }
}
