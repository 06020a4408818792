//! Playlist-side view of memberships

use crate::error::{MixtapeError, Result};
use crate::identity::Identity;
use crate::store::LibraryStore;
use crate::types::{Account, AccountId, Membership, PlaylistId};
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;

/// The membership linking `account_id` to the playlist, if any
pub async fn membership_for<S: LibraryStore + ?Sized>(
    store: &S,
    playlist_id: &PlaylistId,
    account_id: &AccountId,
) -> Result<Option<Membership>> {
    store.find_membership(account_id, playlist_id).await
}

/// The calling user's membership for the playlist.
///
/// Fails with a precondition error when nobody is authenticated.
pub async fn membership_for_current<S, I>(
    store: &S,
    identity: &I,
    playlist_id: &PlaylistId,
) -> Result<Option<Membership>>
where
    S: LibraryStore + ?Sized,
    I: Identity + ?Sized,
{
    let account_id = identity
        .current_account_id()
        .ok_or_else(|| MixtapeError::precondition("no authenticated account"))?;

    membership_for(store, playlist_id, &account_id).await
}

/// Whether at least one account has the playlist in its library
pub async fn has_any_member<S: LibraryStore + ?Sized>(
    store: &S,
    playlist_id: &PlaylistId,
) -> Result<bool> {
    let mut memberships = store.playlist_memberships(playlist_id);
    Ok(memberships.try_next().await?.is_some())
}

/// Accounts that have the playlist in their library, fetched lazily
pub fn members<'a, S: LibraryStore + ?Sized>(
    store: &'a S,
    playlist_id: &PlaylistId,
) -> BoxStream<'a, Result<Account>> {
    store.playlist_members(playlist_id)
}
