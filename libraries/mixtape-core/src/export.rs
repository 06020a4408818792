//! Snapshot assembly that needs the store (owner names, embedded playlists)

use crate::error::Result;
use crate::library::Library;
use crate::snapshot::{MembershipSnapshot, PlaylistSnapshot};
use crate::store::LibraryStore;
use crate::types::{AccountId, Membership, Playlist, PlaylistId};
use futures_util::TryStreamExt;

/// Snapshot of an already loaded playlist.
///
/// A dangling owner reference is reported as not found rather than silently
/// dropping the owner block.
pub async fn snapshot_of<S: LibraryStore + ?Sized>(
    store: &S,
    playlist: &Playlist,
) -> Result<PlaylistSnapshot> {
    let owner = match &playlist.owner_id {
        Some(owner_id) => Some(store.require_account(owner_id).await?),
        None => None,
    };
    playlist.to_snapshot(owner.as_ref())
}

pub async fn playlist_snapshot<S: LibraryStore + ?Sized>(
    store: &S,
    playlist_id: &PlaylistId,
) -> Result<PlaylistSnapshot> {
    let playlist = store.require_playlist(playlist_id).await?;
    snapshot_of(store, &playlist).await
}

pub async fn membership_snapshot<S: LibraryStore + ?Sized>(
    store: &S,
    membership: &Membership,
) -> Result<MembershipSnapshot> {
    let playlist = playlist_snapshot(store, &membership.playlist_id).await?;
    membership.to_snapshot(playlist)
}

/// Every membership of an account, in display order
pub async fn library_snapshot<S: LibraryStore + ?Sized>(
    store: &S,
    account_id: &AccountId,
) -> Result<Vec<MembershipSnapshot>> {
    let memberships: Vec<Membership> = Library::new(store, account_id.clone())
        .memberships()
        .try_collect()
        .await?;

    let mut snapshots = Vec::with_capacity(memberships.len());
    for membership in &memberships {
        snapshots.push(membership_snapshot(store, membership).await?);
    }
    Ok(snapshots)
}
