//! An account's ordered playlist library
//!
//! Every write here reads the account's full membership list once, plans the
//! new positions in memory and commits them with a single
//! [`LibraryStore::put_memberships`] call. There is no re-read between
//! planning and commit, so two concurrent writers on the same account can
//! lose an update; different accounts never interfere.

use crate::error::{MixtapeError, Result};
use crate::ordering::{plan_reindex, plan_reorder};
use crate::store::{LibraryStore, PositionOrder};
use crate::types::{AccountId, Membership, PlaylistId};
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use tracing::debug;

/// Position reported by [`Library::last_position`] for an empty library
pub const NO_POSITION: i64 = -1;

/// Ordering operations over one account's memberships
pub struct Library<'s, S: LibraryStore + ?Sized> {
    store: &'s S,
    account_id: AccountId,
}

impl<'s, S: LibraryStore + ?Sized> Library<'s, S> {
    pub fn new(store: &'s S, account_id: AccountId) -> Self {
        Self { store, account_id }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Memberships in display order, fetched lazily
    pub fn memberships(&self) -> BoxStream<'s, Result<Membership>> {
        self.store
            .account_memberships(&self.account_id, PositionOrder::Ascending)
    }

    async fn load(&self) -> Result<Vec<Membership>> {
        self.memberships().try_collect().await
    }

    pub async fn membership_for(&self, playlist_id: &PlaylistId) -> Result<Option<Membership>> {
        self.store.find_membership(&self.account_id, playlist_id).await
    }

    pub async fn has_membership(&self, playlist_id: &PlaylistId) -> Result<bool> {
        Ok(self.membership_for(playlist_id).await?.is_some())
    }

    /// Highest position in the library, or [`NO_POSITION`] when empty
    pub async fn last_position(&self) -> Result<i64> {
        let mut newest_first = self
            .store
            .account_memberships(&self.account_id, PositionOrder::Descending);

        Ok(newest_first
            .try_next()
            .await?
            .map_or(NO_POSITION, |m| m.position))
    }

    /// Rewrite positions as `0..n` in current order.
    ///
    /// Returns how many memberships moved; calling it again right away
    /// returns 0.
    pub async fn reindex(&self) -> Result<usize> {
        let current = self.load().await?;
        let plan = plan_reindex(&current);

        debug!(
            account = %self.account_id,
            total = current.len(),
            changed = plan.len(),
            "Reindexing library"
        );

        self.store.put_memberships(&plan).await?;
        Ok(plan.len())
    }

    /// Move `membership` to `new_position`, shifting the neighbours between
    /// its stored position and the target.
    ///
    /// The stored position is used, not the one carried by `membership`.
    /// Targets past the end are not clamped and leave a gap that
    /// [`Library::reindex`] closes; clamp to `0..=last_position()` first to
    /// avoid it. Returns the memberships that were written.
    pub async fn reorder(
        &self,
        membership: &Membership,
        new_position: i64,
    ) -> Result<Vec<Membership>> {
        if !membership.belongs_to(&self.account_id) {
            return Err(MixtapeError::precondition(format!(
                "membership {} belongs to account {}, not {}",
                membership.id, membership.account_id, self.account_id
            )));
        }

        let current = self.load().await?;
        let plan = plan_reorder(&current, &membership.id, new_position)?;
        if plan.is_empty() {
            return Ok(plan);
        }

        debug!(
            account = %self.account_id,
            membership = %membership.id,
            new_position,
            shifted = plan.len() - 1,
            "Reordering library"
        );

        self.store.put_memberships(&plan).await?;
        Ok(plan)
    }

    /// Append a playlist to the end of the library
    pub async fn add(&self, playlist_id: &PlaylistId, is_owner: bool) -> Result<Membership> {
        self.store.require_account(&self.account_id).await?;
        self.store.require_playlist(playlist_id).await?;

        if self.has_membership(playlist_id).await? {
            return Err(MixtapeError::duplicate(format!(
                "account {} already has playlist {}",
                self.account_id, playlist_id
            )));
        }

        let position = self.last_position().await? + 1;
        let membership = Membership::new(
            self.account_id.clone(),
            playlist_id.clone(),
            is_owner,
            position,
        );
        self.store.insert_membership(&membership).await?;

        Ok(membership)
    }

    /// Drop a playlist from the library and close the gap it leaves
    pub async fn remove(&self, playlist_id: &PlaylistId) -> Result<Membership> {
        let membership = self
            .membership_for(playlist_id)
            .await?
            .ok_or_else(|| {
                MixtapeError::not_found(
                    "Membership",
                    format!("{}/{}", self.account_id, playlist_id),
                )
            })?;

        self.store.delete_membership(&membership.id).await?;
        self.reindex().await?;

        Ok(membership)
    }
}
