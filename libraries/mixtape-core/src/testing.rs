//! In-memory store for unit tests

use crate::error::Result;
use crate::store::{LibraryStore, PositionOrder};
use crate::types::{
    Account, AccountId, CreateAccount, CreatePlaylist, Membership, MembershipId, Playlist,
    PlaylistId,
};
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    playlists: Vec<Playlist>,
    // insertion order doubles as the tie breaker
    memberships: Vec<Membership>,
    batches: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn add_account(&self, nickname: &str) -> Account {
        let account =
            Account::new(CreateAccount::new(format!("identity:{nickname}"), nickname)).unwrap();
        self.state.lock().unwrap().accounts.push(account.clone());
        account
    }

    pub fn add_playlist(&self, share_hash: &str, owner_id: Option<AccountId>) -> Playlist {
        let playlist = Playlist::new(CreatePlaylist::new(share_hash, owner_id)).unwrap();
        self.state.lock().unwrap().playlists.push(playlist.clone());
        playlist
    }

    pub fn membership(&self, id: &MembershipId) -> Option<Membership> {
        let state = self.state.lock().unwrap();
        state.memberships.iter().find(|m| &m.id == id).cloned()
    }

    pub fn set_position(&self, id: &MembershipId, position: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(m) = state.memberships.iter_mut().find(|m| &m.id == id) {
            m.position = position;
        }
    }

    pub fn batch_count(&self) -> usize {
        self.state.lock().unwrap().batches
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.iter().find(|a| &a.id == id).cloned())
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        let state = self.state.lock().unwrap();
        Ok(state.playlists.iter().find(|p| &p.id == id).cloned())
    }

    async fn get_membership(&self, id: &MembershipId) -> Result<Option<Membership>> {
        Ok(self.membership(id))
    }

    async fn find_membership(
        &self,
        account_id: &AccountId,
        playlist_id: &PlaylistId,
    ) -> Result<Option<Membership>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .memberships
            .iter()
            .find(|m| &m.account_id == account_id && &m.playlist_id == playlist_id)
            .cloned())
    }

    fn account_memberships<'a>(
        &'a self,
        account_id: &AccountId,
        order: PositionOrder,
    ) -> BoxStream<'a, Result<Membership>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Membership> = state
            .memberships
            .iter()
            .filter(|m| &m.account_id == account_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.position);
        if order == PositionOrder::Descending {
            rows.reverse();
        }
        stream::iter(rows.into_iter().map(Ok)).boxed()
    }

    fn playlist_memberships<'a>(
        &'a self,
        playlist_id: &PlaylistId,
    ) -> BoxStream<'a, Result<Membership>> {
        let state = self.state.lock().unwrap();
        let rows: Vec<Membership> = state
            .memberships
            .iter()
            .filter(|m| &m.playlist_id == playlist_id)
            .cloned()
            .collect();
        stream::iter(rows.into_iter().map(Ok)).boxed()
    }

    fn playlist_members<'a>(&'a self, playlist_id: &PlaylistId) -> BoxStream<'a, Result<Account>> {
        let state = self.state.lock().unwrap();
        let rows: Vec<Account> = state
            .memberships
            .iter()
            .filter(|m| &m.playlist_id == playlist_id)
            .filter_map(|m| state.accounts.iter().find(|a| a.id == m.account_id))
            .cloned()
            .collect();
        stream::iter(rows.into_iter().map(Ok)).boxed()
    }

    async fn insert_membership(&self, membership: &Membership) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .memberships
            .push(membership.clone());
        Ok(())
    }

    async fn delete_membership(&self, id: &MembershipId) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .memberships
            .retain(|m| &m.id != id);
        Ok(())
    }

    async fn put_memberships(&self, batch: &[Membership]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.batches += 1;
        for row in batch {
            match state.memberships.iter_mut().find(|m| m.id == row.id) {
                Some(existing) => *existing = row.clone(),
                None => state.memberships.push(row.clone()),
            }
        }
        Ok(())
    }
}
