//! Membership: one account's entry for one playlist

use super::ids::{AccountId, MembershipId, PlaylistId};
use serde::{Deserialize, Serialize};

/// Join between an account and a playlist
///
/// `position` orders the account's library and is only comparable with
/// positions of the same account's other memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub account_id: AccountId,
    pub playlist_id: PlaylistId,
    pub is_owner: bool,
    pub position: i64,
}

impl Membership {
    pub fn new(
        account_id: AccountId,
        playlist_id: PlaylistId,
        is_owner: bool,
        position: i64,
    ) -> Self {
        Self {
            id: MembershipId::generate(),
            account_id,
            playlist_id,
            is_owner,
            position,
        }
    }

    pub fn belongs_to(&self, account_id: &AccountId) -> bool {
        &self.account_id == account_id
    }
}
