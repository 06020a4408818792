//! Export contract
//!
//! Snapshots are the only shape handed to callers outside the core. Field
//! names and nesting are part of the wire format: `smart_filter` is present
//! only for smart playlists and `owner` only when the playlist has an owner.

use crate::error::{MixtapeError, Result};
use crate::types::{Account, Membership, Playlist, SmartFilter};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Rendering of a timestamp that was never set
pub const ABSENT_DATE: &str = "None";

/// Render a timestamp as display text.
///
/// `YYYY-MM-DD HH:MM:SS` in UTC, with a six-digit fraction appended only when
/// the sub-second part is non-zero.
pub fn display_timestamp(at: &DateTime<Utc>) -> String {
    if at.nanosecond() / 1_000 == 0 {
        at.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

fn display_optional(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| ABSENT_DATE.to_string(), display_timestamp)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    pub id: String,
    pub name: String,
    pub date_created: String,
    pub collaborative: bool,
    pub tracks: String,
    pub version: i64,
    pub share_hash: String,
    pub smart: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_filter: Option<SmartFilterSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartFilterSnapshot {
    pub artist: String,
    pub genres: String,
    pub tags: String,
    pub uploaded_from: String,
    pub uploaded_to: String,
    pub bpm_from: i64,
    pub bpm_to: i64,
    pub search_term: String,
    pub user_favorites: String,
    pub order: String,
    pub duration_from: i64,
    pub duration_to: i64,
}

/// The only owner detail that crosses a sharing boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSnapshot {
    pub is_owner: bool,
    pub position: i64,
    pub playlist: PlaylistSnapshot,
}

impl From<&SmartFilter> for SmartFilterSnapshot {
    fn from(filter: &SmartFilter) -> Self {
        Self {
            artist: filter.artist.clone(),
            genres: filter.genres.clone(),
            tags: filter.tags.clone(),
            uploaded_from: display_optional(filter.uploaded_from.as_ref()),
            uploaded_to: display_optional(filter.uploaded_to.as_ref()),
            bpm_from: filter.bpm_from,
            bpm_to: filter.bpm_to,
            search_term: filter.search_term.clone(),
            user_favorites: filter.user_favorites.clone(),
            order: filter.order.clone(),
            duration_from: filter.duration_from,
            duration_to: filter.duration_to,
        }
    }
}

impl Playlist {
    /// Snapshot of the visible fields.
    ///
    /// `owner` must be the account referenced by `owner_id`, and `None`
    /// exactly when the playlist has no owner; only its nickname is exported.
    pub fn to_snapshot(&self, owner: Option<&Account>) -> Result<PlaylistSnapshot> {
        match (&self.owner_id, owner) {
            (Some(owner_id), Some(account)) if &account.id == owner_id => {}
            (None, None) => {}
            (expected, given) => {
                return Err(MixtapeError::precondition(format!(
                    "playlist {} is owned by {}, snapshot was given {}",
                    self.id,
                    expected.as_ref().map_or("nobody", |id| id.as_str()),
                    given.map_or("nobody", |account| account.id.as_str()),
                )));
            }
        }

        Ok(PlaylistSnapshot {
            id: self.id.to_string(),
            name: self.name.clone(),
            date_created: display_timestamp(&self.created_at),
            collaborative: self.collaborative,
            tracks: self.tracks.clone(),
            version: self.version,
            share_hash: self.share_hash.clone(),
            smart: self.smart,
            smart_filter: self.smart.then(|| SmartFilterSnapshot::from(&self.filter)),
            owner: owner.map(|account| OwnerSnapshot {
                nickname: account.nickname.clone(),
            }),
        })
    }
}

impl Membership {
    /// Snapshot embedding the full snapshot of the referenced playlist
    pub fn to_snapshot(&self, playlist: PlaylistSnapshot) -> Result<MembershipSnapshot> {
        if playlist.id != self.playlist_id.as_str() {
            return Err(MixtapeError::precondition(format!(
                "membership {} references playlist {}, not {}",
                self.id, self.playlist_id, playlist.id
            )));
        }

        Ok(MembershipSnapshot {
            is_owner: self.is_owner,
            position: self.position,
            playlist,
        })
    }
}

impl PlaylistSnapshot {
    /// JSON text of the snapshot
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl MembershipSnapshot {
    /// JSON text of the snapshot
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, CreateAccount, CreatePlaylist, PlaylistId};
    use chrono::TimeZone;
    use serde_json::Value;

    fn owner() -> Account {
        Account::new(CreateAccount::new("identity:alice", "alice")).unwrap()
    }

    fn playlist(smart: bool, owner_id: Option<AccountId>) -> Playlist {
        let mut input = CreatePlaylist::new("share-1", owner_id).named("Road trip");
        if smart {
            input = input.smart(SmartFilter {
                artist: "Boards of Canada".to_string(),
                bpm_from: 80,
                bpm_to: 120,
                uploaded_from: Some(Utc.with_ymd_and_hms(2008, 5, 1, 12, 30, 0).unwrap()),
                ..SmartFilter::default()
            });
        }
        Playlist::new(input).unwrap()
    }

    fn as_json(snapshot: &PlaylistSnapshot) -> serde_json::Map<String, Value> {
        match serde_json::from_str(&snapshot.to_json().unwrap()).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn plain_playlist_has_no_smart_filter() {
        let json = as_json(&playlist(false, None).to_snapshot(None).unwrap());

        assert!(!json.contains_key("smart_filter"));
        assert_eq!(json["smart"], Value::Bool(false));
        assert_eq!(json["name"], "Road trip");
        assert_eq!(json["tracks"], "0");
        assert_eq!(json["version"], 0);
    }

    #[test]
    fn smart_playlist_exports_all_twelve_filter_fields() {
        let json = as_json(&playlist(true, None).to_snapshot(None).unwrap());

        let filter = json["smart_filter"].as_object().unwrap();
        assert_eq!(filter.len(), 12);
        for key in [
            "artist",
            "genres",
            "tags",
            "uploaded_from",
            "uploaded_to",
            "bpm_from",
            "bpm_to",
            "search_term",
            "user_favorites",
            "order",
            "duration_from",
            "duration_to",
        ] {
            assert!(filter.contains_key(key), "missing {key}");
        }
        assert_eq!(filter["artist"], "Boards of Canada");
        assert_eq!(filter["uploaded_from"], "2008-05-01 12:30:00");
        assert_eq!(filter["uploaded_to"], ABSENT_DATE);
        assert_eq!(filter["bpm_to"], 120);
    }

    #[test]
    fn owner_block_only_carries_nickname() {
        let alice = owner();
        let owned = playlist(false, Some(alice.id.clone()));
        let json = as_json(&owned.to_snapshot(Some(&alice)).unwrap());

        let owner = json["owner"].as_object().unwrap();
        assert_eq!(owner.len(), 1);
        assert_eq!(owner["nickname"], "alice");
        let text = serde_json::to_string(&json).unwrap();
        assert!(!text.contains("identity:alice"));
        assert!(!text.contains(alice.id.as_str()));
    }

    #[test]
    fn ownerless_playlist_has_no_owner_key() {
        let json = as_json(&playlist(false, None).to_snapshot(None).unwrap());
        assert!(!json.contains_key("owner"));
    }

    #[test]
    fn membership_snapshot_inlines_playlist() {
        let list = playlist(true, None);
        let membership = Membership::new(AccountId::new("a"), list.id.clone(), true, 3);

        let snapshot = membership
            .to_snapshot(list.to_snapshot(None).unwrap())
            .unwrap();
        let json: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

        assert_eq!(json["is_owner"], true);
        assert_eq!(json["position"], 3);
        assert_eq!(json["playlist"]["id"], list.id.as_str());
        assert!(json["playlist"]["smart_filter"].is_object());
    }

    #[test]
    fn timestamps_render_as_plain_text() {
        let whole = Utc.with_ymd_and_hms(2009, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(display_timestamp(&whole), "2009-01-02 03:04:05");

        let fractional = whole + chrono::Duration::microseconds(250);
        assert_eq!(display_timestamp(&fractional), "2009-01-02 03:04:05.000250");
    }

    #[test]
    fn snapshot_id_is_the_playlist_id() {
        let list = playlist(false, None);
        assert_eq!(PlaylistId::new(list.to_snapshot(None).unwrap().id), list.id);
    }

    #[test]
    fn owner_must_match_the_owner_reference() {
        let alice = owner();
        let bob = Account::new(CreateAccount::new("identity:bob", "bob")).unwrap();

        let ownerless = playlist(false, None);
        let err = ownerless.to_snapshot(Some(&alice)).unwrap_err();
        assert!(matches!(err, MixtapeError::Precondition(_)));

        let owned = playlist(false, Some(alice.id.clone()));
        let err = owned.to_snapshot(None).unwrap_err();
        assert!(matches!(err, MixtapeError::Precondition(_)));

        let err = owned.to_snapshot(Some(&bob)).unwrap_err();
        assert!(matches!(err, MixtapeError::Precondition(_)));
    }

    #[test]
    fn membership_rejects_snapshot_of_another_playlist() {
        let list = playlist(false, None);
        let other = Playlist::new(CreatePlaylist::new("share-2", None)).unwrap();
        let membership = Membership::new(AccountId::new("a"), list.id.clone(), false, 0);

        let err = membership
            .to_snapshot(other.to_snapshot(None).unwrap())
            .unwrap_err();
        assert!(matches!(err, MixtapeError::Precondition(_)));
    }
}
