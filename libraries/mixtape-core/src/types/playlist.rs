//! Playlist domain types

use super::ids::{AccountId, PlaylistId};
use crate::error::{MixtapeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name given to playlists created without one
pub const DEFAULT_PLAYLIST_NAME: &str = "Playlist";

/// Track token of a playlist that has never been filled
pub const EMPTY_TRACKS: &str = "0";

/// A named collection of tracks, curated by hand or defined by a smart filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub created_at: DateTime<Utc>,

    /// Whether non-owner members may modify the contents
    pub collaborative: bool,

    /// Opaque track list token, owned by the track subsystem
    pub tracks: String,

    /// Rule-based playlist; `filter` only matters when set
    pub smart: bool,

    /// Bumped whenever `tracks` is replaced
    pub version: i64,

    /// Token for shareable links, supplied by the caller
    pub share_hash: String,

    /// Account that created the playlist, if any
    pub owner_id: Option<AccountId>,

    pub filter: SmartFilter,
}

/// Smart playlist criteria
///
/// Always stored, inert unless the playlist is smart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartFilter {
    pub genres: String,
    pub artist: String,
    pub tags: String,
    pub uploaded_from: Option<DateTime<Utc>>,
    pub uploaded_to: Option<DateTime<Utc>>,
    pub bpm_from: i64,
    pub bpm_to: i64,
    pub search_term: String,
    pub user_favorites: String,
    pub order: String,
    pub duration_from: i64,
    pub duration_to: i64,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlaylist {
    /// Falls back to [`DEFAULT_PLAYLIST_NAME`] when `None`
    pub name: Option<String>,
    pub share_hash: String,
    pub owner_id: Option<AccountId>,
    pub collaborative: bool,
    pub smart: bool,
    /// Falls back to [`EMPTY_TRACKS`] when `None`
    pub tracks: Option<String>,
    pub filter: SmartFilter,
}

impl CreatePlaylist {
    /// Plain playlist with the given share hash and owner
    pub fn new(share_hash: impl Into<String>, owner_id: Option<AccountId>) -> Self {
        Self {
            share_hash: share_hash.into(),
            owner_id,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn smart(mut self, filter: SmartFilter) -> Self {
        self.smart = true;
        self.filter = filter;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(MixtapeError::validation("playlist name must not be empty"));
        }
        if self.share_hash.trim().is_empty() {
            return Err(MixtapeError::validation("playlist share hash is required"));
        }
        Ok(())
    }
}

impl Playlist {
    /// Build a new playlist from validated input
    pub fn new(input: CreatePlaylist) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id: PlaylistId::generate(),
            name: input
                .name
                .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string()),
            created_at: Utc::now(),
            collaborative: input.collaborative,
            tracks: input.tracks.unwrap_or_else(|| EMPTY_TRACKS.to_string()),
            smart: input.smart,
            version: 0,
            share_hash: input.share_hash,
            owner_id: input.owner_id,
            filter: input.filter,
        })
    }

    pub fn is_owned_by(&self, account_id: &AccountId) -> bool {
        self.owner_id.as_ref() == Some(account_id)
    }
}
