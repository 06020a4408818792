//! Mixtape Core
//!
//! Data model for collaborative playlist libraries: accounts, playlists
//! (plain or smart) and the memberships that put a playlist into an
//! account's ordered library.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Account`, `Playlist`, `Membership` and their ids
//! - **Ordering**: pure planners for reorder and reindex
//! - **Library**: account-level operations over a [`LibraryStore`]
//! - **Export**: typed snapshots that form the wire contract
//! - **Error Handling**: unified `MixtapeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use mixtape_core::types::{Account, CreateAccount, CreatePlaylist, Membership, Playlist};
//!
//! let alice = Account::new(CreateAccount::new("oauth|alice", "alice")).unwrap();
//! let playlist = Playlist::new(CreatePlaylist::new("x7Gk2", Some(alice.id.clone()))).unwrap();
//! let membership = Membership::new(alice.id.clone(), playlist.id.clone(), true, 0);
//!
//! let snapshot = membership
//!     .to_snapshot(playlist.to_snapshot(Some(&alice)).unwrap())
//!     .unwrap();
//! assert_eq!(snapshot.playlist.name, "Playlist");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod identity;
pub mod library;
pub mod members;
pub mod ordering;
pub mod snapshot;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{MixtapeError, Result};
pub use identity::{Identity, StaticIdentity};
pub use library::{Library, NO_POSITION};
pub use snapshot::{MembershipSnapshot, OwnerSnapshot, PlaylistSnapshot, SmartFilterSnapshot};
pub use store::{LibraryStore, PositionOrder};

pub use types::{
    Account, AccountId, CreateAccount, CreatePlaylist, Membership, MembershipId, Playlist,
    PlaylistId, SmartFilter,
};
