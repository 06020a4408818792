mod account;
mod ids;
mod membership;
mod playlist;

pub use account::{Account, CreateAccount};
pub use ids::{AccountId, MembershipId, PlaylistId};
pub use membership::Membership;
pub use playlist::{CreatePlaylist, Playlist, SmartFilter, DEFAULT_PLAYLIST_NAME, EMPTY_TRACKS};
