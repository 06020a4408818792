/// Mixtape Admin - operator tooling for playlist libraries
use anyhow::Context;
use clap::{Parser, Subcommand};
use futures_util::TryStreamExt;
use mixtape_core::types::{Account, CreateAccount, CreatePlaylist, Membership, Playlist};
use mixtape_core::{export, members, AccountId, Library, PlaylistId};
use mixtape_storage::{accounts, playlists, SqliteLibraryStore, StorageConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mixtape-admin")]
#[command(about = "Inspect and repair Mixtape playlist libraries", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "mixtape.toml")]
    config: PathBuf,

    /// Database URL, overrides the configuration file
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all accounts
    ListAccounts,
    /// Create an account for an external identity
    AddAccount {
        /// External identity reference
        #[arg(short, long)]
        identity: String,
        /// Display name
        #[arg(short, long)]
        nickname: String,
    },
    /// Create a playlist, optionally owned by an account
    AddPlaylist {
        /// Share hash for the new playlist
        share_hash: String,
        /// Owning account (id or identity)
        #[arg(short, long)]
        owner: Option<String>,
        /// Playlist name
        #[arg(short, long)]
        name: Option<String>,
        /// Let members other than the owner edit it
        #[arg(long)]
        collaborative: bool,
    },
    /// Delete a playlist and compact every library that held it
    DeletePlaylist {
        /// Playlist id or share hash
        playlist: String,
    },
    /// Show an account's library in display order
    Library {
        /// Account id or identity
        account: String,
    },
    /// List the accounts holding a playlist
    Members {
        /// Playlist id or share hash
        playlist: String,
    },
    /// Add a playlist to the end of an account's library
    Join {
        /// Account id or identity
        account: String,
        /// Playlist id or share hash
        playlist: String,
    },
    /// Remove a playlist from an account's library
    Leave {
        /// Account id or identity
        account: String,
        /// Playlist id or share hash
        playlist: String,
    },
    /// Move a playlist to a new position in an account's library
    Reorder {
        /// Account id or identity
        account: String,
        /// Playlist id or share hash
        playlist: String,
        /// Target position (0-based)
        position: i64,
    },
    /// Compact positions to 0..n
    Reindex {
        /// Account id or identity; every account when omitted
        account: Option<String>,
    },
    /// Print a playlist snapshot as JSON
    ExportPlaylist {
        /// Playlist id or share hash
        playlist: String,
    },
    /// Print an account's library snapshot as JSON
    ExportLibrary {
        /// Account id or identity
        account: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtape_admin=info,mixtape_storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let store = connect(&cli).await?;

    match cli.command {
        Commands::ListAccounts => list_accounts(&store).await?,
        Commands::AddAccount { identity, nickname } => {
            let account =
                accounts::create(store.pool(), CreateAccount::new(identity, nickname)).await?;
            println!("{}", account.id);
        }
        Commands::AddPlaylist {
            share_hash,
            owner,
            name,
            collaborative,
        } => {
            let owner_id = match owner {
                Some(owner) => Some(resolve_account(&store, &owner).await?.id),
                None => None,
            };
            let mut input = CreatePlaylist::new(share_hash, owner_id);
            input.name = name;
            input.collaborative = collaborative;

            let (playlist, _) = playlists::create(store.pool(), input).await?;
            println!("{}", playlist.id);
        }
        Commands::DeletePlaylist { playlist } => {
            let playlist = resolve_playlist(&store, &playlist).await?;
            playlists::delete(store.pool(), &playlist.id).await?;
        }
        Commands::Library { account } => show_library(&store, &account).await?,
        Commands::Members { playlist } => {
            let playlist = resolve_playlist(&store, &playlist).await?;
            let holders: Vec<Account> = members::members(&store, &playlist.id)
                .try_collect()
                .await?;
            for account in holders {
                println!("  {} - {}", account.id, account.nickname);
            }
        }
        Commands::Join { account, playlist } => {
            let account = resolve_account(&store, &account).await?;
            let playlist = resolve_playlist(&store, &playlist).await?;
            let membership = Library::new(&store, account.id.clone())
                .add(&playlist.id, false)
                .await?;
            println!("{} at position {}", playlist.share_hash, membership.position);
        }
        Commands::Leave { account, playlist } => {
            let account = resolve_account(&store, &account).await?;
            let playlist = resolve_playlist(&store, &playlist).await?;
            Library::new(&store, account.id.clone())
                .remove(&playlist.id)
                .await?;
        }
        Commands::Reorder {
            account,
            playlist,
            position,
        } => reorder(&store, &account, &playlist, position).await?,
        Commands::Reindex { account } => reindex(&store, account.as_deref()).await?,
        Commands::ExportPlaylist { playlist } => {
            let playlist = resolve_playlist(&store, &playlist).await?;
            let snapshot = export::snapshot_of(&store, &playlist).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::ExportLibrary { account } => {
            let account = resolve_account(&store, &account).await?;
            let snapshot = export::library_snapshot(&store, &account.id).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}

async fn connect(cli: &Cli) -> anyhow::Result<SqliteLibraryStore> {
    let mut config = StorageConfig::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(url) = &cli.database_url {
        config.database_url.clone_from(url);
    }

    let pool = mixtape_storage::create_pool(&config).await?;
    mixtape_storage::run_migrations(&pool).await?;

    Ok(SqliteLibraryStore::new(pool))
}

/// Look an account up by id, then by identity
async fn resolve_account(store: &SqliteLibraryStore, key: &str) -> anyhow::Result<Account> {
    if let Some(account) = accounts::get_by_id(store.pool(), &AccountId::new(key)).await? {
        return Ok(account);
    }
    accounts::get_by_identity(store.pool(), key)
        .await?
        .with_context(|| format!("no account with id or identity {key}"))
}

/// Look a playlist up by id, then by share hash
async fn resolve_playlist(store: &SqliteLibraryStore, key: &str) -> anyhow::Result<Playlist> {
    if let Some(playlist) = playlists::get_by_id(store.pool(), &PlaylistId::new(key)).await? {
        return Ok(playlist);
    }
    playlists::get_by_share_hash(store.pool(), key)
        .await?
        .with_context(|| format!("no playlist with id or share hash {key}"))
}

async fn list_accounts(store: &SqliteLibraryStore) -> anyhow::Result<()> {
    let accounts = accounts::get_all(store.pool()).await?;

    println!("Accounts:");
    for account in accounts {
        println!("  {} - {} ({})", account.id, account.nickname, account.identity);
    }

    Ok(())
}

async fn show_library(store: &SqliteLibraryStore, account: &str) -> anyhow::Result<()> {
    let account = resolve_account(store, account).await?;
    let memberships: Vec<Membership> = Library::new(store, account.id.clone())
        .memberships()
        .try_collect()
        .await?;

    println!("Library of {}:", account.nickname);
    for membership in memberships {
        let playlist = playlists::get_by_id(store.pool(), &membership.playlist_id)
            .await?
            .with_context(|| format!("dangling membership {}", membership.id))?;
        let owner = if membership.is_owner { " (owner)" } else { "" };
        println!(
            "  {:>3}  {} - {}{owner}",
            membership.position, playlist.share_hash, playlist.name
        );
    }

    Ok(())
}

async fn reorder(
    store: &SqliteLibraryStore,
    account: &str,
    playlist: &str,
    position: i64,
) -> anyhow::Result<()> {
    let account = resolve_account(store, account).await?;
    let playlist = resolve_playlist(store, playlist).await?;
    let library = Library::new(store, account.id.clone());

    let membership = library
        .membership_for(&playlist.id)
        .await?
        .with_context(|| format!("{} does not hold {}", account.nickname, playlist.share_hash))?;

    let last = library.last_position().await?;
    if position > last {
        tracing::warn!(
            position,
            last,
            "Target is past the end of the library, run reindex to close the gap"
        );
    }

    let written = library.reorder(&membership, position).await?;
    tracing::info!(
        account = %account.id,
        playlist = %playlist.id,
        rows = written.len(),
        "Reorder applied"
    );

    Ok(())
}

async fn reindex(store: &SqliteLibraryStore, account: Option<&str>) -> anyhow::Result<()> {
    let targets = match account {
        Some(key) => vec![resolve_account(store, key).await?],
        None => accounts::get_all(store.pool()).await?,
    };

    for account in targets {
        let changed = Library::new(store, account.id.clone()).reindex().await?;
        tracing::info!(account = %account.id, changed, "Library reindexed");
    }

    Ok(())
}
