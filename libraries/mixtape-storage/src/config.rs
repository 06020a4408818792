/// Storage configuration
use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a writer waits on a locked database before failing
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

impl StorageConfig {
    /// Load configuration from `mixtape.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("mixtape.toml"))
    }

    /// Load configuration from the given file (if present) and environment
    ///
    /// Environment variables prefixed with `MIXTAPE_` override the file,
    /// e.g. `MIXTAPE_DATABASE_URL`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(PathBuf::from(path)));
        }

        settings = settings.add_source(config::Environment::with_prefix("MIXTAPE").try_parsing(true));

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(StorageError::Config(
                "database URL is required (set MIXTAPE_DATABASE_URL)".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(StorageError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/mixtape.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}
