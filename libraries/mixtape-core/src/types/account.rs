/// Account domain types
use super::ids::AccountId;
use crate::error::{MixtapeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user of the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,

    /// Opaque reference to the external identity (one account per human user)
    pub identity: String,

    /// Display name
    pub nickname: String,

    /// Creation timestamp, set once
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a new account from validated input
    pub fn new(input: CreateAccount) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id: AccountId::generate(),
            identity: input.identity,
            nickname: input.nickname,
            created_at: Utc::now(),
        })
    }
}

/// Data for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub identity: String,
    pub nickname: String,
}

impl CreateAccount {
    pub fn new(identity: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            nickname: nickname.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.identity.trim().is_empty() {
            return Err(MixtapeError::validation("account identity is required"));
        }
        if self.nickname.trim().is_empty() {
            return Err(MixtapeError::validation("account nickname is required"));
        }
        Ok(())
    }
}
