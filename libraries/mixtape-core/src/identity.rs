//! Identity of the calling user

use crate::types::AccountId;

/// Resolves the account of the currently authenticated caller
pub trait Identity: Send + Sync {
    /// `None` when nobody is authenticated
    fn current_account_id(&self) -> Option<AccountId>;
}

/// Identity fixed at construction (CLI sessions, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    account_id: Option<AccountId>,
}

impl StaticIdentity {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id: Some(account_id),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl Identity for StaticIdentity {
    fn current_account_id(&self) -> Option<AccountId> {
        self.account_id.clone()
    }
}
