// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Process-wide registry of configured logins and the current one

use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::models::AppAccount;

/// The current login and how the switch to it should be presented
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentAccount {
    pub app_account: AppAccount,
    pub animated: bool,
}

/// Holds every configured login and publishes current-account changes
pub struct AccountRegistry {
    accounts: RwLock<Vec<AppAccount>>,
    current: watch::Sender<Option<CurrentAccount>>,
}

impl AccountRegistry {
    /// Create a registry; `current_id` falls back to the first account
    pub fn new(accounts: Vec<AppAccount>, current_id: Option<&str>) -> Self {
        let current = current_id
            .and_then(|id| accounts.iter().find(|a| a.id == id))
            .or_else(|| accounts.first())
            .cloned()
            .map(|app_account| CurrentAccount {
                app_account,
                animated: false,
            });

        let (current, _) = watch::channel(current);

        Self {
            accounts: RwLock::new(accounts),
            current,
        }
    }

    pub async fn accounts(&self) -> Vec<AppAccount> {
        self.accounts.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<AppAccount> {
        self.accounts.read().await.iter().find(|a| a.id == id).cloned()
    }

    /// Add a login, replacing one with the same id.
    ///
    /// The first login added becomes current.
    pub async fn add(&self, app_account: AppAccount) {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|a| a.id == app_account.id) {
            Some(existing) => *existing = app_account.clone(),
            None => accounts.push(app_account.clone()),
        }
        drop(accounts);

        let is_current = self.current_id().as_deref() == Some(app_account.id.as_str());
        if self.current_id().is_none() || is_current {
            self.current.send_replace(Some(CurrentAccount {
                app_account,
                animated: false,
            }));
        }
    }

    /// Always a fresh read
    pub fn current(&self) -> Option<AppAccount> {
        self.current.borrow().as_ref().map(|c| c.app_account.clone())
    }

    pub fn current_id(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|c| c.app_account.id.clone())
    }

    /// Make `id` the current login. Visible to every reader immediately.
    pub async fn set_current(&self, id: &str, animated: bool) -> Result<AppAccount, CoreError> {
        let app_account = self
            .get(id)
            .await
            .ok_or_else(|| CoreError::AccountNotFound(id.to_string()))?;

        if self.current_id().as_deref() == Some(id) {
            debug!("App account {} is already current", id);
        } else {
            info!("Switching current app account to {}", id);
        }

        self.current.send_replace(Some(CurrentAccount {
            app_account: app_account.clone(),
            animated,
        }));

        Ok(app_account)
    }

    /// Receive every current-account change
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentAccount>> {
        self.current.subscribe()
    }
}
