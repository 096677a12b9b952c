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

//! App account model: one configured login and its profile fetch state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Account;

/// A stored login (for multi-account support)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppAccount {
    /// Unique identifier (local)
    pub id: String,

    /// Server host (e.g., "mastodon.social")
    pub server: String,

    /// Cached display name, shown while the profile is loading
    #[serde(default)]
    pub account_name: Option<String>,

    /// OAuth access token, also the key of the unread-count store.
    /// Accepted from the UI, never echoed back.
    #[serde(default, skip_serializing)]
    pub oauth_token: Option<String>,

    /// When this account was added
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl AppAccount {
    pub fn new(id: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            server: server.into(),
            account_name: None,
            oauth_token: None,
            added_at: Utc::now(),
        }
    }

    pub fn with_account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = Some(token.into());
        self
    }

    /// Label shown next to the loading spinner
    pub fn fallback_label(&self) -> &str {
        self.account_name.as_deref().unwrap_or(&self.id)
    }

    /// Instance base URL for API calls
    pub fn instance_url(&self) -> String {
        if self.server.starts_with("http://") || self.server.starts_with("https://") {
            self.server.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.server.trim_end_matches('/'))
        }
    }
}

/// Fetch state of an account's profile
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProfileState {
    #[default]
    Loading,
    Loaded { account: Account },
    Failed { reason: String },
}

impl ProfileState {
    pub fn account(&self) -> Option<&Account> {
        match self {
            ProfileState::Loaded { account } => Some(account),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProfileState::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_label_prefers_cached_name() {
        let handle = AppAccount::new("acc-1", "mastodon.social");
        assert_eq!(handle.fallback_label(), "acc-1");

        let handle = handle.with_account_name("Alice");
        assert_eq!(handle.fallback_label(), "Alice");
    }

    #[test]
    fn instance_url_is_normalized() {
        assert_eq!(
            AppAccount::new("a", "mastodon.social/").instance_url(),
            "https://mastodon.social"
        );
        assert_eq!(
            AppAccount::new("a", "http://localhost:3000").instance_url(),
            "http://localhost:3000"
        );
    }
}
