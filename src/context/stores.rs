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

//! Shared stores written by external updaters and read per render

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::Account;

/// Unread notification count per OAuth token
#[derive(Default)]
pub struct UnreadCounts {
    counts: RwLock<HashMap<String, u64>>,
}

impl UnreadCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: impl Into<String>, count: u64) {
        self.counts.write().await.insert(token.into(), count);
    }

    /// Copy for one render pass; later writes are seen on the next pass
    pub async fn snapshot(&self) -> HashMap<String, u64> {
        self.counts.read().await.clone()
    }
}

/// Accounts with a pending incoming follow request
#[derive(Default)]
pub struct FollowRequests {
    accounts: RwLock<Vec<Account>>,
}

impl FollowRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, accounts: Vec<Account>) {
        *self.accounts.write().await = accounts;
    }

    /// Drop a handled request, returning it if it was pending
    pub async fn remove(&self, account_id: &str) -> Option<Account> {
        let mut accounts = self.accounts.write().await;
        let position = accounts.iter().position(|a| a.id == account_id)?;
        Some(accounts.remove(position))
    }

    pub async fn snapshot(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::account;

    #[tokio::test]
    async fn unread_snapshot_is_detached() {
        let store = UnreadCounts::new();
        store.set("tok", 3).await;
        let snapshot = store.snapshot().await;
        store.set("tok", 9).await;
        assert_eq!(snapshot.get("tok"), Some(&3));
        assert_eq!(store.snapshot().await.get("tok"), Some(&9));
    }

    #[tokio::test]
    async fn handled_follow_request_is_removed() {
        let store = FollowRequests::new();
        store
            .replace(vec![account("1", "alice"), account("2", "bob")])
            .await;

        assert_eq!(store.remove("1").await.map(|a| a.username), Some("alice".to_string()));
        assert!(store.remove("1").await.is_none());
        assert_eq!(store.snapshot().await.len(), 1);
    }
}
