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

//! Mastodon API client for one login

use anyhow::{Context, Result};
use async_trait::async_trait;
use megalodon::{self, generator, Megalodon, SNS};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::context::{FollowRequestActions, NotificationFeed, ProfileFetcher};
use crate::error::CoreError;
use crate::models::{Account, AppAccount, Notification};

use super::converter;

/// Mastodon API client
pub struct MastodonClient {
    client: Arc<Box<dyn Megalodon + Send + Sync>>,
    instance_url: String,
}

impl MastodonClient {
    /// Create a client for a stored login; it must carry a token
    pub fn from_app_account(app_account: &AppAccount) -> Result<Self> {
        let access_token = app_account
            .oauth_token
            .clone()
            .ok_or_else(|| CoreError::NotAuthenticated(app_account.id.clone()))?;

        let instance_url = app_account.instance_url();
        let client = generator(SNS::Mastodon, instance_url.clone(), Some(access_token), None)
            .with_context(|| format!("Failed to create client for {}", instance_url))?;

        Ok(Self {
            client: Arc::new(client),
            instance_url,
        })
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the profile of the authenticated user
    pub async fn get_current_user(&self) -> Result<Account> {
        let response = self
            .client
            .verify_account_credentials()
            .await
            .context("Failed to verify credentials")?;

        Ok(converter::convert_account(&response.json))
    }

    /// Fetch the newest page of notifications, newest first.
    ///
    /// Notifications of a type outside the closed set are skipped with a
    /// warning so one unsupported entry does not hide the page.
    pub async fn get_notifications(&self, limit: u32) -> Result<Vec<Notification>> {
        let options = megalodon::megalodon::GetNotificationsInputOptions {
            limit: Some(limit),
            ..Default::default()
        };

        let response = self
            .client
            .get_notifications(Some(&options))
            .await
            .context("Failed to fetch notifications")?;

        let mut notifications = Vec::with_capacity(response.json.len());
        for raw in &response.json {
            match converter::convert_notification(raw) {
                Ok(Some(notification)) => notifications.push(notification),
                Ok(None) => debug!("Skipping notification {} without an account", raw.id),
                Err(e) => warn!("Skipping notification {}: {}", raw.id, e),
            }
        }

        debug!("Fetched {} notifications from {}", notifications.len(), self.instance_url);
        Ok(notifications)
    }

    pub async fn accept_follow_request(&self, account_id: &str) -> Result<()> {
        self.client
            .accept_follow_request(account_id.to_string())
            .await
            .context("Failed to accept follow request")?;

        info!("Accepted follow request from {}", account_id);
        Ok(())
    }

    pub async fn reject_follow_request(&self, account_id: &str) -> Result<()> {
        self.client
            .reject_follow_request(account_id.to_string())
            .await
            .context("Failed to reject follow request")?;

        info!("Rejected follow request from {}", account_id);
        Ok(())
    }
}

/// Live collaborators backed by the Mastodon API
#[derive(Debug, Default, Clone, Copy)]
pub struct MastodonGateway;

#[async_trait]
impl ProfileFetcher for MastodonGateway {
    async fn fetch(&self, app_account: &AppAccount) -> Result<Account> {
        MastodonClient::from_app_account(app_account)?
            .get_current_user()
            .await
    }
}

#[async_trait]
impl NotificationFeed for MastodonGateway {
    async fn fetch_page(&self, app_account: &AppAccount, limit: u32) -> Result<Vec<Notification>> {
        MastodonClient::from_app_account(app_account)?
            .get_notifications(limit)
            .await
    }
}

#[async_trait]
impl FollowRequestActions for MastodonGateway {
    async fn accept(&self, app_account: &AppAccount, account_id: &str) -> Result<()> {
        MastodonClient::from_app_account(app_account)?
            .accept_follow_request(account_id)
            .await
    }

    async fn reject(&self, app_account: &AppAccount, account_id: &str) -> Result<()> {
        MastodonClient::from_app_account(app_account)?
            .reject_follow_request(account_id)
            .await
    }
}
