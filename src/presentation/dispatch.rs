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

//! Applies intents emitted by the rows to the collaborators

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use super::account_row::AccountRows;
use crate::context::{AccountRegistry, FollowRequestActions, FollowRequests, Haptics, Router};
use crate::error::CoreError;
use crate::log_intent;
use crate::models::{AppAccount, Intent};

/// What a dispatch changed beyond fire-and-forget effects
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Set when an intent made another login current
    pub switched_to: Option<AppAccount>,
    /// Logins whose profile fetch was restarted
    pub retried: Vec<String>,
}

pub struct IntentDispatcher {
    registry: Arc<AccountRegistry>,
    rows: Arc<AccountRows>,
    follow_requests: Arc<FollowRequests>,
    follow_actions: Arc<dyn FollowRequestActions>,
    router: Arc<dyn Router>,
    haptics: Arc<dyn Haptics>,
}

impl IntentDispatcher {
    pub fn new(
        registry: Arc<AccountRegistry>,
        rows: Arc<AccountRows>,
        follow_requests: Arc<FollowRequests>,
        follow_actions: Arc<dyn FollowRequestActions>,
        router: Arc<dyn Router>,
        haptics: Arc<dyn Haptics>,
    ) -> Self {
        Self {
            registry,
            rows,
            follow_requests,
            follow_actions,
            router,
            haptics,
        }
    }

    /// Apply intents in order, stopping at the first failure
    pub async fn dispatch(&self, intents: &[Intent]) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome::default();

        for intent in intents {
            log_intent!(intent);

            match intent {
                Intent::Navigate { destination } => self.router.navigate(destination.clone()),
                Intent::OpenUrl { url } => self.router.handle_url(url),
                Intent::Haptic { haptic } => self.haptics.fire(*haptic),
                Intent::SwitchAccount {
                    app_account_id,
                    animated,
                } => {
                    let app_account = self.registry.set_current(app_account_id, *animated).await?;
                    outcome.switched_to = Some(app_account);
                }
                Intent::RetryProfileFetch { app_account_id } => {
                    // the fetch task runs on its own; its result arrives as a row update
                    drop(self.rows.retry(app_account_id).await?);
                    outcome.retried.push(app_account_id.clone());
                }
                Intent::AcceptFollowRequest { account_id } => {
                    let app_account = self.authenticated_current()?;
                    self.follow_actions
                        .accept(&app_account, account_id)
                        .await
                        .with_context(|| format!("Failed to accept follow request from {}", account_id))?;
                    self.follow_requests.remove(account_id).await;
                }
                Intent::RejectFollowRequest { account_id } => {
                    let app_account = self.authenticated_current()?;
                    self.follow_actions
                        .reject(&app_account, account_id)
                        .await
                        .with_context(|| format!("Failed to reject follow request from {}", account_id))?;
                    self.follow_requests.remove(account_id).await;
                }
            }
        }

        debug!("Dispatched {} intents", intents.len());
        Ok(outcome)
    }

    fn authenticated_current(&self) -> Result<AppAccount, CoreError> {
        let current = self
            .registry
            .current()
            .ok_or_else(|| CoreError::NotAuthenticated("none".to_string()))?;

        if current.oauth_token.is_none() {
            return Err(CoreError::NotAuthenticated(current.id));
        }
        Ok(current)
    }
}
