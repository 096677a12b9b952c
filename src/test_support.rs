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

//! Fixtures and recording collaborators shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::context::{FollowRequestActions, Haptics, NotificationFeed, ProfileFetcher, Router};
use crate::models::{
    Account, AppAccount, Destination, HapticKind, Notification, Status, Visibility,
};

/// Fixed "now" so relative timestamps are stable
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn at_minutes_ago(minutes: i64) -> DateTime<Utc> {
    fixed_now() - Duration::minutes(minutes)
}

pub fn account(id: &str, username: &str) -> Account {
    Account {
        id: id.to_string(),
        username: username.to_string(),
        acct: format!("{}@example.social", username),
        display_name: username.to_string(),
        note: String::new(),
        url: format!("https://example.social/@{}", username),
        avatar: format!("https://files.example/{}.png", id),
        emojis: Vec::new(),
        locked: false,
        bot: false,
    }
}

pub fn status(id: &str) -> Status {
    Status {
        id: id.to_string(),
        url: Some(format!("https://example.social/statuses/{}", id)),
        account: account("author", "author"),
        content: format!("<p>post {}</p>", id),
        spoiler_text: String::new(),
        visibility: Visibility::Public,
        sensitive: false,
        created_at: at_minutes_ago(60),
        emojis: Vec::new(),
        media_count: 0,
        reblogs_count: 0,
        favourites_count: 0,
        replies_count: 0,
    }
}

/// Profile fetcher with a swappable canned answer
pub struct StubFetcher {
    answer: Mutex<std::result::Result<Account, String>>,
    calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl StubFetcher {
    pub fn succeeding(account: Account) -> Self {
        Self {
            answer: Mutex::new(Ok(account)),
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Mutex::new(Err(message.to_string())),
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    pub fn succeed_with(&self, account: Account) {
        *self.answer.lock().unwrap() = Ok(account);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Token of the login the last fetch was made for
    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileFetcher for StubFetcher {
    async fn fetch(&self, app_account: &AppAccount) -> Result<Account> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = app_account.oauth_token.clone();
        self.answer.lock().unwrap().clone().map_err(|m| anyhow!(m))
    }
}

#[derive(Default)]
pub struct RecordingRouter {
    pub destinations: Mutex<Vec<Destination>>,
    pub urls: Mutex<Vec<String>>,
}

impl Router for RecordingRouter {
    fn navigate(&self, destination: Destination) {
        self.destinations.lock().unwrap().push(destination);
    }

    fn handle_url(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }
}

#[derive(Default)]
pub struct RecordingHaptics {
    pub fired: Mutex<Vec<HapticKind>>,
}

impl Haptics for RecordingHaptics {
    fn fire(&self, kind: HapticKind) {
        self.fired.lock().unwrap().push(kind);
    }
}

/// Follow request actions that record calls and can be told to fail
#[derive(Default)]
pub struct RecordingFollowRequests {
    pub accepted: Mutex<Vec<(String, String)>>,
    pub rejected: Mutex<Vec<(String, String)>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl RecordingFollowRequests {
    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("server refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl FollowRequestActions for RecordingFollowRequests {
    async fn accept(&self, app_account: &AppAccount, account_id: &str) -> Result<()> {
        self.check()?;
        self.accepted
            .lock()
            .unwrap()
            .push((app_account.id.clone(), account_id.to_string()));
        Ok(())
    }

    async fn reject(&self, app_account: &AppAccount, account_id: &str) -> Result<()> {
        self.check()?;
        self.rejected
            .lock()
            .unwrap()
            .push((app_account.id.clone(), account_id.to_string()));
        Ok(())
    }
}

/// Notification feed serving a fixed page
#[derive(Default)]
pub struct StaticFeed {
    pub page: Mutex<Vec<Notification>>,
    pub limits: Mutex<Vec<u32>>,
}

#[async_trait]
impl NotificationFeed for StaticFeed {
    async fn fetch_page(&self, _app_account: &AppAccount, limit: u32) -> Result<Vec<Notification>> {
        self.limits.lock().unwrap().push(limit);
        Ok(self.page.lock().unwrap().clone())
    }
}
