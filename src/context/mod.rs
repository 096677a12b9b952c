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

//! Collaborators the rows are rendered and acted upon with
//!
//! Rendering never looks these up ambiently: handlers snapshot what a render
//! needs and pass it in explicitly.

mod events;
mod registry;
mod stores;

pub use events::{EventHaptics, EventRouter};
pub use registry::{AccountRegistry, CurrentAccount};
pub use stores::{FollowRequests, UnreadCounts};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Account, AppAccount, Destination, HapticKind, Notification};

/// Navigation collaborator
pub trait Router: Send + Sync {
    fn navigate(&self, destination: Destination);

    /// Handle a link tapped inside rendered text
    fn handle_url(&self, url: &str);
}

/// Haptic feedback collaborator. Best effort: it cannot fail or block.
pub trait Haptics: Send + Sync {
    fn fire(&self, kind: HapticKind);
}

/// Loads the profile behind a login
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch(&self, app_account: &AppAccount) -> Result<Account>;
}

/// Loads the newest page of raw notifications, newest first
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    async fn fetch_page(&self, app_account: &AppAccount, limit: u32) -> Result<Vec<Notification>>;
}

/// Accepts or rejects pending follow requests on the server
#[async_trait]
pub trait FollowRequestActions: Send + Sync {
    async fn accept(&self, app_account: &AppAccount, account_id: &str) -> Result<()>;
    async fn reject(&self, app_account: &AppAccount, account_id: &str) -> Result<()>;
}
