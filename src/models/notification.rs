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

//! Notification models and the consolidation that merges them into rows

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Account, Status};
use crate::error::CoreError;

/// Type of notification
///
/// Closed by construction: a type the server sends that is not listed here is
/// rejected with [`CoreError::UnknownNotificationType`] at the conversion edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Someone followed you
    Follow,
    /// Someone requested to follow you
    FollowRequest,
    /// Someone favorited your post
    Favourite,
    /// Someone boosted your post
    Reblog,
    /// Someone mentioned you
    Mention,
    /// A poll you voted in or created has ended
    Poll,
    /// Someone you enabled notifications for posted
    Status,
    /// A post you interacted with was edited
    Update,
    /// Someone signed up (admin only)
    #[serde(rename = "admin.sign_up")]
    AdminSignUp,
}

impl NotificationType {
    pub const ALL: [NotificationType; 9] = [
        NotificationType::Follow,
        NotificationType::FollowRequest,
        NotificationType::Favourite,
        NotificationType::Reblog,
        NotificationType::Mention,
        NotificationType::Poll,
        NotificationType::Status,
        NotificationType::Update,
        NotificationType::AdminSignUp,
    ];

    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Follow => "follow",
            NotificationType::FollowRequest => "follow_request",
            NotificationType::Favourite => "favourite",
            NotificationType::Reblog => "reblog",
            NotificationType::Mention => "mention",
            NotificationType::Poll => "poll",
            NotificationType::Status => "status",
            NotificationType::Update => "update",
            NotificationType::AdminSignUp => "admin.sign_up",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownNotificationType(s.to_string()))
    }
}

/// A single notification from Mastodon, before consolidation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique identifier
    pub id: String,

    /// Type of notification
    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    /// When this notification was created
    pub created_at: DateTime<Utc>,

    /// The account that triggered the notification
    pub account: Account,

    /// The post associated with the notification (if any)
    pub status: Option<Status>,
}

/// One notification row: the same action by one or more actors on one target.
///
/// `accounts` is never empty and ordered most recent first. A mention always
/// has exactly one actor and a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawConsolidatedNotification")]
pub struct ConsolidatedNotification {
    id: String,
    #[serde(rename = "type")]
    notification_type: NotificationType,
    created_at: DateTime<Utc>,
    accounts: Vec<Account>,
    status: Option<Status>,
}

#[derive(Deserialize)]
struct RawConsolidatedNotification {
    id: String,
    #[serde(rename = "type")]
    notification_type: NotificationType,
    created_at: DateTime<Utc>,
    accounts: Vec<Account>,
    #[serde(default)]
    status: Option<Status>,
}

impl TryFrom<RawConsolidatedNotification> for ConsolidatedNotification {
    type Error = CoreError;

    fn try_from(raw: RawConsolidatedNotification) -> Result<Self, Self::Error> {
        ConsolidatedNotification::new(
            raw.id,
            raw.notification_type,
            raw.created_at,
            raw.accounts,
            raw.status,
        )
    }
}

impl ConsolidatedNotification {
    pub fn new(
        id: impl Into<String>,
        notification_type: NotificationType,
        created_at: DateTime<Utc>,
        accounts: Vec<Account>,
        status: Option<Status>,
    ) -> Result<Self, CoreError> {
        let id = id.into();

        if accounts.is_empty() {
            return Err(CoreError::InvalidNotification {
                id,
                reason: "no actor accounts".to_string(),
            });
        }

        if notification_type == NotificationType::Mention {
            if accounts.len() != 1 {
                return Err(CoreError::InvalidNotification {
                    id,
                    reason: format!("mention with {} actors", accounts.len()),
                });
            }
            if status.is_none() {
                return Err(CoreError::InvalidNotification {
                    id,
                    reason: "mention without a status".to_string(),
                });
            }
        }

        Ok(Self {
            id,
            notification_type,
            created_at,
            accounts,
            status,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// All actors, most recent first
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The most recent actor
    pub fn primary_account(&self) -> &Account {
        // non-empty is checked in `new`
        &self.accounts[0]
    }

    pub fn actor_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Whether the attached status is a direct message
    pub fn is_private(&self) -> bool {
        self.status.as_ref().is_some_and(Status::is_direct)
    }
}

/// Grouping key: follows collapse together, boosts and favourites collapse
/// per target status, everything else stays one row per notification.
fn consolidation_key(notification: &Notification) -> String {
    match (notification.notification_type, &notification.status) {
        (NotificationType::Follow, _) => "follow".to_string(),
        (t @ (NotificationType::Reblog | NotificationType::Favourite), Some(status)) => {
            format!("{}:{}", t, status.id)
        }
        _ => format!("id:{}", notification.id),
    }
}

/// Merge a newest-first page of notifications into rows.
///
/// Row order follows the newest notification of each group. Groups that break
/// the row invariants are dropped with a warning.
pub fn consolidate(notifications: Vec<Notification>) -> Vec<ConsolidatedNotification> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Notification>> = Vec::new();

    for notification in notifications {
        let key = consolidation_key(&notification);
        match index.get(&key) {
            Some(&i) => groups[i].push(notification),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![notification]);
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|group| {
            let mut accounts: Vec<Account> = Vec::with_capacity(group.len());
            for n in &group {
                if !accounts.iter().any(|a| a.id == n.account.id) {
                    accounts.push(n.account.clone());
                }
            }

            let mut members = group.into_iter();
            let head = members.next()?;

            match ConsolidatedNotification::new(
                head.id,
                head.notification_type,
                head.created_at,
                accounts,
                head.status,
            ) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("Dropping notification group: {}", e);
                    None
                }
            }
        })
        .collect()
}
