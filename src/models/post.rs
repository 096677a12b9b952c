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

//! Status model, the content item a notification can point at

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Account;

/// Visibility level for a post
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
    Direct,
}

/// A custom emoji
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomEmoji {
    pub shortcode: String,
    pub url: String,
    pub static_url: String,
    #[serde(default)]
    pub visible_in_picker: bool,
}

/// A Mastodon post/status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Status {
    /// Unique identifier for this post
    pub id: String,

    /// URL to the post's HTML representation
    pub url: Option<String>,

    /// The account that authored this post
    pub account: Account,

    /// HTML content of the post
    pub content: String,

    /// Content warning text (if any)
    #[serde(default)]
    pub spoiler_text: String,

    /// Visibility of this post
    #[serde(default)]
    pub visibility: Visibility,

    /// Whether this is a sensitive post
    #[serde(default)]
    pub sensitive: bool,

    /// When this post was created
    pub created_at: DateTime<Utc>,

    /// Custom emoji used in the post
    #[serde(default)]
    pub emojis: Vec<CustomEmoji>,

    /// Number of media attachments
    #[serde(default)]
    pub media_count: usize,

    /// Number of boosts
    #[serde(default)]
    pub reblogs_count: u64,

    /// Number of favorites
    #[serde(default)]
    pub favourites_count: u64,

    /// Number of replies
    #[serde(default)]
    pub replies_count: u64,
}

impl Status {
    pub fn is_direct(&self) -> bool {
        self.visibility == Visibility::Direct
    }
}
