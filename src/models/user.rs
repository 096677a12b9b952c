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

//! User model representing a Mastodon account (the profile side of a login)

use serde::{Deserialize, Serialize};

use super::{strip_html, CustomEmoji};

/// A Mastodon user/account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Unique identifier
    pub id: String,

    /// Username (without domain)
    pub username: String,

    /// Full account name (user@domain or user for local)
    pub acct: String,

    /// Display name, may contain `:shortcode:` emoji
    pub display_name: String,

    /// Profile bio (HTML)
    #[serde(default)]
    pub note: String,

    /// URL to the user's profile page
    #[serde(default)]
    pub url: String,

    /// URL to the user's avatar image
    pub avatar: String,

    /// Custom emoji used in display name or bio
    #[serde(default)]
    pub emojis: Vec<CustomEmoji>,

    /// Whether the account is locked (requires follow approval)
    #[serde(default)]
    pub locked: bool,

    /// Whether this is a bot account
    #[serde(default)]
    pub bot: bool,
}

impl Account {
    /// Display name, falling back to the username when the display name is blank
    pub fn safe_display_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    /// The bio without markup, used as an accessibility label
    pub fn plain_note(&self) -> String {
        strip_html(&self.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::account;

    #[test]
    fn blank_display_name_falls_back_to_username() {
        let mut a = account("1", "alice");
        a.display_name = "   ".to_string();
        assert_eq!(a.safe_display_name(), "alice");

        a.display_name = "Alice :blob:".to_string();
        assert_eq!(a.safe_display_name(), "Alice :blob:");
    }

    #[test]
    fn plain_note_strips_markup() {
        let mut a = account("1", "alice");
        a.note = "<p>Hello &amp; <a href=\"https://x.y\">welcome</a></p>".to_string();
        assert_eq!(a.plain_note(), "Hello & welcome");
    }
}
