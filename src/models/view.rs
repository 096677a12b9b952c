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

//! Building blocks shared by the row view models
//!
//! Views are plain data: the UI draws them and sends [`Intent`]s back when the
//! user acts on a tap target.

use serde::{Deserialize, Serialize};

use super::{Account, AppAccount, CustomEmoji, Visibility};

/// Symbolic icon, mapped to a platform glyph by the UI
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Pencil,
    PencilLine,
    At,
    Tray,
    Boost,
    PersonAdd,
    Star,
    Poll,
    Globe,
    LockOpen,
    Lock,
    Envelope,
}

/// Semantic tint, resolved against the active theme by the UI
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    Accent,
    Orange,
    Teal,
    Blue,
    Yellow,
    Green,
    Purple,
    Gray,
}

impl Visibility {
    /// Glyph appended to mention headers
    pub fn icon(&self) -> Icon {
        match self {
            Visibility::Public => Icon::Globe,
            Visibility::Unlisted => Icon::LockOpen,
            Visibility::Private => Icon::Lock,
            Visibility::Direct => Icon::Envelope,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Body,
    Subheadline,
    Callout,
}

/// Text with inline `:shortcode:` emoji, substituted by the UI's emoji renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmojiText {
    pub text: String,
    pub emojis: Vec<CustomEmoji>,
    pub style: TextStyle,
    pub line_limit: Option<u8>,
}

impl EmojiText {
    pub fn new(text: impl Into<String>, emojis: &[CustomEmoji], style: TextStyle) -> Self {
        Self {
            text: text.into(),
            emojis: emojis.to_vec(),
            style,
            line_limit: None,
        }
    }

    pub fn line_limit(mut self, lines: u8) -> Self {
        self.line_limit = Some(lines);
        self
    }
}

/// Haptic feedback kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HapticKind {
    LightTap,
    Success,
}

/// Router destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Destination {
    AccountDetail { id: String },
    AccountDetailWithAccount { account: Account },
    AccountsList { accounts: Vec<Account> },
    AccountSettings { account: Account, app_account: AppAccount },
}

/// Something the user can cause from a row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Navigate { destination: Destination },
    OpenUrl { url: String },
    /// Make `app_account_id` the current account. Switcher-driven switches
    /// are never animated.
    SwitchAccount { app_account_id: String, animated: bool },
    Haptic { haptic: HapticKind },
    AcceptFollowRequest { account_id: String },
    RejectFollowRequest { account_id: String },
    RetryProfileFetch { app_account_id: String },
}

impl Intent {
    pub fn navigate(destination: Destination) -> Self {
        Intent::Navigate { destination }
    }

    pub fn haptic(haptic: HapticKind) -> Self {
        Intent::Haptic { haptic }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Navigate { .. } => "navigate",
            Intent::OpenUrl { .. } => "open_url",
            Intent::SwitchAccount { .. } => "switch_account",
            Intent::Haptic { .. } => "haptic",
            Intent::AcceptFollowRequest { .. } => "accept_follow_request",
            Intent::RejectFollowRequest { .. } => "reject_follow_request",
            Intent::RetryProfileFetch { .. } => "retry_profile_fetch",
        }
    }
}
