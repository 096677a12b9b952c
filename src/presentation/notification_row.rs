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

//! Notification row: how a consolidated notification is laid out and which
//! intents its tap targets carry

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::labels::{others_suffix, relative_time, HEADER_SEPARATOR};
use crate::models::{
    Account, ConsolidatedNotification, Destination, EmojiText, HapticKind, Icon, Intent,
    NotificationType, Status, TextStyle, Tint,
};

/// Body line cap for non-mention statuses
const STATUS_LINE_LIMIT: u8 = 4;
/// Line cap for the actor name and the follower bio
const HEADER_LINE_LIMIT: u8 = 3;
const BIO_LINE_LIMIT: u8 = 3;

/// Inputs of one render besides the notification itself
pub struct NotificationRowContext<'a> {
    pub now: DateTime<Utc>,
    pub pending_follow_requests: &'a [Account],
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TypeBadge {
    pub icon: Icon,
    pub tint: Tint,
}

/// Decorative icon; hidden glyphs are skipped by assistive technology
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Glyph {
    pub icon: Icon,
    pub accessibility_hidden: bool,
}

impl Glyph {
    fn decorative(icon: Icon) -> Self {
        Self {
            icon,
            accessibility_hidden: true,
        }
    }
}

/// The header label already names the actors and the type, so the cluster
/// is always hidden from assistive technology.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeadingCluster {
    /// Single actor: their avatar with the type badge overlaid
    ActorAvatar {
        avatar_url: String,
        badge: TypeBadge,
        on_tap: Intent,
        accessibility_hidden: bool,
    },
    /// Several actors: the badge alone at avatar size
    TypeBadge {
        badge: TypeBadge,
        accessibility_hidden: bool,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StripAvatar {
    pub account_id: String,
    pub avatar_url: String,
    pub on_tap: Intent,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeaderLabel {
    pub actor_name: EmojiText,
    /// " " for one actor, " and N others " for more
    pub others: String,
    pub action: String,
    pub timestamp: String,
    pub visibility_glyph: Option<Glyph>,
}

impl HeaderLabel {
    /// The label as one line of text
    pub fn plain_text(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.actor_name.text, self.others, self.action, HEADER_SEPARATOR, self.timestamp
        )
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Header {
    /// Every actor, only when there is more than one
    pub avatar_strip: Vec<StripAvatar>,
    pub label: HeaderLabel,
    pub accessibility_hidden: bool,
    pub on_tap: Intent,
}

/// Flags for the status row renderer
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusDisplayMode {
    pub compact: bool,
    pub interactive: bool,
    pub show_actions: bool,
    pub text_disabled: bool,
    pub line_limit: Option<u8>,
}

impl StatusDisplayMode {
    fn full() -> Self {
        Self {
            compact: true,
            interactive: true,
            show_actions: true,
            text_disabled: false,
            line_limit: None,
        }
    }

    fn preview() -> Self {
        Self {
            compact: true,
            interactive: false,
            show_actions: false,
            text_disabled: true,
            line_limit: Some(STATUS_LINE_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bio {
    pub text: EmojiText,
    pub accessibility_label: String,
    /// Links are sent back as `open_url` intents
    pub links_routed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Body {
    Status {
        status: Status,
        mode: StatusDisplayMode,
    },
    Account {
        handle: String,
        bio: Option<Bio>,
        on_tap: Intent,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FollowRequestButtons {
    pub accept: Intent,
    pub reject: Intent,
}

/// Exposed to assistive technology, not drawn
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccessibilityAction {
    pub label: String,
    pub intents: Vec<Intent>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationRowView {
    pub notification_id: String,
    pub leading: LeadingCluster,
    pub header: Header,
    pub body: Body,
    pub follow_request: Option<FollowRequestButtons>,
    pub accessibility_actions: Vec<AccessibilityAction>,
}

/// Where a tap on the header or the account body leads
fn actors_destination(notification: &ConsolidatedNotification) -> Intent {
    if notification.actor_count() == 1 {
        Intent::navigate(Destination::AccountDetailWithAccount {
            account: notification.primary_account().clone(),
        })
    } else {
        Intent::navigate(Destination::AccountsList {
            accounts: notification.accounts().to_vec(),
        })
    }
}

fn type_badge(notification: &ConsolidatedNotification) -> TypeBadge {
    let is_private = notification.is_private();
    let t = notification.notification_type();
    TypeBadge {
        icon: t.icon(is_private),
        tint: t.tint(is_private),
    }
}

fn leading_cluster(notification: &ConsolidatedNotification) -> LeadingCluster {
    let badge = type_badge(notification);

    if notification.actor_count() == 1 {
        let actor = notification.primary_account();
        LeadingCluster::ActorAvatar {
            avatar_url: actor.avatar.clone(),
            badge,
            on_tap: Intent::navigate(Destination::AccountDetailWithAccount {
                account: actor.clone(),
            }),
            accessibility_hidden: true,
        }
    } else {
        LeadingCluster::TypeBadge {
            badge,
            accessibility_hidden: true,
        }
    }
}

fn header(notification: &ConsolidatedNotification, now: DateTime<Utc>) -> Header {
    let t = notification.notification_type();
    let count = notification.actor_count();
    let actor = notification.primary_account();

    let avatar_strip = if count > 1 {
        notification
            .accounts()
            .iter()
            .map(|account| StripAvatar {
                account_id: account.id.clone(),
                avatar_url: account.avatar.clone(),
                on_tap: Intent::navigate(Destination::AccountDetailWithAccount {
                    account: account.clone(),
                }),
            })
            .collect()
    } else {
        Vec::new()
    };

    let visibility_glyph = match (t, notification.status()) {
        (NotificationType::Mention, Some(status)) => Some(Glyph::decorative(status.visibility.icon())),
        _ => None,
    };

    Header {
        avatar_strip,
        label: HeaderLabel {
            actor_name: EmojiText::new(
                actor.safe_display_name(),
                &actor.emojis,
                TextStyle::Subheadline,
            )
            .line_limit(HEADER_LINE_LIMIT),
            others: others_suffix(count),
            action: t.label(count).to_string(),
            timestamp: relative_time(notification.created_at(), now),
            visibility_glyph,
        },
        // the status body already reads out a mention
        accessibility_hidden: t == NotificationType::Mention,
        on_tap: actors_destination(notification),
    }
}

fn body(notification: &ConsolidatedNotification) -> Body {
    let t = notification.notification_type();

    if let Some(status) = notification.status() {
        let mode = if t == NotificationType::Mention {
            StatusDisplayMode::full()
        } else {
            StatusDisplayMode::preview()
        };
        return Body::Status {
            status: status.clone(),
            mode,
        };
    }

    let actor = notification.primary_account();
    let bio = (t == NotificationType::Follow).then(|| Bio {
        text: EmojiText::new(actor.note.clone(), &actor.emojis, TextStyle::Callout)
            .line_limit(BIO_LINE_LIMIT),
        accessibility_label: actor.plain_note(),
        links_routed: true,
    });

    Body::Account {
        handle: format!("@{}", actor.acct),
        bio,
        on_tap: actors_destination(notification),
    }
}

fn follow_request_buttons(
    notification: &ConsolidatedNotification,
    pending: &[Account],
) -> Option<FollowRequestButtons> {
    if notification.notification_type() != NotificationType::FollowRequest {
        return None;
    }

    let actor_id = &notification.primary_account().id;
    pending
        .iter()
        .any(|a| &a.id == actor_id)
        .then(|| FollowRequestButtons {
            accept: Intent::AcceptFollowRequest {
                account_id: actor_id.clone(),
            },
            reject: Intent::RejectFollowRequest {
                account_id: actor_id.clone(),
            },
        })
}

fn accessibility_actions(notification: &ConsolidatedNotification) -> Vec<AccessibilityAction> {
    if notification.notification_type() != NotificationType::Follow {
        return Vec::new();
    }

    notification
        .accounts()
        .iter()
        .map(|account| AccessibilityAction {
            label: format!("@{}", account.username),
            intents: vec![
                Intent::haptic(HapticKind::Success),
                Intent::navigate(Destination::AccountDetail {
                    id: account.id.clone(),
                }),
            ],
        })
        .collect()
}

/// Render one notification row
pub fn render_notification_row(
    notification: &ConsolidatedNotification,
    ctx: &NotificationRowContext<'_>,
) -> NotificationRowView {
    NotificationRowView {
        notification_id: notification.id().to_string(),
        leading: leading_cluster(notification),
        header: header(notification, ctx.now),
        body: body(notification),
        follow_request: follow_request_buttons(notification, ctx.pending_follow_requests),
        accessibility_actions: accessibility_actions(notification),
    }
}
