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

//! Type converters from megalodon entities to Switchboard models

use megalodon::entities;
use megalodon::entities::notification::NotificationType as WireType;

use crate::error::CoreError;
use crate::models::{Account, CustomEmoji, Notification, NotificationType, Status, Visibility};

/// Convert a megalodon Status
pub fn convert_status(status: &entities::Status) -> Status {
    Status {
        id: status.id.clone(),
        url: status.url.clone(),
        account: convert_account(&status.account),
        content: status.content.clone(),
        spoiler_text: status.spoiler_text.clone(),
        visibility: convert_visibility(&status.visibility),
        sensitive: status.sensitive,
        created_at: status.created_at,
        emojis: status.emojis.iter().map(convert_emoji).collect(),
        media_count: status.media_attachments.len(),
        reblogs_count: status.reblogs_count as u64,
        favourites_count: status.favourites_count as u64,
        replies_count: status.replies_count as u64,
    }
}

/// Convert a megalodon Account
pub fn convert_account(account: &entities::Account) -> Account {
    Account {
        id: account.id.clone(),
        username: account.username.clone(),
        acct: account.acct.clone(),
        display_name: account.display_name.clone(),
        note: account.note.clone(),
        url: account.url.clone(),
        avatar: account.avatar.clone(),
        emojis: account.emojis.iter().map(convert_emoji).collect(),
        locked: account.locked,
        bot: account.bot,
    }
}

fn convert_visibility(visibility: &entities::StatusVisibility) -> Visibility {
    match visibility {
        entities::StatusVisibility::Public => Visibility::Public,
        entities::StatusVisibility::Unlisted => Visibility::Unlisted,
        entities::StatusVisibility::Private => Visibility::Private,
        entities::StatusVisibility::Direct => Visibility::Direct,
        // local-only posts are not federated, closest is unlisted
        entities::StatusVisibility::Local => Visibility::Unlisted,
    }
}

fn convert_emoji(emoji: &entities::Emoji) -> CustomEmoji {
    CustomEmoji {
        shortcode: emoji.shortcode.clone(),
        url: emoji.url.clone(),
        static_url: emoji.static_url.clone(),
        visible_in_picker: emoji.visible_in_picker,
    }
}

/// Convert a megalodon Notification.
///
/// Notifications without an account (e.g. severed relationships) yield
/// `Ok(None)`; types outside the closed set are an error.
pub fn convert_notification(
    notification: &entities::Notification,
) -> Result<Option<Notification>, CoreError> {
    let notification_type = convert_notification_type(&notification.r#type)?;

    let Some(account) = notification.account.as_ref() else {
        return Ok(None);
    };

    Ok(Some(Notification {
        id: notification.id.clone(),
        notification_type,
        created_at: notification.created_at,
        account: convert_account(account),
        status: notification.status.as_ref().map(|s| convert_status(s)),
    }))
}

fn convert_notification_type(notification_type: &WireType) -> Result<NotificationType, CoreError> {
    match notification_type {
        WireType::Mention => Ok(NotificationType::Mention),
        WireType::Reblog => Ok(NotificationType::Reblog),
        WireType::Favourite => Ok(NotificationType::Favourite),
        WireType::Follow => Ok(NotificationType::Follow),
        WireType::FollowRequest => Ok(NotificationType::FollowRequest),
        WireType::PollExpired => Ok(NotificationType::Poll),
        WireType::Status => Ok(NotificationType::Status),
        WireType::Update => Ok(NotificationType::Update),
        WireType::AdminSignup => Ok(NotificationType::AdminSignUp),
        other => Err(CoreError::UnknownNotificationType(format!("{:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_map_onto_the_closed_set() {
        assert_eq!(
            convert_notification_type(&WireType::PollExpired),
            Ok(NotificationType::Poll)
        );
        assert_eq!(
            convert_notification_type(&WireType::AdminSignup),
            Ok(NotificationType::AdminSignUp)
        );
    }

    #[test]
    fn other_types_are_rejected() {
        assert!(matches!(
            convert_notification_type(&WireType::AdminReport),
            Err(CoreError::UnknownNotificationType(_))
        ));
    }
}
