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

//! Notification type styling and the small text formats rows share

use chrono::{DateTime, Utc};
use chrono_humanize::{Accuracy, HumanTime, Tense};

use crate::models::{Icon, NotificationType, Tint};

/// Badge counts above this display as "99+"
pub const BADGE_COUNT_LIMIT: u64 = 99;

/// Separator between a header label and its timestamp
pub const HEADER_SEPARATOR: &str = " ⸱ ";

/// Singular/plural wording of a type label
struct LabelTemplate {
    one: &'static str,
    other: &'static str,
}

impl NotificationType {
    /// Badge icon; private mentions get their own glyph
    pub fn icon(&self, is_private: bool) -> Icon {
        match self {
            NotificationType::Status => Icon::Pencil,
            NotificationType::Mention if is_private => Icon::Tray,
            NotificationType::Mention => Icon::At,
            NotificationType::Reblog => Icon::Boost,
            NotificationType::Follow | NotificationType::FollowRequest => Icon::PersonAdd,
            NotificationType::AdminSignUp => Icon::PersonAdd,
            NotificationType::Favourite => Icon::Star,
            NotificationType::Poll => Icon::Poll,
            NotificationType::Update => Icon::PencilLine,
        }
    }

    /// Badge background tint
    pub fn tint(&self, is_private: bool) -> Tint {
        match self {
            NotificationType::Status => Tint::Accent,
            NotificationType::Mention if is_private => Tint::Orange,
            NotificationType::Mention => Tint::Accent,
            NotificationType::Reblog => Tint::Teal,
            NotificationType::Follow | NotificationType::FollowRequest => Tint::Blue,
            NotificationType::Favourite => Tint::Yellow,
            NotificationType::Poll => Tint::Green,
            NotificationType::Update => Tint::Purple,
            NotificationType::AdminSignUp => Tint::Gray,
        }
    }

    fn label_template(&self) -> LabelTemplate {
        let (one, other) = match self {
            NotificationType::Status => ("posted a status", "posted statuses"),
            NotificationType::Mention => ("mentioned you", "mentioned you"),
            NotificationType::Reblog => ("boosted", "boosted"),
            NotificationType::Follow => ("followed you", "followed you"),
            NotificationType::FollowRequest => {
                ("requested to follow you", "requested to follow you")
            }
            NotificationType::Favourite => ("starred", "starred"),
            NotificationType::Poll => ("poll ended", "poll ended"),
            NotificationType::Update => ("edited a post", "edited a post"),
            NotificationType::AdminSignUp => ("signed up", "signed up"),
        };
        LabelTemplate { one, other }
    }

    /// Action wording for `actor_count` actors
    pub fn label(&self, actor_count: usize) -> &'static str {
        let template = self.label_template();
        if actor_count == 1 {
            template.one
        } else {
            template.other
        }
    }
}

/// Unread badge text, saturating at "99+"
pub fn badge_text(count: u64) -> String {
    if count > BADGE_COUNT_LIMIT {
        format!("{}+", BADGE_COUNT_LIMIT)
    } else {
        count.to_string()
    }
}

/// Text between the primary actor and the type label.
///
/// One actor gets a plain space; more get " and N other(s)" for the rest.
pub fn others_suffix(actor_count: usize) -> String {
    match actor_count.saturating_sub(1) {
        0 => " ".to_string(),
        1 => " and 1 other ".to_string(),
        n => format!(" and {} others ", n),
    }
}

/// Relative timestamp such as "5 minutes ago"
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // Clock skew can put a fresh notification slightly in the future
    let delta = (created_at - now).min(chrono::Duration::zero());
    HumanTime::from(delta).to_text_en(Accuracy::Rough, Tense::Past)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_style_and_label() {
        for t in NotificationType::ALL {
            for count in [1, 3] {
                assert!(!t.label(count).is_empty(), "{} has no label", t);
            }
            // total over the closed set: these must not panic
            let _ = (t.icon(false), t.icon(true), t.tint(false), t.tint(true));
        }
    }

    #[test]
    fn private_mentions_are_distinct() {
        let t = NotificationType::Mention;
        assert_eq!(t.icon(false), Icon::At);
        assert_eq!(t.icon(true), Icon::Tray);
        assert_eq!(t.tint(true), Tint::Orange);
        assert_eq!(NotificationType::Reblog.icon(true), Icon::Boost);
    }

    #[test]
    fn badge_saturates_at_ninety_nine() {
        assert_eq!(badge_text(42), "42");
        assert_eq!(badge_text(99), "99");
        assert_eq!(badge_text(100), "99+");
        assert_eq!(badge_text(12_000), "99+");
    }

    #[test]
    fn others_suffix_counts_the_rest() {
        assert_eq!(others_suffix(1), " ");
        assert_eq!(others_suffix(2), " and 1 other ");
        assert_eq!(others_suffix(3), " and 2 others ");
    }

    #[test]
    fn future_timestamps_read_as_now() {
        let now = crate::test_support::fixed_now();
        let ahead = now + chrono::Duration::seconds(30);
        assert_eq!(relative_time(ahead, now), relative_time(now, now));
        assert_ne!(
            relative_time(now - chrono::Duration::days(3), now),
            relative_time(now, now)
        );
    }
}
