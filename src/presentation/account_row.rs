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

//! Account switcher row: profile fetch state, render policy and activation

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;

use super::labels::badge_text;
use crate::context::ProfileFetcher;
use crate::error::CoreError;
use crate::log_fetch;
use crate::models::{
    AppAccount, Destination, EmojiText, HapticKind, Intent, ProfileState, TextStyle,
};

/// Per-screen presentation flags
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccountRowOptions {
    /// Avatar only
    pub compact: bool,
    /// Show the unread badge on non-current accounts
    pub show_badge: bool,
    /// Row sits in a navigation list and gets a disclosure chevron
    pub in_navigation: bool,
}

/// Everything one render of a row depends on locally
#[derive(Debug, Clone)]
pub struct AccountRowState {
    pub app_account: AppAccount,
    pub profile: ProfileState,
    pub options: AccountRowOptions,
}

/// Shared signals read during one render pass
pub struct AccountRowContext<'a> {
    pub current_account_id: Option<&'a str>,
    pub unread_counts: &'a HashMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvatarSlot {
    Spinner,
    Avatar {
        url: String,
        overlay: Option<AvatarOverlay>,
    },
    /// The fetch failed; tapping retries
    Retry { intent: Intent },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvatarOverlay {
    Checkmark,
    UnreadBadge { text: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FullAccountRow {
    pub avatar: AvatarSlot,
    /// Shown next to the spinner or retry glyph until the profile loads
    pub placeholder_label: Option<String>,
    pub failure: Option<String>,
    pub display_name: Option<EmojiText>,
    /// `username@server`
    pub subtitle: Option<String>,
    pub chevron: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum AccountRowView {
    Compact { avatar: AvatarSlot },
    Full(FullAccountRow),
}

/// Badge policy: checkmark on the current account, otherwise an unread badge
/// when enabled and the token has unread notifications.
fn avatar_overlay(state: &AccountRowState, ctx: &AccountRowContext<'_>) -> Option<AvatarOverlay> {
    if ctx.current_account_id == Some(state.app_account.id.as_str()) {
        return Some(AvatarOverlay::Checkmark);
    }

    if !state.options.show_badge {
        return None;
    }

    let token = state.app_account.oauth_token.as_ref()?;
    match ctx.unread_counts.get(token) {
        Some(&count) if count > 0 => Some(AvatarOverlay::UnreadBadge {
            text: badge_text(count),
        }),
        _ => None,
    }
}

fn retry_slot(app_account: &AppAccount) -> AvatarSlot {
    AvatarSlot::Retry {
        intent: Intent::RetryProfileFetch {
            app_account_id: app_account.id.clone(),
        },
    }
}

/// Render one account switcher row
pub fn render_account_row(state: &AccountRowState, ctx: &AccountRowContext<'_>) -> AccountRowView {
    if state.options.compact {
        let avatar = match &state.profile {
            ProfileState::Loading => AvatarSlot::Spinner,
            ProfileState::Loaded { account } => AvatarSlot::Avatar {
                url: account.avatar.clone(),
                overlay: None,
            },
            ProfileState::Failed { .. } => retry_slot(&state.app_account),
        };
        return AccountRowView::Compact { avatar };
    }

    let fallback = state.app_account.fallback_label().to_string();
    let chevron = state.options.in_navigation;

    let row = match &state.profile {
        ProfileState::Loading => FullAccountRow {
            avatar: AvatarSlot::Spinner,
            placeholder_label: Some(fallback),
            failure: None,
            display_name: None,
            subtitle: None,
            chevron,
        },
        ProfileState::Failed { reason } => FullAccountRow {
            avatar: retry_slot(&state.app_account),
            placeholder_label: Some(fallback),
            failure: Some(reason.clone()),
            display_name: None,
            subtitle: None,
            chevron,
        },
        ProfileState::Loaded { account } => FullAccountRow {
            avatar: AvatarSlot::Avatar {
                url: account.avatar.clone(),
                overlay: avatar_overlay(state, ctx),
            },
            placeholder_label: None,
            failure: None,
            display_name: Some(EmojiText::new(
                account.safe_display_name(),
                &account.emojis,
                TextStyle::Body,
            )),
            subtitle: Some(format!("{}@{}", account.username, state.app_account.server)),
            chevron,
        },
    };

    AccountRowView::Full(row)
}

/// Intents for a primary activation of the row.
///
/// Evaluated at tap time against a fresh current account: the current, loaded
/// account opens its settings; anything else becomes current without animation.
pub fn activate_account_row(
    app_account: &AppAccount,
    profile: &ProfileState,
    current_account_id: Option<&str>,
) -> Vec<Intent> {
    let is_current = current_account_id == Some(app_account.id.as_str());

    match (is_current, profile.account()) {
        (true, Some(account)) => vec![
            Intent::navigate(Destination::AccountSettings {
                account: account.clone(),
                app_account: app_account.clone(),
            }),
            Intent::haptic(HapticKind::LightTap),
        ],
        _ => vec![
            Intent::SwitchAccount {
                app_account_id: app_account.id.clone(),
                animated: false,
            },
            Intent::haptic(HapticKind::Success),
        ],
    }
}

/// Published whenever a row's profile state changes
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountRowUpdate {
    pub app_account_id: String,
    pub profile: ProfileState,
}

/// Live state of one row: its login, its profile and whether the fetch was started
pub struct AccountRow {
    /// Replaced when the login is re-added with a new token or name
    app_account: watch::Sender<AppAccount>,
    profile: watch::Sender<ProfileState>,
    fetch_started: AtomicBool,
}

impl AccountRow {
    pub fn new(app_account: AppAccount) -> Self {
        let (app_account, _) = watch::channel(app_account);
        let (profile, _) = watch::channel(ProfileState::Loading);
        Self {
            app_account,
            profile,
            fetch_started: AtomicBool::new(false),
        }
    }

    pub fn app_account(&self) -> AppAccount {
        self.app_account.borrow().clone()
    }

    /// Swap in an updated handle for the same login; the profile is kept
    pub fn refresh(&self, app_account: AppAccount) {
        self.app_account.send_replace(app_account);
    }

    pub fn profile(&self) -> ProfileState {
        self.profile.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.profile.subscribe()
    }

    pub fn state(&self, options: AccountRowOptions) -> AccountRowState {
        AccountRowState {
            app_account: self.app_account(),
            profile: self.profile(),
            options,
        }
    }

    /// First appearance starts the one fetch; later calls return `None`
    pub fn appear(
        self: &Arc<Self>,
        fetcher: Arc<dyn ProfileFetcher>,
        updates: broadcast::Sender<AccountRowUpdate>,
    ) -> Option<JoinHandle<()>> {
        if self.fetch_started.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.spawn_fetch(fetcher, updates))
    }

    /// Refetch after a failure
    pub fn retry(
        self: &Arc<Self>,
        fetcher: Arc<dyn ProfileFetcher>,
        updates: broadcast::Sender<AccountRowUpdate>,
    ) -> Result<JoinHandle<()>, CoreError> {
        let reset = self.profile.send_if_modified(|state| {
            if state.is_failed() {
                *state = ProfileState::Loading;
                true
            } else {
                false
            }
        });

        if !reset {
            return Err(CoreError::RetryNotAllowed(self.app_account().id));
        }

        self.fetch_started.store(true, Ordering::SeqCst);
        let _ = updates.send(AccountRowUpdate {
            app_account_id: self.app_account().id,
            profile: ProfileState::Loading,
        });

        Ok(self.spawn_fetch(fetcher, updates))
    }

    fn spawn_fetch(
        self: &Arc<Self>,
        fetcher: Arc<dyn ProfileFetcher>,
        updates: broadcast::Sender<AccountRowUpdate>,
    ) -> JoinHandle<()> {
        let row = Arc::clone(self);

        tokio::spawn(async move {
            // read at fetch time so a refreshed token is used
            let app_account = row.app_account();
            let id = app_account.id.clone();
            log_fetch!(started, id.as_str());

            let state = match fetcher.fetch(&app_account).await {
                Ok(account) => {
                    log_fetch!(loaded, id.as_str());
                    ProfileState::Loaded { account }
                }
                Err(e) => {
                    let reason = format!("{:#}", e);
                    log_fetch!(failed, id.as_str(), reason.as_str());
                    ProfileState::Failed { reason }
                }
            };

            row.profile.send_replace(state.clone());
            let _ = updates.send(AccountRowUpdate {
                app_account_id: id,
                profile: state,
            });
        })
    }
}

/// All live rows, keyed by app account id
pub struct AccountRows {
    rows: RwLock<HashMap<String, Arc<AccountRow>>>,
    fetcher: Arc<dyn ProfileFetcher>,
    updates: broadcast::Sender<AccountRowUpdate>,
}

impl AccountRows {
    pub fn new(fetcher: Arc<dyn ProfileFetcher>) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            rows: RwLock::new(HashMap::new()),
            fetcher,
            updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccountRowUpdate> {
        self.updates.subscribe()
    }

    pub async fn get(&self, app_account_id: &str) -> Option<Arc<AccountRow>> {
        self.rows.read().await.get(app_account_id).cloned()
    }

    /// Row for a login, created on first use
    pub async fn row(&self, app_account: &AppAccount) -> Arc<AccountRow> {
        if let Some(row) = self.get(&app_account.id).await {
            return row;
        }

        let mut rows = self.rows.write().await;
        rows.entry(app_account.id.clone())
            .or_insert_with(|| Arc::new(AccountRow::new(app_account.clone())))
            .clone()
    }

    /// Point an existing row at an updated handle. Rows not created yet pick
    /// up the handle on first use.
    pub async fn refresh(&self, app_account: &AppAccount) {
        if let Some(row) = self.get(&app_account.id).await {
            row.refresh(app_account.clone());
        }
    }

    /// Mark the row as appeared, starting its fetch the first time
    pub async fn appear(&self, app_account: &AppAccount) -> (Arc<AccountRow>, Option<JoinHandle<()>>) {
        let row = self.row(app_account).await;
        let task = row.appear(Arc::clone(&self.fetcher), self.updates.clone());
        (row, task)
    }

    pub async fn retry(&self, app_account_id: &str) -> Result<JoinHandle<()>, CoreError> {
        let row = self
            .get(app_account_id)
            .await
            .ok_or_else(|| CoreError::AccountNotFound(app_account_id.to_string()))?;
        row.retry(Arc::clone(&self.fetcher), self.updates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{account, StubFetcher};

    fn handle() -> AppAccount {
        AppAccount::new("acc-1", "mastodon.social").with_token("tok-1")
    }

    fn loaded() -> ProfileState {
        let mut alice = account("1", "alice");
        alice.display_name = "Alice :wave:".to_string();
        ProfileState::Loaded { account: alice }
    }

    fn state(profile: ProfileState, options: AccountRowOptions) -> AccountRowState {
        AccountRowState {
            app_account: handle(),
            profile,
            options,
        }
    }

    fn full() -> AccountRowOptions {
        AccountRowOptions {
            compact: false,
            show_badge: true,
            in_navigation: false,
        }
    }

    fn render(state: &AccountRowState, current: Option<&str>, counts: &[(&str, u64)]) -> AccountRowView {
        let counts: HashMap<String, u64> =
            counts.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        render_account_row(
            state,
            &AccountRowContext {
                current_account_id: current,
                unread_counts: &counts,
            },
        )
    }

    fn full_row(view: AccountRowView) -> FullAccountRow {
        match view {
            AccountRowView::Full(row) => row,
            other => panic!("expected full row, got {:?}", other),
        }
    }

    fn overlay(view: AccountRowView) -> Option<AvatarOverlay> {
        match full_row(view).avatar {
            AvatarSlot::Avatar { overlay, .. } => overlay,
            other => panic!("expected avatar, got {:?}", other),
        }
    }

    #[test]
    fn compact_loading_is_a_bare_spinner() {
        let options = AccountRowOptions {
            compact: true,
            ..full()
        };
        let view = render(&state(ProfileState::Loading, options), None, &[]);
        assert_eq!(view, AccountRowView::Compact { avatar: AvatarSlot::Spinner });
    }

    #[test]
    fn compact_loaded_is_avatar_only() {
        let options = AccountRowOptions {
            compact: true,
            ..full()
        };
        let view = render(&state(loaded(), options), Some("acc-1"), &[("tok-1", 5)]);
        assert_eq!(
            view,
            AccountRowView::Compact {
                avatar: AvatarSlot::Avatar {
                    url: "https://files.example/1.png".to_string(),
                    overlay: None,
                }
            }
        );
    }

    #[test]
    fn full_loading_shows_fallback_label() {
        let row = full_row(render(&state(ProfileState::Loading, full()), None, &[]));
        assert_eq!(row.avatar, AvatarSlot::Spinner);
        assert_eq!(row.placeholder_label.as_deref(), Some("acc-1"));
        assert!(row.display_name.is_none());

        let mut named = state(ProfileState::Loading, full());
        named.app_account.account_name = Some("Alice".to_string());
        let row = full_row(render(&named, None, &[]));
        assert_eq!(row.placeholder_label.as_deref(), Some("Alice"));
    }

    #[test]
    fn full_loaded_shows_name_and_handle() {
        let row = full_row(render(&state(loaded(), full()), None, &[]));
        let name = row.display_name.unwrap();
        assert_eq!(name.text, "Alice :wave:");
        assert_eq!(row.subtitle.as_deref(), Some("alice@mastodon.social"));
        assert!(row.placeholder_label.is_none());
        assert!(!row.chevron);
    }

    #[test]
    fn chevron_only_in_navigation() {
        let options = AccountRowOptions {
            in_navigation: true,
            ..full()
        };
        assert!(full_row(render(&state(loaded(), options), None, &[])).chevron);
    }

    #[test]
    fn checkmark_beats_unread_badge() {
        let view = render(&state(loaded(), full()), Some("acc-1"), &[("tok-1", 12)]);
        assert_eq!(overlay(view), Some(AvatarOverlay::Checkmark));
    }

    #[test]
    fn unread_badge_on_other_accounts() {
        let view = render(&state(loaded(), full()), Some("other"), &[("tok-1", 42)]);
        assert_eq!(
            overlay(view),
            Some(AvatarOverlay::UnreadBadge {
                text: "42".to_string()
            })
        );

        let view = render(&state(loaded(), full()), Some("other"), &[("tok-1", 100)]);
        assert_eq!(
            overlay(view),
            Some(AvatarOverlay::UnreadBadge {
                text: "99+".to_string()
            })
        );
    }

    #[test]
    fn no_badge_without_flag_token_or_count() {
        let hidden = AccountRowOptions {
            show_badge: false,
            ..full()
        };
        assert_eq!(overlay(render(&state(loaded(), hidden), None, &[("tok-1", 3)])), None);
        assert_eq!(overlay(render(&state(loaded(), full()), None, &[("tok-1", 0)])), None);
        assert_eq!(overlay(render(&state(loaded(), full()), None, &[])), None);

        let mut tokenless = state(loaded(), full());
        tokenless.app_account.oauth_token = None;
        assert_eq!(overlay(render(&tokenless, None, &[("tok-1", 3)])), None);
    }

    #[test]
    fn failed_fetch_offers_retry() {
        let failed = ProfileState::Failed {
            reason: "timeout".to_string(),
        };
        let row = full_row(render(&state(failed, full()), None, &[]));
        assert_eq!(row.failure.as_deref(), Some("timeout"));
        assert_eq!(row.placeholder_label.as_deref(), Some("acc-1"));
        assert_eq!(
            row.avatar,
            AvatarSlot::Retry {
                intent: Intent::RetryProfileFetch {
                    app_account_id: "acc-1".to_string()
                }
            }
        );
    }

    #[test]
    fn current_loaded_account_opens_settings() {
        let intents = activate_account_row(&handle(), &loaded(), Some("acc-1"));
        assert_eq!(intents.len(), 2);
        assert!(matches!(
            &intents[0],
            Intent::Navigate {
                destination: Destination::AccountSettings { app_account, .. }
            } if app_account.id == "acc-1"
        ));
        assert_eq!(intents[1], Intent::haptic(HapticKind::LightTap));
        assert!(!intents
            .iter()
            .any(|i| matches!(i, Intent::SwitchAccount { .. })));
    }

    #[test]
    fn other_account_switches_without_animation() {
        for profile in [loaded(), ProfileState::Loading] {
            let intents = activate_account_row(&handle(), &profile, Some("other"));
            assert_eq!(
                intents,
                vec![
                    Intent::SwitchAccount {
                        app_account_id: "acc-1".to_string(),
                        animated: false,
                    },
                    Intent::haptic(HapticKind::Success),
                ]
            );
        }
    }

    #[test]
    fn current_but_unloaded_account_switches() {
        let intents = activate_account_row(&handle(), &ProfileState::Loading, Some("acc-1"));
        assert!(matches!(intents[0], Intent::SwitchAccount { animated: false, .. }));
    }

    #[tokio::test]
    async fn appearing_twice_fetches_once() {
        let fetcher = Arc::new(StubFetcher::succeeding(account("1", "alice")));
        let rows = AccountRows::new(fetcher.clone());
        let mut updates = rows.subscribe();

        let (row, task) = rows.appear(&handle()).await;
        task.expect("first appearance fetches").await.unwrap();
        let (_, again) = rows.appear(&handle()).await;
        assert!(again.is_none());

        assert_eq!(fetcher.calls(), 1);
        assert!(matches!(row.profile(), ProfileState::Loaded { .. }));
        let update = updates.recv().await.unwrap();
        assert_eq!(update.app_account_id, "acc-1");
    }

    #[tokio::test]
    async fn failure_is_explicit_and_retryable() {
        let fetcher = Arc::new(StubFetcher::failing("network down"));
        let rows = AccountRows::new(fetcher.clone());

        let (row, task) = rows.appear(&handle()).await;
        task.unwrap().await.unwrap();
        assert_eq!(
            row.profile(),
            ProfileState::Failed {
                reason: "network down".to_string()
            }
        );

        fetcher.succeed_with(account("1", "alice"));
        rows.retry("acc-1").await.unwrap().await.unwrap();
        assert!(matches!(row.profile(), ProfileState::Loaded { .. }));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn refreshed_handle_is_used_for_render_and_retry() {
        let fetcher = Arc::new(StubFetcher::failing("unauthorized"));
        let rows = AccountRows::new(fetcher.clone());

        let (row, task) = rows.appear(&handle()).await;
        task.unwrap().await.unwrap();
        assert_eq!(fetcher.last_token().as_deref(), Some("tok-1"));

        let renewed = handle().with_token("tok-2").with_account_name("Alice");
        rows.refresh(&renewed).await;

        let state = row.state(full());
        assert_eq!(state.app_account.oauth_token.as_deref(), Some("tok-2"));
        let view = full_row(render(&state, None, &[("tok-2", 7)]));
        assert_eq!(view.placeholder_label.as_deref(), Some("Alice"));

        fetcher.succeed_with(account("1", "alice"));
        rows.retry("acc-1").await.unwrap().await.unwrap();
        assert_eq!(fetcher.last_token().as_deref(), Some("tok-2"));
        assert_eq!(
            overlay(render(&row.state(full()), None, &[("tok-1", 3), ("tok-2", 7)])),
            Some(AvatarOverlay::UnreadBadge {
                text: "7".to_string()
            })
        );
    }

    #[tokio::test]
    async fn retry_needs_a_failure() {
        let fetcher = Arc::new(StubFetcher::succeeding(account("1", "alice")));
        let rows = AccountRows::new(fetcher);

        assert_eq!(
            rows.retry("acc-1").await.err(),
            Some(CoreError::AccountNotFound("acc-1".to_string()))
        );

        let (_, task) = rows.appear(&handle()).await;
        task.unwrap().await.unwrap();
        assert_eq!(
            rows.retry("acc-1").await.err(),
            Some(CoreError::RetryNotAllowed("acc-1".to_string()))
        );
    }
}
