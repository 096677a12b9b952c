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

//! IPC message handler

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::context::{
    AccountRegistry, EventHaptics, EventRouter, FollowRequestActions, FollowRequests,
    NotificationFeed, ProfileFetcher, UnreadCounts,
};
use crate::error::CoreError;
use crate::log_ipc;
use crate::models::{
    consolidate, error_codes, events, methods, Account, AppAccount, ConsolidatedNotification,
    Intent, IpcError, IpcMessage,
};
use crate::presentation::{
    activate_account_row, render_account_row, render_notification_row, AccountRowContext,
    AccountRowOptions, AccountRowView, AccountRows, DispatchOutcome, IntentDispatcher,
    NotificationRowContext,
};

/// Pending events per client before the slowest one starts losing them
const EVENT_CAPACITY: usize = 256;

type HandlerResult = Result<Value, IpcError>;

/// Services the handler reaches out to
pub struct Collaborators {
    pub profiles: Arc<dyn ProfileFetcher>,
    pub feed: Arc<dyn NotificationFeed>,
    pub follow_actions: Arc<dyn FollowRequestActions>,
}

#[derive(Deserialize)]
struct AccountRowParams {
    app_account_id: String,
    #[serde(default)]
    options: AccountRowOptions,
}

#[derive(Deserialize)]
struct RenderRowsParams {
    /// Every registered login when absent
    app_account_id: Option<String>,
    #[serde(default)]
    options: AccountRowOptions,
}

#[derive(Deserialize)]
struct UnreadParams {
    token: String,
    count: u64,
}

#[derive(Deserialize)]
struct FollowRequestsParams {
    accounts: Vec<Account>,
}

#[derive(Deserialize)]
struct FollowRequestParams {
    account_id: String,
}

#[derive(Deserialize)]
struct NotificationRowParams {
    id: Option<String>,
    notification: Option<ConsolidatedNotification>,
}

#[derive(Deserialize)]
struct DispatchParams {
    intents: Vec<Intent>,
}

/// Handles incoming IPC messages and routes them to appropriate handlers
pub struct MessageHandler {
    registry: Arc<AccountRegistry>,
    cache: Arc<CacheManager>,
    rows: Arc<AccountRows>,
    unread: UnreadCounts,
    follow_requests: Arc<FollowRequests>,
    /// Last consolidated page, looked up by `notification_row.render`
    notifications: RwLock<Vec<ConsolidatedNotification>>,
    feed: Arc<dyn NotificationFeed>,
    dispatcher: IntentDispatcher,
    events: broadcast::Sender<IpcMessage>,
    shutdown: broadcast::Sender<()>,
    notifications_limit: u32,
}

impl MessageHandler {
    pub fn new(
        registry: Arc<AccountRegistry>,
        cache: Arc<CacheManager>,
        collaborators: Collaborators,
        notifications_limit: u32,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (shutdown, _) = broadcast::channel(1);

        let rows = Arc::new(AccountRows::new(collaborators.profiles));
        let follow_requests = Arc::new(FollowRequests::new());

        let dispatcher = IntentDispatcher::new(
            registry.clone(),
            rows.clone(),
            follow_requests.clone(),
            collaborators.follow_actions,
            Arc::new(EventRouter::new(events.clone())),
            Arc::new(EventHaptics::new(events.clone())),
        );

        Self {
            registry,
            cache,
            rows,
            unread: UnreadCounts::new(),
            follow_requests,
            notifications: RwLock::new(Vec::new()),
            feed: collaborators.feed,
            dispatcher,
            events,
            shutdown,
            notifications_limit,
        }
    }

    /// Events pushed to connected clients
    pub fn subscribe_events(&self) -> broadcast::Receiver<IpcMessage> {
        self.events.subscribe()
    }

    /// Fires once when a client asks the core to stop
    pub fn shutdown_signal(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    /// Turn row fetch results and current-account switches into IPC events
    pub fn spawn_event_forwarders(&self) -> Vec<JoinHandle<()>> {
        let mut updates = self.rows.subscribe();
        let tx = self.events.clone();
        let rows = tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(update) => {
                        log_ipc!(event, events::ACCOUNT_ROW_UPDATED);
                        let _ = tx.send(IpcMessage::event(events::ACCOUNT_ROW_UPDATED, json!(update)));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Dropped {} account row updates", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let mut current = self.registry.subscribe();
        let tx = self.events.clone();
        let switches = tokio::spawn(async move {
            while current.changed().await.is_ok() {
                let value = current.borrow_and_update().clone();
                log_ipc!(event, events::CURRENT_ACCOUNT_CHANGED);
                let _ = tx.send(IpcMessage::event(
                    events::CURRENT_ACCOUNT_CHANGED,
                    json!({ "current": value }),
                ));
            }
        });

        vec![rows, switches]
    }

    /// Handle an incoming IPC message
    pub async fn handle_message(&self, msg: IpcMessage) -> IpcMessage {
        let method = msg.method.as_deref().unwrap_or("unknown");
        log_ipc!(request, method, &msg.id);

        let result = match method {
            // System methods
            methods::PING => self.handle_ping().await,
            methods::SHUTDOWN => self.handle_shutdown().await,

            // Account registry
            methods::ACCOUNTS_LIST => self.handle_accounts_list().await,
            methods::ACCOUNTS_ADD => self.handle_accounts_add(&msg).await,
            methods::ACCOUNTS_CURRENT => self.handle_accounts_current().await,

            // Account switcher rows
            methods::ACCOUNT_ROW_APPEAR => self.handle_account_row_appear(&msg).await,
            methods::ACCOUNT_ROW_RENDER => self.handle_account_row_render(&msg).await,
            methods::ACCOUNT_ROW_ACTIVATE => self.handle_account_row_activate(&msg).await,
            methods::ACCOUNT_ROW_RETRY => self.handle_account_row_retry(&msg).await,
            methods::UNREAD_SET => self.handle_unread_set(&msg).await,

            // Follow requests
            methods::FOLLOW_REQUESTS_SET => self.handle_follow_requests_set(&msg).await,
            methods::FOLLOW_REQUESTS_ACCEPT => self.handle_follow_request(&msg, true).await,
            methods::FOLLOW_REQUESTS_REJECT => self.handle_follow_request(&msg, false).await,

            // Notification rows
            methods::NOTIFICATIONS_GET => self.handle_notifications_get().await,
            methods::NOTIFICATION_ROW_RENDER => self.handle_notification_row_render(&msg).await,

            methods::INTENT_DISPATCH => self.handle_intent_dispatch(&msg).await,

            // Unknown method
            _ => {
                warn!("Unknown method: {}", method);
                Err(IpcError::new(
                    error_codes::METHOD_NOT_FOUND,
                    format!("Unknown method: {}", method),
                ))
            }
        };

        let response = match result {
            Ok(value) => IpcMessage::response_ok(&msg.id, value),
            Err(error) => IpcMessage::response_err(&msg.id, error),
        };

        let success = response.error.is_none();
        log_ipc!(response, method, &msg.id, success);

        response
    }

    async fn handle_ping(&self) -> HandlerResult {
        Ok(json!({
            "pong": true,
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn handle_shutdown(&self) -> HandlerResult {
        info!("Shutdown requested via IPC");
        let _ = self.shutdown.send(());
        Ok(json!({ "status": "shutting_down" }))
    }

    async fn handle_accounts_list(&self) -> HandlerResult {
        Ok(json!({
            "accounts": self.registry.accounts().await,
            "current_id": self.registry.current_id(),
        }))
    }

    async fn handle_accounts_add(&self, msg: &IpcMessage) -> HandlerResult {
        let app_account: AppAccount = params(msg)?;

        self.cache
            .save_account(&app_account)
            .await
            .map_err(internal_error)?;
        self.registry.add(app_account.clone()).await;
        self.rows.refresh(&app_account).await;

        if self.registry.current_id().as_deref() == Some(app_account.id.as_str()) {
            self.persist_current(&app_account.id).await;
        }

        Ok(json!({ "account": app_account }))
    }

    async fn handle_accounts_current(&self) -> HandlerResult {
        Ok(json!({ "current": self.registry.current() }))
    }

    async fn handle_account_row_appear(&self, msg: &IpcMessage) -> HandlerResult {
        let AccountRowParams {
            app_account_id,
            options,
        } = params(msg)?;
        let app_account = self.app_account(&app_account_id).await?;

        // the fetch runs detached and reports through `event.account_row_updated`
        let (_, task) = self.rows.appear(&app_account).await;
        let fetch_started = task.is_some();

        let mut rendered = self.render_rows(vec![app_account], options).await;
        Ok(json!({
            "fetch_started": fetch_started,
            "row": rendered.pop(),
        }))
    }

    async fn handle_account_row_render(&self, msg: &IpcMessage) -> HandlerResult {
        let RenderRowsParams {
            app_account_id,
            options,
        } = params(msg)?;

        let accounts = match app_account_id {
            Some(id) => vec![self.app_account(&id).await?],
            None => self.registry.accounts().await,
        };

        let rows: Vec<Value> = self
            .render_rows(accounts.clone(), options)
            .await
            .into_iter()
            .zip(accounts)
            .map(|(view, app_account)| json!({ "app_account_id": app_account.id, "view": view }))
            .collect();

        Ok(json!({ "rows": rows }))
    }

    async fn handle_account_row_activate(&self, msg: &IpcMessage) -> HandlerResult {
        let AccountRowParams { app_account_id, .. } = params(msg)?;
        let app_account = self.app_account(&app_account_id).await?;
        let row = self.rows.row(&app_account).await;

        // read the current account at tap time, not at render time
        let current_id = self.registry.current_id();
        let intents = activate_account_row(&app_account, &row.profile(), current_id.as_deref());
        let outcome = self.dispatch(&intents).await?;

        Ok(json!({
            "intents": intents,
            "switched": outcome.switched_to.is_some(),
        }))
    }

    async fn handle_account_row_retry(&self, msg: &IpcMessage) -> HandlerResult {
        let AccountRowParams { app_account_id, .. } = params(msg)?;
        self.dispatch(&[Intent::RetryProfileFetch { app_account_id }])
            .await?;
        Ok(json!({ "success": true }))
    }

    async fn handle_unread_set(&self, msg: &IpcMessage) -> HandlerResult {
        let UnreadParams { token, count } = params(msg)?;
        self.unread.set(token, count).await;
        Ok(json!({ "success": true }))
    }

    async fn handle_follow_requests_set(&self, msg: &IpcMessage) -> HandlerResult {
        let FollowRequestsParams { accounts } = params(msg)?;
        let count = accounts.len();
        self.follow_requests.replace(accounts).await;
        debug!("{} pending follow requests", count);
        Ok(json!({ "count": count }))
    }

    async fn handle_follow_request(&self, msg: &IpcMessage, accept: bool) -> HandlerResult {
        let FollowRequestParams { account_id } = params(msg)?;
        let intent = if accept {
            Intent::AcceptFollowRequest { account_id }
        } else {
            Intent::RejectFollowRequest { account_id }
        };
        self.dispatch(&[intent]).await?;
        Ok(json!({ "success": true }))
    }

    async fn handle_notifications_get(&self) -> HandlerResult {
        let current = self
            .registry
            .current()
            .ok_or_else(|| core_error(CoreError::NotAuthenticated("none".to_string())))?;

        let page = self
            .feed
            .fetch_page(&current, self.notifications_limit)
            .await
            .map_err(api_error)?;

        let consolidated = consolidate(page);
        let pending = self.follow_requests.snapshot().await;
        let ctx = NotificationRowContext {
            now: Utc::now(),
            pending_follow_requests: &pending,
        };
        let rows: Vec<_> = consolidated
            .iter()
            .map(|n| render_notification_row(n, &ctx))
            .collect();

        info!("Loaded {} notification rows for {}", rows.len(), current.id);
        *self.notifications.write().await = consolidated;

        Ok(json!({ "rows": rows }))
    }

    async fn handle_notification_row_render(&self, msg: &IpcMessage) -> HandlerResult {
        let NotificationRowParams { id, notification } = params(msg)?;

        let notification = match (notification, id) {
            (Some(notification), _) => notification,
            (None, Some(id)) => self
                .notifications
                .read()
                .await
                .iter()
                .find(|n| n.id() == id)
                .cloned()
                .ok_or_else(|| core_error(CoreError::NotificationNotFound(id)))?,
            (None, None) => {
                return Err(IpcError::new(
                    error_codes::INVALID_PARAMS,
                    "Missing id or notification",
                ))
            }
        };

        let pending = self.follow_requests.snapshot().await;
        let view = render_notification_row(
            &notification,
            &NotificationRowContext {
                now: Utc::now(),
                pending_follow_requests: &pending,
            },
        );

        to_value(&view)
    }

    async fn handle_intent_dispatch(&self, msg: &IpcMessage) -> HandlerResult {
        let DispatchParams { intents } = params(msg)?;
        let outcome = self.dispatch(&intents).await?;
        Ok(json!({
            "switched_to": outcome.switched_to.map(|a| a.id),
            "retried": outcome.retried,
        }))
    }

    async fn app_account(&self, id: &str) -> Result<AppAccount, IpcError> {
        self.registry
            .get(id)
            .await
            .ok_or_else(|| core_error(CoreError::AccountNotFound(id.to_string())))
    }

    /// Render rows against one snapshot of the shared signals
    async fn render_rows(
        &self,
        accounts: Vec<AppAccount>,
        options: AccountRowOptions,
    ) -> Vec<AccountRowView> {
        let rows = join_all(accounts.iter().map(|a| self.rows.row(a))).await;
        let counts = self.unread.snapshot().await;
        let current_id = self.registry.current_id();
        let ctx = AccountRowContext {
            current_account_id: current_id.as_deref(),
            unread_counts: &counts,
        };

        rows.iter()
            .map(|row| render_account_row(&row.state(options), &ctx))
            .collect()
    }

    async fn dispatch(&self, intents: &[Intent]) -> Result<DispatchOutcome, IpcError> {
        let outcome = self.dispatcher.dispatch(intents).await.map_err(api_error)?;

        if let Some(app_account) = &outcome.switched_to {
            self.persist_current(&app_account.id).await;
        }

        Ok(outcome)
    }

    /// The switch already happened in memory; a failed write only loses it on restart
    async fn persist_current(&self, id: &str) {
        if let Err(e) = self.cache.set_current_account_id(id).await {
            warn!("Failed to persist current account {}: {:#}", id, e);
        }
    }
}

fn params<T: DeserializeOwned>(msg: &IpcMessage) -> Result<T, IpcError> {
    let value = msg.params.clone().unwrap_or_else(|| json!({}));
    serde_json::from_value(value)
        .map_err(|e| IpcError::new(error_codes::INVALID_PARAMS, format!("Invalid params: {}", e)))
}

fn to_value<T: Serialize>(value: &T) -> HandlerResult {
    serde_json::to_value(value)
        .map_err(|e| IpcError::new(error_codes::INTERNAL_ERROR, format!("Failed to encode: {}", e)))
}

fn core_error(e: CoreError) -> IpcError {
    IpcError::new(e.ipc_code(), e.to_string())
}

/// Domain errors keep their code; anything else came from the server
fn api_error(e: anyhow::Error) -> IpcError {
    match e.downcast_ref::<CoreError>() {
        Some(core) => core_error(core.clone()),
        None => IpcError::new(error_codes::API_ERROR, format!("{:#}", e)),
    }
}

fn internal_error(e: anyhow::Error) -> IpcError {
    IpcError::new(error_codes::INTERNAL_ERROR, format!("{:#}", e))
}
