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

//! Switchboard Core - presentation core for Switchboard
//!
//! This binary runs as a background process next to the native UI. It owns
//! the account switcher and notification row policy and talks to the UI over
//! a JSON-lines IPC socket.

mod api;
mod cache;
mod config;
mod context;
mod error;
mod ipc;
mod logger;
mod models;
mod presentation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use api::MastodonGateway;
use cache::CacheManager;
use config::CoreConfig;
use context::AccountRegistry;
use ipc::{Collaborators, MessageHandler};
use logger::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CoreConfig::load().context("Failed to load configuration")?;

    // Initialize logging system
    Logger::init(&config)?;

    info!("Switchboard Core starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let cache = Arc::new(CacheManager::open(&config.db_path()).await?);
    let accounts = cache.get_accounts().await?;
    let current_id = cache.get_current_account_id().await?;
    info!("Loaded {} stored accounts", accounts.len());

    let registry = Arc::new(AccountRegistry::new(accounts, current_id.as_deref()));
    let gateway = Arc::new(MastodonGateway);

    let handler = Arc::new(MessageHandler::new(
        registry,
        cache,
        Collaborators {
            profiles: gateway.clone(),
            feed: gateway.clone(),
            follow_actions: gateway,
        },
        config.notifications_limit,
    ));

    match ipc::run_server(handler, &config.pipe_name).await {
        Ok(()) => {
            info!("Switchboard Core shutting down gracefully");
        }
        Err(e) => {
            error!("Fatal error in IPC server: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
