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

//! Cache module for local data storage
//!
//! Uses SQLite to persist configured logins, the current login and settings.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::AppAccount;

/// Settings key holding the id of the current login
const CURRENT_ACCOUNT_KEY: &str = "current_account_id";

/// Cache manager for local data storage
pub struct CacheManager {
    pool: SqlitePool,
}

impl CacheManager {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        info!("Opening cache database at {}", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .context("Failed to open cache database")?;

        let manager = Self { pool };
        manager.init_schema().await?;

        Ok(manager)
    }

    /// Private in-memory database; one connection so every query sees it
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let manager = Self { pool };
        manager.init_schema().await?;
        Ok(manager)
    }

    /// Initialize the database schema
    async fn init_schema(&self) -> Result<()> {
        debug!("Initializing cache schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                server TEXT NOT NULL,
                access_token TEXT,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to initialize cache schema")?;

        info!("Cache schema initialized");

        Ok(())
    }

    // ===== ACCOUNT CRUD METHODS =====

    /// Save or update a login
    pub async fn save_account(&self, account: &AppAccount) -> Result<()> {
        // the token is skipped by serde and kept in its own column
        let data = serde_json::to_string(account)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, server, access_token, data, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                server = excluded.server,
                access_token = excluded.access_token,
                data = excluded.data
            "#,
        )
        .bind(&account.id)
        .bind(&account.server)
        .bind(&account.oauth_token)
        .bind(&data)
        .bind(account.added_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("Saved account {} ({})", account.fallback_label(), account.id);
        Ok(())
    }

    /// All stored logins in the order they were added
    pub async fn get_accounts(&self) -> Result<Vec<AppAccount>> {
        let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(
            "SELECT id, data, access_token FROM accounts ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let accounts = rows
            .into_iter()
            .filter_map(|(id, data, access_token)| {
                match serde_json::from_str::<AppAccount>(&data) {
                    Ok(mut account) => {
                        account.oauth_token = access_token;
                        Some(account)
                    }
                    Err(e) => {
                        warn!("Skipping unreadable account {}: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        Ok(accounts)
    }

    pub async fn get_current_account_id(&self) -> Result<Option<String>> {
        self.get_setting(CURRENT_ACCOUNT_KEY).await
    }

    pub async fn set_current_account_id(&self, account_id: &str) -> Result<()> {
        self.set_setting(CURRENT_ACCOUNT_KEY, account_id).await
    }

    // ===== SETTINGS CRUD METHODS =====

    /// Get a setting value
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(v,)| v))
    }

    /// Set a setting value
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!("Set setting {} = {}", key, value);
        Ok(())
    }

    /// Get all settings as a map
    pub async fn get_all_settings(&self) -> Result<HashMap<String, String>> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
